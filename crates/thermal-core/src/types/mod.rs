//! Sensor, cooling-device, and reading types.

pub mod collections;
pub mod cooling;
pub mod identifiers;
pub mod readings;
pub mod sensor;
pub mod throttling;

pub use cooling::{CdevInfo, CoolingType};
pub use identifiers::{CdevId, SensorId};
pub use readings::{CoolingDevice, Temperature, TemperatureThreshold};
pub use sensor::{Formula, LinkedSensor, SensorInfo, SensorType, VirtualSensorInfo};
pub use throttling::{nan_array, CdevWeight, ThrottleType, ThrottlingArray, ThrottlingInfo};
