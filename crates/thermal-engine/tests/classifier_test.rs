use proptest::prelude::*;
use test_fixtures::levels;
use thermal_core::types::nan_array;
use thermal_core::{Severity, ThrottlingArray};
use thermal_engine::{classify, SeverityPair, ThresholdView};

const NAN: f64 = f64::NAN;

fn skin_hot() -> (ThrottlingArray, ThrottlingArray) {
    (
        levels([NAN, 35.0, 45.0, 55.0, 65.0, 85.0]),
        [0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0],
    )
}

fn hot_view<'a>(hot: &'a ThrottlingArray, hyst: &'a ThrottlingArray, unset: &'a ThrottlingArray, zeros: &'a ThrottlingArray) -> ThresholdView<'a> {
    ThresholdView {
        hot,
        hot_hysteresis: hyst,
        cold: unset,
        cold_hysteresis: zeros,
    }
}

fn hot_only(previous: Severity, value: f64) -> Severity {
    let (hot, hyst) = skin_hot();
    let (unset, zeros) = (nan_array::unset(), nan_array::zeros());
    let view = hot_view(&hot, &hyst, &unset, &zeros);
    classify(&view, SeverityPair::new(previous, Severity::None), value).hot
}

// ── Hot thresholds ───────────────────────────────────────────────────────

#[test]
fn test_rising_reading_lands_in_its_bucket() {
    assert_eq!(hot_only(Severity::None, 30.0), Severity::None);
    assert_eq!(hot_only(Severity::None, 35.0), Severity::Moderate);
    assert_eq!(hot_only(Severity::None, 46.0), Severity::Severe);
    assert_eq!(hot_only(Severity::None, 90.0), Severity::Shutdown);
}

#[test]
fn test_hysteresis_holds_severity_inside_band() {
    let first = hot_only(Severity::None, 46.0);
    assert_eq!(first, Severity::Severe);
    // 44 > 45 - 2, so the level is held.
    assert_eq!(hot_only(first, 44.0), Severity::Severe);
}

#[test]
fn test_leaving_hysteresis_band_releases_one_level() {
    assert_eq!(hot_only(Severity::Severe, 43.0), Severity::Moderate);
    assert_eq!(hot_only(Severity::Severe, 42.5), Severity::Moderate);
}

#[test]
fn test_rising_ignores_hysteresis() {
    assert_eq!(hot_only(Severity::Moderate, 56.0), Severity::Critical);
}

#[test]
fn test_stale_previous_can_release_two_levels_in_one_pass() {
    // Known quirk: the relaxed level is taken whenever the fresh level is
    // below the stored one, however stale that stored level is.
    assert_eq!(hot_only(Severity::Critical, 40.0), Severity::Moderate);
}

#[test]
fn test_unset_thresholds_never_match() {
    let unset = nan_array::unset();
    let zeros = nan_array::zeros();
    let view = hot_view(&unset, &zeros, &unset, &zeros);
    let out = classify(&view, SeverityPair::default(), 1.0e6);
    assert_eq!(out, SeverityPair::default());
}

// ── Cold thresholds ──────────────────────────────────────────────────────

fn cold_only(previous: Severity, value: f64) -> Severity {
    let cold = levels([15.0, 10.0, 5.0, 0.0, -5.0, -10.0]);
    let hyst = [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0];
    let unset = nan_array::unset();
    let zeros = nan_array::zeros();
    let view = ThresholdView {
        hot: &unset,
        hot_hysteresis: &zeros,
        cold: &cold,
        cold_hysteresis: &hyst,
    };
    classify(&view, SeverityPair::new(Severity::None, previous), value).cold
}

#[test]
fn test_falling_reading_raises_cold_severity() {
    assert_eq!(cold_only(Severity::None, 20.0), Severity::None);
    assert_eq!(cold_only(Severity::None, 4.0), Severity::Severe);
    assert_eq!(cold_only(Severity::None, -20.0), Severity::Shutdown);
}

#[test]
fn test_cold_hysteresis_holds_while_warming() {
    assert_eq!(cold_only(Severity::Severe, 5.5), Severity::Severe);
    assert_eq!(cold_only(Severity::Severe, 6.5), Severity::Moderate);
}

#[test]
fn test_status_is_the_worse_direction() {
    let pair = SeverityPair::new(Severity::Light, Severity::Critical);
    assert_eq!(pair.status(), Severity::Critical);
    let pair = SeverityPair::new(Severity::Emergency, Severity::None);
    assert_eq!(pair.status(), Severity::Emergency);
}

// ── Properties ───────────────────────────────────────────────────────────

fn arb_thresholds() -> impl Strategy<Value = ThrottlingArray> {
    proptest::collection::vec(prop_oneof![Just(NAN), -50.0f64..150.0], 7).prop_map(|v| {
        let mut out = [0.0; 7];
        out.copy_from_slice(&v);
        out
    })
}

fn arb_hysteresis() -> impl Strategy<Value = ThrottlingArray> {
    proptest::collection::vec(0.01f64..10.0, 7).prop_map(|v| {
        let mut out = [0.0; 7];
        out.copy_from_slice(&v);
        out
    })
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    (0usize..7).prop_map(|i| Severity::from_index(i).unwrap())
}

proptest! {
    // With strictly positive hysteresis, feeding the output back as the
    // previous severity on the same value is a fixed point.
    #[test]
    fn test_classification_is_idempotent(
        hot in arb_thresholds(),
        hot_h in arb_hysteresis(),
        cold in arb_thresholds(),
        cold_h in arb_hysteresis(),
        prev_hot in arb_severity(),
        prev_cold in arb_severity(),
        value in -80.0f64..180.0,
    ) {
        let view = ThresholdView {
            hot: &hot,
            hot_hysteresis: &hot_h,
            cold: &cold,
            cold_hysteresis: &cold_h,
        };
        let once = classify(&view, SeverityPair::new(prev_hot, prev_cold), value);
        let twice = classify(&view, once, value);
        prop_assert_eq!(once, twice);
    }

    // Evenly spaced thresholds with hysteresis under half a gap: moving into
    // the neighbouring band changes severity by at most one level.
    #[test]
    fn test_crossing_one_boundary_moves_at_most_one_level(
        base in -20.0f64..60.0,
        gap in 2.0f64..20.0,
        hyst in proptest::collection::vec(0.0f64..0.99, 6),
        band in 0usize..7,
        up in any::<bool>(),
        frac1 in 0.0f64..0.99,
        frac2 in 0.0f64..0.99,
    ) {
        let mut hot = nan_array::unset();
        let mut hot_h = nan_array::zeros();
        for i in 1..7 {
            hot[i] = base + gap * i as f64;
            hot_h[i] = hyst[i - 1] * gap / 2.0;
        }
        let band_start = |b: usize| base + gap * b as f64;
        let next_band = if up { (band + 1).min(6) } else { band.saturating_sub(1) };

        let unset = nan_array::unset();
        let zeros = nan_array::zeros();
        let view = ThresholdView {
            hot: &hot,
            hot_hysteresis: &hot_h,
            cold: &unset,
            cold_hysteresis: &zeros,
        };
        let v1 = band_start(band) + frac1 * gap;
        let v2 = band_start(next_band) + frac2 * gap;
        let first = classify(&view, SeverityPair::default(), v1);
        let second = classify(&view, first, v2);
        let step = (first.hot.index() as i64 - second.hot.index() as i64).abs();
        prop_assert!(step <= 1, "moved {} levels: {:?} -> {:?}", step, first.hot, second.hot);
    }
}
