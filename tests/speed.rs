use gpx_tcx_rs::error::ConfigError;
use gpx_tcx_rs::pipeline::geo::haversine_distance;
use gpx_tcx_rs::pipeline::speed::SpeedBand;
use gpx_tcx_rs::types::pace::TargetPace;

#[test]
fn haversine_matches_known_distances() {
    assert_eq!(haversine_distance(52.0, 13.0, 52.0, 13.0), 0.0);

    // one degree of latitude on a 6371 km sphere
    let degree = haversine_distance(0.0, 0.0, 1.0, 0.0);
    assert!((degree - 111_194.93).abs() < 0.1, "{degree}");

    let berlin_paris = haversine_distance(52.5200, 13.4050, 48.8566, 2.3522);
    assert!((berlin_paris - 877_500.0).abs() < 2_000.0, "{berlin_paris}");
}

#[test]
fn pace_parses_minutes_and_seconds() {
    let pace: TargetPace = "5:30".parse().expect("pace");
    assert_eq!(pace.seconds_per_km(), 330.0);
    assert!((pace.target_speed_mps() - 1000.0 / 330.0).abs() < 1e-12);
    assert_eq!(pace.to_string(), "5:30");
}

#[test]
fn pace_parses_bare_minutes() {
    let pace: TargetPace = "6".parse().expect("pace");
    assert_eq!(pace.seconds_per_km(), 360.0);

    let pace: TargetPace = "4.5".parse().expect("pace");
    assert_eq!(pace.seconds_per_km(), 270.0);
}

#[test]
fn pace_rejects_garbage_and_zero() {
    for input in ["fast", "5:xx", "0:00", "0", "-3", ""] {
        let err = input.parse::<TargetPace>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPace(_)), "{input}");
    }
}

#[test]
fn pace_outside_human_range_is_rejected() {
    for input in ["1e12", "0:10", "61:00", "inf", "NaN"] {
        let err = input.parse::<TargetPace>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPace(_)), "{input}");
    }
    assert!(TargetPace::from_seconds_per_km(1e12).is_err());
    assert_eq!("60:00".parse::<TargetPace>().expect("slowest").seconds_per_km(), 3600.0);
    assert_eq!("0:30".parse::<TargetPace>().expect("fastest").seconds_per_km(), 30.0);
}

#[test]
fn default_pace_is_five_thirty() {
    assert_eq!(TargetPace::default().seconds_per_km(), 330.0);
}

fn band() -> SpeedBand {
    SpeedBand::from_pace(&TargetPace::default())
}

#[test]
fn band_is_fifteen_percent_around_target() {
    let band = band();
    assert!((band.min - band.target * 0.85).abs() < 1e-12);
    assert!((band.max - band.target * 1.15).abs() < 1e-12);
}

#[test]
fn in_band_speed_passes_through() {
    let band = band();
    assert_eq!(band.normalize(band.target), band.target);
}

#[test]
fn slow_speed_is_lifted_to_band_floor() {
    let band = band();
    assert_eq!(band.normalize(0.0), band.min);
    assert_eq!(band.normalize(1.0), band.min);
}

#[test]
fn moderate_overshoot_stays_at_band_ceiling() {
    let band = band();
    assert_eq!(band.normalize(band.max * 1.2), band.max);
}

#[test]
fn far_overshoot_saturates_toward_ceiling() {
    let band = band();
    let near = band.normalize(band.max * 1.5 + 0.01);
    let far = band.normalize(1.0e9);

    assert!(near < band.min + 0.01, "{near}");
    assert!(far <= band.max && band.max - far < 1e-6, "{far}");
    assert!(band.normalize(100.0) > band.normalize(20.0));
}

#[test]
fn every_raw_speed_lands_in_band() {
    let band = band();
    for step in 0..2_000 {
        let raw = step as f64 * 0.05;
        let speed = band.normalize(raw);
        assert!(band.contains(speed), "raw {raw} -> {speed}");
    }
}
