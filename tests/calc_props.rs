// tests/calc_props.rs
use vlf_research_hub::calc::{
    frequency_to_wavelength, frequency_to_wavelength_from_text, great_circle_distance,
    great_circle_distance_from_text, waveguide_parameters, waveguide_parameters_from_text,
    Propagation, SPEED_OF_LIGHT_M_S,
};
use vlf_research_hub::CalcError;

fn close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * b.abs().max(1.0)
}

#[test]
fn wavelength_times_frequency_is_c() {
    for f in [3.0e3, 19.8e3, 20.0e3, 30.0e3, -5.0e3, 1.0, 1.0e9, 0.5] {
        let r = frequency_to_wavelength(f).unwrap();
        assert!(close(r.wavelength_m * f, SPEED_OF_LIGHT_M_S, 1e-12), "f={f}");
    }
}

#[test]
fn twenty_khz_is_about_fifteen_km() {
    let r = frequency_to_wavelength(20_000.0).unwrap();
    assert!((r.wavelength_m - 14_989.6229).abs() < 1e-3);
    assert!((r.wavelength_km.unwrap() - 14.9896).abs() < 1e-3);
}

#[test]
fn km_form_uses_magnitude() {
    let r = frequency_to_wavelength(-20_000.0).unwrap();
    assert!(r.wavelength_km.is_some());
    assert!(frequency_to_wavelength(299_000.0).unwrap().wavelength_km.is_some());
    assert!(frequency_to_wavelength(300_000.0).unwrap().wavelength_km.is_none());
}

#[test]
fn wavelength_input_errors() {
    assert_eq!(frequency_to_wavelength(0.0), Err(CalcError::DivisionByZero));
    assert_eq!(
        frequency_to_wavelength_from_text("0"),
        Err(CalcError::DivisionByZero)
    );
    assert_eq!(
        frequency_to_wavelength_from_text("twenty"),
        Err(CalcError::InvalidInput)
    );
    assert_eq!(
        CalcError::DivisionByZero.to_string(),
        "Frequency cannot be zero"
    );
    assert_eq!(CalcError::InvalidInput.to_string(), "Invalid input");
}

#[test]
fn distance_is_symmetric_and_zero_on_itself() {
    let pts = [
        (41.0, 29.0),
        (37.4, -122.2),
        (-33.9, 151.2),
        (90.0, 0.0),
        (0.0, 179.9),
        (0.0, -179.9),
    ];
    for &(a_lat, a_lon) in &pts {
        let same = great_circle_distance(a_lat, a_lon, a_lat, a_lon).unwrap();
        assert!(same.distance_km.abs() < 1e-9);
        for &(b_lat, b_lon) in &pts {
            let ab = great_circle_distance(a_lat, a_lon, b_lat, b_lon).unwrap();
            let ba = great_circle_distance(b_lat, b_lon, a_lat, a_lon).unwrap();
            assert!(ab.distance_km >= 0.0);
            assert!((ab.distance_km - ba.distance_km).abs() < 1e-6);
        }
    }
}

#[test]
fn longitude_wraps_modulo_360() {
    let d = great_circle_distance(10.0, 20.0, 10.0, 380.0).unwrap();
    assert!(d.distance_km < 1e-6);
}

#[test]
fn istanbul_to_stanford() {
    // haversine with R = 6371 km
    let d = great_circle_distance(41.0, 29.0, 37.4, -122.2).unwrap();
    assert!((d.distance_km - 10_818.3).abs() < 1.0, "got {}", d.distance_km);
    assert_eq!(d.display(), "Distance: 10818.3 km");
}

#[test]
fn antipodes_are_half_the_circumference() {
    let d = great_circle_distance(0.0, 0.0, 0.0, 180.0).unwrap();
    assert!((d.distance_km - std::f64::consts::PI * 6371.0).abs() < 1e-6);
}

#[test]
fn distance_text_errors() {
    assert_eq!(
        great_circle_distance_from_text("41", "29", "north", "-122.2"),
        Err(CalcError::InvalidInput)
    );
    assert!(great_circle_distance_from_text(" 41 ", "29", "37.4", "-122.2").is_ok());
}

#[test]
fn velocities_multiply_to_one_above_cutoff() {
    let cutoff = waveguide_parameters(1.0, 70.0).unwrap().cutoff_freq_hz;
    for f in [cutoff * 1.0001, cutoff * 1.5, 20_000.0, 30_000.0] {
        let r = waveguide_parameters(f, 70.0).unwrap();
        match r.propagation {
            Propagation::Propagating {
                phase_velocity_ratio,
                group_velocity_ratio,
            } => {
                assert!((phase_velocity_ratio * group_velocity_ratio - 1.0).abs() < 1e-9);
                assert!(phase_velocity_ratio > 1.0);
                assert!(group_velocity_ratio < 1.0);
            }
            Propagation::BelowCutoff => panic!("f={f} should propagate"),
        }
    }
}

#[test]
fn at_or_below_cutoff_reports_no_velocity() {
    let cutoff = waveguide_parameters(1.0, 70.0).unwrap().cutoff_freq_hz;
    for f in [cutoff, cutoff * 0.5, 0.0, -100.0] {
        let r = waveguide_parameters(f, 70.0).unwrap();
        assert!(r.is_below_cutoff(), "f={f}");
        assert_eq!(r.display_lines()[1], "Below cutoff frequency");
        assert_eq!(r.display_lines()[2], "Below cutoff frequency");
    }
}

#[test]
fn attenuation_is_the_fixed_estimate() {
    for (f, h) in [(5_000.0, 60.0), (25_000.0, 90.0)] {
        let r = waveguide_parameters(f, h).unwrap();
        assert_eq!(r.attenuation_db_per_mm, 2.5);
        assert_eq!(r.display_lines()[3], "Attenuation: ~2.5 dB/Mm");
    }
}

#[test]
fn waveguide_input_errors() {
    assert_eq!(
        waveguide_parameters_from_text("20000", "abc"),
        Err(CalcError::InvalidInput)
    );
    assert_eq!(
        waveguide_parameters_from_text("20000", "0"),
        Err(CalcError::InvalidInput)
    );
    assert_eq!(waveguide_parameters(20_000.0, -70.0), Err(CalcError::InvalidInput));
}
