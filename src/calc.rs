// src/calc.rs
//! Closed-form VLF calculators: frequency/wavelength, great-circle distance
//! and a simplified Earth-ionosphere waveguide (TM0 mode).
//!
//! Inputs normally arrive as text from a form or a query string, so every
//! calculator has a `*_from_text` twin that parses first.

use serde::Serialize;

use crate::error::CalcError;

/// Speed of light in vacuum, m/s (exact).
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;
/// Mean Earth radius, km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Typical VLF attenuation in the Earth-ionosphere waveguide, dB per megameter.
/// Reported as a fixed estimate; it is not derived from the inputs.
pub const TYPICAL_ATTENUATION_DB_PER_MM: f64 = 2.5;

/// Parse one numeric field. Surrounding whitespace is ignored; NaN/inf are rejected.
pub fn parse_number(text: &str) -> Result<f64, CalcError> {
    let v: f64 = text.trim().parse().map_err(|_| CalcError::InvalidInput)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CalcError::InvalidInput)
    }
}

// ------------------------------------------------------------
// Frequency -> wavelength
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WavelengthResult {
    pub wavelength_m: f64,
    /// Present when |wavelength| >= 1000 m.
    pub wavelength_km: Option<f64>,
}

impl WavelengthResult {
    pub fn display(&self) -> String {
        match self.wavelength_km {
            Some(km) => format!("Wavelength: {km:.2} km"),
            None => format!("Wavelength: {:.2} m", self.wavelength_m),
        }
    }
}

pub fn frequency_to_wavelength(frequency_hz: f64) -> Result<WavelengthResult, CalcError> {
    if !frequency_hz.is_finite() {
        return Err(CalcError::InvalidInput);
    }
    if frequency_hz == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    let wavelength_m = SPEED_OF_LIGHT_M_S / frequency_hz;
    let wavelength_km = (wavelength_m.abs() >= 1000.0).then(|| wavelength_m / 1000.0);
    Ok(WavelengthResult {
        wavelength_m,
        wavelength_km,
    })
}

pub fn frequency_to_wavelength_from_text(frequency: &str) -> Result<WavelengthResult, CalcError> {
    frequency_to_wavelength(parse_number(frequency)?)
}

// ------------------------------------------------------------
// Great-circle distance (haversine)
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceResult {
    pub distance_km: f64,
}

impl DistanceResult {
    pub fn display(&self) -> String {
        format!("Distance: {:.1} km", self.distance_km)
    }
}

/// Coordinates in degrees.
pub fn great_circle_distance(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<DistanceResult, CalcError> {
    if ![lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return Err(CalcError::InvalidInput);
    }
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // rounding can push `a` a hair outside [0, 1]
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    Ok(DistanceResult {
        distance_km: c * EARTH_RADIUS_KM,
    })
}

pub fn great_circle_distance_from_text(
    lat1: &str,
    lon1: &str,
    lat2: &str,
    lon2: &str,
) -> Result<DistanceResult, CalcError> {
    great_circle_distance(
        parse_number(lat1)?,
        parse_number(lon1)?,
        parse_number(lat2)?,
        parse_number(lon2)?,
    )
}

// ------------------------------------------------------------
// Earth-ionosphere waveguide (TM0, simplified)
// ------------------------------------------------------------

/// Phase/group velocity as multiples of c, or nothing when the wave is at or below cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Propagation {
    Propagating {
        phase_velocity_ratio: f64,
        group_velocity_ratio: f64,
    },
    BelowCutoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveguideResult {
    pub cutoff_freq_hz: f64,
    pub propagation: Propagation,
    pub attenuation_db_per_mm: f64,
}

impl WaveguideResult {
    pub fn is_below_cutoff(&self) -> bool {
        matches!(self.propagation, Propagation::BelowCutoff)
    }

    /// Human-readable lines: cutoff, phase velocity, group velocity, attenuation.
    pub fn display_lines(&self) -> [String; 4] {
        let cutoff = format!("TM0 cutoff: {:.1} Hz", self.cutoff_freq_hz);
        let atten = format!("Attenuation: ~{} dB/Mm", self.attenuation_db_per_mm);
        match self.propagation {
            Propagation::Propagating {
                phase_velocity_ratio,
                group_velocity_ratio,
            } => [
                cutoff,
                format!("Phase velocity: {phase_velocity_ratio:.4}c"),
                format!("Group velocity: {group_velocity_ratio:.4}c"),
                atten,
            ],
            Propagation::BelowCutoff => [
                cutoff,
                "Below cutoff frequency".to_string(),
                "Below cutoff frequency".to_string(),
                atten,
            ],
        }
    }
}

pub fn waveguide_parameters(
    frequency_hz: f64,
    d_layer_height_km: f64,
) -> Result<WaveguideResult, CalcError> {
    if !frequency_hz.is_finite() || !d_layer_height_km.is_finite() {
        return Err(CalcError::InvalidInput);
    }
    let height_m = d_layer_height_km * 1000.0;
    // zero height means an infinite cutoff; a negative one has no physical meaning
    if height_m <= 0.0 {
        return Err(CalcError::InvalidInput);
    }

    let cutoff_freq_hz = SPEED_OF_LIGHT_M_S / (2.0 * height_m);

    let propagation = if frequency_hz > cutoff_freq_hz {
        let root = (1.0 - (cutoff_freq_hz / frequency_hz).powi(2)).sqrt();
        Propagation::Propagating {
            phase_velocity_ratio: 1.0 / root,
            group_velocity_ratio: root,
        }
    } else {
        Propagation::BelowCutoff
    };

    Ok(WaveguideResult {
        cutoff_freq_hz,
        propagation,
        attenuation_db_per_mm: TYPICAL_ATTENUATION_DB_PER_MM,
    })
}

pub fn waveguide_parameters_from_text(
    frequency: &str,
    d_layer_height_km: &str,
) -> Result<WaveguideResult, CalcError> {
    waveguide_parameters(parse_number(frequency)?, parse_number(d_layer_height_km)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_trims_and_rejects_garbage() {
        assert_eq!(parse_number(" 20000 "), Ok(20000.0));
        assert_eq!(parse_number("abc"), Err(CalcError::InvalidInput));
        assert_eq!(parse_number(""), Err(CalcError::InvalidInput));
        assert_eq!(parse_number("inf"), Err(CalcError::InvalidInput));
    }

    #[test]
    fn short_wavelength_has_no_km_form() {
        let r = frequency_to_wavelength(1.0e6).unwrap();
        assert!(r.wavelength_km.is_none());
        assert_eq!(r.display(), "Wavelength: 299.79 m");
    }

    #[test]
    fn vlf_wavelength_is_reported_in_km() {
        let r = frequency_to_wavelength(20_000.0).unwrap();
        assert_eq!(r.display(), "Wavelength: 14.99 km");
    }

    #[test]
    fn zero_height_is_invalid() {
        assert_eq!(
            waveguide_parameters(20_000.0, 0.0),
            Err(CalcError::InvalidInput)
        );
    }

    #[test]
    fn typical_d_layer_cutoff() {
        // 70 km D-layer: c / 140 km ~ 2141 Hz
        let r = waveguide_parameters(20_000.0, 70.0).unwrap();
        assert!((r.cutoff_freq_hz - 2141.37).abs() < 0.01);
        assert!(!r.is_below_cutoff());
        assert_eq!(r.attenuation_db_per_mm, 2.5);
    }
}
