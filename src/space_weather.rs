// src/space_weather.rs
//! Space-weather conditions as they bear on VLF propagation.
//!
//! No index feed (NOAA SWPC or similar) is wired in yet; `current_snapshot`
//! returns a fixed set of representative readings.

use serde::Serialize;

/// Solar / geomagnetic readings plus their VLF interpretation. Values are
/// display strings with units already attached.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SpaceWeatherSnapshot {
    /// 10.7 cm solar radio flux.
    pub solar_flux: String,
    pub sunspot_number: String,
    pub k_index: String,
    pub solar_wind_speed: String,
    /// IMF north-south component.
    pub bz_component: String,
    pub geomagnetic_activity: String,
    pub vlf_impact: String,
    pub d_layer_absorption: String,
    pub forecast: String,
}

/// A titled block of lines, rendered top to bottom.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeatherSection {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl WeatherSection {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }
}

fn bullets<'a>(items: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    items.iter().map(|s| format!("• {s}"))
}

impl SpaceWeatherSnapshot {
    /// Current conditions, VLF impact and the 24-hour outlook.
    pub fn sections(&self) -> Vec<WeatherSection> {
        let conditions = vec![
            format!("Solar Flux (10.7 cm): {}", self.solar_flux),
            format!("Sunspot Number: {}", self.sunspot_number),
            format!("K-index: {}", self.k_index),
            format!("Solar Wind Speed: {}", self.solar_wind_speed),
            format!("Bz Component: {}", self.bz_component),
            format!("Geomagnetic Activity: {}", self.geomagnetic_activity),
        ];

        let mut impact = vec![
            format!("Current VLF Conditions: {}", self.vlf_impact),
            format!("D-layer Absorption: {}", self.d_layer_absorption),
        ];
        impact.extend(bullets(&[
            "Normal VLF propagation in Earth-ionosphere waveguide",
            "Minimal signal degradation expected",
            "Standard attenuation rates (~2-3 dB/Mm)",
        ]));

        let mut outlook = vec![self.forecast.clone()];
        outlook.extend(bullets(&[
            "VLF propagation should remain stable",
            "Monitor for sudden ionospheric disturbances",
            "Lightning-generated sferics unaffected",
        ]));

        vec![
            WeatherSection::new("Current Space Weather Conditions", conditions),
            WeatherSection::new("VLF Propagation Impact", impact),
            WeatherSection::new("24-Hour Forecast", outlook),
        ]
    }
}

pub fn current_snapshot() -> SpaceWeatherSnapshot {
    SpaceWeatherSnapshot {
        solar_flux: "142 sfu".to_string(),
        sunspot_number: "85".to_string(),
        k_index: "3 (Unsettled)".to_string(),
        solar_wind_speed: "425 km/s".to_string(),
        bz_component: "-2.3 nT".to_string(),
        geomagnetic_activity: "Quiet to Unsettled".to_string(),
        vlf_impact: "Normal propagation conditions".to_string(),
        d_layer_absorption: "Low (<1 dB)".to_string(),
        forecast: "Quiet geomagnetic conditions expected for next 24h".to_string(),
    }
}

/// Static primer shown before any conditions are requested.
pub fn background_sections() -> Vec<WeatherSection> {
    let mut effects = vec!["Space weather affects VLF wave propagation through:".to_string()];
    effects.extend(bullets(&[
        "D-layer ionization changes",
        "Geomagnetic storm effects on ionosphere",
        "Solar flare X-ray enhancement",
        "Sudden ionospheric disturbances (SIDs)",
    ]));

    let parameters = [
        "Solar Flux (10.7 cm): Indicates solar activity level",
        "K-index: Geomagnetic activity indicator",
        "Solar wind parameters: Affect magnetosphere",
        "X-ray flux: Directly ionizes D-layer",
        "VLF propagation is most affected by D-layer changes.",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    vec![
        WeatherSection::new("Space Weather & VLF Research", effects),
        WeatherSection::new("Key Parameters for VLF", parameters),
    ]
}
