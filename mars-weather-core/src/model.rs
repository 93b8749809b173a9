use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A measurement averaged over one sol. The wire field is `av`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct AggregatedMeasurement {
    #[serde(rename = "av", default)]
    pub average: Option<f64>,
}

/// Measurements reported for a single sol.
///
/// Each slot is independently optional; a missing slot, a `null` slot and a
/// slot without an average all mean "no data". Unlisted wire fields
/// (`WD`, `Season`, `First_UTC`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SolMeasurements {
    #[serde(rename = "AT", default, deserialize_with = "object_or_null")]
    pub atmospheric_temperature: Option<AggregatedMeasurement>,

    #[serde(rename = "HWS", default, deserialize_with = "object_or_null")]
    pub horizontal_wind_speed: Option<AggregatedMeasurement>,

    #[serde(rename = "PRE", default, deserialize_with = "object_or_null")]
    pub pressure: Option<AggregatedMeasurement>,
}

impl SolMeasurements {
    pub fn temperature_c(&self) -> Option<f64> {
        average_of(self.atmospheric_temperature)
    }

    pub fn wind_speed_mps(&self) -> Option<f64> {
        average_of(self.horizontal_wind_speed)
    }

    pub fn pressure_pa(&self) -> Option<f64> {
        average_of(self.pressure)
    }
}

/// Accept a measurement slot only as `null` or an object.
fn object_or_null<'de, D>(deserializer: D) -> Result<Option<AggregatedMeasurement>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(map) = Option::<Map<String, Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    AggregatedMeasurement::deserialize(Value::Object(map))
        .map(Some)
        .map_err(<D::Error as serde::de::Error>::custom)
}

fn average_of(slot: Option<AggregatedMeasurement>) -> Option<f64> {
    slot.and_then(|m| m.average)
}

/// Decoded report: the declared sol keys in payload order, and the sols that
/// were actually published under those keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolReport {
    pub sol_keys: Vec<String>,
    pub sols: HashMap<String, SolMeasurements>,
}

/// One display-ready row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolWeather {
    /// Row identity; equal to the sol key.
    pub id: String,
    pub sol: String,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub pressure_pa: f64,
}
