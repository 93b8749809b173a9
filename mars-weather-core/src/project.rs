use std::collections::HashMap;

use crate::model::{SolMeasurements, SolReport, SolWeather};

/// Flatten decoded sols into display rows, in `sol_keys` order.
///
/// Keys with no published sol produce no row. Missing measurements read as `0.0`.
pub fn project(sol_keys: &[String], sols: &HashMap<String, SolMeasurements>) -> Vec<SolWeather> {
    sol_keys
        .iter()
        .filter_map(|key| {
            let Some(sol) = sols.get(key) else {
                tracing::debug!("Missing sol data for key: {key}");
                return None;
            };

            Some(SolWeather {
                id: key.clone(),
                sol: key.clone(),
                temperature_c: sol.temperature_c().unwrap_or(0.0),
                wind_speed_mps: sol.wind_speed_mps().unwrap_or(0.0),
                pressure_pa: sol.pressure_pa().unwrap_or(0.0),
            })
        })
        .collect()
}

impl SolReport {
    pub fn project(&self) -> Vec<SolWeather> {
        project(&self.sol_keys, &self.sols)
    }
}
