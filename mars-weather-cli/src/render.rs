use mars_weather_core::{SolWeather, ViewState};

pub const TITLE: &str = "Mars Weather";
pub const LOADING: &str = "Loading Mars weather data...";
pub const EMPTY: &str = "No Mars weather data available.";

pub const PLANET: &str = r"
            .-~~~-.
        .-~ .   o  ~-.
       /  O     .     \
      |     .   ( )    |
      |  ( )      .    |
       \     .    O   /
        `-.   o   .-'
           `~~~~~'
";

/// Render the content area for a state.
pub fn view(state: &ViewState) -> String {
    match state {
        ViewState::Loading => format!("{LOADING}\n"),
        ViewState::Empty { .. } => format!("{EMPTY}\n"),
        ViewState::Failed { message } => format!("Failed to load Mars weather data: {message}\n"),
        ViewState::Loaded { records, fetched_at } => {
            let mut out = format!("{TITLE}\n");
            out.push_str(&format!("Updated {}\n", fetched_at.format("%Y-%m-%d %H:%M UTC")));
            for record in records {
                out.push('\n');
                out.push_str(&sol_entry(record));
            }
            out
        }
    }
}

pub fn sol_entry(weather: &SolWeather) -> String {
    format!(
        "Sol: {}\n  Temperature: {:.1} °C\n  Wind Speed: {:.1} m/s\n  Pressure: {:.1} Pa\n",
        weather.sol, weather.temperature_c, weather.wind_speed_mps, weather.pressure_pa,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sol(key: &str, t: f64, w: f64, p: f64) -> SolWeather {
        SolWeather {
            id: key.into(),
            sol: key.into(),
            temperature_c: t,
            wind_speed_mps: w,
            pressure_pa: p,
        }
    }

    #[test]
    fn sol_entry_uses_one_decimal() {
        let text = sol_entry(&sol("6", -62.345, 7.2, 750.1));

        assert_eq!(
            text,
            "Sol: 6\n  Temperature: -62.3 °C\n  Wind Speed: 7.2 m/s\n  Pressure: 750.1 Pa\n"
        );
    }

    #[test]
    fn loaded_view_lists_sols_in_order() {
        let fetched_at = Utc.with_ymd_and_hms(2020, 5, 1, 12, 30, 0).unwrap();
        let state = ViewState::Loaded {
            records: vec![sol("10", 0.0, 0.0, 0.0), sol("9", 1.0, 2.0, 3.0)],
            fetched_at,
        };

        let text = view(&state);

        assert!(text.starts_with("Mars Weather\nUpdated 2020-05-01 12:30 UTC\n"));
        let first = text.find("Sol: 10").unwrap();
        let second = text.find("Sol: 9").unwrap();
        assert!(first < second);
        assert!(text.contains("Temperature: 0.0 °C"));
    }

    #[test]
    fn status_views_are_distinct() {
        let loading = view(&ViewState::Loading);
        let empty = view(&ViewState::Empty { fetched_at: Utc::now() });
        let failed = view(&ViewState::Failed { message: "boom".into() });

        assert_eq!(loading, "Loading Mars weather data...\n");
        assert_eq!(empty, "No Mars weather data available.\n");
        assert_eq!(failed, "Failed to load Mars weather data: boom\n");
    }
}
