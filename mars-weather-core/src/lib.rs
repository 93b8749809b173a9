//! Core library for the `mars-weather` CLI.
//!
//! This crate defines:
//! - Decoding of the InSight weather payload, whose per-sol fields are named at runtime
//! - Projection of decoded sols into display-ready rows
//! - Report providers (HTTP and file) and the fetcher that publishes view state
//! - Configuration handling
//!
//! It is used by `mars-weather-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod project;
pub mod provider;
pub mod state;

pub use config::Config;
pub use decode::{DecodeError, decode_report};
pub use error::FetchError;
pub use model::{AggregatedMeasurement, SolMeasurements, SolReport, SolWeather};
pub use project::project;
pub use provider::{ReportProvider, load_weather, provider_from_config};
pub use state::{ReportFetcher, ViewState};
