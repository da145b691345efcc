//! Core library for the `skycast` weather simulator.
//!
//! This crate defines:
//! - The city reference table
//! - An injectable random source
//! - The synthetic weather model and its report type
//! - Configuration handling
//!
//! Nothing here touches the network; every report is generated locally.
//! It is used by `skycast-cli`, but any front end can drive [`Synthesizer`] directly.

pub mod city;
pub mod config;
pub mod error;
pub mod model;
pub mod random;
pub mod synth;

pub use city::{CityRecord, CityTable};
pub use config::{CityConfig, Config, DEFAULT_CITY};
pub use error::Error;
pub use model::{Condition, Season, WeatherReport, WeatherRequest};
pub use random::{RandomSource, RngSource};
pub use synth::Synthesizer;
