//! Core library for the `wcli` weather tool.
//!
//! This crate defines:
//! - The local credentials file (latitude, longitude, API key)
//! - A client for the OpenWeather One Call endpoint
//! - The decoded response model
//! - Plain-text rendering of current and daily weather
//!
//! It is used by `wcli-cli`, which owns argument parsing and exit codes.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod render;

pub use client::WeatherClient;
pub use config::{CredentialStore, Credentials};
pub use error::{Error, Result};
pub use model::WeatherResponse;
