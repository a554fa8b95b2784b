//! Core library for the `cuaca` weather CLI.
//!
//! This crate implements:
//! - Location resolution and weather retrieval against OpenWeatherMap
//! - Normalization of the provider schema into stable display models
//! - A single-slot, 30-minute cache plus the persisted UI preferences
//! - The session state driving interactive frontends
//!
//! It is used by `cuaca-cli`, but can also be embedded by other frontends.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod session;
pub mod storage;

pub use cache::CacheStore;
pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentConditions, DailyEntry, HourlyEntry, Place, WeatherSnapshot};
pub use normalize::kelvin_to_celsius;
pub use provider::{WeatherProvider, provider_from_config};
pub use service::WeatherService;
pub use session::{Phase, Session, Ticket};
pub use storage::{FileStorage, MemoryStorage, NoStorage, StoragePort};
