//! # External Collaborators
//!
//! Clients for the services the pipeline talks to: geocoding, weather
//! forecasts and the local report database.

pub mod db;
pub mod geo;
pub mod weather;
