#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the `agritrust` integration tests: tracing setup and a
//! scripted geocoder that records the queries it receives.

use agritrust::providers::geo::Geocoder;
use agritrust::{Coordinates, GeocodeError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

// --- Scripted Geocoder ---

#[derive(Clone, Debug, Default)]
pub struct ScriptedGeocoder {
    answer: Option<Coordinates>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGeocoder {
    pub fn answering(answer: Option<Coordinates>) -> Self {
        Self {
            answer,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.calls.lock().unwrap().push(query.to_string());
        Ok(self.answer)
    }
}
