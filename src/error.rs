//! Error types for Itinera
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Itinera operations
///
/// Covers configuration loading, form capture, session token persistence,
/// the map library, and the transport layer. Server-reported failures are
/// not errors at this level: the dispatcher turns them into a
/// [`crate::dispatch::DispatchOutcome`] that the renderer shows to the user.
#[derive(Error, Debug)]
pub enum ItineraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required form field was missing or a field held an option the form
    /// does not offer
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session token persistence errors (file backend, lookups)
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Mapping library could not be loaded or used
    #[error("Map library error: {0}")]
    MapLibrary(String),

    /// Share target URL was not usable
    #[error("Share error: {0}")]
    Share(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Itinera operations
///
/// Uses `anyhow::Error` so that callers can attach context while still
/// being able to downcast to [`ItineraError`].
pub type Result<T> = anyhow::Result<T>;
