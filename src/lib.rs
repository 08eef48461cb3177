//! Itinera - travel itinerary client library
//!
//! A thin client for an itinerary backend: it collects form input, sends it
//! as JSON, and turns each response into an action on the interface.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session token store over pluggable persistence
//! - `forms`: Form capture and the typed forms
//! - `dispatch`: Request dispatcher with the pre-flight login check
//! - `render`: Response renderer producing [`render::UiAction`] values
//! - `handlers`: One handler per user action
//! - `map`: Map widget and the Google Static Maps backend
//! - `share`: Social share links
//! - `export`: Plain-text itinerary export
//! - `ui`: Terminal and recording interfaces
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use itinera::commands::Client;
//! use itinera::forms::FormValues;
//! use itinera::ui::RecordingUi;
//! use itinera::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file("config/config.yaml")?;
//!     config.validate()?;
//!
//!     let client = Client::from_config(config, true)?;
//!     let mut ui = RecordingUi::without_map();
//!     let values = FormValues::new().with("chat-input", "best beaches in Lisbon");
//!     itinera::commands::chat(&client, &mut ui, &values).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod forms;
pub mod handlers;
pub mod map;
pub mod model;
pub mod render;
pub mod session;
pub mod share;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{DispatchOutcome, Dispatcher, Endpoint};
pub use error::{ItineraError, Result};
pub use render::{OutputRegion, UiAction};
pub use session::{SessionContext, SessionToken, TokenPersistence};
