//! Command-line interface definition for Itinera
//!
//! Every subcommand corresponds to one form of the travel client; its
//! arguments are the form's fields.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Itinera - travel itinerary client
///
/// Plan trips, track expenses, review activities and talk to the travel
/// assistant through the itinerary backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "itinera")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Keep the session token in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Itinera
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Request an optimized itinerary (requires login)
    Itinerary {
        #[arg(short, long)]
        destination: String,

        /// Trip length in days
        #[arg(long)]
        duration: String,

        #[arg(short, long)]
        budget: String,

        /// Interests (culture, adventure, relaxation, food); repeatable or comma separated
        #[arg(short, long = "interest", value_delimiter = ',')]
        interests: Vec<String>,
    },

    /// Record an expense and show the running total
    Expense {
        #[arg(short, long)]
        amount: String,

        /// Currency code, such as EUR
        #[arg(long)]
        currency: String,
    },

    /// Review an activity (requires login)
    Review {
        #[arg(long)]
        activity_id: String,

        /// Rating, 1 to 5
        #[arg(short, long)]
        rating: String,

        #[arg(short = 't', long)]
        review_text: String,
    },

    /// Ask the travel assistant; without a query, start an interactive session
    Chat {
        /// Single query to send
        query: Option<String>,
    },

    /// Generate an itinerary of places from preferences and show it on a map
    Generate {
        #[arg(short, long)]
        destination: String,

        #[arg(short, long)]
        budget: String,

        /// Trip length in days
        #[arg(long)]
        trip_duration: String,

        /// Interests (culture, adventure, relaxation, food); repeatable or comma separated
        #[arg(short, long = "interest", value_delimiter = ',')]
        interests: Vec<String>,

        /// Also write the itinerary to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print share links for a URL
    Share {
        #[arg(short, long)]
        url: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
