/*!
Command handlers for the CLI

Each subcommand turns its arguments into a form submission, runs the matching
handler and applies the resulting UI action to the interface. The functions
are generic over [`Ui`] so the same flows drive the terminal and headless
recorders.
*/

use std::path::Path;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::export;
use crate::forms::{ChatForm, ExpenseForm, FormCapture, FormValues, ItineraryForm, LoginForm, ReviewForm};
use crate::handlers;
use crate::map::{GoogleMapsLoader, MapWidget};
use crate::model::Preferences;
use crate::session::SessionContext;
use crate::share::ShareWidget;
use crate::ui::{apply, TerminalUi, Ui};

/// Everything a command needs besides the interface
#[derive(Debug, Clone)]
pub struct Client {
    pub config: Config,
    pub dispatcher: Dispatcher,
}

impl Client {
    /// Build the session and dispatcher described by `config`.
    ///
    /// With `ephemeral` the token lives in memory for this process only.
    pub fn from_config(config: Config, ephemeral: bool) -> Result<Self> {
        let session = SessionContext::from_config(&config.session, ephemeral)?;
        let dispatcher = Dispatcher::from_config(&config, session)?;
        Ok(Self { config, dispatcher })
    }

    /// Client over an existing session
    pub fn with_session(config: Config, session: SessionContext) -> Result<Self> {
        let dispatcher = Dispatcher::from_config(&config, session)?;
        Ok(Self { config, dispatcher })
    }
}

/// Run the parsed command line against the terminal.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let client = Client::from_config(config, cli.ephemeral)?;
    let loader = GoogleMapsLoader::from_config(&client.config.map);
    let mut ui = TerminalUi::new(MapWidget::new(Arc::new(loader), client.config.map.zoom));

    match cli.command {
        Commands::Login { username, password } => {
            let values = FormValues::new()
                .with("username", username)
                .with("password", password);
            login(&client, &mut ui, &values).await
        }
        Commands::Logout => logout(&client, &mut ui).await,
        Commands::Itinerary {
            destination,
            duration,
            budget,
            interests,
        } => {
            let values = FormValues::new()
                .with("destination", destination)
                .with("duration", duration)
                .with("budget", budget)
                .with_multi("interests", interests);
            create_itinerary(&client, &mut ui, &values).await
        }
        Commands::Expense { amount, currency } => {
            let values = FormValues::new()
                .with("amount", amount)
                .with("currency", currency);
            track_expense(&client, &mut ui, &values).await
        }
        Commands::Review {
            activity_id,
            rating,
            review_text,
        } => {
            let values = FormValues::new()
                .with("activity-id", activity_id)
                .with("rating", rating)
                .with("review-text", review_text);
            submit_review(&client, &mut ui, &values).await
        }
        Commands::Chat { query: Some(query) } => {
            let values = FormValues::new().with("chat-input", query);
            chat(&client, &mut ui, &values).await
        }
        Commands::Chat { query: None } => chat::run_interactive(&client, &mut ui).await,
        Commands::Generate {
            destination,
            budget,
            trip_duration,
            interests,
            output,
        } => {
            let values = FormValues::new()
                .with("destination", destination)
                .with("budget", budget)
                .with("tripDuration", trip_duration)
                .with_multi("interests", interests);
            generate_itinerary(&client, &mut ui, &values, output.as_deref()).await
        }
        Commands::Share { url } => share(&client, &mut ui, &url),
    }
}

/// Submit the login form.
pub async fn login<U: Ui + ?Sized>(client: &Client, ui: &mut U, values: &FormValues) -> Result<()> {
    let form = LoginForm::capture(values)?;
    let action = handlers::login(&client.dispatcher, form).await?;
    apply(ui, action).await
}

/// Clear the stored session.
pub async fn logout<U: Ui + ?Sized>(client: &Client, ui: &mut U) -> Result<()> {
    let action = handlers::logout(&client.dispatcher)?;
    apply(ui, action).await
}

/// Submit the itinerary form.
pub async fn create_itinerary<U: Ui + ?Sized>(
    client: &Client,
    ui: &mut U,
    values: &FormValues,
) -> Result<()> {
    let form = ItineraryForm::capture(values)?;
    let action =
        handlers::create_itinerary(&client.dispatcher, form, &client.config.session.user_id)
            .await?;
    apply(ui, action).await
}

/// Submit the expense form.
pub async fn track_expense<U: Ui + ?Sized>(
    client: &Client,
    ui: &mut U,
    values: &FormValues,
) -> Result<()> {
    let form = ExpenseForm::capture(values)?;
    let action = handlers::track_expense(&client.dispatcher, form).await?;
    apply(ui, action).await
}

/// Submit the review form.
pub async fn submit_review<U: Ui + ?Sized>(
    client: &Client,
    ui: &mut U,
    values: &FormValues,
) -> Result<()> {
    let form = ReviewForm::capture(values)?;
    let action = handlers::submit_review(&client.dispatcher, form).await?;
    apply(ui, action).await
}

/// Send the chat input.
pub async fn chat<U: Ui + ?Sized>(client: &Client, ui: &mut U, values: &FormValues) -> Result<()> {
    let form = ChatForm::capture(values)?;
    let action = handlers::chat(&client.dispatcher, form).await?;
    apply(ui, action).await
}

/// Submit the preferences form and optionally export the result to `output`.
pub async fn generate_itinerary<U: Ui + ?Sized>(
    client: &Client,
    ui: &mut U,
    values: &FormValues,
    output: Option<&Path>,
) -> Result<()> {
    let preferences = Preferences::capture(values)?;
    let generated = handlers::generate_itinerary(&client.dispatcher, &preferences).await?;
    apply(ui, generated.action).await?;

    if let Some(path) = output {
        match &generated.itinerary {
            Some(itinerary) => {
                export::write_itinerary(path, &preferences.destination, itinerary)?;
                ui.notice(&format!("Itinerary saved to {}", path.display()));
            }
            None => tracing::warn!(path = %path.display(), "No itinerary to export"),
        }
    }
    Ok(())
}

/// Show share triggers for `url`.
pub fn share<U: Ui + ?Sized>(client: &Client, ui: &mut U, url: &str) -> Result<()> {
    let widget = ShareWidget::new(client.config.share.platforms.clone());
    let triggers = widget.render(url)?;
    ui.show_share(&triggers);
    Ok(())
}

// Interactive chat
pub mod chat {
    //! Line-editing chat session.
    //!
    //! Every non-empty line is sent as one chatbot query. `exit`, `quit`,
    //! Ctrl-C and Ctrl-D end the session.

    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Whether `line` ends the session
    pub fn is_exit(line: &str) -> bool {
        matches!(line.trim().to_ascii_lowercase().as_str(), "exit" | "quit")
    }

    /// Start the interactive session on the terminal.
    pub async fn run_interactive<U: Ui + ?Sized>(client: &Client, ui: &mut U) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        println!(
            "{}",
            "Ask the travel assistant. Type 'exit' or press Ctrl-D to leave.".bold()
        );

        loop {
            match rl.readline(&format!("{} ", "you>".cyan())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if is_exit(trimmed) {
                        break;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let values = FormValues::new().with("chat-input", trimmed);
                    if let Err(e) = super::chat(client, ui, &values).await {
                        eprintln!("{} {:#}", "Error:".red(), e);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Readline error");
                    return Err(e.into());
                }
            }
        }

        tracing::info!("Chat session ended");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_exit_words() {
            assert!(is_exit("exit"));
            assert!(is_exit(" QUIT "));
            assert!(!is_exit("exit strategy"));
            assert!(!is_exit("best beaches in Lisbon"));
        }
    }
}
