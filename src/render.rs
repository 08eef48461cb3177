//! Response renderer
//!
//! Turns a [`DispatchOutcome`] into the [`UiAction`] the interface should
//! perform. Success bodies are mapped per endpoint; every failure kind is
//! mapped the same way for all endpoints:
//!
//! | Outcome | Action |
//! |---|---|
//! | `LoginRequired` | notice "Please log in first!" |
//! | `ServerError` with `message` | notice with the message verbatim |
//! | `ServerError` without `message` | notice naming the HTTP status |
//! | `TransportFailure` | nothing (already logged by the dispatcher) |
//!
//! A success body that does not have the expected shape is treated like a
//! transport failure: it is logged and nothing is shown.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::dispatch::DispatchOutcome;
use crate::error::Result;
use crate::model::{
    ChatResponse, ExpenseResponse, Itinerary, ItineraryResponse, LoginResponse, Place,
    Preferences,
};
use crate::session::{SessionContext, SessionToken};

/// Notice shown when a protected action is attempted without a token
pub const LOGIN_REQUIRED_NOTICE: &str = "Please log in first!";

/// Named output areas whose text a render overwrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputRegion {
    /// Optimized itinerary from `/itinerary`
    ItineraryOutput,
    /// Assistant reply from `/chatbot`
    ChatOutput,
    /// Heading of a generated itinerary
    ItinerarySummary,
}

impl OutputRegion {
    pub fn id(&self) -> &'static str {
        match self {
            Self::ItineraryOutput => "itinerary-output",
            Self::ChatOutput => "chat-output",
            Self::ItinerarySummary => "itinerary-summary",
        }
    }
}

impl fmt::Display for OutputRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What the interface should do in response to one user action
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Blocking notice shown to the user
    Notice(String),
    /// Replace the whole text of an output region
    SetText { region: OutputRegion, text: String },
    /// Show places on the map widget
    ShowMap(Vec<Place>),
    /// Several actions, applied in order
    Many(Vec<UiAction>),
    /// No visible update
    Nothing,
}

impl UiAction {
    fn notice(message: impl Into<String>) -> Self {
        Self::Notice(message.into())
    }

    /// Flatten nested [`UiAction::Many`] into the ordered list of steps.
    pub fn into_steps(self) -> Vec<UiAction> {
        match self {
            Self::Many(actions) => actions.into_iter().flat_map(Self::into_steps).collect(),
            Self::Nothing => Vec::new(),
            action => vec![action],
        }
    }
}

/// Map failures uniformly and successes with `on_success`.
fn render_outcome<F>(outcome: DispatchOutcome, on_success: F) -> Result<UiAction>
where
    F: FnOnce(serde_json::Value) -> Result<UiAction>,
{
    match outcome {
        DispatchOutcome::Success(body) => on_success(body),
        DispatchOutcome::LoginRequired => Ok(UiAction::notice(LOGIN_REQUIRED_NOTICE)),
        DispatchOutcome::ServerError {
            message: Some(message),
            ..
        } => Ok(UiAction::Notice(message)),
        DispatchOutcome::ServerError {
            status,
            message: None,
        } => Ok(UiAction::Notice(format!("Request failed with status {}", status))),
        DispatchOutcome::TransportFailure(_) => Ok(UiAction::Nothing),
    }
}

/// Parse a success body, logging and discarding one of the wrong shape.
fn parse_body<T: DeserializeOwned>(body: serde_json::Value, what: &str) -> Option<T> {
    match serde_json::from_value(body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::error!(error = %e, "Unexpected {} response body", what);
            None
        }
    }
}

/// Login: save the token, then confirm.
///
/// # Errors
///
/// Returns an error if the token cannot be persisted.
pub fn login(outcome: DispatchOutcome, session: &SessionContext) -> Result<UiAction> {
    render_outcome(outcome, |body| {
        let Some(response) = parse_body::<LoginResponse>(body, "login") else {
            return Ok(UiAction::Nothing);
        };
        session.save(&SessionToken::new(response.token))?;
        Ok(UiAction::notice("Login successful!"))
    })
}

/// Itinerary creation: join the stops into the itinerary output region.
pub fn itinerary(outcome: DispatchOutcome) -> Result<UiAction> {
    render_outcome(outcome, |body| {
        Ok(parse_body::<ItineraryResponse>(body, "itinerary")
            .map(|response| UiAction::SetText {
                region: OutputRegion::ItineraryOutput,
                text: format!("Optimized Itinerary: {}", response.itinerary.join(", ")),
            })
            .unwrap_or(UiAction::Nothing))
    })
}

/// Expense tracking: show the total the backend computed.
pub fn expense(outcome: DispatchOutcome) -> Result<UiAction> {
    render_outcome(outcome, |body| {
        Ok(parse_body::<ExpenseResponse>(body, "expense")
            .map(|response| {
                let total = match response.total_expense {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                UiAction::Notice(format!("Total Expense: {}", total))
            })
            .unwrap_or(UiAction::Nothing))
    })
}

/// Review submission: acknowledge.
pub fn review(outcome: DispatchOutcome) -> Result<UiAction> {
    render_outcome(outcome, |_| {
        Ok(UiAction::notice("Review submitted successfully!"))
    })
}

/// Chatbot: write the assistant reply into the chat output region.
pub fn chat(outcome: DispatchOutcome) -> Result<UiAction> {
    render_outcome(outcome, |body| {
        Ok(parse_body::<ChatResponse>(body, "chatbot")
            .map(|response| UiAction::SetText {
                region: OutputRegion::ChatOutput,
                text: format!("Assistant: {}", response.response),
            })
            .unwrap_or(UiAction::Nothing))
    })
}

/// Heading shown above a generated itinerary
pub fn itinerary_summary(preferences: &Preferences) -> String {
    format!(
        "Your Itinerary for {}\nBudget: {}\nDuration: {} days\nPlaces of Interest",
        preferences.destination, preferences.budget, preferences.trip_duration
    )
}

/// Itinerary generation: summary heading followed by the map of places.
///
/// Also returns the parsed itinerary so callers can export it.
pub fn generated_itinerary(
    outcome: DispatchOutcome,
    preferences: &Preferences,
) -> Result<(UiAction, Option<Itinerary>)> {
    let mut itinerary = None;
    let action = render_outcome(outcome, |body| {
        let Some(parsed) = parse_body::<Itinerary>(body, "generated itinerary") else {
            return Ok(UiAction::Nothing);
        };
        let mut steps = vec![UiAction::SetText {
            region: OutputRegion::ItinerarySummary,
            text: itinerary_summary(preferences),
        }];
        steps.push(UiAction::ShowMap(parsed.places.clone()));
        itinerary = Some(parsed);
        Ok(UiAction::Many(steps))
    })?;
    Ok((action, itinerary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormNumber;
    use serde_json::json;

    fn success(body: serde_json::Value) -> DispatchOutcome {
        DispatchOutcome::Success(body)
    }

    #[test]
    fn test_login_saves_token_and_confirms() {
        let session = SessionContext::in_memory();
        let action = login(success(json!({"token": "abc123"})), &session).unwrap();
        assert_eq!(action, UiAction::Notice("Login successful!".to_string()));
        assert_eq!(session.load().unwrap().unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_login_failure_leaves_storage_untouched() {
        let session = SessionContext::in_memory();
        let action = login(
            DispatchOutcome::ServerError {
                status: 403,
                message: Some("Invalid Credentials!".to_string()),
            },
            &session,
        )
        .unwrap();
        assert_eq!(action, UiAction::Notice("Invalid Credentials!".to_string()));
        assert!(session.load().unwrap().is_none());
    }

    #[test]
    fn test_login_body_without_token_shows_nothing() {
        let session = SessionContext::in_memory();
        let action = login(success(json!({"status": "ok"})), &session).unwrap();
        assert_eq!(action, UiAction::Nothing);
        assert!(session.load().unwrap().is_none());
    }

    #[test]
    fn test_itinerary_joins_stops() {
        let action = itinerary(success(json!({"itinerary": ["Park", "Museum", "Monument"]}))).unwrap();
        assert_eq!(
            action,
            UiAction::SetText {
                region: OutputRegion::ItineraryOutput,
                text: "Optimized Itinerary: Park, Museum, Monument".to_string(),
            }
        );
    }

    #[test]
    fn test_expense_shows_numeric_total() {
        let action = expense(success(json!({"total_expense": 42.5}))).unwrap();
        assert_eq!(action, UiAction::Notice("Total Expense: 42.5".to_string()));
    }

    #[test]
    fn test_expense_shows_textual_total_without_quotes() {
        let action = expense(success(json!({
            "total_expense": "Currency rates are not available at this time."
        })))
        .unwrap();
        assert_eq!(
            action,
            UiAction::Notice(
                "Total Expense: Currency rates are not available at this time.".to_string()
            )
        );
    }

    #[test]
    fn test_review_acknowledges_any_body() {
        let action = review(success(json!({}))).unwrap();
        assert_eq!(
            action,
            UiAction::Notice("Review submitted successfully!".to_string())
        );
    }

    #[test]
    fn test_chat_writes_assistant_reply() {
        let action = chat(success(json!({"response": "Try Praia da Rocha"}))).unwrap();
        assert_eq!(
            action,
            UiAction::SetText {
                region: OutputRegion::ChatOutput,
                text: "Assistant: Try Praia da Rocha".to_string(),
            }
        );
    }

    #[test]
    fn test_login_required_notice() {
        assert_eq!(
            review(DispatchOutcome::LoginRequired).unwrap(),
            UiAction::Notice("Please log in first!".to_string())
        );
    }

    #[test]
    fn test_server_error_message_is_shown_verbatim() {
        let action = itinerary(DispatchOutcome::ServerError {
            status: 400,
            message: Some("All fields are required!".to_string()),
        })
        .unwrap();
        assert_eq!(action, UiAction::Notice("All fields are required!".to_string()));
    }

    #[test]
    fn test_server_error_without_message_names_status() {
        let action = chat(DispatchOutcome::ServerError {
            status: 502,
            message: None,
        })
        .unwrap();
        assert_eq!(
            action,
            UiAction::Notice("Request failed with status 502".to_string())
        );
    }

    #[test]
    fn test_transport_failure_renders_nothing() {
        let action = chat(DispatchOutcome::TransportFailure("refused".to_string())).unwrap();
        assert_eq!(action, UiAction::Nothing);
        assert!(action.into_steps().is_empty());
    }

    #[test]
    fn test_generated_itinerary_summary_then_map() {
        let prefs = Preferences {
            destination: "Lisbon".to_string(),
            budget: FormNumber::from_input("1000"),
            trip_duration: FormNumber::from_input("5"),
            interests: Default::default(),
        };
        let (action, itinerary) = generated_itinerary(
            success(json!({"places": [{"name": "Belem Tower", "lat": 38.69, "lng": -9.22}]})),
            &prefs,
        )
        .unwrap();

        let steps = action.into_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0],
            UiAction::SetText {
                region: OutputRegion::ItinerarySummary,
                text: "Your Itinerary for Lisbon\nBudget: 1000\nDuration: 5 days\nPlaces of Interest"
                    .to_string(),
            }
        );
        assert!(matches!(&steps[1], UiAction::ShowMap(places) if places.len() == 1));
        assert_eq!(itinerary.unwrap().places[0].name, "Belem Tower");
    }

    #[test]
    fn test_into_steps_flattens_nested_actions() {
        let action = UiAction::Many(vec![
            UiAction::Notice("a".to_string()),
            UiAction::Many(vec![UiAction::Nothing, UiAction::Notice("b".to_string())]),
        ]);
        assert_eq!(
            action.into_steps(),
            vec![
                UiAction::Notice("a".to_string()),
                UiAction::Notice("b".to_string())
            ]
        );
    }
}
