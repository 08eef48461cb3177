//! User action handlers
//!
//! One function per user action. Each takes a captured form, issues exactly
//! one request through the [`Dispatcher`], and returns the [`UiAction`] the
//! interface should perform. Handlers never touch the interface themselves.

use crate::dispatch::{Dispatcher, Endpoint};
use crate::error::Result;
use crate::forms::{ChatForm, ExpenseForm, ItineraryForm, LoginForm, ReviewForm};
use crate::model::{
    ChatQuery, ExpenseRecord, Itinerary, ItineraryRequest, LoginRequest, Preferences, Review,
};
use crate::render::{self, UiAction};

/// Submit credentials and store the issued token.
pub async fn login(dispatcher: &Dispatcher, form: LoginForm) -> Result<UiAction> {
    tracing::info!(username = %form.username, "Logging in");
    let request = LoginRequest {
        username: form.username,
        password: form.password,
    };
    let outcome = dispatcher.dispatch(Endpoint::Login, &request).await?;
    render::login(outcome, dispatcher.session())
}

/// Forget the stored token.
pub fn logout(dispatcher: &Dispatcher) -> Result<UiAction> {
    dispatcher.session().clear()?;
    Ok(UiAction::Notice("Logged out.".to_string()))
}

/// Request an optimized itinerary. Requires a stored token.
pub async fn create_itinerary(
    dispatcher: &Dispatcher,
    form: ItineraryForm,
    user_id: &str,
) -> Result<UiAction> {
    let request = ItineraryRequest {
        destination: form.destination,
        duration: form.duration,
        budget: form.budget,
        interests: form.interests,
        user_id: user_id.to_string(),
    };
    let outcome = dispatcher
        .dispatch(Endpoint::CreateItinerary, &request)
        .await?;
    render::itinerary(outcome)
}

/// Record an expense and show the running total.
pub async fn track_expense(dispatcher: &Dispatcher, form: ExpenseForm) -> Result<UiAction> {
    let record = ExpenseRecord {
        amount: form.amount,
        currency: form.currency,
    };
    let outcome = dispatcher.dispatch(Endpoint::TrackExpense, &record).await?;
    render::expense(outcome)
}

/// Submit an activity review. Requires a stored token.
pub async fn submit_review(dispatcher: &Dispatcher, form: ReviewForm) -> Result<UiAction> {
    let review = Review {
        activity_id: form.activity_id,
        rating: form.rating,
        review_text: form.review_text,
    };
    let outcome = dispatcher.dispatch(Endpoint::SubmitReview, &review).await?;
    render::review(outcome)
}

/// Ask the travel assistant.
pub async fn chat(dispatcher: &Dispatcher, form: ChatForm) -> Result<UiAction> {
    let query = ChatQuery { query: form.query };
    let outcome = dispatcher.dispatch(Endpoint::Chatbot, &query).await?;
    render::chat(outcome)
}

/// Result of generating an itinerary from preferences
#[derive(Debug, Clone)]
pub struct GeneratedItinerary {
    pub action: UiAction,
    /// The itinerary, when the backend returned one
    pub itinerary: Option<Itinerary>,
}

/// Generate an itinerary of places from travel preferences.
pub async fn generate_itinerary(
    dispatcher: &Dispatcher,
    preferences: &Preferences,
) -> Result<GeneratedItinerary> {
    tracing::info!(destination = %preferences.destination, "Generating itinerary");
    let outcome = dispatcher
        .dispatch(Endpoint::GenerateItinerary, preferences)
        .await?;
    let (action, itinerary) = render::generated_itinerary(outcome, preferences)?;
    Ok(GeneratedItinerary { action, itinerary })
}
