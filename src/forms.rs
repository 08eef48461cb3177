//! Form capture
//!
//! A [`FormValues`] is a snapshot of a form's named fields taken at submit
//! time. Typed forms are read out of it with [`FormCapture::capture`]. The
//! only check performed is the "required" rule of the input surface: a
//! required field that is absent or empty stops the submission. Values are
//! otherwise passed through unvalidated; numeric fields keep their raw text
//! when it does not parse (see [`FormNumber`]).

use std::collections::{BTreeSet, HashMap};

use crate::error::{ItineraError, Result};
use crate::model::{FormNumber, Interest, Preferences};

/// Value of a single named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text inputs, number inputs, single selects
    Single(String),
    /// Multi-selects: every selected option value
    Multi(Vec<String>),
}

/// Named field values captured from one form submission
///
/// # Examples
///
/// ```
/// use itinera::forms::{FormCapture, FormValues, LoginForm};
///
/// let values = FormValues::new()
///     .with("username", "alice")
///     .with("password", "secret");
/// let form = LoginForm::capture(&values).unwrap();
/// assert_eq!(form.username, "alice");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    fields: HashMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued field
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Single(value.into()));
        self
    }

    /// Set a single-valued field only when a value was entered
    pub fn with_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Set a multi-select field
    pub fn with_multi<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(
            name.to_string(),
            FieldValue::Multi(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Raw value of a field, if present
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text of a field; an absent field reads as empty text.
    ///
    /// A multi-select read as text yields its first selected option.
    pub fn text(&self, name: &str) -> String {
        match self.fields.get(name) {
            Some(FieldValue::Single(value)) => value.clone(),
            Some(FieldValue::Multi(values)) => values.first().cloned().unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Text of a required field.
    ///
    /// # Errors
    ///
    /// Returns [`ItineraError::Validation`] if the field is absent or empty.
    pub fn required(&self, name: &str) -> Result<String> {
        let value = self.text(name);
        if value.is_empty() {
            return Err(ItineraError::Validation(format!("{} is required", name)).into());
        }
        Ok(value)
    }

    /// Selected options of a multi-select field.
    ///
    /// A single-valued field yields a one-element selection (or none when
    /// empty).
    pub fn selected(&self, name: &str) -> Vec<String> {
        match self.fields.get(name) {
            Some(FieldValue::Multi(values)) => values.clone(),
            Some(FieldValue::Single(value)) if !value.is_empty() => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    /// Selected interests as a set.
    ///
    /// # Errors
    ///
    /// Returns [`ItineraError::Validation`] for an option the interests
    /// select does not offer.
    pub fn interests(&self, name: &str) -> Result<BTreeSet<Interest>> {
        self.selected(name)
            .iter()
            .map(|value| value.parse::<Interest>().map_err(anyhow::Error::from))
            .collect()
    }
}

/// A typed form read from captured field values
pub trait FormCapture: Sized {
    /// Read the form out of a submission snapshot.
    fn capture(values: &FormValues) -> Result<Self>;
}

/// `login-form`
#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl FormCapture for LoginForm {
    fn capture(values: &FormValues) -> Result<Self> {
        Ok(Self {
            username: values.required("username")?,
            password: values.required("password")?,
        })
    }
}

/// `itinerary-form`
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryForm {
    pub destination: String,
    pub duration: FormNumber,
    pub budget: FormNumber,
    pub interests: BTreeSet<Interest>,
}

impl FormCapture for ItineraryForm {
    fn capture(values: &FormValues) -> Result<Self> {
        Ok(Self {
            destination: values.required("destination")?,
            duration: FormNumber::from_input(&values.required("duration")?),
            budget: FormNumber::from_input(&values.required("budget")?),
            interests: values.interests("interests")?,
        })
    }
}

/// `expense-form`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub amount: FormNumber,
    pub currency: String,
}

impl FormCapture for ExpenseForm {
    fn capture(values: &FormValues) -> Result<Self> {
        Ok(Self {
            amount: FormNumber::from_input(&values.required("amount")?),
            currency: values.required("currency")?,
        })
    }
}

/// `review-form`
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewForm {
    pub activity_id: String,
    pub rating: FormNumber,
    pub review_text: String,
}

impl FormCapture for ReviewForm {
    fn capture(values: &FormValues) -> Result<Self> {
        Ok(Self {
            activity_id: values.required("activity-id")?,
            rating: FormNumber::from_input(&values.required("rating")?),
            review_text: values.required("review-text")?,
        })
    }
}

/// Chat input. Not a form: an empty query is sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatForm {
    pub query: String,
}

impl FormCapture for ChatForm {
    fn capture(values: &FormValues) -> Result<Self> {
        Ok(Self {
            query: values.text("chat-input"),
        })
    }
}

/// Preferences form of the itinerary generator
impl FormCapture for Preferences {
    fn capture(values: &FormValues) -> Result<Self> {
        Ok(Self {
            destination: values.required("destination")?,
            budget: FormNumber::from_input(&values.required("budget")?),
            trip_duration: FormNumber::from_input(&values.required("tripDuration")?),
            interests: values.interests("interests")?,
        })
    }
}
