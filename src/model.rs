//! Wire types exchanged with the itinerary planner backend
//!
//! Request bodies are built from captured forms; response bodies are parsed
//! from the JSON the backend returns on success. Field names follow the
//! backend's JSON exactly, including the one camel-cased field
//! (`tripDuration`) used by the itinerary generator.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ItineraError;

/// A numeric form field as it is sent on the wire.
///
/// Inputs are not validated on the client. Text whose JSON number form reads
/// back exactly as typed is sent as a number; anything else (`007`, `1e3`,
/// `5.10`, `about 300`) is forwarded verbatim as a string and left for the
/// backend to judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    /// Field text that is exactly a JSON number
    Number(serde_json::Number),
    /// Field text sent as typed
    Text(String),
}

impl FormNumber {
    /// Interpret raw field text.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinera::model::FormNumber;
    ///
    /// assert_eq!(FormNumber::from_input("5").to_string(), "5");
    /// assert!(matches!(FormNumber::from_input("five"), FormNumber::Text(_)));
    /// assert!(matches!(FormNumber::from_input("007"), FormNumber::Text(_)));
    /// ```
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        let number = trimmed
            .parse::<i64>()
            .ok()
            .map(serde_json::Number::from)
            .or_else(|| trimmed.parse::<u64>().ok().map(serde_json::Number::from))
            .or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
            });

        match number {
            Some(number) if number.to_string() == trimmed => Self::Number(number),
            _ => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for FormNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Interest categories offered by the preferences form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Culture,
    Adventure,
    Relaxation,
    Food,
}

impl Interest {
    /// Every option the interests select lists, in display order.
    pub const ALL: [Interest; 4] = [
        Interest::Culture,
        Interest::Adventure,
        Interest::Relaxation,
        Interest::Food,
    ];

    /// Option value as submitted by the form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Adventure => "adventure",
            Self::Relaxation => "relaxation",
            Self::Food => "food",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interest {
    type Err = ItineraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interest::ALL
            .into_iter()
            .find(|interest| interest.as_str() == s)
            .ok_or_else(|| {
                ItineraError::Validation(format!(
                    "unknown interest '{}', expected one of: culture, adventure, relaxation, food",
                    s
                ))
            })
    }
}

/// Travel preferences collected by the itinerary generator form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preferences {
    pub destination: String,
    pub budget: FormNumber,
    #[serde(rename = "tripDuration")]
    pub trip_duration: FormNumber,
    pub interests: BTreeSet<Interest>,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Success body of `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of `POST /itinerary`
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryRequest {
    pub destination: String,
    pub duration: FormNumber,
    pub budget: FormNumber,
    pub interests: BTreeSet<Interest>,
    pub user_id: String,
}

/// Success body of `POST /itinerary`: the optimized list of stops
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryResponse {
    #[serde(default)]
    pub itinerary: Vec<String>,
}

/// Body of `POST /track-expense`
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseRecord {
    pub amount: FormNumber,
    pub currency: String,
}

/// Success body of `POST /track-expense`
///
/// The backend may report the total as a number or, when conversion fails,
/// as a message string; either is displayed as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseResponse {
    pub total_expense: serde_json::Value,
}

/// Body of `POST /submit-review`
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub activity_id: String,
    pub rating: FormNumber,
    pub review_text: String,
}

/// Body of `POST /chatbot`
#[derive(Debug, Clone, Serialize)]
pub struct ChatQuery {
    pub query: String,
}

/// Success body of `POST /chatbot`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// A named geographic point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Itinerary returned by the generator: places and/or plain-text stops
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default, alias = "itinerary")]
    pub stops: Vec<String>,
}

/// Error body carried by every non-success response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_number_parses_integers_and_floats() {
        assert_eq!(serde_json::to_string(&FormNumber::from_input("1000")).unwrap(), "1000");
        assert_eq!(serde_json::to_string(&FormNumber::from_input(" 12.5 ")).unwrap(), "12.5");
    }

    #[test]
    fn test_form_number_forwards_text_verbatim() {
        let value = FormNumber::from_input("about 300");
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"about 300\"");
    }

    #[test]
    fn test_form_number_keeps_text_that_would_change_as_a_number() {
        for typed in ["007", "1e3", "5.10", "+5", "123456789012345678901234"] {
            assert_eq!(
                FormNumber::from_input(typed),
                FormNumber::Text(typed.to_string()),
                "{} must be sent as typed",
                typed
            );
        }
    }

    #[test]
    fn test_form_number_keeps_integers_beyond_i64() {
        assert_eq!(
            serde_json::to_string(&FormNumber::from_input("12345678901234567890")).unwrap(),
            "12345678901234567890"
        );
        assert_eq!(
            serde_json::to_string(&FormNumber::from_input("-42")).unwrap(),
            "-42"
        );
    }

    #[test]
    fn test_interest_from_str_matches_option_values_exactly() {
        assert_eq!("culture".parse::<Interest>().unwrap(), Interest::Culture);
        assert_eq!("food".parse::<Interest>().unwrap(), Interest::Food);
        assert!("Culture".parse::<Interest>().is_err());
        assert!(" food ".parse::<Interest>().is_err());
    }

    #[test]
    fn test_interest_from_str_rejects_unknown_option() {
        let err = "shopping".parse::<Interest>().unwrap_err();
        assert!(err.to_string().contains("unknown interest 'shopping'"));
    }

    #[test]
    fn test_preferences_serialize_with_backend_field_names() {
        let prefs = Preferences {
            destination: "Lisbon".to_string(),
            budget: FormNumber::from_input("1000"),
            trip_duration: FormNumber::from_input("5"),
            interests: [Interest::Food, Interest::Culture].into_iter().collect(),
        };
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "destination": "Lisbon",
                "budget": 1000,
                "tripDuration": 5,
                "interests": ["culture", "food"]
            })
        );
    }

    #[test]
    fn test_itinerary_accepts_places_or_stops() {
        let with_places: Itinerary = serde_json::from_str(
            r#"{"places":[{"name":"Belem Tower","lat":38.69,"lng":-9.22}]}"#,
        )
        .unwrap();
        assert_eq!(with_places.places.len(), 1);
        assert!(with_places.stops.is_empty());

        let with_stops: Itinerary =
            serde_json::from_str(r#"{"itinerary":["Museum","Park"]}"#).unwrap();
        assert_eq!(with_stops.stops, vec!["Museum", "Park"]);
    }

    #[test]
    fn test_error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }
}
