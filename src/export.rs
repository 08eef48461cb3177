//! Plain-text itinerary export

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use crate::error::Result;
use crate::model::Itinerary;

/// Render an itinerary as a printable text document.
///
/// # Examples
///
/// ```
/// use itinera::export::itinerary_document;
/// use itinera::model::{Itinerary, Place};
///
/// let itinerary = Itinerary {
///     places: vec![Place { name: "Eiffel Tower".into(), lat: 48.8584, lng: 2.2945 }],
///     stops: vec![],
/// };
/// let doc = itinerary_document("Paris", &itinerary);
/// assert!(doc.starts_with("Travel Itinerary for Paris\n"));
/// ```
pub fn itinerary_document(destination: &str, itinerary: &Itinerary) -> String {
    let mut doc = format!("Travel Itinerary for {}\n\n", destination);

    if !itinerary.places.is_empty() {
        doc.push_str("Places of Interest:\n");
        for place in &itinerary.places {
            let _ = writeln!(doc, "  {} ({:.4}, {:.4})", place.name, place.lat, place.lng);
        }
    }

    if !itinerary.stops.is_empty() {
        if !itinerary.places.is_empty() {
            doc.push('\n');
        }
        doc.push_str("Stops:\n");
        for (index, stop) in itinerary.stops.iter().enumerate() {
            let _ = writeln!(doc, "  {}. {}", index + 1, stop);
        }
    }

    if itinerary.places.is_empty() && itinerary.stops.is_empty() {
        doc.push_str("No places returned.\n");
    }

    doc
}

/// Write the itinerary document to `path`, replacing any existing file.
pub fn write_itinerary(path: &Path, destination: &str, itinerary: &Itinerary) -> Result<()> {
    std::fs::write(path, itinerary_document(destination, itinerary))
        .with_context(|| format!("Failed to write itinerary to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Itinerary exported");
    Ok(())
}
