//! Share widget
//!
//! Renders one share trigger per supported social platform for a single URL.
//! A trigger is the platform's own share endpoint with the target URL
//! embedded; activating it hands over entirely to the platform. The widget
//! holds no state and performs no network calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ItineraError, Result};

/// Platforms a link can be shared to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Facebook,
    Twitter,
    WhatsApp,
}

impl SharePlatform {
    /// All supported platforms in display order
    pub const ALL: [SharePlatform; 3] = [
        SharePlatform::Facebook,
        SharePlatform::Twitter,
        SharePlatform::WhatsApp,
    ];

    /// Human readable platform name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
            Self::WhatsApp => "WhatsApp",
        }
    }

    fn endpoint(&self) -> (&'static str, &'static str) {
        match self {
            Self::Facebook => ("https://www.facebook.com/sharer/sharer.php", "u"),
            Self::Twitter => ("https://twitter.com/intent/tweet", "url"),
            Self::WhatsApp => ("https://api.whatsapp.com/send", "text"),
        }
    }

    /// Build this platform's share link for `target`.
    pub fn share_link(&self, target: &Url) -> Result<Url> {
        let (base, param) = self.endpoint();
        Ok(Url::parse_with_params(base, &[(param, target.as_str())])?)
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rendered share button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTrigger {
    pub platform: SharePlatform,
    /// The URL being shared
    pub target: Url,
    /// Platform share link that opens the native share flow
    pub link: Url,
}

/// Stateless renderer of share triggers
///
/// # Examples
///
/// ```
/// use itinera::share::{SharePlatform, ShareWidget};
///
/// let widget = ShareWidget::new(SharePlatform::ALL.to_vec());
/// let triggers = widget.render("https://trips.example.com/lisbon").unwrap();
/// assert_eq!(triggers.len(), 3);
/// assert!(triggers[0].link.as_str().starts_with("https://www.facebook.com/"));
/// ```
#[derive(Debug, Clone)]
pub struct ShareWidget {
    platforms: Vec<SharePlatform>,
}

impl ShareWidget {
    pub fn new(platforms: Vec<SharePlatform>) -> Self {
        Self { platforms }
    }

    /// Render one trigger per configured platform for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ItineraError::Share`] if `target` is not an absolute http(s)
    /// URL.
    pub fn render(&self, target: &str) -> Result<Vec<ShareTrigger>> {
        let target = Url::parse(target)
            .map_err(|e| ItineraError::Share(format!("'{}' is not a valid URL: {}", target, e)))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ItineraError::Share(format!(
                "only http(s) links can be shared, got: {}",
                target.scheme()
            ))
            .into());
        }

        self.platforms
            .iter()
            .map(|platform| {
                Ok(ShareTrigger {
                    platform: *platform,
                    link: platform.share_link(&target)?,
                    target: target.clone(),
                })
            })
            .collect()
    }
}

impl Default for ShareWidget {
    fn default() -> Self {
        Self::new(SharePlatform::ALL.to_vec())
    }
}
