//! Map widget
//!
//! Renders a list of places as one map centered on the first place, with one
//! marker per place titled with its name.
//!
//! The mapping library is an external collaborator obtained through a
//! [`MapLibraryLoader`]. [`MapWidget::ensure_loaded`] is idempotent: the
//! loader runs at most once per widget, concurrent renders share that single
//! load, and a failed load is attempted again on the next render.
//!
//! An empty place list renders nothing and does not load the library.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use url::Url;

use crate::error::Result;
use crate::model::Place;

pub mod google;

pub use google::{GoogleMapsLoader, GoogleStaticMaps};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<&Place> for LatLng {
    fn from(place: &Place) -> Self {
        Self {
            lat: place.lat,
            lng: place.lng,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A titled map marker
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub title: String,
}

/// A rendered map
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    /// Image of the map, when the library renders to an image
    pub image_url: Option<Url>,
}

/// A loaded mapping library
pub trait MapLibrary: Send + Sync + fmt::Debug {
    /// Construct a map centered on `center` carrying `markers`.
    fn render(&self, center: LatLng, zoom: u8, markers: Vec<Marker>) -> Result<MapView>;
}

/// Loads the mapping library and returns a handle once it is ready
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MapLibraryLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn MapLibrary>>;
}

/// Renders places through a lazily loaded mapping library
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use itinera::map::{GoogleMapsLoader, MapWidget};
/// use itinera::model::Place;
///
/// # async fn example() -> itinera::error::Result<()> {
/// let loader = GoogleMapsLoader::new(Some("maps-key".to_string()), &Default::default());
/// let widget = MapWidget::new(Arc::new(loader), 10);
/// let places = vec![Place { name: "Belem Tower".into(), lat: 38.69, lng: -9.22 }];
/// let view = widget.render(&places).await?.expect("one place renders a map");
/// assert_eq!(view.markers.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MapWidget {
    loader: Arc<dyn MapLibraryLoader>,
    library: OnceCell<Arc<dyn MapLibrary>>,
    zoom: u8,
}

impl fmt::Debug for MapWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapWidget")
            .field("loaded", &self.library.initialized())
            .field("zoom", &self.zoom)
            .finish()
    }
}

impl MapWidget {
    pub fn new(loader: Arc<dyn MapLibraryLoader>, zoom: u8) -> Self {
        Self {
            loader,
            library: OnceCell::new(),
            zoom,
        }
    }

    /// Load the mapping library if it is not loaded yet and return it.
    pub async fn ensure_loaded(&self) -> Result<Arc<dyn MapLibrary>> {
        let library = self
            .library
            .get_or_try_init(|| async {
                tracing::debug!("Loading map library");
                self.loader.load().await
            })
            .await?;
        Ok(Arc::clone(library))
    }

    /// Render `places`, centered on the first one.
    ///
    /// Returns `Ok(None)` for an empty list.
    pub async fn render(&self, places: &[Place]) -> Result<Option<MapView>> {
        let Some(first) = places.first() else {
            tracing::debug!("No places to render; map skipped");
            return Ok(None);
        };

        let library = self.ensure_loaded().await?;
        let markers = places
            .iter()
            .map(|place| Marker {
                position: LatLng::from(place),
                title: place.name.clone(),
            })
            .collect();

        let view = library.render(LatLng::from(first), self.zoom, markers)?;
        tracing::debug!(markers = view.markers.len(), center = %view.center, "Map rendered");
        Ok(Some(view))
    }
}
