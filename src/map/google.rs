//! Google Maps Static API backend
//!
//! Loading resolves the API key and the endpoint once; the resulting handle
//! renders maps as static image URLs. Marker titles are not part of the
//! image and are reported alongside it in the [`MapView`].

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::config::MapConfig;
use crate::error::{ItineraError, Result};
use crate::map::{LatLng, MapLibrary, MapLibraryLoader, MapView, Marker};

/// Loaded Google Static Maps handle
#[derive(Debug, Clone)]
pub struct GoogleStaticMaps {
    endpoint: Url,
    api_key: String,
    width: u32,
    height: u32,
}

impl GoogleStaticMaps {
    fn image_url(&self, center: LatLng, zoom: u8, markers: &[Marker]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("center", &center.to_string())
                .append_pair("zoom", &zoom.to_string())
                .append_pair("size", &format!("{}x{}", self.width, self.height));
            for marker in markers {
                query.append_pair("markers", &marker.position.to_string());
            }
            query.append_pair("key", &self.api_key);
        }
        url
    }
}

impl MapLibrary for GoogleStaticMaps {
    fn render(&self, center: LatLng, zoom: u8, markers: Vec<Marker>) -> Result<MapView> {
        let image_url = self.image_url(center, zoom, &markers);
        Ok(MapView {
            center,
            zoom,
            markers,
            image_url: Some(image_url),
        })
    }
}

/// Loader for [`GoogleStaticMaps`]
#[derive(Debug, Clone)]
pub struct GoogleMapsLoader {
    api_key: Option<String>,
    endpoint: String,
    width: u32,
    height: u32,
}

impl GoogleMapsLoader {
    /// Create a loader. `api_key` is checked at load time, not here, so that
    /// commands which never show a map work without one.
    pub fn new(api_key: Option<String>, config: &MapConfig) -> Self {
        Self {
            api_key,
            endpoint: config.static_base_url.clone(),
            width: config.width,
            height: config.height,
        }
    }

    /// Loader configured entirely from [`MapConfig`]
    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.api_key.clone(), config)
    }
}

#[async_trait]
impl MapLibraryLoader for GoogleMapsLoader {
    async fn load(&self) -> Result<Arc<dyn MapLibrary>> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ItineraError::MapLibrary(
                    "no Google Maps API key configured (set map.api_key or ITINERA_MAPS_API_KEY)"
                        .to_string(),
                )
            })?;

        let endpoint = Url::parse(&self.endpoint).map_err(|e| {
            ItineraError::MapLibrary(format!("invalid static map endpoint '{}': {}", self.endpoint, e))
        })?;

        tracing::info!(endpoint = %endpoint, "Map library loaded");
        Ok(Arc::new(GoogleStaticMaps {
            endpoint,
            api_key: api_key.to_string(),
            width: self.width,
            height: self.height,
        }))
    }
}
