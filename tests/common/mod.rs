use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use itinera::commands::Client;
use itinera::config::Config;
use itinera::map::{LatLng, MapLibrary, MapLibraryLoader, MapView, Marker};
use itinera::session::SessionContext;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Client talking to `base_url` with an in-memory session
#[allow(dead_code)]
pub fn client_for(base_url: &str) -> Client {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    Client::with_session(config, SessionContext::in_memory()).expect("client builds")
}

/// Map library that renders without an image
#[allow(dead_code)]
#[derive(Debug)]
pub struct PlainMapLibrary;

impl MapLibrary for PlainMapLibrary {
    fn render(&self, center: LatLng, zoom: u8, markers: Vec<Marker>) -> itinera::Result<MapView> {
        Ok(MapView {
            center,
            zoom,
            markers,
            image_url: None,
        })
    }
}

/// Loader that counts how often it was asked to load
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct CountingLoader {
    loads: AtomicUsize,
}

#[allow(dead_code)]
impl CountingLoader {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapLibraryLoader for CountingLoader {
    async fn load(&self) -> itinera::Result<Arc<dyn MapLibrary>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(PlainMapLibrary))
    }
}
