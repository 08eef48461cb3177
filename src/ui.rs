//! Interface adapters
//!
//! A [`Ui`] performs the actions produced by the handlers. [`TerminalUi`]
//! prints to the terminal; [`RecordingUi`] keeps everything in memory for
//! headless use and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use prettytable::{format, Table};

use crate::error::Result;
use crate::map::{MapLibraryLoader, MapView, MapWidget};
use crate::model::Place;
use crate::render::{OutputRegion, UiAction};
use crate::share::ShareTrigger;

/// Surface that UI actions are applied to
#[async_trait]
pub trait Ui: Send {
    /// Show a blocking notice.
    fn notice(&mut self, message: &str);

    /// Replace the text of an output region.
    fn set_text(&mut self, region: OutputRegion, text: &str);

    /// Render places on the map widget.
    async fn show_map(&mut self, places: &[Place]) -> Result<()>;

    /// Show share triggers.
    fn show_share(&mut self, triggers: &[ShareTrigger]);
}

/// Apply `action` to `ui`, step by step.
pub async fn apply<U: Ui + ?Sized>(ui: &mut U, action: UiAction) -> Result<()> {
    for step in action.into_steps() {
        match step {
            UiAction::Notice(message) => ui.notice(&message),
            UiAction::SetText { region, text } => ui.set_text(region, &text),
            UiAction::ShowMap(places) => ui.show_map(&places).await?,
            UiAction::Many(_) | UiAction::Nothing => {}
        }
    }
    Ok(())
}

/// Terminal interface
#[derive(Debug)]
pub struct TerminalUi {
    map: MapWidget,
}

impl TerminalUi {
    pub fn new(map: MapWidget) -> Self {
        Self { map }
    }

    fn print_map(view: &MapView) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row![
            "#".bold(),
            "Place".bold(),
            "Latitude".bold(),
            "Longitude".bold()
        ]);
        for (index, marker) in view.markers.iter().enumerate() {
            table.add_row(prettytable::row![
                index + 1,
                marker.title.cyan(),
                marker.position.lat,
                marker.position.lng
            ]);
        }
        table.printstd();

        println!(
            "Centered on {} at zoom {}",
            view.center.to_string().cyan(),
            view.zoom
        );
        if let Some(url) = &view.image_url {
            println!("Map: {}", url.as_str().underline());
        }
    }
}

#[async_trait]
impl Ui for TerminalUi {
    fn notice(&mut self, message: &str) {
        println!("{} {}", "!".yellow().bold(), message.yellow());
    }

    fn set_text(&mut self, _region: OutputRegion, text: &str) {
        println!("{}", text);
    }

    async fn show_map(&mut self, places: &[Place]) -> Result<()> {
        match self.map.render(places).await {
            Ok(Some(view)) => Self::print_map(&view),
            Ok(None) => println!("{}", "No places to display.".yellow()),
            Err(e) => {
                tracing::warn!(error = %e, "Map unavailable");
                println!("{} {}", "Map unavailable:".yellow(), e);
                for place in places {
                    println!("  {} ({}, {})", place.name.cyan(), place.lat, place.lng);
                }
            }
        }
        Ok(())
    }

    fn show_share(&mut self, triggers: &[ShareTrigger]) {
        for trigger in triggers {
            println!(
                "{:<10} {}",
                trigger.platform.label().bold(),
                trigger.link.as_str().underline()
            );
        }
    }
}

/// In-memory interface that records what would have been shown
///
/// # Examples
///
/// ```
/// use itinera::render::{OutputRegion, UiAction};
/// use itinera::ui::{apply, RecordingUi};
///
/// # tokio_test::block_on(async {
/// let mut ui = RecordingUi::without_map();
/// apply(&mut ui, UiAction::SetText {
///     region: OutputRegion::ChatOutput,
///     text: "Assistant: hello".to_string(),
/// }).await.unwrap();
/// assert_eq!(ui.text(OutputRegion::ChatOutput), Some("Assistant: hello"));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct RecordingUi {
    map: Option<MapWidget>,
    /// Notices in the order they were shown
    pub notices: Vec<String>,
    /// Current text of every written region
    pub regions: HashMap<OutputRegion, String>,
    /// Every map render; `None` for an empty place list
    pub maps: Vec<Option<MapView>>,
    /// Every set of share triggers shown
    pub shares: Vec<Vec<ShareTrigger>>,
}

impl RecordingUi {
    /// Recorder that renders maps through `loader`
    pub fn new(loader: Arc<dyn MapLibraryLoader>, zoom: u8) -> Self {
        Self {
            map: Some(MapWidget::new(loader, zoom)),
            ..Self::default()
        }
    }

    /// Recorder for flows that never show a map
    pub fn without_map() -> Self {
        Self::default()
    }

    /// Current text of `region`
    pub fn text(&self, region: OutputRegion) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }
}

#[async_trait]
impl Ui for RecordingUi {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn set_text(&mut self, region: OutputRegion, text: &str) {
        self.regions.insert(region, text.to_string());
    }

    async fn show_map(&mut self, places: &[Place]) -> Result<()> {
        let view = match &self.map {
            Some(widget) => widget.render(places).await?,
            None => None,
        };
        self.maps.push(view);
        Ok(())
    }

    fn show_share(&mut self, triggers: &[ShareTrigger]) {
        self.shares.push(triggers.to_vec());
    }
}
