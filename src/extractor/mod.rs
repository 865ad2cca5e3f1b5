pub mod fetch;
pub mod inventory;
pub mod scrape;

use std::path::Path;

use tracing::{error, info};

use crate::error::{PipelineError, Result};
use crate::trace::{EventSink, NoopSink, Stage, StageStatus, TraceEvent};

use fetch::PageFetcher;
use inventory::ElementInventory;
use scrape::scrape_elements;

/// Stage 1: fetch a page and record its UI elements.
pub struct Extractor {
    url: String,
    fetcher: Box<dyn PageFetcher>,
    sink: Box<dyn EventSink>,
}

impl Extractor {
    pub fn new(url: &str, fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            url: url.to_string(),
            fetcher,
            sink: Box::new(NoopSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the configured URL and build a fresh inventory.
    pub fn extract(&self) -> Result<ElementInventory> {
        let result = self
            .fetcher
            .fetch(&self.url)
            .and_then(|body| scrape_elements(&body));

        match result {
            Ok(inventory) => {
                info!("Successfully extracted elements from {}", self.url);
                Ok(inventory)
            }
            Err(e) => {
                error!("Failed to fetch webpage: {}", e);
                Err(e)
            }
        }
    }

    /// Write the inventory as 4-space-indented UTF-8 JSON, creating parent
    /// directories as needed.
    pub fn persist(&self, inventory: &ElementInventory, path: &Path) -> Result<()> {
        match write_inventory(inventory, path) {
            Ok(()) => {
                info!("Successfully saved elements to {}", path.display());
                Ok(())
            }
            Err(e) => {
                error!("Failed to save JSON file: {}", e);
                Err(e)
            }
        }
    }

    /// Extract then persist, journaling the stage.
    pub fn run(&self, path: &Path) -> Result<ElementInventory> {
        self.sink
            .emit(&TraceEvent::now(Stage::Extract, StageStatus::Started));

        let result = self.extract().and_then(|inventory| {
            self.persist(&inventory, path)?;
            Ok(inventory)
        });

        let event = match &result {
            Ok(inventory) => TraceEvent::now(Stage::Extract, StageStatus::Completed)
                .with_artifact(path)
                .with_records(inventory.total()),
            Err(e) => TraceEvent::now(Stage::Extract, StageStatus::Failed).with_error(e),
        };
        self.sink.emit(&event);

        result
    }
}

fn write_inventory(inventory: &ElementInventory, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::persist(parent, e))?;
    }
    let json = inventory
        .to_json_pretty()
        .map_err(|e| PipelineError::persist(path, e))?;
    std::fs::write(path, json).map_err(|e| PipelineError::persist(path, e))
}
