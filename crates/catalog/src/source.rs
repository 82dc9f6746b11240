//! Descriptor sources.
//!
//! A source hands the catalog a finished, ordered list of descriptors. The
//! core never retries or caches a fetch; that belongs to whoever owns the
//! source.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::Deserialize;

use crate::CatalogError;
use crate::catalog::LayerCatalog;
use crate::descriptor::LayerDescriptor;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait DescriptorSource: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<LayerDescriptor>, CatalogError>>;
}

/// Fetches from `source` and validates the result into a catalog.
pub async fn load_catalog(source: &dyn DescriptorSource) -> Result<LayerCatalog, CatalogError> {
    let layers = source.fetch().await?;
    LayerCatalog::new(layers)
}

/// A list already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    layers: Vec<LayerDescriptor>,
}

impl StaticSource {
    pub fn new(layers: Vec<LayerDescriptor>) -> Self {
        Self { layers }
    }
}

impl DescriptorSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<LayerDescriptor>, CatalogError>> {
        let layers = self.layers.clone();
        Box::pin(async move { Ok(layers) })
    }
}

/// JSON text, either a bare array of descriptors or `{ "layers": [...] }`.
#[derive(Debug, Clone)]
pub struct JsonSource {
    label: String,
    text: String,
}

impl JsonSource {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            label: "json".to_string(),
            text: text.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("read {}: {e}", path.display())))?;
        Ok(Self {
            label: path.display().to_string(),
            text,
        })
    }
}

impl DescriptorSource for JsonSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<LayerDescriptor>, CatalogError>> {
        Box::pin(async move { parse_descriptors(&self.text) })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorDocument {
    Bare(Vec<LayerDescriptor>),
    Wrapped { layers: Vec<LayerDescriptor> },
}

/// Parses a serialized descriptor list as returned by a layer catalog
/// endpoint.
pub fn parse_descriptors(text: &str) -> Result<Vec<LayerDescriptor>, CatalogError> {
    let doc: DescriptorDocument =
        serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(match doc {
        DescriptorDocument::Bare(layers) => layers,
        DescriptorDocument::Wrapped { layers } => layers,
    })
}
