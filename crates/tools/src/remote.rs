use catalog::{BoxFuture, CatalogError, DescriptorSource, LayerDescriptor, parse_descriptors};
use tracing::info;

/// Layer catalog served over HTTP as JSON.
pub struct HttpSource {
    url: String,
    http: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl DescriptorSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<LayerDescriptor>, CatalogError>> {
        Box::pin(async move {
            info!(url = %self.url, "fetching layer catalog");
            let resp = self
                .http
                .get(&self.url)
                .send()
                .await
                .map_err(|e| CatalogError::Source(format!("GET {}: {e}", self.url)))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(CatalogError::Source(format!("GET {}: {status}", self.url)));
            }
            let body = resp
                .text()
                .await
                .map_err(|e| CatalogError::Source(format!("read {}: {e}", self.url)))?;
            parse_descriptors(&body)
        })
    }
}
