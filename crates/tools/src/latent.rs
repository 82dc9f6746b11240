use std::time::Duration;

use catalog::BoxFuture;
use foundation::DrawableId;
use layers::{DrawableSpec, InMemorySurface, MapSurface, SurfaceError};

/// In-memory surface whose attaches take a while, with per-layer jitter so
/// completions arrive out of catalog order.
pub struct LatentSurface {
    inner: InMemorySurface,
    latency: Duration,
}

impl LatentSurface {
    pub fn new(latency: Duration) -> Self {
        Self {
            inner: InMemorySurface::new(),
            latency,
        }
    }

    pub fn inner(&self) -> &InMemorySurface {
        &self.inner
    }

    fn delay_for(&self, layer_id: &str) -> Duration {
        let spread = layer_id.bytes().map(u32::from).sum::<u32>() % 4 + 1;
        self.latency * spread
    }
}

impl MapSurface for LatentSurface {
    fn add_drawable(&self, spec: DrawableSpec) -> BoxFuture<'_, Result<DrawableId, SurfaceError>> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.delay_for(&spec.layer_id)).await;
            }
            self.inner.add_drawable(spec).await
        })
    }

    fn remove_drawable(&self, drawable: DrawableId) {
        self.inner.remove_drawable(drawable);
    }

    fn set_visible(&self, drawable: DrawableId, visible: bool) {
        self.inner.set_visible(drawable, visible);
    }

    fn set_opacity(&self, drawable: DrawableId, opacity: f32) {
        self.inner.set_opacity(drawable, opacity);
    }
}
