use catalog::LayerDescriptor;
use tracing::{debug, warn};

use crate::layer::LiveLayerHandle;
use crate::surface::{MapSurface, SurfaceError};
use crate::symbology::{DrawableSpec, StyleError, StyleTable};

#[derive(Debug, Clone, PartialEq)]
pub enum MaterializeError {
    Style(StyleError),
    Surface(SurfaceError),
}

impl std::fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterializeError::Style(e) => write!(f, "malformed style template: {e}"),
            MaterializeError::Surface(e) => write!(f, "surface rejected drawable: {e}"),
        }
    }
}

impl std::error::Error for MaterializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterializeError::Style(e) => Some(e),
            MaterializeError::Surface(e) => Some(e),
        }
    }
}

impl From<StyleError> for MaterializeError {
    fn from(e: StyleError) -> Self {
        MaterializeError::Style(e)
    }
}

impl From<SurfaceError> for MaterializeError {
    fn from(e: SurfaceError) -> Self {
        MaterializeError::Surface(e)
    }
}

/// Turns descriptors into live handles on a surface.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    styles: StyleTable,
}

impl Materializer {
    pub fn new(styles: StyleTable) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn drawable_spec(&self, descriptor: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
        self.styles.render(descriptor)
    }

    /// Attaches `descriptor` to `surface`.
    ///
    /// The drawable spec is built before the first suspension point, so the
    /// handle reflects the descriptor as it was when the call started.
    pub async fn try_materialize<S: MapSurface + ?Sized>(
        &self,
        descriptor: &LayerDescriptor,
        surface: &S,
    ) -> Result<LiveLayerHandle, MaterializeError> {
        let spec = self.drawable_spec(descriptor)?;
        let (visible, opacity) = (descriptor.visible, descriptor.opacity);
        let drawable = surface.add_drawable(spec).await?;
        Ok(LiveLayerHandle::new(drawable, visible, opacity))
    }

    /// Like [`try_materialize`](Self::try_materialize), but failures are
    /// logged and reported as `None`.
    pub async fn materialize<S: MapSurface + ?Sized>(
        &self,
        descriptor: &LayerDescriptor,
        surface: &S,
    ) -> Option<LiveLayerHandle> {
        match self.try_materialize(descriptor, surface).await {
            Ok(handle) => {
                debug!(
                    layer_id = %descriptor.id,
                    drawable = %handle.drawable(),
                    "layer materialized"
                );
                Some(handle)
            }
            Err(err) => {
                warn!(layer_id = %descriptor.id, kind = %descriptor.kind, "layer materialization failed: {err}");
                None
            }
        }
    }
}
