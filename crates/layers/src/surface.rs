use catalog::BoxFuture;
use foundation::DrawableId;

use crate::symbology::DrawableSpec;

/// Error returned when a surface refuses to attach a drawable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceError {
    pub message: String,
}

impl SurfaceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SurfaceError {}

/// The external rendering target.
///
/// Only the registry calls into a surface. Attaching is the one async
/// operation; everything else is immediate.
///
/// The registry's state is unlocked while these methods run, so an
/// implementation may read the registry (`visible_count`, `descriptor`,
/// `layer_panel`) from inside them. Mutating the registry from inside them
/// deadlocks.
pub trait MapSurface: Send + Sync {
    /// Attaches a drawable built from `spec` and resolves once it is live.
    fn add_drawable(&self, spec: DrawableSpec) -> BoxFuture<'_, Result<DrawableId, SurfaceError>>;

    /// Detaches a drawable. Unknown ids are ignored.
    fn remove_drawable(&self, drawable: DrawableId);

    fn set_visible(&self, drawable: DrawableId, visible: bool);

    fn set_opacity(&self, drawable: DrawableId, opacity: f32);
}

/// A surface call recorded under the registry lock and issued after it is
/// released.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum SurfaceOp {
    Remove(DrawableId),
    SetVisible(DrawableId, bool),
    SetOpacity(DrawableId, f32),
}

impl SurfaceOp {
    pub(crate) fn apply<S: MapSurface + ?Sized>(self, surface: &S) {
        match self {
            SurfaceOp::Remove(id) => surface.remove_drawable(id),
            SurfaceOp::SetVisible(id, visible) => surface.set_visible(id, visible),
            SurfaceOp::SetOpacity(id, opacity) => surface.set_opacity(id, opacity),
        }
    }
}
