use catalog::LayerDescriptor;
use foundation::{DrawableId, Opacity};

use crate::surface::SurfaceOp;

/// A materialized layer: the surface drawable plus the state last pushed to
/// it. Owned by the registry and never handed to UI collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveLayerHandle {
    drawable: DrawableId,
    visible: bool,
    opacity: Opacity,
}

impl LiveLayerHandle {
    pub(crate) fn new(drawable: DrawableId, visible: bool, opacity: Opacity) -> Self {
        Self {
            drawable,
            visible,
            opacity,
        }
    }

    pub fn drawable(&self) -> DrawableId {
        self.drawable
    }

    pub fn state(&self) -> HandleState {
        HandleState {
            visible: self.visible,
            opacity: self.opacity,
        }
    }

    /// Records the surface calls needed to move to `visible`/`opacity`.
    pub(crate) fn sync_to(&mut self, visible: bool, opacity: Opacity, ops: &mut Vec<SurfaceOp>) {
        if self.visible != visible {
            ops.push(SurfaceOp::SetVisible(self.drawable, visible));
            self.visible = visible;
        }
        if self.opacity != opacity {
            ops.push(SurfaceOp::SetOpacity(self.drawable, opacity.get()));
            self.opacity = opacity;
        }
    }
}

/// Observable render state of a live handle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandleState {
    pub visible: bool,
    pub opacity: Opacity,
}

/// One row of a layer-control panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStatus {
    pub descriptor: LayerDescriptor,
    pub materialized: bool,
}
