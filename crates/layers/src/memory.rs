//! In-memory map surface.
//!
//! Records attached drawables and their live visibility/opacity. Attaches
//! can be held open, for every layer or per layer, and individual layers can
//! be configured to be rejected, which makes interleavings with teardown and toggles
//! reproducible.

use std::collections::{BTreeMap, HashSet};

use catalog::BoxFuture;
use foundation::DrawableId;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::surface::{MapSurface, SurfaceError};
use crate::symbology::DrawableSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct AttachedDrawable {
    pub id: DrawableId,
    pub spec: DrawableSpec,
    pub visible: bool,
    pub opacity: f32,
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_id: u64,
    drawables: BTreeMap<DrawableId, AttachedDrawable>,
    rejected: HashSet<String>,
    held_all: bool,
    held: HashSet<String>,
    attached_total: u64,
}

impl SurfaceState {
    fn is_held(&self, layer_id: &str) -> bool {
        self.held_all || self.held.contains(layer_id)
    }
}

#[derive(Debug)]
pub struct InMemorySurface {
    state: Mutex<SurfaceState>,
    /// Bumped whenever a hold changes so pending attaches re-check.
    gate: watch::Sender<u64>,
}

impl Default for InMemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySurface {
    pub fn new() -> Self {
        let (gate, _rx) = watch::channel(0);
        Self {
            state: Mutex::new(SurfaceState::default()),
            gate,
        }
    }

    /// Makes every subsequent attach for `layer_id` fail.
    pub fn reject_layer(&self, layer_id: impl Into<String>) {
        self.state.lock().rejected.insert(layer_id.into());
    }

    pub fn accept_layer(&self, layer_id: &str) {
        self.state.lock().rejected.remove(layer_id);
    }

    /// Holds every attach pending until [`release`](Self::release).
    pub fn hold(&self) {
        self.state.lock().held_all = true;
        self.notify();
    }

    /// Lifts [`hold`](Self::hold) and every per-layer hold.
    pub fn release(&self) {
        {
            let mut state = self.state.lock();
            state.held_all = false;
            state.held.clear();
        }
        self.notify();
    }

    /// Holds attaches for `layer_id` pending until
    /// [`release_layer`](Self::release_layer) or [`release`](Self::release).
    pub fn hold_layer(&self, layer_id: impl Into<String>) {
        self.state.lock().held.insert(layer_id.into());
        self.notify();
    }

    pub fn release_layer(&self, layer_id: &str) {
        self.state.lock().held.remove(layer_id);
        self.notify();
    }

    fn notify(&self) {
        self.gate.send_modify(|generation| *generation += 1);
    }

    pub fn drawable_count(&self) -> usize {
        self.state.lock().drawables.len()
    }

    /// Number of attaches that ever succeeded, including later removals.
    pub fn attached_total(&self) -> u64 {
        self.state.lock().attached_total
    }

    pub fn drawables(&self) -> Vec<AttachedDrawable> {
        self.state.lock().drawables.values().cloned().collect()
    }

    pub fn drawable_for_layer(&self, layer_id: &str) -> Option<AttachedDrawable> {
        self.state
            .lock()
            .drawables
            .values()
            .find(|d| d.spec.layer_id == layer_id)
            .cloned()
    }
}

impl MapSurface for InMemorySurface {
    fn add_drawable(&self, spec: DrawableSpec) -> BoxFuture<'_, Result<DrawableId, SurfaceError>> {
        Box::pin(async move {
            let mut gate = self.gate.subscribe();
            loop {
                let held = self.state.lock().is_held(&spec.layer_id);
                if !held {
                    break;
                }
                if gate.changed().await.is_err() {
                    return Err(SurfaceError::new("surface closed"));
                }
            }

            let mut state = self.state.lock();
            if state.rejected.contains(&spec.layer_id) {
                return Err(SurfaceError::new(format!(
                    "surface rejected layer {}",
                    spec.layer_id
                )));
            }
            let id = DrawableId::new(state.next_id);
            state.next_id += 1;
            state.attached_total += 1;
            state.drawables.insert(
                id,
                AttachedDrawable {
                    id,
                    visible: spec.visible,
                    opacity: spec.opacity,
                    spec,
                },
            );
            Ok(id)
        })
    }

    fn remove_drawable(&self, drawable: DrawableId) {
        self.state.lock().drawables.remove(&drawable);
    }

    fn set_visible(&self, drawable: DrawableId, visible: bool) {
        if let Some(d) = self.state.lock().drawables.get_mut(&drawable) {
            d.visible = visible;
        }
    }

    fn set_opacity(&self, drawable: DrawableId, opacity: f32) {
        if let Some(d) = self.state.lock().drawables.get_mut(&drawable) {
            d.opacity = opacity;
        }
    }
}
