//! Surface lifecycle.
//!
//! `Detached → Initializing → Attached → TearingDown → Detached`. At most one
//! surface is live at a time: attaching while a surface is live or still
//! initializing tears the old one down first.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::registry::{InitializeReport, LayerRegistry};
use crate::surface::MapSurface;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Detached,
    Initializing,
    Attached,
    TearingDown,
}

/// Drives a [`LayerRegistry`] through surface attach and teardown.
///
/// Dropping the controller detaches the registry.
pub struct LifecycleController<S: MapSurface> {
    registry: LayerRegistry<S>,
    state: Mutex<LifecycleState>,
}

impl<S: MapSurface> LifecycleController<S> {
    pub fn new(registry: LayerRegistry<S>) -> Self {
        Self {
            registry,
            state: Mutex::new(LifecycleState::Detached),
        }
    }

    pub fn registry(&self) -> &LayerRegistry<S> {
        &self.registry
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    fn transition(&self, to: LifecycleState) {
        let mut state = self.state.lock();
        debug!(from = ?*state, to = ?to, "layer lifecycle transition");
        *state = to;
    }

    /// A surface became available: materialize every layer onto it.
    ///
    /// Moves to `Attached` once every materialization has settled, unless
    /// the attach was superseded by a detach or another attach meanwhile.
    pub async fn attach(&self, surface: Arc<S>) -> InitializeReport {
        if matches!(
            self.state(),
            LifecycleState::Initializing | LifecycleState::Attached
        ) {
            self.detach();
        }

        self.transition(LifecycleState::Initializing);
        let report = self.registry.initialize(surface).await;

        if self.registry.current_epoch() == report.epoch {
            self.transition(LifecycleState::Attached);
        } else {
            debug!(
                epoch = report.epoch.value(),
                "attach superseded before materialization settled"
            );
        }
        report
    }

    /// The surface went away or the consuming view is unmounting.
    pub fn detach(&self) {
        if self.state() == LifecycleState::Detached {
            return;
        }
        self.transition(LifecycleState::TearingDown);
        self.registry.teardown();
        self.transition(LifecycleState::Detached);
    }
}

impl<S: MapSurface> Drop for LifecycleController<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySurface;
    use catalog::{LayerCatalog, malaysia_layers};

    fn controller() -> Arc<LifecycleController<InMemorySurface>> {
        let catalog = LayerCatalog::new(malaysia_layers()).unwrap();
        Arc::new(LifecycleController::new(LayerRegistry::new(catalog)))
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn attach_then_detach() {
        let ctl = controller();
        assert_eq!(ctl.state(), LifecycleState::Detached);

        let surface = Arc::new(InMemorySurface::new());
        let report = ctl.attach(surface.clone()).await;
        assert_eq!(ctl.state(), LifecycleState::Attached);
        assert_eq!(report.materialized, 9);
        assert_eq!(ctl.registry().visible_count(), 4);

        ctl.detach();
        assert_eq!(ctl.state(), LifecycleState::Detached);
        assert_eq!(surface.drawable_count(), 0);
        assert_eq!(ctl.registry().visible_count(), 4);
    }

    #[tokio::test]
    async fn visible_count_ignores_materialization_failures() {
        let ctl = controller();
        let surface = Arc::new(InMemorySurface::new());
        surface.reject_layer("malaysia-boundaries");
        surface.reject_layer("emergency-services-malaysia");
        surface.reject_layer("forest-cover-malaysia");

        let report = ctl.attach(surface).await;
        assert_eq!(report.failed, 3);
        assert_eq!(ctl.state(), LifecycleState::Attached);
        assert_eq!(ctl.registry().visible_count(), 4);
    }

    #[tokio::test]
    async fn state_is_initializing_while_attaches_are_pending() {
        let ctl = controller();
        let surface = Arc::new(InMemorySurface::new());
        surface.hold();

        let task = tokio::spawn({
            let ctl = ctl.clone();
            let surface = surface.clone();
            async move { ctl.attach(surface).await }
        });
        settle().await;
        assert_eq!(ctl.state(), LifecycleState::Initializing);

        surface.release();
        task.await.unwrap();
        assert_eq!(ctl.state(), LifecycleState::Attached);
    }

    #[tokio::test]
    async fn toggle_before_attach_completes_is_kept() {
        let ctl = controller();
        let surface = Arc::new(InMemorySurface::new());
        surface.hold();

        let task = tokio::spawn({
            let ctl = ctl.clone();
            let surface = surface.clone();
            async move { ctl.attach(surface).await }
        });
        settle().await;
        ctl.registry().toggle_visibility("flood-risk-malaysia");

        surface.release();
        task.await.unwrap();
        assert_eq!(ctl.state(), LifecycleState::Attached);
        let flood = surface.drawable_for_layer("flood-risk-malaysia").unwrap();
        assert!(!flood.visible);
        assert!(!ctl.registry().handle_state("flood-risk-malaysia").unwrap().visible);
    }

    #[tokio::test]
    async fn edits_while_detached_shape_the_next_attach() {
        let ctl = controller();
        ctl.registry().set_opacity("transportation-malaysia", 0.3);
        ctl.registry().toggle_visibility("earthquake-risk-malaysia");

        let surface = Arc::new(InMemorySurface::new());
        ctl.attach(surface.clone()).await;
        let roads = surface.drawable_for_layer("transportation-malaysia").unwrap();
        assert_eq!(roads.opacity, 0.3);
        assert!(surface.drawable_for_layer("earthquake-risk-malaysia").unwrap().visible);
    }

    #[tokio::test]
    async fn detach_during_initialize_leaves_nothing_attached() {
        let ctl = controller();
        let surface = Arc::new(InMemorySurface::new());
        surface.hold();

        let task = tokio::spawn({
            let ctl = ctl.clone();
            let surface = surface.clone();
            async move { ctl.attach(surface).await }
        });
        settle().await;
        ctl.detach();
        assert_eq!(ctl.state(), LifecycleState::Detached);

        surface.release();
        let report = task.await.unwrap();
        assert_eq!(report.stale, 9);
        assert_eq!(ctl.state(), LifecycleState::Detached);
        assert_eq!(surface.drawable_count(), 0);
    }

    #[tokio::test]
    async fn replacing_the_surface_tears_down_the_old_one() {
        let ctl = controller();
        let a = Arc::new(InMemorySurface::new());
        let b = Arc::new(InMemorySurface::new());

        ctl.attach(a.clone()).await;
        ctl.attach(b.clone()).await;
        assert_eq!(ctl.state(), LifecycleState::Attached);
        assert_eq!(a.drawable_count(), 0);
        assert_eq!(b.drawable_count(), 9);
    }

    #[tokio::test]
    async fn dropping_the_controller_detaches() {
        let catalog = LayerCatalog::new(malaysia_layers()).unwrap();
        let registry = LayerRegistry::new(catalog);
        let surface = Arc::new(InMemorySurface::new());
        {
            let ctl = LifecycleController::new(registry.clone());
            ctl.attach(surface.clone()).await;
            assert_eq!(surface.drawable_count(), 9);
        }
        assert_eq!(surface.drawable_count(), 0);
        assert!(!registry.is_attached());
    }
}
