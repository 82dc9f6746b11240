//! Layer registry.
//!
//! Owns the catalog's descriptors and the live handle for every descriptor
//! materialized in the current epoch. All surface mutation goes through
//! here. Synchronous operations (toggles, opacity) may run at any time,
//! including while `initialize` is awaiting attaches. The state lock is
//! never held across an `.await` or while the surface is being called.

use std::collections::HashMap;
use std::sync::Arc;

use catalog::{LayerCatalog, LayerDescriptor};
use foundation::{Epoch, Opacity};
use futures_util::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::layer::{HandleState, LayerStatus, LiveLayerHandle};
use crate::materializer::Materializer;
use crate::metrics::RegistryMetrics;
use crate::surface::{MapSurface, SurfaceOp};
use crate::symbology::StyleTable;

#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub styles: StyleTable,
}

/// Outcome of one bulk materialization pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InitializeReport {
    pub epoch: Epoch,
    pub requested: usize,
    pub materialized: usize,
    pub failed: usize,
    /// Results that arrived after their epoch was superseded.
    pub stale: usize,
}

impl InitializeReport {
    fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            requested: 0,
            materialized: 0,
            failed: 0,
            stale: 0,
        }
    }

    fn record(&mut self, outcome: Commit) {
        self.requested += 1;
        match outcome {
            Commit::Attached => self.materialized += 1,
            Commit::Failed => self.failed += 1,
            Commit::Stale => self.stale += 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Commit {
    Attached,
    Failed,
    Stale,
}

struct RegistryState<S> {
    catalog: LayerCatalog,
    handles: HashMap<String, LiveLayerHandle>,
    epoch: Epoch,
    surface: Option<Arc<S>>,
    metrics: RegistryMetrics,
}

impl<S: MapSurface> RegistryState<S> {
    /// Forgets the attached surface and every held handle, queueing their
    /// removal.
    fn detach_surface(&mut self, calls: &mut SurfaceCalls<S>) -> usize {
        calls.surface = self.surface.take();
        let removed = self.handles.len();
        calls
            .ops
            .extend(self.handles.drain().map(|(_, h)| SurfaceOp::Remove(h.drawable())));
        self.metrics.removed += removed as u64;
        removed
    }

    /// Brings the handle for `id`, if any, in line with its descriptor.
    fn sync_handle(&mut self, id: &str, calls: &mut SurfaceCalls<S>) {
        let (Some(desc), Some(handle), Some(surface)) = (
            self.catalog.get(id),
            self.handles.get_mut(id),
            self.surface.as_ref(),
        ) else {
            return;
        };
        calls.surface = Some(Arc::clone(surface));
        handle.sync_to(desc.visible, desc.opacity, &mut calls.ops);
    }
}

/// Surface calls recorded under the state lock.
struct SurfaceCalls<S> {
    surface: Option<Arc<S>>,
    ops: Vec<SurfaceOp>,
}

impl<S: MapSurface> SurfaceCalls<S> {
    fn issue(self) {
        let Some(surface) = self.surface else {
            return;
        };
        for op in self.ops {
            op.apply(surface.as_ref());
        }
    }
}

struct Inner<S> {
    materializer: Materializer,
    state: Mutex<RegistryState<S>>,
    /// Taken before `state`; keeps surface calls in the order they were recorded.
    surface_order: Mutex<()>,
}

/// Registry of layer descriptors and their live handles.
///
/// Cloning yields another reference to the same registry.
pub struct LayerRegistry<S: MapSurface> {
    inner: Arc<Inner<S>>,
}

impl<S: MapSurface> Clone for LayerRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MapSurface> std::fmt::Debug for LayerRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("LayerRegistry")
            .field("layers", &state.catalog.len())
            .field("handles", &state.handles.len())
            .field("epoch", &state.epoch)
            .field("attached", &state.surface.is_some())
            .finish()
    }
}

impl<S: MapSurface> LayerRegistry<S> {
    pub fn new(catalog: LayerCatalog) -> Self {
        Self::with_config(catalog, RegistryConfig::default())
    }

    pub fn with_config(catalog: LayerCatalog, config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                materializer: Materializer::new(config.styles),
                state: Mutex::new(RegistryState {
                    catalog,
                    handles: HashMap::new(),
                    epoch: Epoch::ZERO,
                    surface: None,
                    metrics: RegistryMetrics::default(),
                }),
                surface_order: Mutex::new(()),
            }),
        }
    }

    /// Materializes every descriptor onto `surface`.
    ///
    /// Handles from a previous surface are removed first and a new epoch
    /// begins. Each result is committed as soon as it settles; the returned
    /// future resolves once all of them have. Individual failures are
    /// counted in the report, never returned as errors.
    pub async fn initialize(&self, surface: Arc<S>) -> InitializeReport {
        let (removed, epoch, pending) = self.locked(|state, calls| {
            let removed = state.detach_surface(calls);
            let epoch = state.epoch.advance();
            state.surface = Some(Arc::clone(&surface));
            (removed, epoch, state.catalog.as_slice().to_vec())
        });
        if removed > 0 {
            debug!(removed, "removed handles from previous surface");
        }

        info!(epoch = epoch.value(), layers = pending.len(), "materializing layers");
        let report = self.materialize_all(epoch, &surface, &pending).await;
        info!(
            epoch = epoch.value(),
            materialized = report.materialized,
            failed = report.failed,
            stale = report.stale,
            "layer materialization settled"
        );
        report
    }

    /// Re-attempts every descriptor that has no handle on the current
    /// surface. Does nothing while detached.
    pub async fn retry_missing(&self) -> InitializeReport {
        let (epoch, surface, pending) = {
            let state = self.inner.state.lock();
            let Some(surface) = state.surface.clone() else {
                return InitializeReport::new(state.epoch);
            };
            let pending: Vec<LayerDescriptor> = state
                .catalog
                .iter()
                .filter(|d| !state.handles.contains_key(&d.id))
                .cloned()
                .collect();
            (state.epoch, surface, pending)
        };

        debug!(epoch = epoch.value(), layers = pending.len(), "retrying missing layers");
        self.materialize_all(epoch, &surface, &pending).await
    }

    async fn materialize_all(
        &self,
        epoch: Epoch,
        surface: &Arc<S>,
        pending: &[LayerDescriptor],
    ) -> InitializeReport {
        let outcomes = join_all(
            pending
                .iter()
                .map(|descriptor| self.materialize_one(epoch, surface, descriptor)),
        )
        .await;

        let mut report = InitializeReport::new(epoch);
        for outcome in outcomes {
            report.record(outcome);
        }
        report
    }

    async fn materialize_one(
        &self,
        epoch: Epoch,
        surface: &Arc<S>,
        descriptor: &LayerDescriptor,
    ) -> Commit {
        let handle = self
            .inner
            .materializer
            .materialize(descriptor, surface.as_ref())
            .await;
        self.commit(epoch, surface, &descriptor.id, handle)
    }

    fn commit(
        &self,
        epoch: Epoch,
        surface: &Arc<S>,
        id: &str,
        handle: Option<LiveLayerHandle>,
    ) -> Commit {
        self.locked(|state, calls| {
            let Some(mut handle) = handle else {
                state.metrics.failed += 1;
                return Commit::Failed;
            };
            calls.surface = Some(Arc::clone(surface));

            if state.epoch != epoch {
                calls.ops.push(SurfaceOp::Remove(handle.drawable()));
                state.metrics.stale_discarded += 1;
                debug!(
                    layer_id = id,
                    epoch = epoch.value(),
                    current = state.epoch.value(),
                    "discarded handle from superseded epoch"
                );
                return Commit::Stale;
            }

            let Some(desc) = state.catalog.get(id) else {
                calls.ops.push(SurfaceOp::Remove(handle.drawable()));
                state.metrics.failed += 1;
                return Commit::Failed;
            };

            // Edits made while the attach was in flight win over the snapshot.
            handle.sync_to(desc.visible, desc.opacity, &mut calls.ops);
            if let Some(previous) = state.handles.insert(id.to_string(), handle) {
                calls.ops.push(SurfaceOp::Remove(previous.drawable()));
                state.metrics.removed += 1;
            }
            state.metrics.materialized += 1;
            Commit::Attached
        })
    }

    /// Runs `edit` under the state lock, then issues the surface calls it
    /// recorded once the lock is released.
    fn locked<R>(&self, edit: impl FnOnce(&mut RegistryState<S>, &mut SurfaceCalls<S>) -> R) -> R {
        let _order = self.inner.surface_order.lock();
        let mut calls = SurfaceCalls {
            surface: None,
            ops: Vec::new(),
        };
        let out = {
            let mut state = self.inner.state.lock();
            edit(&mut state, &mut calls)
        };
        calls.issue();
        out
    }

    /// Removes every live handle from the surface they were attached to.
    ///
    /// Descriptors keep their state, so a later `initialize` reproduces the
    /// same configuration. Attaches still in flight belong to the superseded
    /// epoch and are removed as they arrive.
    pub fn teardown(&self) {
        let (removed, epoch) = self.locked(|state, calls| {
            let removed = state.detach_surface(calls);
            (removed, state.epoch.advance())
        });
        info!(removed, epoch = epoch.value(), "layer registry torn down");
    }

    pub fn toggle_visibility(&self, id: &str) {
        self.update(id, |d| d.visible = !d.visible);
    }

    pub fn set_visibility(&self, id: &str, visible: bool) {
        self.update(id, |d| d.visible = visible);
    }

    /// Sets opacity, clamping into `[0, 1]`. NaN is ignored.
    pub fn set_opacity(&self, id: &str, value: f32) {
        let Some(opacity) = Opacity::clamped(value) else {
            debug!(layer_id = id, "ignored NaN opacity");
            return;
        };
        self.update(id, |d| d.opacity = opacity);
    }

    fn update(&self, id: &str, edit: impl FnOnce(&mut LayerDescriptor)) {
        self.locked(|state, calls| {
            let Some(desc) = state.catalog.get_mut(id) else {
                debug!(layer_id = id, "ignored edit for unknown layer");
                return;
            };
            edit(desc);
            state.sync_handle(id, calls);
        });
    }

    pub fn visible_count(&self) -> usize {
        self.inner.state.lock().catalog.visible_count()
    }

    pub fn descriptor(&self, id: &str) -> Option<LayerDescriptor> {
        self.inner.state.lock().catalog.get(id).cloned()
    }

    /// All descriptors in catalog order.
    pub fn descriptors(&self) -> Vec<LayerDescriptor> {
        self.inner.state.lock().catalog.as_slice().to_vec()
    }

    pub fn layer_panel(&self) -> Vec<LayerStatus> {
        let state = self.inner.state.lock();
        state
            .catalog
            .iter()
            .map(|d| LayerStatus {
                descriptor: d.clone(),
                materialized: state.handles.contains_key(&d.id),
            })
            .collect()
    }

    pub fn has_handle(&self, id: &str) -> bool {
        self.inner.state.lock().handles.contains_key(id)
    }

    pub fn handle_state(&self, id: &str) -> Option<HandleState> {
        self.inner.state.lock().handles.get(id).map(|h| h.state())
    }

    pub fn handle_count(&self) -> usize {
        self.inner.state.lock().handles.len()
    }

    pub fn current_epoch(&self) -> Epoch {
        self.inner.state.lock().epoch
    }

    pub fn is_attached(&self) -> bool {
        self.inner.state.lock().surface.is_some()
    }

    pub fn metrics(&self) -> RegistryMetrics {
        self.inner.state.lock().metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySurface;
    use catalog::{GeometryTemplate, LayerKind, StyleHint, malaysia_layers};
    use pretty_assertions::assert_eq;

    fn malaysia() -> LayerRegistry<InMemorySurface> {
        LayerRegistry::new(LayerCatalog::new(malaysia_layers()).unwrap())
    }

    /// Lets spawned tasks on the current-thread runtime run to their next
    /// suspension point.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn assert_in_sync(registry: &LayerRegistry<InMemorySurface>, surface: &InMemorySurface) {
        for d in registry.descriptors() {
            match registry.handle_state(&d.id) {
                Some(h) => {
                    assert_eq!(h.visible, d.visible, "{}", d.id);
                    assert_eq!(h.opacity, d.opacity, "{}", d.id);
                    let live = surface.drawable_for_layer(&d.id).expect("attached");
                    assert_eq!(live.visible, d.visible, "{}", d.id);
                    assert_eq!(live.opacity, d.opacity.get(), "{}", d.id);
                }
                None => assert!(surface.drawable_for_layer(&d.id).is_none()),
            }
        }
    }

    #[tokio::test]
    async fn initialize_materializes_every_layer() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());

        let report = registry.initialize(surface.clone()).await;
        assert_eq!(report.requested, 9);
        assert_eq!(report.materialized, 9);
        assert_eq!(surface.drawable_count(), 9);
        assert_eq!(registry.visible_count(), 4);
        assert!(registry.is_attached());
        assert_in_sync(&registry, &surface);
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        surface.reject_layer("flood-risk-malaysia");
        surface.reject_layer("tsunami-risk-malaysia");

        let report = registry.initialize(surface.clone()).await;
        assert_eq!(report.materialized, 7);
        assert_eq!(report.failed, 2);
        assert!(!registry.has_handle("flood-risk-malaysia"));
        assert!(registry.descriptor("flood-risk-malaysia").is_some());
        assert_eq!(registry.visible_count(), 4);
        assert_eq!(registry.metrics().failed, 2);
        assert_in_sync(&registry, &surface);

        let panel = registry.layer_panel();
        assert_eq!(panel.len(), 9);
        assert_eq!(panel.iter().filter(|row| !row.materialized).count(), 2);
    }

    #[tokio::test]
    async fn malformed_template_only_fails_that_layer() {
        let mut layers = malaysia_layers();
        layers[2].style_hint = StyleHint::new("mud", GeometryTemplate::Polygon);
        let registry = LayerRegistry::new(LayerCatalog::new(layers).unwrap());
        let surface = Arc::new(InMemorySurface::new());

        let report = registry.initialize(surface).await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.materialized, 8);
        assert!(!registry.has_handle("landslide-risk-malaysia"));
    }

    #[tokio::test]
    async fn toggle_twice_restores_visibility() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        registry.initialize(surface.clone()).await;

        let id = "forest-cover-malaysia";
        let before = registry.descriptor(id).unwrap().visible;
        registry.toggle_visibility(id);
        assert_eq!(registry.descriptor(id).unwrap().visible, !before);
        assert_eq!(surface.drawable_for_layer(id).unwrap().visible, !before);
        registry.toggle_visibility(id);
        assert_eq!(registry.descriptor(id).unwrap().visible, before);
        assert_in_sync(&registry, &surface);
    }

    #[tokio::test]
    async fn opacity_is_clamped_and_propagated() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        registry.initialize(surface.clone()).await;

        let id = "flood-risk-malaysia";
        registry.set_opacity(id, 1.7);
        assert_eq!(registry.descriptor(id).unwrap().opacity, Opacity::OPAQUE);
        assert_eq!(surface.drawable_for_layer(id).unwrap().opacity, 1.0);

        registry.set_opacity(id, -0.3);
        assert_eq!(registry.descriptor(id).unwrap().opacity, Opacity::TRANSPARENT);
        assert_eq!(surface.drawable_for_layer(id).unwrap().opacity, 0.0);

        registry.set_opacity(id, f32::NAN);
        assert_eq!(registry.descriptor(id).unwrap().opacity, Opacity::TRANSPARENT);
        assert_in_sync(&registry, &surface);
    }

    #[tokio::test]
    async fn unknown_ids_leave_state_unchanged() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        registry.initialize(surface.clone()).await;
        let before = registry.descriptors();
        let drawables = surface.drawables();

        registry.toggle_visibility("atlantis");
        registry.set_visibility("atlantis", true);
        registry.set_opacity("atlantis", 0.5);

        assert_eq!(registry.descriptors(), before);
        assert_eq!(surface.drawables(), drawables);
        assert!(registry.descriptor("atlantis").is_none());
    }

    #[tokio::test]
    async fn teardown_keeps_descriptor_state() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        registry.initialize(surface.clone()).await;
        registry.toggle_visibility("forest-cover-malaysia");

        registry.teardown();
        assert_eq!(surface.drawable_count(), 0);
        assert_eq!(registry.handle_count(), 0);
        assert!(!registry.is_attached());
        assert_eq!(registry.visible_count(), 5);
        assert_eq!(registry.metrics().removed, 9);
    }

    #[tokio::test]
    async fn reinitialize_moves_handles_to_new_surface() {
        let registry = malaysia();
        let a = Arc::new(InMemorySurface::new());
        let b = Arc::new(InMemorySurface::new());

        registry.initialize(a.clone()).await;
        registry.set_visibility("tsunami-risk-malaysia", true);
        let first = registry.current_epoch();

        registry.initialize(b.clone()).await;
        assert!(registry.current_epoch() > first);
        assert_eq!(a.drawable_count(), 0);
        assert_eq!(b.drawable_count(), 9);
        assert!(b.drawable_for_layer("tsunami-risk-malaysia").unwrap().visible);
        assert_in_sync(&registry, &b);
    }

    #[tokio::test]
    async fn results_commit_incrementally() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        for d in registry.descriptors() {
            surface.hold_layer(d.id);
        }

        let task = tokio::spawn({
            let registry = registry.clone();
            let surface = surface.clone();
            async move { registry.initialize(surface).await }
        });
        settle().await;
        assert_eq!(registry.handle_count(), 0);
        assert!(registry.is_attached());

        surface.release_layer("flood-risk-malaysia");
        settle().await;
        assert!(registry.has_handle("flood-risk-malaysia"));
        assert_eq!(registry.handle_count(), 1);
        assert_eq!(registry.metrics().materialized, 1);
        assert!(!task.is_finished());

        surface.release_layer("transportation-malaysia");
        settle().await;
        assert!(registry.has_handle("transportation-malaysia"));
        assert_eq!(registry.handle_count(), 2);

        surface.release();
        let report = task.await.unwrap();
        assert_eq!(report.materialized, 9);
        assert_eq!(registry.handle_count(), 9);
    }

    /// Surface that reads the registry back from inside its callbacks.
    #[derive(Default)]
    struct ObservingSurface {
        inner: InMemorySurface,
        registry: std::sync::OnceLock<LayerRegistry<ObservingSurface>>,
        visible_seen: Mutex<Vec<usize>>,
        handles_seen: Mutex<Vec<usize>>,
    }

    impl MapSurface for ObservingSurface {
        fn add_drawable(
            &self,
            spec: crate::symbology::DrawableSpec,
        ) -> catalog::BoxFuture<'_, Result<foundation::DrawableId, crate::surface::SurfaceError>>
        {
            self.inner.add_drawable(spec)
        }

        fn remove_drawable(&self, drawable: foundation::DrawableId) {
            if let Some(registry) = self.registry.get() {
                self.handles_seen.lock().push(registry.handle_count());
            }
            self.inner.remove_drawable(drawable);
        }

        fn set_visible(&self, drawable: foundation::DrawableId, visible: bool) {
            if let Some(registry) = self.registry.get() {
                self.visible_seen.lock().push(registry.visible_count());
            }
            self.inner.set_visible(drawable, visible);
        }

        fn set_opacity(&self, drawable: foundation::DrawableId, opacity: f32) {
            if let Some(registry) = self.registry.get() {
                let _ = registry.layer_panel();
            }
            self.inner.set_opacity(drawable, opacity);
        }
    }

    #[tokio::test]
    async fn surface_callbacks_can_read_the_registry() {
        let registry = LayerRegistry::new(LayerCatalog::new(malaysia_layers()).unwrap());
        let surface = Arc::new(ObservingSurface::default());
        assert!(surface.registry.set(registry.clone()).is_ok());

        registry.initialize(surface.clone()).await;
        registry.toggle_visibility("flood-risk-malaysia");
        registry.set_opacity("flood-risk-malaysia", 0.4);
        assert_eq!(*surface.visible_seen.lock(), vec![3]);
        assert_eq!(surface.inner.drawable_for_layer("flood-risk-malaysia").unwrap().opacity, 0.4);

        registry.teardown();
        assert_eq!(*surface.handles_seen.lock(), vec![0; 9]);
        assert_eq!(surface.inner.drawable_count(), 0);
    }

    #[tokio::test]
    async fn teardown_during_initialize_discards_late_handles() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        surface.hold();

        let task = tokio::spawn({
            let registry = registry.clone();
            let surface = surface.clone();
            async move { registry.initialize(surface).await }
        });
        settle().await;

        registry.teardown();
        surface.release();
        let report = task.await.unwrap();

        assert_eq!(report.stale, 9);
        assert_eq!(report.materialized, 0);
        assert_eq!(surface.drawable_count(), 0);
        assert_eq!(surface.attached_total(), 9);
        assert_eq!(registry.handle_count(), 0);
        assert_eq!(registry.metrics().stale_discarded, 9);
    }

    #[tokio::test]
    async fn edits_during_initialize_are_applied_on_commit() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        surface.hold();

        let task = tokio::spawn({
            let registry = registry.clone();
            let surface = surface.clone();
            async move { registry.initialize(surface).await }
        });
        settle().await;

        registry.toggle_visibility("flood-risk-malaysia");
        registry.set_opacity("population-density-malaysia", 0.25);
        surface.release();
        task.await.unwrap();

        let flood = surface.drawable_for_layer("flood-risk-malaysia").unwrap();
        assert!(!flood.visible);
        let density = surface.drawable_for_layer("population-density-malaysia").unwrap();
        assert_eq!(density.opacity, 0.25);
        assert_in_sync(&registry, &surface);
    }

    #[tokio::test]
    async fn retry_missing_fills_gaps() {
        let registry = malaysia();
        let surface = Arc::new(InMemorySurface::new());
        surface.reject_layer("forest-cover-malaysia");
        registry.initialize(surface.clone()).await;
        registry.toggle_visibility("forest-cover-malaysia");
        assert!(!registry.has_handle("forest-cover-malaysia"));

        surface.accept_layer("forest-cover-malaysia");
        let report = registry.retry_missing().await;
        assert_eq!(report.requested, 1);
        assert_eq!(report.materialized, 1);
        assert!(surface.drawable_for_layer("forest-cover-malaysia").unwrap().visible);
        assert_eq!(surface.drawable_count(), 9);
        assert_in_sync(&registry, &surface);
    }

    #[tokio::test]
    async fn retry_missing_is_a_no_op_when_detached() {
        let registry = malaysia();
        let report = registry.retry_missing().await;
        assert_eq!(report.requested, 0);
    }

    #[tokio::test]
    async fn registries_are_independent() {
        let a = malaysia();
        let b = malaysia();
        a.toggle_visibility("flood-risk-malaysia");
        assert_eq!(a.visible_count(), 3);
        assert_eq!(b.visible_count(), 4);
    }

    #[tokio::test]
    async fn unrecognized_kind_still_materializes() {
        let layers = vec![
            LayerDescriptor::new("ash", "Ash Fall", LayerKind::from("volcanic-ash"))
                .with_visible(true),
        ];
        let registry = LayerRegistry::new(LayerCatalog::new(layers).unwrap());
        let surface = Arc::new(InMemorySurface::new());
        let report = registry.initialize(surface.clone()).await;
        assert_eq!(report.materialized, 1);
        assert_in_sync(&registry, &surface);
    }
}
