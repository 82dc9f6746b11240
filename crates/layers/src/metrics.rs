/// Lifetime counters for one registry.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RegistryMetrics {
    /// Handles committed to the registry.
    pub materialized: u64,
    /// Materializations that resolved without a handle.
    pub failed: u64,
    /// Handles that arrived for a superseded epoch and were removed.
    pub stale_discarded: u64,
    /// Handles removed from a surface by teardown or replacement.
    pub removed: u64,
}

impl RegistryMetrics {
    pub fn attempts(&self) -> u64 {
        self.materialized + self.failed + self.stale_discarded
    }

    /// Handles that should currently be attached somewhere.
    pub fn live(&self) -> u64 {
        self.materialized.saturating_sub(self.removed)
    }
}
