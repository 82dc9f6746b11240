/// Monotonic token identifying one surface attach/teardown cycle.
///
/// Async results carry the epoch they were started in; a result whose epoch
/// no longer matches the owner's current one is stale and must be discarded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch before any surface was ever attached.
    pub const ZERO: Epoch = Epoch(0);

    pub const fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }

    /// Replaces `self` with the following epoch and returns it.
    pub fn advance(&mut self) -> Self {
        *self = self.next();
        *self
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
