/// Opaque identifier a map surface hands back for an attached drawable.
///
/// The registry never exposes these to UI collaborators; they only travel
/// between the registry and the surface that minted them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawableId(u64);

impl DrawableId {
    pub const fn new(raw: u64) -> Self {
        DrawableId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DrawableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drawable#{}", self.0)
    }
}
