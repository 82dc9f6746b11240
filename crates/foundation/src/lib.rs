pub mod epoch;
pub mod handles;
pub mod opacity;

// Foundation crate: small, well-tested primitives only.
pub use epoch::*;
pub use handles::*;
pub use opacity::*;
