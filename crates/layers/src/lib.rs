pub mod layer;
pub mod lifecycle;
pub mod materializer;
pub mod memory;
pub mod metrics;
pub mod registry;
pub mod surface;
pub mod symbology;

pub use layer::*;
pub use lifecycle::*;
pub use materializer::*;
pub use memory::InMemorySurface;
pub use metrics::*;
pub use registry::*;
pub use surface::*;
pub use symbology::{DrawableSpec, RenderFn, Rgba, StyleError, StyleTable};
