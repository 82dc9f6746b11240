pub mod catalog;
pub mod descriptor;
pub mod malaysia;
pub mod source;

pub use catalog::*;
pub use descriptor::*;
pub use malaysia::*;
pub use source::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateId(String),
    EmptyId { index: usize },
    Parse(String),
    Io(String),
    Source(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateId(id) => write!(f, "duplicate layer id: {id}"),
            CatalogError::EmptyId { index } => write!(f, "layer at index {index} has an empty id"),
            CatalogError::Parse(msg) => write!(f, "layer catalog parse error: {msg}"),
            CatalogError::Io(msg) => write!(f, "layer catalog io error: {msg}"),
            CatalogError::Source(msg) => write!(f, "layer catalog source error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
