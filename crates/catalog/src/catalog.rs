use std::collections::HashSet;

use crate::CatalogError;
use crate::descriptor::LayerDescriptor;

/// Ordered, fixed-size list of layer descriptors offered for a session.
///
/// Ids are unique. Descriptors are never added or removed after
/// construction; only their `visible`/`opacity` fields change, and only
/// through the owning registry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LayerCatalog {
    layers: Vec<LayerDescriptor>,
}

impl LayerCatalog {
    pub fn new(layers: Vec<LayerDescriptor>) -> Result<Self, CatalogError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(layers.len());
        for (index, layer) in layers.iter().enumerate() {
            if layer.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(layer.id.as_str()) {
                return Err(CatalogError::DuplicateId(layer.id.clone()));
            }
        }
        Ok(Self { layers })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn as_slice(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerDescriptor> {
        self.layers.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut LayerDescriptor> {
        self.layers.iter_mut().find(|d| d.id == id)
    }

    pub fn visible_count(&self) -> usize {
        self.layers.iter().filter(|d| d.visible).count()
    }
}

impl<'a> IntoIterator for &'a LayerCatalog {
    type Item = &'a LayerDescriptor;
    type IntoIter = std::slice::Iter<'a, LayerDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
