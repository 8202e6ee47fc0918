//! Declaration-ordered resource graph keyed by logical id

use super::resources::{Resource, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGraph {
    resources: Vec<(String, Resource)>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `resource` under `logical_id`.
    ///
    /// Re-declaring an id replaces the resource in place and returns the old one.
    pub fn insert(&mut self, logical_id: impl Into<String>, resource: Resource) -> Option<Resource> {
        let logical_id = logical_id.into();
        if let Some(slot) = self.resources.iter_mut().find(|(id, _)| *id == logical_id) {
            return Some(std::mem::replace(&mut slot.1, resource));
        }
        tracing::trace!(logical_id = %logical_id, kind = ?resource.kind(), "declared resource");
        self.resources.push((logical_id, resource));
        None
    }

    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|(id, _)| id == logical_id)
            .map(|(_, resource)| resource)
    }

    /// Resources in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(id, r)| (id.as_str(), r))
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.resources.iter().filter(|(_, r)| r.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
