//! Bijective index between node names and task ids.

use super::policy::DuplicatePolicy;
use super::types::TaskId;
use crate::error::{DagError, Result};
use log::warn;
use std::collections::HashMap;

/// Two maps, `name -> TaskId` and `TaskId -> name`, kept exact inverses of
/// each other.
///
/// The index has no state of its own: it is maintained by
/// [`DagBuilder`](crate::DagBuilder) as a byproduct of node insertion.
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    name_to_id: HashMap<String, TaskId>,
    id_to_name: HashMap<TaskId, String>,
}

/// What a successful [`IdentifierIndex::register`] changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registration {
    /// Id the name was registered under before, if it changed
    pub previous_id: Option<TaskId>,
    /// Name that held the id before and lost its entry
    pub displaced: Option<String>,
}

impl IdentifierIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` under `id`.
    ///
    /// Both maps are updated or neither is. A name that moves to a new id
    /// drops its stale reverse entry; an id taken over from another name
    /// evicts that name, unless `reused_id` is [`DuplicatePolicy::Reject`].
    ///
    /// # Errors
    ///
    /// Returns [`DagError::DuplicateTaskId`] if `id` belongs to a different
    /// name and `reused_id` is [`DuplicatePolicy::Reject`].
    pub fn register(
        &mut self,
        name: &str,
        id: TaskId,
        reused_id: DuplicatePolicy,
    ) -> Result<Registration> {
        self.check(name, id, reused_id)?;

        let mut registration = Registration::default();

        if let Some(old_id) = self.name_to_id.insert(name.to_string(), id) {
            if old_id != id {
                if self.id_to_name.get(&old_id).map(String::as_str) == Some(name) {
                    self.id_to_name.remove(&old_id);
                }
                registration.previous_id = Some(old_id);
            }
        }

        if let Some(owner) = self.id_to_name.insert(id, name.to_string()) {
            if owner != name {
                self.name_to_id.remove(&owner);
                warn!("Task id {id} moved from '{owner}' to '{name}'");
                registration.displaced = Some(owner);
            }
        }

        Ok(registration)
    }

    /// Verify that registering `name` under `id` is allowed, without changing anything.
    ///
    /// # Errors
    ///
    /// Same as [`IdentifierIndex::register`].
    pub fn check(&self, name: &str, id: TaskId, reused_id: DuplicatePolicy) -> Result<()> {
        match self.id_to_name.get(&id) {
            Some(owner) if owner != name && reused_id == DuplicatePolicy::Reject => {
                Err(DagError::DuplicateTaskId {
                    id,
                    existing: owner.clone(),
                    incoming: name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Name registered under `id`.
    pub fn name_of(&self, id: &TaskId) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// Id registered for `name`.
    pub fn id_of(&self, name: &str) -> Option<TaskId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// Iterate over all `(name, id)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TaskId)> + '_ {
        self.name_to_id.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// True if both maps are inverses of each other.
    pub fn is_bijective(&self) -> bool {
        self.name_to_id.len() == self.id_to_name.len()
            && self
                .name_to_id
                .iter()
                .all(|(name, id)| self.id_to_name.get(id) == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERWRITE: DuplicatePolicy = DuplicatePolicy::Overwrite;

    #[test]
    fn test_register_round_trip() {
        let mut index = IdentifierIndex::new();
        let id = TaskId::new(0, 1, 7);
        let reg = index.register("A", id, OVERWRITE).unwrap();

        assert_eq!(reg, Registration::default());
        assert_eq!(index.id_of("A"), Some(id));
        assert_eq!(index.name_of(&id), Some("A"));
        assert!(index.is_bijective());
    }

    #[test]
    fn test_redeclared_name_drops_stale_id() {
        let mut index = IdentifierIndex::new();
        let old = TaskId::new(0, 1, 7);
        let new = TaskId::new(0, 1, 9);
        index.register("A", old, OVERWRITE).unwrap();
        let reg = index.register("A", new, OVERWRITE).unwrap();

        assert_eq!(reg.previous_id, Some(old));
        assert_eq!(index.name_of(&old), None);
        assert_eq!(index.name_of(&new), Some("A"));
        assert_eq!(index.len(), 1);
        assert!(index.is_bijective());
    }

    #[test]
    fn test_reused_id_evicts_previous_owner() {
        let mut index = IdentifierIndex::new();
        let id = TaskId::new(0, 1, 7);
        index.register("A", id, OVERWRITE).unwrap();
        let reg = index.register("B", id, OVERWRITE).unwrap();

        assert_eq!(reg.displaced.as_deref(), Some("A"));
        assert_eq!(index.name_of(&id), Some("B"));
        assert_eq!(index.id_of("A"), None);
        assert!(index.is_bijective());
    }

    #[test]
    fn test_reused_id_rejected_leaves_index_untouched() {
        let mut index = IdentifierIndex::new();
        let id = TaskId::new(0, 1, 7);
        index.register("A", id, OVERWRITE).unwrap();

        let err = index.register("B", id, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, DagError::DuplicateTaskId { ref existing, .. } if existing == "A"));
        assert_eq!(index.name_of(&id), Some("A"));
        assert_eq!(index.id_of("B"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_same_pair_twice_is_a_no_op() {
        let mut index = IdentifierIndex::new();
        let id = TaskId::new(4, 4, 4);
        index.register("A", id, DuplicatePolicy::Reject).unwrap();
        let reg = index.register("A", id, DuplicatePolicy::Reject).unwrap();

        assert_eq!(reg, Registration::default());
        assert_eq!(index.len(), 1);
    }
}
