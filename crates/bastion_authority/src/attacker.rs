//! # Attacker Resolution
//!
//! Maps a damage event's source id back to a live entity, best effort.
//!
//! The attacker may have been destroyed between firing and the host applying
//! the hit. That is a normal outcome: resolution yields `None` and the damage
//! still lands.

use bastion_shared::{ActorId, EntityHandle};

use crate::transport::EntityDirectory;

/// Resolves a source id once.
#[must_use]
pub fn resolve(directory: &dyn EntityDirectory, source: ActorId) -> Option<EntityHandle> {
    directory.lookup(source)
}

/// Attacker lookup scoped to a single damage application.
///
/// Bookkeeping and client feedback both need the attacker. The first call to
/// [`AttackerLookup::get`] hits the directory; later calls reuse the answer,
/// including a `None`.
pub struct AttackerLookup<'a> {
    directory: &'a dyn EntityDirectory,
    source: ActorId,
    cached: Option<Option<EntityHandle>>,
}

impl<'a> AttackerLookup<'a> {
    /// Creates a lookup. Nothing is resolved yet.
    #[must_use]
    pub fn new(directory: &'a dyn EntityDirectory, source: ActorId) -> Self {
        Self {
            directory,
            source,
            cached: None,
        }
    }

    /// Source id being resolved.
    #[must_use]
    pub const fn source(&self) -> ActorId {
        self.source
    }

    /// Resolved attacker.
    pub fn get(&mut self) -> Option<EntityHandle> {
        let (directory, source) = (self.directory, self.source);
        *self.cached.get_or_insert_with(|| resolve(directory, source))
    }
}
