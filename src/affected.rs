//! Private module for selective re-export.

use crate::actor::Actor;
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};

type ActorSet<S> = HashSet<Actor<S>, ahash::RandomState>;

/// Which actors a batch of receptions added, changed, or removed.
///
/// Values combine with [`plus`](AffectedActors::plus), which is how the
/// universe folds the effects of parallel reception tasks into one summary.
/// The all-empty value is the identity, and for any one actor the three
/// verdicts resolve as: added and then changed is still added; added and then
/// removed cancels out; changed and then removed is removed.
pub struct AffectedActors<S> {
    added: ActorSet<S>,
    changed: ActorSet<S>,
    removed: ActorSet<S>,
}

impl<S> AffectedActors<S> {
    /// The identity value: nothing was affected.
    pub fn none() -> Self {
        AffectedActors {
            added: ActorSet::default(),
            changed: ActorSet::default(),
            removed: ActorSet::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Actors that came into existence.
    pub fn added(&self) -> &HashSet<Actor<S>, ahash::RandomState> {
        &self.added
    }

    /// Actors whose timeline or pending signals changed.
    pub fn changed(&self) -> &HashSet<Actor<S>, ahash::RandomState> {
        &self.changed
    }

    /// Actors that ceased to exist.
    pub fn removed(&self) -> &HashSet<Actor<S>, ahash::RandomState> {
        &self.removed
    }

    /// Combines two summaries.
    pub fn plus(mut self, other: Self) -> Self {
        for actor in other.added {
            self.note_added(actor);
        }
        for actor in other.changed {
            self.note_changed(actor);
        }
        for actor in other.removed {
            self.note_removed(actor);
        }
        self
    }

    pub(crate) fn note_added(&mut self, actor: Actor<S>) {
        if self.removed.remove(&actor) {
            return;
        }
        self.changed.remove(&actor);
        self.added.insert(actor);
    }

    pub(crate) fn note_changed(&mut self, actor: Actor<S>) {
        if self.added.contains(&actor) || self.removed.contains(&actor) {
            return;
        }
        self.changed.insert(actor);
    }

    pub(crate) fn note_removed(&mut self, actor: Actor<S>) {
        if self.added.remove(&actor) {
            return;
        }
        self.changed.remove(&actor);
        self.removed.insert(actor);
    }
}

impl<S> Default for AffectedActors<S> {
    fn default() -> Self {
        AffectedActors::none()
    }
}

impl<S> Clone for AffectedActors<S> {
    fn clone(&self) -> Self {
        AffectedActors {
            added: self.added.clone(),
            changed: self.changed.clone(),
            removed: self.removed.clone(),
        }
    }
}

impl<S> PartialEq for AffectedActors<S> {
    fn eq(&self, other: &Self) -> bool {
        self.added == other.added && self.changed == other.changed && self.removed == other.removed
    }
}

impl<S> Eq for AffectedActors<S> {}

impl<S> Debug for AffectedActors<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("AffectedActors")
            .field("added", &self.added)
            .field("changed", &self.changed)
            .field("removed", &self.removed)
            .finish()
    }
}
