//! Private module for selective re-export.

use crate::affected::AffectedActors;
use crate::event::Event;
use crate::history::StateHistory;
use crate::signal::{SignalId, SignalRef, UnreceivableSignal};
use crate::time::Time;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique actor identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ActorId(u64);

impl ActorId {
    fn next() -> ActorId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ActorId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl nohash_hasher::IsEnabled for ActorId {}

impl Display for ActorId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared, thread-safe handle to one simulated actor.
///
/// An actor owns a [`StateHistory`], the ordered set of [`Event`]s already
/// committed to that history, and the set of signals still in flight toward
/// it. Cloning the handle shares the actor; equality, hashing, and ordering
/// follow the identity assigned at construction.
///
/// Mutating operations serialize on the actor's own lock. No actor lock is
/// ever held across a call into a different actor: cross-actor signal
/// postings and removals happen after the local commit, which is what allows
/// receptions on distinct actors to run in parallel without deadlock.
pub struct Actor<S>(Arc<Shared<S>>);

struct Shared<S> {
    id: ActorId,
    core: RwLock<Core<S>>,
}

struct Core<S> {
    start: Time,
    history: StateHistory<S>,
    events: BTreeMap<(Time, SignalId), Event<S>>,
    pending: BTreeMap<SignalId, SignalRef<S>>,
    when_next: Time,
}

impl<S> Actor<S> {
    /// Creates an actor whose history begins at `start` with `initial`.
    pub fn new(start: Time, initial: S) -> Actor<S> {
        Actor(Arc::new(Shared {
            id: ActorId::next(),
            core: RwLock::new(Core {
                start,
                history: StateHistory::new(start, Some(initial)),
                events: BTreeMap::new(),
                pending: BTreeMap::new(),
                when_next: Time::NEVER,
            }),
        }))
    }

    pub fn id(&self) -> ActorId {
        self.0.id
    }

    pub fn start(&self) -> Time {
        self.0.core.read().start
    }

    /// The committed events, in time order.
    pub fn events(&self) -> Vec<Event<S>> {
        self.0.core.read().events.values().cloned().collect()
    }

    pub fn last_event(&self) -> Option<Event<S>> {
        self.0.core.read().events.values().next_back().cloned()
    }

    /// The signals still in flight toward this actor.
    pub fn signals_to_receive(&self) -> Vec<SignalRef<S>> {
        self.0.core.read().pending.values().cloned().collect()
    }

    /// The earliest moment a pending signal would be received, or
    /// [`Time::NEVER`] when nothing pending can ever arrive.
    pub fn when_receive_next_signal(&self) -> Time {
        self.0.core.read().when_next
    }

    /// Queues `signal` for later reception. Does not receive it.
    ///
    /// Fails when the signal is addressed to a different actor or was sent
    /// before this actor's start. Queueing the same signal twice is
    /// idempotent. A signal that can never arrive (the receiver is already
    /// destroyed, or the delay saturates the timeline) is accepted and stays
    /// pending forever.
    pub fn add_signal_to_receive(&self, signal: SignalRef<S>) -> Result<(), UnreceivableSignal> {
        let mut core = self.0.core.write();
        if signal.receiver() != *self {
            return Err(UnreceivableSignal::WrongReceiver);
        }
        if signal.when_sent() < core.start {
            return Err(UnreceivableSignal::SentBeforeStart {
                when_sent: signal.when_sent(),
                start: core.start,
            });
        }
        let when = signal.when_received(&core.history);
        log::trace!(
            "actor {}: queueing {:?}, receivable at {:?}",
            self.0.id,
            signal,
            when
        );
        core.pending.insert(signal.id(), signal);
        if when < core.when_next {
            core.when_next = when;
        }
        Ok(())
    }
}

impl<S: Clone> Actor<S> {
    /// A snapshot of the state timeline.
    pub fn state_history(&self) -> StateHistory<S> {
        self.0.core.read().history.clone()
    }

    /// The state prevailing at `when`, or `None` before the actor's start or
    /// after its destruction.
    pub fn state_at(&self, when: Time) -> Option<S> {
        self.0.core.read().history.at(when).cloned()
    }

    /// Compacts history up to `when`.
    ///
    /// The latest event at or before `when` becomes the new origin: `start`
    /// advances to its time, the state timeline is rebased on its post-state,
    /// events at or before `when` are discarded, and pending signals sent
    /// before the new start are dropped. Without such an event the call is a
    /// no-op.
    pub fn clear_events_before(&self, when: Time) {
        let mut core = self.0.core.write();
        let Some(anchor_key) = core
            .events
            .range(..=(when, SignalId::MAX))
            .next_back()
            .map(|(key, _)| *key)
        else {
            return;
        };
        let anchor = core.events[&anchor_key].clone();
        log::debug!(
            "actor {}: clearing events before {:?}, new start {:?}",
            self.0.id,
            when,
            anchor.when()
        );
        core.start = anchor.when();
        core.history
            .rebase(anchor.when(), anchor.state_after().cloned());
        core.events = core.events.split_off(&(when, SignalId::MAX));
        let start = core.start;
        core.pending.retain(|_, signal| signal.when_sent() >= start);
        core.recompute_when_next();
    }
}

impl<S: Clone + PartialEq> Actor<S> {
    /// Receives the single pending signal with the earliest reception time,
    /// committing one [`Event`].
    ///
    /// When nothing pending can be received the call returns the empty
    /// [`AffectedActors`] and mutates nothing. When the reception time does
    /// not follow every committed event, the timeline is first repaired:
    /// events at or after the reception time are rolled back in descending
    /// order, signals they emitted are withdrawn from their receivers, actors
    /// they created are reported removed, and their causing signals return to
    /// the pending set to be received again.
    ///
    /// Signals emitted by the new event are posted to their receivers before
    /// the call returns. Ties between simultaneous receptions resolve by
    /// signal identity order, so a replay from the same inputs commits the
    /// same events.
    ///
    /// An error from the signal's own [`receive`](crate::Signal::receive) is
    /// returned as is; a rollback already performed for that reception stays
    /// committed.
    pub fn receive_signal(&self) -> Result<AffectedActors<S>, UnreceivableSignal> {
        let mut affected = AffectedActors::none();
        let mut withdrawals = Vec::new();
        let mut posts = Vec::new();
        {
            let mut core = self.0.core.write();
            let Some((signal, when)) = core.next_reception() else {
                return Ok(affected);
            };
            // Where the new event will sit in the total event order. Only
            // events ordering after it are stale.
            let prospective = (when, signal.id());
            let invalidates = matches!(
                core.events.keys().next_back(),
                Some(last) if *last > prospective
            );
            if invalidates {
                log::debug!(
                    "actor {}: {:?} at {:?} precedes committed events, repairing timeline",
                    self.0.id,
                    signal,
                    when
                );
                core.roll_back_from(prospective, None, self, &mut affected, &mut withdrawals);
            }
            let Some(state) = core.history.at(when).cloned() else {
                return Err(UnreceivableSignal::InvalidState);
            };
            let reception = signal.receive(when, &state)?;
            core.pending.remove(&signal.id());
            let event = Event::new(signal, when, reception);
            if core.history.at(when) != event.state_after() {
                core.history
                    .record_transition(when, event.state_after().cloned());
            }
            for emitted in event.signals_emitted() {
                if emitted.receiver() == *self {
                    core.pending.insert(emitted.id(), emitted.clone());
                } else {
                    affected.note_changed(emitted.receiver());
                    posts.push(emitted.clone());
                }
            }
            for created in event.created_actors() {
                affected.note_added(created.clone());
            }
            log::trace!("actor {}: committed event at {:?}", self.0.id, event.when());
            core.events.insert(event.key(), event);
            affected.note_changed(self.clone());
            core.recompute_when_next();
            core.check_invariants(self);
        }
        for signal in withdrawals {
            affected = affected.plus(signal.receiver().remove_signal(&signal));
        }
        for signal in posts {
            signal.receiver().add_signal_to_receive(signal)?;
        }
        Ok(affected)
    }

    /// Withdraws `signal` from this actor, wherever it ended up.
    ///
    /// A pending signal is dropped. A signal that already caused an event
    /// rolls back that event and every later one; the causing signals of the
    /// other rolled-back events return to the pending set, signals emitted by
    /// rolled-back events are withdrawn from their receivers recursively, and
    /// actors created by rolled-back events are reported removed. A signal
    /// this actor has never seen is a no-op.
    pub fn remove_signal(&self, signal: &SignalRef<S>) -> AffectedActors<S> {
        let mut affected = AffectedActors::none();
        let mut withdrawals = Vec::new();
        {
            let mut core = self.0.core.write();
            if core.pending.remove(&signal.id()).is_some() {
                log::trace!("actor {}: dropped pending {:?}", self.0.id, signal);
                core.recompute_when_next();
                affected.note_changed(self.clone());
                return affected;
            }
            let caused = core
                .events
                .iter()
                .find(|(_, event)| event.causing_signal().id() == signal.id())
                .map(|(key, _)| *key);
            let Some(key) = caused else {
                return affected;
            };
            log::debug!(
                "actor {}: withdrawing {:?}, rolling back from {:?}",
                self.0.id,
                signal,
                key.0
            );
            core.roll_back_from(key, Some(signal.id()), self, &mut affected, &mut withdrawals);
            affected.note_changed(self.clone());
            core.recompute_when_next();
            core.check_invariants(self);
        }
        for signal in withdrawals {
            affected = affected.plus(signal.receiver().remove_signal(&signal));
        }
        affected
    }
}

impl<S> Core<S> {
    fn recompute_when_next(&mut self) {
        self.when_next = self
            .pending
            .values()
            .map(|signal| signal.when_received(&self.history))
            .min()
            .unwrap_or(Time::NEVER);
    }
}

impl<S: Clone + PartialEq> Core<S> {
    /// The pending signal with the earliest reception time against the
    /// current history, ties resolved by signal identity order.
    fn next_reception(&self) -> Option<(SignalRef<S>, Time)> {
        let mut best: Option<(SignalRef<S>, Time)> = None;
        for signal in self.pending.values() {
            let when = signal.when_received(&self.history);
            if when == Time::NEVER {
                continue;
            }
            match &best {
                Some((_, best_when)) if *best_when <= when => {}
                _ => best = Some((signal.clone(), when)),
            }
        }
        best
    }

    /// Rolls back every event with key at or after `from`, in descending
    /// order. Causing signals other than `removing` return to the pending
    /// set. Emitted signals addressed to this actor are dropped in place; the
    /// rest accumulate in `withdrawals` for the caller to propagate once the
    /// lock is released. Created actors accumulate in `affected` as removed.
    fn roll_back_from(
        &mut self,
        from: (Time, SignalId),
        removing: Option<SignalId>,
        owner: &Actor<S>,
        affected: &mut AffectedActors<S>,
        withdrawals: &mut Vec<SignalRef<S>>,
    ) {
        let invalidated: Vec<_> = self.events.range(from..).map(|(key, _)| *key).collect();
        log::debug!(
            "actor {}: rolling back {} event(s)",
            owner.0.id,
            invalidated.len()
        );
        for key in invalidated.into_iter().rev() {
            let event = self.events.remove(&key).unwrap();
            self.history.truncate_from(event.when());
            for emitted in event.signals_emitted() {
                if emitted.receiver() == *owner {
                    self.pending.remove(&emitted.id());
                } else {
                    withdrawals.push(emitted.clone());
                }
            }
            for created in event.created_actors() {
                affected.note_removed(created.clone());
            }
            let causing = event.causing_signal();
            if removing != Some(causing.id()) {
                self.pending.insert(causing.id(), causing.clone());
            }
        }
        // A surviving reception at the boundary instant shares its transition
        // point with the rolled-back ones; reinstate it.
        let survivor = self
            .events
            .range((from.0, SignalId::MIN)..=(from.0, SignalId::MAX))
            .next_back()
            .map(|(_, event)| event.clone());
        if let Some(event) = survivor {
            if self.history.at(event.when()) != event.state_after() {
                self.history
                    .append_transition(event.when(), event.state_after().cloned());
            }
        }
    }

    fn check_invariants(&self, owner: &Actor<S>) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(self.history.first_transition_time(), self.start);
            debug_assert!(self.when_next > self.start);
            let mut events = self.events.iter().peekable();
            while let Some((key, event)) = events.next() {
                let when = key.0;
                debug_assert!(when > self.start);
                debug_assert!(event.affected_actor() == *owner);
                // A same-instant successor owns the transition point.
                let shadowed = events.peek().map_or(false, |(next, _)| next.0 == when);
                if !shadowed {
                    debug_assert!(self.history.at(when) == event.state_after());
                }
            }
            for signal in self.pending.values() {
                debug_assert!(signal.receiver() == *owner);
                debug_assert!(signal.when_sent() >= self.start);
            }
        }
    }
}

impl<S> Clone for Actor<S> {
    fn clone(&self) -> Self {
        Actor(Arc::clone(&self.0))
    }
}

impl<S> PartialEq for Actor<S> {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl<S> Eq for Actor<S> {}

impl<S> std::hash::Hash for Actor<S> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl<S> PartialOrd for Actor<S> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Actor<S> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.id.cmp(&other.0.id)
    }
}

impl<S> Debug for Actor<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Actor({})", self.0.id)
    }
}
