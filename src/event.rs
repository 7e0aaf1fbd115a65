//! Private module for selective re-export.

use crate::actor::Actor;
use crate::signal::{Reception, SignalId, SignalRef};
use crate::time::Time;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// The immutable record of one reception: the causing signal, the moment it
/// took effect, the state it left behind (`None` means the receiver was
/// destroyed), and everything it set in motion.
///
/// Events are totally ordered by `(when, causing signal identity)`, and
/// equality is consistent with that order. Cloning shares the record.
pub struct Event<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    causing_signal: SignalRef<S>,
    when: Time,
    state_after: Option<S>,
    signals_emitted: Vec<SignalRef<S>>,
    created_actors: Vec<Actor<S>>,
}

impl<S> Event<S> {
    pub(crate) fn new(causing_signal: SignalRef<S>, when: Time, reception: Reception<S>) -> Self {
        if cfg!(debug_assertions) {
            let receiver = causing_signal.receiver();
            for signal in &reception.signals_emitted {
                debug_assert!(signal.when_sent() == when);
                debug_assert!(signal.sender() == Some(receiver.clone()));
            }
            for actor in &reception.created_actors {
                debug_assert!(actor.start() == when);
                debug_assert!(*actor != receiver);
            }
        }
        Event {
            inner: Arc::new(Inner {
                causing_signal,
                when,
                state_after: reception.state_after,
                signals_emitted: reception.signals_emitted,
                created_actors: reception.created_actors,
            }),
        }
    }

    pub fn causing_signal(&self) -> &SignalRef<S> {
        &self.inner.causing_signal
    }

    pub fn when(&self) -> Time {
        self.inner.when
    }

    /// The receiver's state after this event, or `None` if the event
    /// destroyed it.
    pub fn state_after(&self) -> Option<&S> {
        self.inner.state_after.as_ref()
    }

    pub fn signals_emitted(&self) -> &[SignalRef<S>] {
        &self.inner.signals_emitted
    }

    pub fn created_actors(&self) -> &[Actor<S>] {
        &self.inner.created_actors
    }

    /// The actor this event happened to.
    pub fn affected_actor(&self) -> Actor<S> {
        self.inner.causing_signal.receiver()
    }

    pub(crate) fn key(&self) -> (Time, SignalId) {
        (self.inner.when, self.inner.causing_signal.id())
    }
}

impl<S> Clone for Event<S> {
    fn clone(&self) -> Self {
        Event {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> PartialEq for Event<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<S> Eq for Event<S> {}

impl<S> PartialOrd for Event<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Event<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<S: Debug> Debug for Event<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Event")
            .field("causing_signal", &self.inner.causing_signal)
            .field("when", &self.inner.when)
            .field("state_after", &self.inner.state_after)
            .field("signals_emitted", &self.inner.signals_emitted)
            .field("created_actors", &self.inner.created_actors)
            .finish()
    }
}
