//! Private module for selective re-export.

use crate::actor::Actor;
use crate::history::StateHistory;
use crate::medium::Medium;
use crate::time::Time;
use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Why a signal could not be accepted or received.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnreceivableSignal {
    #[error("signal addressed to a different actor")]
    WrongReceiver,
    #[error("signal sent at {when_sent:?}, before the receiver's start at {start:?}")]
    SentBeforeStart { when_sent: Time, start: Time },
    #[error("reception at {when:?} does not follow the send time {when_sent:?}")]
    NotAfterSendTime { when: Time, when_sent: Time },
    #[error("signal cannot be received in the receiver's current state")]
    InvalidState,
}

/// A scheduled message from one actor to another.
///
/// Implementations supply the envelope accessors plus the two behavioral
/// operations: how long the signal takes to propagate given the receiver's
/// state, and what receiving it does. Both must be pure. The delay must be
/// strictly positive for every non-null state.
pub trait Signal<S>: Send + Sync {
    fn when_sent(&self) -> Time;

    /// The emitting actor, or `None` for externally injected signals.
    fn sender(&self) -> Option<Actor<S>>;

    fn receiver(&self) -> Actor<S>;

    fn medium(&self) -> Medium;

    /// How long this signal is in flight given the receiver's state at the
    /// moment of reception. Strictly positive, finite, and must not mutate
    /// anything.
    fn propagation_delay(&self, receiver_state: &S) -> Duration;

    /// The effect of receiving this signal at `when` in `receiver_state`.
    ///
    /// Every emitted signal must report `sender() == Some(receiver)` and
    /// `when_sent() == when`; every created actor must start at `when` and be
    /// distinct from the receiver.
    fn receive(&self, when: Time, receiver_state: &S) -> Result<Reception<S>, UnreceivableSignal>;

    /// The earliest `t > when_sent` satisfying
    /// `t == when_sent + propagation_delay(history.at(t))`, evaluated per
    /// constant segment of `history`. Segments with no state (before the
    /// receiver's start, or after its destruction) yield no reception, and a
    /// delay that saturates the timeline yields [`Time::NEVER`].
    fn when_received(&self, history: &StateHistory<S>) -> Time {
        let sent = self.when_sent();
        for (segment_start, value, segment_end) in history.segments() {
            if segment_end <= sent {
                continue;
            }
            let Some(state) = value else { continue };
            let when = sent + self.propagation_delay(state);
            if when > sent && when >= segment_start && when < segment_end {
                return when;
            }
        }
        Time::NEVER
    }
}

/// Process-unique identity of a [`SignalRef`].
///
/// Allocation order provides the total, within-process-stable order used to
/// break ties between simultaneous receptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct SignalId(u64);

impl SignalId {
    pub(crate) const MIN: SignalId = SignalId(0);
    pub(crate) const MAX: SignalId = SignalId(u64::MAX);

    fn next() -> SignalId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SignalId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A shared handle to a [`Signal`] with reference identity.
///
/// Equality, hashing, and ordering follow the identity assigned by
/// [`SignalRef::new`], never the signal's fields: two separately constructed
/// signals are distinct even when their fields coincide, and clones of one
/// handle are the same signal.
pub struct SignalRef<S> {
    id: SignalId,
    signal: Arc<dyn Signal<S>>,
}

impl<S> SignalRef<S> {
    pub fn new(signal: impl Signal<S> + 'static) -> Self {
        SignalRef {
            id: SignalId::next(),
            signal: Arc::new(signal),
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }
}

impl<S> Clone for SignalRef<S> {
    fn clone(&self) -> Self {
        SignalRef {
            id: self.id,
            signal: Arc::clone(&self.signal),
        }
    }
}

impl<S> Deref for SignalRef<S> {
    type Target = dyn Signal<S>;

    fn deref(&self) -> &Self::Target {
        &*self.signal
    }
}

impl<S> PartialEq for SignalRef<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<S> Eq for SignalRef<S> {}

impl<S> std::hash::Hash for SignalRef<S> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<S> PartialOrd for SignalRef<S> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for SignalRef<S> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<S> Debug for SignalRef<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "SignalRef({})", self.id.0)
    }
}

/// What a successful reception does: the state the receiver transitions to
/// (`None` destroys it), the signals it emits, and the actors it creates.
pub struct Reception<S> {
    pub state_after: Option<S>,
    pub signals_emitted: Vec<SignalRef<S>>,
    pub created_actors: Vec<Actor<S>>,
}

impl<S> Reception<S> {
    /// A reception that transitions the receiver to `state`.
    pub fn to_state(state: S) -> Self {
        Reception {
            state_after: Some(state),
            signals_emitted: Vec::new(),
            created_actors: Vec::new(),
        }
    }

    /// A reception that destroys the receiver.
    pub fn destruction() -> Self {
        Reception {
            state_after: None,
            signals_emitted: Vec::new(),
            created_actors: Vec::new(),
        }
    }

    pub fn emit(mut self, signal: SignalRef<S>) -> Self {
        self.signals_emitted.push(signal);
        self
    }

    pub fn create(mut self, actor: Actor<S>) -> Self {
        self.created_actors.push(actor);
        self
    }
}
