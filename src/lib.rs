//! A discrete-event simulation engine organized around autonomous,
//! message-passing actors.
//!
//! Each [`Actor`] owns a timeline of states; actors influence one another
//! exclusively by sending timestamped [`Signal`]s across [`Medium`]s. A
//! signal's reception time follows from its propagation-delay model, ties
//! resolve by signal identity, and reception is deterministic even when a
//! [`Universe`] processes receptions concurrently across actors. When a
//! late-arriving signal turns out to precede [`Event`]s already on the books,
//! the timeline is repaired retroactively: stale events roll back, signals
//! they emitted are withdrawn from their receivers, actors they created
//! cease to exist, and reception resumes from the corrected past.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use timewarp::{Actor, Medium, Reception, Signal, SignalRef, Time, Universe, UnreceivableSignal};
//!
//! struct Pulse {
//!     when_sent: Time,
//!     receiver: Actor<u32>,
//!     medium: Medium,
//! }
//!
//! impl Signal<u32> for Pulse {
//!     fn when_sent(&self) -> Time { self.when_sent }
//!     fn sender(&self) -> Option<Actor<u32>> { None }
//!     fn receiver(&self) -> Actor<u32> { self.receiver.clone() }
//!     fn medium(&self) -> Medium { self.medium }
//!     fn propagation_delay(&self, _state: &u32) -> Duration { Duration::from_secs(1) }
//!     fn receive(&self, _when: Time, state: &u32) -> Result<Reception<u32>, UnreceivableSignal> {
//!         Ok(Reception::to_state(state + 1))
//!     }
//! }
//!
//! let receiver = Actor::new(Time::ZERO, 0);
//! receiver
//!     .add_signal_to_receive(SignalRef::new(Pulse {
//!         when_sent: Time::from_secs(1),
//!         receiver: receiver.clone(),
//!         medium: Medium::new(),
//!     }))
//!     .unwrap();
//!
//! let universe = Universe::new();
//! universe.add(receiver.clone());
//! let affected = universe.advance_to(Time::from_secs(5), 2).unwrap();
//!
//! assert!(affected.changed().contains(&receiver));
//! assert_eq!(receiver.events().len(), 1);
//! assert_eq!(receiver.state_at(Time::from_secs(2)), Some(1));
//! ```

mod actor;
mod affected;
mod event;
mod history;
mod medium;
mod report;
mod signal;
mod time;
mod universe;
mod worklist;

#[cfg(test)]
pub mod test_util;

pub use actor::{Actor, ActorId};
pub use affected::AffectedActors;
pub use event::Event;
pub use history::StateHistory;
pub use medium::Medium;
pub use report::{ReportData, Reporter, WriteReporter};
pub use signal::{Reception, Signal, SignalId, SignalRef, UnreceivableSignal};
pub use time::Time;
pub use universe::{SignalError, Universe};
