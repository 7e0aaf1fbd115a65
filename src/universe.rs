//! Private module for selective re-export.

use crate::actor::{Actor, ActorId};
use crate::affected::AffectedActors;
use crate::report::{ReportData, Reporter};
use crate::signal::UnreceivableSignal;
use crate::time::Time;
use crate::worklist::Worklist;
use dashmap::DashMap;
use nohash_hasher::NoHashHasher;
use parking_lot::Mutex;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// An [`UnreceivableSignal`] surfaced while the universe was advancing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("a signal could not be received while advancing: {0}")]
pub struct SignalError(#[from] pub UnreceivableSignal);

/// The set of live actors and the orchestrator of [`advance_to`].
///
/// [`advance_to`]: Universe::advance_to
pub struct Universe<S> {
    actors: DashMap<ActorId, Actor<S>, BuildHasherDefault<NoHashHasher<ActorId>>>,
}

impl<S> Universe<S> {
    pub fn new() -> Self {
        Universe {
            actors: DashMap::default(),
        }
    }

    /// Adds an actor. Returns whether the set changed.
    pub fn add(&self, actor: Actor<S>) -> bool {
        self.actors.insert(actor.id(), actor).is_none()
    }

    /// Removes an actor. Returns whether the set changed.
    pub fn remove(&self, actor: &Actor<S>) -> bool {
        self.actors.remove(&actor.id()).is_some()
    }

    pub fn contains(&self, actor: &Actor<S>) -> bool {
        self.actors.contains_key(&actor.id())
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Iterates over a snapshot of the current actors.
    pub fn iter(&self) -> impl Iterator<Item = Actor<S>> {
        self.actors
            .iter()
            .map(|entry| entry.value().clone())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<S: Clone> Universe<S> {
    /// Compacts every actor's history up to `when`.
    /// See [`Actor::clear_events_before`].
    pub fn clear_events_before(&self, when: Time) {
        for actor in self.iter() {
            actor.clear_events_before(when);
        }
    }
}

impl<S> Default for Universe<S> {
    fn default() -> Self {
        Universe::new()
    }
}

impl<S: Clone + PartialEq + Send + Sync> Universe<S> {
    /// Drives every actor's timeline up to `when` across `thread_count`
    /// workers, returning the fold of everything they did.
    ///
    /// Workers repeatedly take an actor with a reception due at or before
    /// `when` and run [`Actor::receive_signal`]; actors an iteration changed
    /// or created are re-examined, created actors join the universe, and
    /// removed actors leave it. The call returns once every live actor's next
    /// reception lies after `when`.
    ///
    /// The first reception failure closes the drain and surfaces as
    /// [`SignalError`]; receptions already committed by other workers stay
    /// committed. A panic inside a user [`receive`](crate::Signal::receive)
    /// propagates out of this call.
    pub fn advance_to(
        &self,
        when: Time,
        thread_count: usize,
    ) -> Result<AffectedActors<S>, SignalError> {
        self.advance(when, thread_count, None)
    }

    /// Like [`advance_to`](Universe::advance_to), also delivering progress
    /// snapshots to `reporter` at its chosen cadence while the workers drain,
    /// and a final report once the advance completes.
    pub fn advance_to_reported(
        &self,
        when: Time,
        thread_count: usize,
        reporter: &mut dyn Reporter,
    ) -> Result<AffectedActors<S>, SignalError> {
        self.advance(when, thread_count, Some(reporter))
    }

    fn advance(
        &self,
        when: Time,
        thread_count: usize,
        mut reporter: Option<&mut dyn Reporter>,
    ) -> Result<AffectedActors<S>, SignalError> {
        let started = Instant::now();
        let worklist = Worklist::new(thread_count.max(1));
        for actor in self.iter() {
            if actor.when_receive_next_signal() <= when {
                worklist.push(actor);
            }
        }
        let total = Mutex::new(AffectedActors::none());
        let failure: Mutex<Option<SignalError>> = Mutex::new(None);
        let receptions = AtomicUsize::new(0);

        if thread_count <= 1 {
            self.drain(when, &worklist, &total, &failure, &receptions);
        } else {
            crossbeam_utils::thread::scope(|scope| {
                for index in 0..thread_count {
                    let worklist = &worklist;
                    let total = &total;
                    let failure = &failure;
                    let receptions = &receptions;
                    scope
                        .builder()
                        .name(format!("universe-{}", index))
                        .spawn(move |_| self.drain(when, worklist, total, failure, receptions))
                        .expect("Failed to spawn a thread");
                }
                if let Some(reporter) = reporter.as_deref_mut() {
                    let poll = std::time::Duration::from_millis(10);
                    let mut since_report = std::time::Duration::ZERO;
                    while !worklist.is_closed() {
                        std::thread::sleep(poll);
                        since_report += poll;
                        if since_report >= reporter.delay() && !worklist.is_closed() {
                            since_report = std::time::Duration::ZERO;
                            let snapshot = total.lock();
                            reporter.report_advancing(ReportData {
                                receptions: receptions.load(Ordering::Relaxed),
                                added: snapshot.added().len(),
                                removed: snapshot.removed().len(),
                                target: when,
                                duration: started.elapsed(),
                                done: false,
                            });
                        }
                    }
                }
            })
            .unwrap();
        }

        let result = match failure.into_inner() {
            Some(error) => Err(error),
            None => Ok(total.into_inner()),
        };
        if let Some(reporter) = reporter {
            let (added, removed) = match &result {
                Ok(affected) => (affected.added().len(), affected.removed().len()),
                Err(_) => (0, 0),
            };
            reporter.report_advancing(ReportData {
                receptions: receptions.load(Ordering::Relaxed),
                added,
                removed,
                target: when,
                duration: started.elapsed(),
                done: true,
            });
        }
        result
    }

    fn drain(
        &self,
        when: Time,
        worklist: &Worklist<S>,
        total: &Mutex<AffectedActors<S>>,
        failure: &Mutex<Option<SignalError>>,
        receptions: &AtomicUsize,
    ) {
        while let Some(actor) = worklist.pop() {
            if !self.contains(&actor) || actor.when_receive_next_signal() > when {
                continue;
            }
            log::trace!(
                "{}: receiving on actor {}",
                std::thread::current().name().unwrap_or_default(),
                actor.id()
            );
            let affected = match actor.receive_signal() {
                Ok(affected) if affected.is_empty() => continue,
                Ok(affected) => {
                    receptions.fetch_add(1, Ordering::Relaxed);
                    affected
                }
                Err(error) => {
                    log::debug!(
                        "{}: reception failed on actor {}: {}",
                        std::thread::current().name().unwrap_or_default(),
                        actor.id(),
                        error
                    );
                    let mut slot = failure.lock();
                    if slot.is_none() {
                        *slot = Some(SignalError(error));
                    }
                    drop(slot);
                    worklist.close();
                    return;
                }
            };
            for added in affected.added() {
                self.add(added.clone());
            }
            for removed in affected.removed() {
                self.remove(removed);
            }
            for candidate in affected.changed().iter().chain(affected.added()) {
                if self.contains(candidate) && candidate.when_receive_next_signal() <= when {
                    worklist.push(candidate.clone());
                }
            }
            let mut total = total.lock();
            let folded = std::mem::take(&mut *total).plus(affected);
            *total = folded;
        }
    }
}
