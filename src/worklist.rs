use crate::actor::{Actor, ActorId};
use nohash_hasher::NoHashHasher;
use parking_lot::{Condvar, Mutex};
use std::collections::{HashSet, VecDeque};
use std::hash::BuildHasherDefault;

/// The actors awaiting a reception pass during an advance.
///
/// Maintains synchronisation for multiple workers, including shutdown once
/// every worker goes idle with nothing queued, or once a worker fails.
pub(crate) struct Worklist<S> {
    /// Get notified when there is a new actor to handle.
    has_work: Condvar,
    shared: Mutex<Shared<S>>,
}

struct Shared<S> {
    /// Whether this worklist is still open.
    open: bool,
    /// Number of workers not currently waiting for work.
    active_count: usize,
    queue: VecDeque<Actor<S>>,
    queued: HashSet<ActorId, BuildHasherDefault<NoHashHasher<ActorId>>>,
}

impl<S> Worklist<S> {
    pub fn new(worker_count: usize) -> Self {
        Worklist {
            has_work: Condvar::new(),
            shared: Mutex::new(Shared {
                open: true,
                active_count: worker_count,
                queue: VecDeque::new(),
                queued: HashSet::default(),
            }),
        }
    }

    /// Queues an actor unless it is already queued.
    pub fn push(&self, actor: Actor<S>) {
        let mut shared = self.shared.lock();
        if !shared.open {
            return;
        }
        if shared.queued.insert(actor.id()) {
            log::trace!(
                "{}: queueing actor {}",
                std::thread::current().name().unwrap_or_default(),
                actor.id()
            );
            shared.queue.push_back(actor);
            self.has_work.notify_one();
        }
    }

    /// Takes the next actor, blocking while other workers may still produce
    /// work. Returns `None` once the worklist has closed: every worker went
    /// idle with the queue empty, or a worker called [`close`](Self::close).
    pub fn pop(&self) -> Option<Actor<S>> {
        let mut shared = self.shared.lock();
        loop {
            if !shared.open {
                return None;
            }
            if let Some(actor) = shared.queue.pop_front() {
                shared.queued.remove(&actor.id());
                return Some(actor);
            }
            shared.active_count -= 1;
            if shared.active_count == 0 {
                log::trace!(
                    "{}: no work and no active workers, closing",
                    std::thread::current().name().unwrap_or_default()
                );
                shared.open = false;
                self.has_work.notify_all();
                return None;
            }
            log::trace!(
                "{}: no work, awaiting. active={}",
                std::thread::current().name().unwrap_or_default(),
                shared.active_count
            );
            self.has_work.wait(&mut shared);
            shared.active_count += 1;
        }
    }

    /// Whether the worklist has closed.
    pub fn is_closed(&self) -> bool {
        !self.shared.lock().open
    }

    /// Closes immediately, discarding queued work.
    pub fn close(&self) {
        let mut shared = self.shared.lock();
        shared.open = false;
        shared.queue.clear();
        shared.queued.clear();
        self.has_work.notify_all();
    }
}
