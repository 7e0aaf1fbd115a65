//! Utilities for tests.

use crate::{Actor, Medium, Reception, Signal, SignalRef, Time, UnreceivableSignal};
use std::time::Duration;

/// Bumps the receiver's counter by one.
pub struct Tick {
    pub when_sent: Time,
    pub receiver: Actor<u64>,
    pub medium: Medium,
    pub delay: Duration,
}

impl Tick {
    pub fn send(receiver: &Actor<u64>, when_sent: Time, delay: Duration) -> SignalRef<u64> {
        SignalRef::new(Tick {
            when_sent,
            receiver: receiver.clone(),
            medium: Medium::new(),
            delay,
        })
    }
}

impl Signal<u64> for Tick {
    fn when_sent(&self) -> Time {
        self.when_sent
    }
    fn sender(&self) -> Option<Actor<u64>> {
        None
    }
    fn receiver(&self) -> Actor<u64> {
        self.receiver.clone()
    }
    fn medium(&self) -> Medium {
        self.medium
    }
    fn propagation_delay(&self, _state: &u64) -> Duration {
        self.delay
    }
    fn receive(&self, _when: Time, state: &u64) -> Result<Reception<u64>, UnreceivableSignal> {
        Ok(Reception::to_state(state + 1))
    }
}

/// Bumps the counter and, while any strobes remain, sends itself the next
/// one at the moment of reception.
pub struct Strobe {
    pub when_sent: Time,
    pub sender: Option<Actor<u64>>,
    pub receiver: Actor<u64>,
    pub medium: Medium,
    pub delay: Duration,
    pub remaining: u64,
}

impl Strobe {
    pub fn send(
        receiver: &Actor<u64>,
        when_sent: Time,
        delay: Duration,
        remaining: u64,
    ) -> SignalRef<u64> {
        SignalRef::new(Strobe {
            when_sent,
            sender: None,
            receiver: receiver.clone(),
            medium: Medium::new(),
            delay,
            remaining,
        })
    }
}

impl Signal<u64> for Strobe {
    fn when_sent(&self) -> Time {
        self.when_sent
    }
    fn sender(&self) -> Option<Actor<u64>> {
        self.sender.clone()
    }
    fn receiver(&self) -> Actor<u64> {
        self.receiver.clone()
    }
    fn medium(&self) -> Medium {
        self.medium
    }
    fn propagation_delay(&self, _state: &u64) -> Duration {
        self.delay
    }
    fn receive(&self, when: Time, state: &u64) -> Result<Reception<u64>, UnreceivableSignal> {
        let mut reception = Reception::to_state(state + 1);
        if self.remaining > 0 {
            reception = reception.emit(SignalRef::new(Strobe {
                when_sent: when,
                sender: Some(self.receiver.clone()),
                receiver: self.receiver.clone(),
                medium: self.medium,
                delay: self.delay,
                remaining: self.remaining - 1,
            }));
        }
        Ok(reception)
    }
}

/// Bumps the counter and echoes back to the sender until the hops run out.
pub struct Echo {
    pub when_sent: Time,
    pub sender: Option<Actor<u64>>,
    pub receiver: Actor<u64>,
    pub medium: Medium,
    pub delay: Duration,
    pub hops_left: u64,
}

impl Echo {
    pub fn send(
        sender: &Actor<u64>,
        receiver: &Actor<u64>,
        when_sent: Time,
        delay: Duration,
        hops_left: u64,
    ) -> SignalRef<u64> {
        SignalRef::new(Echo {
            when_sent,
            sender: Some(sender.clone()),
            receiver: receiver.clone(),
            medium: Medium::new(),
            delay,
            hops_left,
        })
    }
}

impl Signal<u64> for Echo {
    fn when_sent(&self) -> Time {
        self.when_sent
    }
    fn sender(&self) -> Option<Actor<u64>> {
        self.sender.clone()
    }
    fn receiver(&self) -> Actor<u64> {
        self.receiver.clone()
    }
    fn medium(&self) -> Medium {
        self.medium
    }
    fn propagation_delay(&self, _state: &u64) -> Duration {
        self.delay
    }
    fn receive(&self, when: Time, state: &u64) -> Result<Reception<u64>, UnreceivableSignal> {
        let mut reception = Reception::to_state(state + 1);
        if self.hops_left > 0 {
            if let Some(back) = &self.sender {
                reception = reception.emit(SignalRef::new(Echo {
                    when_sent: when,
                    sender: Some(self.receiver.clone()),
                    receiver: back.clone(),
                    medium: self.medium,
                    delay: self.delay,
                    hops_left: self.hops_left - 1,
                }));
            }
        }
        Ok(reception)
    }
}

/// Bumps the counter and creates a fresh actor starting at the moment of
/// reception.
pub struct Spawn {
    pub when_sent: Time,
    pub receiver: Actor<u64>,
    pub medium: Medium,
    pub delay: Duration,
}

impl Spawn {
    pub fn send(receiver: &Actor<u64>, when_sent: Time, delay: Duration) -> SignalRef<u64> {
        SignalRef::new(Spawn {
            when_sent,
            receiver: receiver.clone(),
            medium: Medium::new(),
            delay,
        })
    }
}

impl Signal<u64> for Spawn {
    fn when_sent(&self) -> Time {
        self.when_sent
    }
    fn sender(&self) -> Option<Actor<u64>> {
        None
    }
    fn receiver(&self) -> Actor<u64> {
        self.receiver.clone()
    }
    fn medium(&self) -> Medium {
        self.medium
    }
    fn propagation_delay(&self, _state: &u64) -> Duration {
        self.delay
    }
    fn receive(&self, when: Time, state: &u64) -> Result<Reception<u64>, UnreceivableSignal> {
        Ok(Reception::to_state(state + 1).create(Actor::new(when, 0)))
    }
}

/// Destroys the receiver.
pub struct Poison {
    pub when_sent: Time,
    pub receiver: Actor<u64>,
    pub medium: Medium,
    pub delay: Duration,
}

impl Poison {
    pub fn send(receiver: &Actor<u64>, when_sent: Time, delay: Duration) -> SignalRef<u64> {
        SignalRef::new(Poison {
            when_sent,
            receiver: receiver.clone(),
            medium: Medium::new(),
            delay,
        })
    }
}

impl Signal<u64> for Poison {
    fn when_sent(&self) -> Time {
        self.when_sent
    }
    fn sender(&self) -> Option<Actor<u64>> {
        None
    }
    fn receiver(&self) -> Actor<u64> {
        self.receiver.clone()
    }
    fn medium(&self) -> Medium {
        self.medium
    }
    fn propagation_delay(&self, _state: &u64) -> Duration {
        self.delay
    }
    fn receive(&self, _when: Time, _state: &u64) -> Result<Reception<u64>, UnreceivableSignal> {
        Ok(Reception::destruction())
    }
}

/// A signal whose reception always fails.
pub struct Faulty {
    pub when_sent: Time,
    pub receiver: Actor<u64>,
    pub medium: Medium,
    pub delay: Duration,
}

impl Faulty {
    pub fn send(receiver: &Actor<u64>, when_sent: Time, delay: Duration) -> SignalRef<u64> {
        SignalRef::new(Faulty {
            when_sent,
            receiver: receiver.clone(),
            medium: Medium::new(),
            delay,
        })
    }
}

impl Signal<u64> for Faulty {
    fn when_sent(&self) -> Time {
        self.when_sent
    }
    fn sender(&self) -> Option<Actor<u64>> {
        None
    }
    fn receiver(&self) -> Actor<u64> {
        self.receiver.clone()
    }
    fn medium(&self) -> Medium {
        self.medium
    }
    fn propagation_delay(&self, _state: &u64) -> Duration {
        self.delay
    }
    fn receive(&self, _when: Time, _state: &u64) -> Result<Reception<u64>, UnreceivableSignal> {
        Err(UnreceivableSignal::InvalidState)
    }
}
