//! Private module for selective re-export.

use crate::time::Time;
use std::collections::BTreeMap;

/// A step function from [`Time`] to an optional state value.
///
/// The value before the first transition is `None`, as is the value after a
/// destruction transition. A history is never empty: construction installs
/// the first transition, and truncation never removes it.
#[derive(Clone, Debug, PartialEq)]
pub struct StateHistory<S> {
    transitions: BTreeMap<Time, Option<S>>,
}

impl<S> StateHistory<S> {
    pub(crate) fn new(start: Time, value: Option<S>) -> Self {
        let mut transitions = BTreeMap::new();
        transitions.insert(start, value);
        StateHistory { transitions }
    }

    /// The value prevailing at `when`: the value of the latest transition at
    /// or before `when`, or `None` before the first transition.
    pub fn at(&self, when: Time) -> Option<&S> {
        self.transitions
            .range(..=when)
            .next_back()
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn first_transition_time(&self) -> Time {
        *self.transitions.keys().next().unwrap()
    }

    pub fn last_transition_time(&self) -> Time {
        *self.transitions.keys().next_back().unwrap()
    }

    /// The value from the last transition onward.
    pub fn last_value(&self) -> Option<&S> {
        self.transitions
            .values()
            .next_back()
            .and_then(|value| value.as_ref())
    }

    /// The transition points in time order.
    pub fn transitions(&self) -> impl Iterator<Item = (Time, Option<&S>)> {
        self.transitions
            .iter()
            .map(|(when, value)| (*when, value.as_ref()))
    }

    pub(crate) fn append_transition(&mut self, when: Time, value: Option<S>) {
        debug_assert!(when > self.last_transition_time());
        self.transitions.insert(when, value);
    }

    /// Like [`append_transition`](Self::append_transition), but a transition
    /// already at `when` is overwritten. Receptions at the same instant
    /// commit in signal identity order, and the later one owns the step.
    pub(crate) fn record_transition(&mut self, when: Time, value: Option<S>) {
        debug_assert!(when >= self.last_transition_time());
        self.transitions.insert(when, value);
    }

    /// Drops every transition at or after `when`.
    pub(crate) fn truncate_from(&mut self, when: Time) {
        self.transitions.split_off(&when);
        debug_assert!(!self.transitions.is_empty());
    }

    /// Drops every transition before `start` and pins the first transition to
    /// `(start, value)`.
    pub(crate) fn rebase(&mut self, start: Time, value: Option<S>) {
        self.transitions = self.transitions.split_off(&start);
        self.transitions.insert(start, value);
    }

    /// The constant-value segments `(start, value, end)` in time order, with
    /// `end` exclusive. The final segment ends at [`Time::NEVER`].
    pub(crate) fn segments(&self) -> impl Iterator<Item = (Time, Option<&S>, Time)> {
        let mut transitions = self.transitions.iter().peekable();
        std::iter::from_fn(move || {
            let (when, value) = transitions.next()?;
            let end = transitions
                .peek()
                .map(|(next, _)| **next)
                .unwrap_or(Time::NEVER);
            Some((*when, value.as_ref(), end))
        })
    }
}
