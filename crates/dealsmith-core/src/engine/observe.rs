//! Failure-attribution side channel.
//!
//! Observers receive a cumulative snapshot after every failed dealing
//! attempt. They are a pure tap: nothing an observer does can influence the
//! cards that are dealt.

use crate::engine::synth::AttributionCounters;
use crate::profile::HandProfile;

/// Cumulative view of one board's failed attempts so far.
#[derive(Debug, Clone, Copy)]
pub struct AttemptSnapshot<'a> {
    pub profile: &'a HandProfile,
    pub board_number: u32,
    pub attempt_number: u32,
    pub counters: &'a AttributionCounters,
}

/// Sink for per-attempt failure snapshots.
pub trait DealObserver {
    fn on_failed_attempt(&mut self, snapshot: &AttemptSnapshot<'_>);
}

/// Explicit replacement for swapping a callback on shared module state:
/// installing pushes, removing pops, and whatever was installed before
/// becomes active again. Only the top observer receives snapshots, so nested
/// harnesses can wrap a run and restore it afterwards.
#[derive(Default)]
pub struct ObserverStack {
    stack: Vec<Box<dyn DealObserver>>,
}

impl ObserverStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn install(&mut self, observer: Box<dyn DealObserver>) {
        self.stack.push(observer);
    }

    /// Removes the current observer, restoring the previously installed one.
    pub fn remove(&mut self) -> Option<Box<dyn DealObserver>> {
        self.stack.pop()
    }

    pub fn active(&mut self) -> Option<&mut (dyn DealObserver + 'static)> {
        self.stack.last_mut().map(|observer| observer.as_mut())
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
