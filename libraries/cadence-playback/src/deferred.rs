//! Deferred playback resume
//!
//! Loading a new resource and starting it in the same step races the sink:
//! the new media reference may not have propagated yet, so `play()` would act
//! on the old resource or be refused outright. Track changes therefore only
//! *schedule* a resume here. The driver drains the queue after yielding once,
//! at which point the sink has observed the load.
//!
//! Requests are not coalesced. Two quick `next()` calls leave two pending
//! resumes, each of which plays whatever track is current when it runs.

use std::collections::VecDeque;

/// What triggered a pending resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeReason {
    /// `next()` changed track
    Next,

    /// `previous()` was called (whether or not the track changed)
    Previous,

    /// A track was selected directly
    Select,

    /// The previous track ended and the session advanced
    Ended,
}

/// Queue of scheduled playback resumes
#[derive(Debug, Default)]
pub struct DeferredPlay {
    pending: VecDeque<ResumeReason>,
}

impl DeferredPlay {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a resume
    pub fn schedule(&mut self, reason: ResumeReason) {
        self.pending.push_back(reason);
    }

    /// Take every pending resume, oldest first
    pub fn drain(&mut self) -> Vec<ResumeReason> {
        self.pending.drain(..).collect()
    }

    /// Whether any resume is pending
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of pending resumes
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending resume, returning how many were dropped
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
