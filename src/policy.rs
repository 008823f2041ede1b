//! Page replacement policies.
//!
//! FIFO and LRU differ only in which order drives victim selection; the
//! eviction mechanics around them live in the engine.

use std::collections::VecDeque;
use std::fmt::Debug;

use crate::config::PolicyKind;
use crate::constants::{FIFO_NAME, LRU_NAME};
use crate::error::{Result, SimError};

/// Why a frame is being reported to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The page was already resident in the frame.
    Hit,
    /// The frame was just loaded on a miss.
    Fill,
}

pub trait ReplacementPolicy: Debug {
    fn name(&self) -> &'static str;

    /// Frame to load the next missing page into. Does not change policy state.
    fn select_victim(&self) -> Result<usize>;

    /// Record an access to `frame` at instruction `instruction`.
    fn on_load(&mut self, frame: usize, instruction: u64, access: Access);
}

/// Build the policy for `kind` over `num_frames` frames.
pub fn build(kind: PolicyKind, num_frames: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Fifo => Box::new(Fifo::new(num_frames)),
        PolicyKind::Lru => Box::new(Lru::new(num_frames)),
        PolicyKind::Optimal => Box::new(Optimal),
    }
}

/// Round-robin over frames in load order.
///
/// The front frame is reused on every miss and goes to the back of the queue
/// with its new page. Hits never reorder the queue.
#[derive(Debug, Clone)]
pub struct Fifo {
    queue: VecDeque<usize>,
}

impl Fifo {
    pub fn new(num_frames: usize) -> Self {
        Fifo {
            queue: (0..num_frames).collect(),
        }
    }

    /// Frames in eviction order, front first
    pub fn order(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }
}

impl ReplacementPolicy for Fifo {
    fn name(&self) -> &'static str {
        FIFO_NAME
    }

    fn select_victim(&self) -> Result<usize> {
        self.queue.front().copied().ok_or(SimError::FrameOutOfRange {
            frame: 0,
            num_frames: 0,
        })
    }

    fn on_load(&mut self, frame: usize, _instruction: u64, access: Access) {
        if access == Access::Hit {
            return;
        }
        if self.queue.front() == Some(&frame) {
            self.queue.pop_front();
        } else if let Some(pos) = self.queue.iter().position(|&f| f == frame) {
            self.queue.remove(pos);
        }
        self.queue.push_back(frame);
    }
}

/// Evicts the frame with the oldest last reference.
///
/// Unused frames start at 0 so they are filled before anything is evicted.
/// Ties go to the lowest frame index.
#[derive(Debug, Clone)]
pub struct Lru {
    last_used: Vec<u64>,
}

impl Lru {
    pub fn new(num_frames: usize) -> Self {
        Lru {
            last_used: vec![0; num_frames],
        }
    }

    pub fn last_used(&self, frame: usize) -> Option<u64> {
        self.last_used.get(frame).copied()
    }
}

impl ReplacementPolicy for Lru {
    fn name(&self) -> &'static str {
        LRU_NAME
    }

    fn select_victim(&self) -> Result<usize> {
        // min_by_key keeps the first of equal minimums
        self.last_used
            .iter()
            .enumerate()
            .min_by_key(|&(_, &stamp)| stamp)
            .map(|(frame, _)| frame)
            .ok_or(SimError::FrameOutOfRange {
                frame: 0,
                num_frames: 0,
            })
    }

    fn on_load(&mut self, frame: usize, instruction: u64, _access: Access) {
        if let Some(stamp) = self.last_used.get_mut(frame) {
            *stamp = instruction;
        }
    }
}

/// Clairvoyant replacement. Not implemented: every victim request fails.
#[derive(Debug, Clone, Copy)]
pub struct Optimal;

impl ReplacementPolicy for Optimal {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn select_victim(&self) -> Result<usize> {
        Err(SimError::UnsupportedPolicy(self.name().to_string()))
    }

    fn on_load(&mut self, _frame: usize, _instruction: u64, _access: Access) {}
}
