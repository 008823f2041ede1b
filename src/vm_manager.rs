use log::debug;

use crate::config::{Geometry, PolicyKind};
use crate::constants::FIRST_INSTRUCTION;
use crate::error::{Result, SimError};
use crate::memory::{Frame, FrameTable, Page, PageState, PageTable};
use crate::policy::{self, Access, ReplacementPolicy};
use crate::stats::Tracker;
use crate::translation::PageAddress;

/// Kind of memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// How an access was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Page was resident in `frame`.
    Hit { frame: usize },
    /// Page was loaded into `frame`, taking it from `evicted` if it was resident.
    Miss {
        frame: usize,
        evicted: Option<usize>,
    },
}

/// Read-only view of the simulation state
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub pages: &'a [Page],
    pub frames: &'a [Frame],
    pub tracker: Tracker,
}

/// Demand-paging engine: resolves one access at a time against the page and
/// frame tables, asking the replacement policy for a frame on every miss.
#[derive(Debug)]
pub struct VmManager {
    geometry: Geometry,
    pages: PageTable,
    frames: FrameTable,
    policy: Box<dyn ReplacementPolicy>,
    tracker: Tracker,
    /// Instruction count the next access will carry
    instruction: u64,
    /// Per-access tracing
    debug: bool,
}

impl VmManager {
    pub fn new(geometry: Geometry, kind: PolicyKind) -> Self {
        Self::with_policy(geometry, policy::build(kind, geometry.num_frames))
    }

    pub fn with_policy(geometry: Geometry, policy: Box<dyn ReplacementPolicy>) -> Self {
        VmManager {
            geometry,
            pages: PageTable::new(geometry.num_pages, geometry.page_size),
            frames: FrameTable::new(geometry.num_frames),
            policy,
            tracker: Tracker::default(),
            instruction: FIRST_INSTRUCTION,
            debug: false,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn tracker(&self) -> Tracker {
        self.tracker
    }

    /// Instruction count the next access will carry
    pub fn instruction_count(&self) -> u64 {
        self.instruction
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, on: bool) {
        self.debug = on;
    }

    pub fn page(&self, page: usize) -> Result<&Page> {
        self.pages.get(page)
    }

    pub fn frame(&self, frame: usize) -> Result<&Frame> {
        self.frames.get(frame)
    }

    /// Resolve a single read or write of `address`.
    ///
    /// Every error is fatal to the run; state is left as it was before the
    /// failing step.
    pub fn access(&mut self, op: Operation, address: u64) -> Result<Outcome> {
        let addr = PageAddress::resolve(address, &self.geometry)?;
        if self.debug {
            debug!(
                "Requested page: {} requested page index: {}",
                addr.page, addr.offset
            );
        }

        let resident = self.pages.get(addr.page)?.resident_frame();
        let outcome = match resident {
            Some(frame) => self.hit(op, addr, frame)?,
            None => self.miss(op, addr)?,
        };

        self.tracker.pages_referenced += 1;
        self.instruction += 1;
        Ok(outcome)
    }

    fn hit(&mut self, op: Operation, addr: PageAddress, frame: usize) -> Result<Outcome> {
        let now = self.instruction;
        self.pages.get_mut(addr.page)?.touch(addr.offset);

        let slot = self.frames.get_mut(frame)?;
        if op == Operation::Write {
            slot.dirty = true;
        }
        slot.last_use = now;
        self.policy.on_load(frame, now, Access::Hit);

        Ok(Outcome::Hit { frame })
    }

    fn miss(&mut self, op: Operation, addr: PageAddress) -> Result<Outcome> {
        let now = self.instruction;
        let frame = self.policy.select_victim()?;
        if self.debug {
            debug!("Next usable frame {}: {}", self.policy.name(), frame);
        }
        let evicted = self.take_frame(frame)?;

        let page = self.pages.get_mut(addr.page)?;
        if page.on_disk {
            self.tracker.frames_recovered_from_disk += 1;
        }
        if page.state == PageState::Unmapped {
            self.tracker.pages_mapped += 1;
        }
        self.tracker.page_misses += 1;

        page.state = PageState::Mapped;
        page.frame = Some(frame);
        page.touch(addr.offset);

        self.frames.set(
            frame,
            Frame {
                in_use: true,
                dirty: op == Operation::Write,
                first_use: now,
                last_use: now,
                owner: Some(addr.page),
            },
        )?;
        self.policy.on_load(frame, now, Access::Fill);

        Ok(Outcome::Miss { frame, evicted })
    }

    /// Evict whichever page holds `frame`, writing it back if dirty.
    ///
    /// Returns the evicted page, or `None` if the frame was free. An in-use
    /// frame that no resident page holds is an error.
    fn take_frame(&mut self, frame: usize) -> Result<Option<usize>> {
        let slot = *self.frames.get(frame)?;
        if !slot.in_use {
            return Ok(None);
        }
        let broken = SimError::BrokenBinding {
            frame,
            owner: slot.owner,
        };
        let Some(owner) = slot.owner else {
            return Err(broken);
        };

        let page = self.pages.get_mut(owner)?;
        if page.resident_frame() != Some(frame) {
            return Err(broken);
        }
        if self.debug {
            debug!("Frame taken from page: {}", owner);
        }

        self.tracker.frames_taken += 1;
        page.state = PageState::Evicted;
        page.frame = None;
        if slot.dirty {
            page.on_disk = true;
            self.tracker.frames_written_to_disk += 1;
        }
        Ok(Some(owner))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            pages: self.pages.snapshot(),
            frames: self.frames.snapshot(),
            tracker: self.tracker,
        }
    }

    /// Check the page/frame binding invariants.
    ///
    /// Every mapped page must own its frame, and every in-use frame must be
    /// claimed by exactly the page it names.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut claimed = vec![None; self.frames.len()];

        for (index, page) in self.pages.snapshot().iter().enumerate() {
            match (page.state, page.frame) {
                (PageState::Mapped, Some(frame)) => {
                    let slot = self.frames.get(frame).map_err(|e| e.to_string())?;
                    if !slot.in_use || slot.owner != Some(index) {
                        return Err(format!(
                            "page {} claims frame {} it does not own",
                            index, frame
                        ));
                    }
                    if let Some(other) = claimed[frame].replace(index) {
                        return Err(format!(
                            "frame {} claimed by pages {} and {}",
                            frame, other, index
                        ));
                    }
                }
                (PageState::Mapped, None) => {
                    return Err(format!("page {} is mapped without a frame", index));
                }
                (_, Some(frame)) => {
                    return Err(format!(
                        "page {} is not mapped but links frame {}",
                        index, frame
                    ));
                }
                (_, None) => {}
            }
        }

        for (index, slot) in self.frames.snapshot().iter().enumerate() {
            if slot.in_use && claimed[index].is_none() {
                return Err(format!("frame {} in use but no page maps it", index));
            }
        }

        let t = &self.tracker;
        if t.page_misses > t.pages_referenced {
            return Err(format!(
                "{} misses for {} references",
                t.page_misses, t.pages_referenced
            ));
        }
        if t.pages_mapped > self.geometry.num_pages as u64 {
            return Err(format!(
                "{} pages mapped out of {}",
                t.pages_mapped, self.geometry.num_pages
            ));
        }
        Ok(())
    }
}
