use bitvec::vec::BitVec;

use crate::error::{Result, SimError};

/// Residency state of a logical page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    /// Never loaded.
    #[default]
    Unmapped,
    /// Resident in a frame.
    Mapped,
    /// Was resident, its frame was taken by another page.
    Evicted,
}

impl PageState {
    /// Label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            PageState::Unmapped => "UNMAPPED",
            PageState::Mapped => "MAPPED",
            PageState::Evicted => "TAKEN",
        }
    }
}

impl std::fmt::Display for PageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Page table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub state: PageState,
    /// Set iff `state == Mapped`
    pub frame: Option<usize>,
    /// Sticky: true once the page has been written back at least once
    pub on_disk: bool,
    /// One bit per in-page offset that has been referenced
    pub touched: BitVec,
}

impl Page {
    pub fn new(page_size: usize) -> Self {
        Page {
            state: PageState::Unmapped,
            frame: None,
            on_disk: false,
            touched: BitVec::repeat(false, page_size),
        }
    }

    /// Frame holding this page, if it is resident
    #[inline]
    pub fn resident_frame(&self) -> Option<usize> {
        match self.state {
            PageState::Mapped => self.frame,
            _ => None,
        }
    }

    /// Record a reference to `offset`. Offsets past the page end are ignored.
    pub fn touch(&mut self, offset: usize) {
        if let Some(mut bit) = self.touched.get_mut(offset) {
            *bit = true;
        }
    }

    pub fn is_touched(&self, offset: usize) -> bool {
        self.touched.get(offset).is_some_and(|bit| *bit)
    }

    pub fn touched_count(&self) -> usize {
        self.touched.count_ones()
    }
}

/// Frame table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub in_use: bool,
    /// Only meaningful while `in_use`
    pub dirty: bool,
    pub first_use: u64,
    pub last_use: u64,
    /// Page currently bound to this frame
    pub owner: Option<usize>,
}

/// Per-page residency state, one entry per logical page
#[derive(Debug, Clone)]
pub struct PageTable {
    pages: Vec<Page>,
}

impl PageTable {
    pub fn new(num_pages: usize, page_size: usize) -> Self {
        PageTable {
            pages: vec![Page::new(page_size); num_pages],
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, page: usize) -> Result<&Page> {
        let num_pages = self.pages.len();
        self.pages
            .get(page)
            .ok_or(SimError::PageOutOfRange { page, num_pages })
    }

    pub fn get_mut(&mut self, page: usize) -> Result<&mut Page> {
        let num_pages = self.pages.len();
        self.pages
            .get_mut(page)
            .ok_or(SimError::PageOutOfRange { page, num_pages })
    }

    pub fn set(&mut self, page: usize, entry: Page) -> Result<()> {
        *self.get_mut(page)? = entry;
        Ok(())
    }

    /// Read-only view for reporting
    pub fn snapshot(&self) -> &[Page] {
        &self.pages
    }
}

/// Per-frame usage state, one entry per physical frame
#[derive(Debug, Clone)]
pub struct FrameTable {
    frames: Vec<Frame>,
}

impl FrameTable {
    pub fn new(num_frames: usize) -> Self {
        FrameTable {
            frames: vec![Frame::default(); num_frames],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, frame: usize) -> Result<&Frame> {
        let num_frames = self.frames.len();
        self.frames
            .get(frame)
            .ok_or(SimError::FrameOutOfRange { frame, num_frames })
    }

    pub fn get_mut(&mut self, frame: usize) -> Result<&mut Frame> {
        let num_frames = self.frames.len();
        self.frames
            .get_mut(frame)
            .ok_or(SimError::FrameOutOfRange { frame, num_frames })
    }

    pub fn set(&mut self, frame: usize, entry: Frame) -> Result<()> {
        *self.get_mut(frame)? = entry;
        Ok(())
    }

    pub fn snapshot(&self) -> &[Frame] {
        &self.frames
    }
}
