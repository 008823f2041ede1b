/// Instruction counts are 1-based; the first access in a trace is instruction 1.
pub const FIRST_INSTRUCTION: u64 = 1;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = -1;

/// Lines starting with this character are skipped anywhere in a trace.
pub const COMMENT_PREFIX: char = '#';

/// pageSize numFrames numPages numBackingBlocks
pub const HEADER_FIELDS: usize = 4;

pub const READ_TOKEN: &str = "r";
pub const WRITE_TOKEN: &str = "w";
pub const PRINT_TOKEN: &str = "print";
pub const DEBUG_TOKEN: &str = "debug";
pub const NODEBUG_TOKEN: &str = "nodebug";

pub const FIFO_NAME: &str = "FIFO";
pub const LRU_NAME: &str = "LRU";

/// Frame number printed for pages that have no frame.
pub const NO_FRAME: i64 = -1;
