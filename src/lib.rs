pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod logger;
pub mod memory;
pub mod policy;
pub mod simulation;
pub mod stats;
pub mod translation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use config::{Geometry, PolicyKind, RunConfig};
pub use error::{Result, SimError};
pub use stats::Tracker;
pub use translation::PageAddress;
pub use vm_manager::{Operation, Outcome, Snapshot, VmManager};
