//! Utilities shared across commands
//!
//! - [`fs`] - atomic writes, directory creation and file moves
//! - [`progress`] - progress bars that honour `MODUP_NO_PROGRESS`

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, move_file};
pub use progress::ProgressBar;
