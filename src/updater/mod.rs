//! Update decisions and the pipelines built on them.
//!
//! - [`UpdateEngine`] turns one [`crate::manifest::ModEntry`] into an
//!   [`crate::models::UpdateDecision`]. It performs lookups only and never
//!   touches the filesystem or the config.
//! - [`UpdateRunner`] evaluates a whole config in bounded batches, then runs
//!   download → verify → commit for each mod in config order.
//! - [`StatusChecker`] produces the read-only latest-version report behind
//!   `modup list`.
//!
//! # Evaluation order
//!
//! ```text
//! forks (in list order) ──found──▶ FORK, simulate|download
//!        │ none
//!        ▼
//! primary source ──unsupported──▶ skip + error
//!        │
//!        ▼
//! candidate? ──no──▶ skip
//!        │ yes
//!        ▼
//! archived flag? ──yes──▶ skip
//!        │ no
//!        ▼
//! dry-run / config-only ? simulate : download
//! ```

mod engine;
mod pipeline;
mod status;


pub use engine::{DecisionOptions, PrimaryLookup, UpdateEngine};
pub use pipeline::{ModOutcome, ModReport, RunSummary, UpdateOptions, UpdateRunner};
pub use status::{StatusChecker, StatusSummary, VersionStatus};
