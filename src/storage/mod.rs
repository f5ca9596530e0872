//! On-disk layout for a batch.
//!
//! ```text
//! {root}/
//! ├── {name}.log            # Run log (append-only, verbose runs)
//! └── {name}/               # Batch folder
//!     ├── Some_Song.zip
//!     └── Other_Song.zip
//! ```
//!
//! Without a batch name, archives land directly in `{root}` and the run log
//! is `{root}/saberdl.log`.

pub mod local;
pub mod run_log;

pub use local::LocalStorage;
pub use run_log::RunLog;
