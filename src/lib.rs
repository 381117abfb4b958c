//! path-reducer - normalizes volatile filesystem path segments into stable patterns.
//!
//! Paths observed while tracing process activity are full of ephemeral
//! identifiers: pids, thread ids, container ids, pod cgroups, loop devices.
//! This library rewrites them to wildcards (or `self` for the owning
//! process) so activity from different runs and hosts can be compared.
//!
//! It provides:
//! - The ordered rule engine (`PathReducer`)
//! - The built-in rule set and configurable extra rules
//! - TOML configuration with directory cascade discovery
//!
//! # Example
//!
//! ```
//! use path_reducer::{FileMetadata, PathReducer, ProcessIdentity};
//!
//! let reducer = PathReducer::builtin();
//! let reduced = reducer.reduce_path("/proc/99/task/5/ns/pid", None, &ProcessIdentity::new(99));
//! assert_eq!(reduced, "/proc/self/task/*/ns/pid");
//!
//! let sysfs = FileMetadata::new("sysfs");
//! let reduced = reducer.reduce_path(
//!     "/sys/fs/cgroup/kubepods-burstable.slice",
//!     Some(&sysfs),
//!     &ProcessIdentity::new(1),
//! );
//! assert_eq!(reduced, "/sys/fs/cgroup/kubepods-*.slice");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod reducer;
pub mod rules;

pub use error::{ReducerError, Result};
pub use model::{FileMetadata, ProcessIdentity};
pub use reducer::PathReducer;
