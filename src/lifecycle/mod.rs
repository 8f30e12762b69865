//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Connect storage → Ensure containers → AppContext
//!
//! Per unit of work (context.rs):
//!     open_session → work → start_log / write → close session → close log
//!
//! Bootstrap (bootstrap.rs):
//!     start_log → open_session → close session → close log
//!
//! Teardown (context.rs, shutdown.rs):
//!     destroy → trigger shutdown → open sessions count as expired
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then containers
//! - Sessions are bounded by a deadline (deadline.rs), never pooled
//! - Teardown is a signal, not a join: sessions stay owned by their callers

pub mod bootstrap;
pub mod context;
pub mod deadline;
pub mod shutdown;
pub mod startup;

pub use bootstrap::{bootstrap, BOOTSTRAP_TOPIC};
pub use context::{AppContext, FeedUrls};
pub use deadline::Deadline;
pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{initialize, InitError};
