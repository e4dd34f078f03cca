//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Client::new:
//!     spawn sniffer / health checker → handles tracked by Shutdown
//!
//! Client::close:
//!     broadcast shutdown → loops exit on next select → handles joined
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every background task
//! - close() joins the tasks, so no task outlives the client

pub mod shutdown;

pub use shutdown::Shutdown;
