//! Background Tasks Module
//!
//! # Tasks
//! - Memory sweep: drops expired entries from the in-process layer

mod cleanup;

pub use cleanup::spawn_cleanup_task;
