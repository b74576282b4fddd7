//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Reclaimer: drops stale cache records before anyone asks for them again

mod reclaim;

pub use reclaim::spawn_reclaim_task;
