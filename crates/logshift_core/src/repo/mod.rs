//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed persistence contract the tracker depends on.
//! - Isolate SQLite query details from service/aggregation logic.
//! - Offer an in-memory backend with the same observable rules.
//!
//! # Invariants
//! - Repository writes validate field limits before persistence.
//! - Repository APIs return semantic errors (`Duplicate`, `UnknownUser`,
//!   `UnknownProject`) in addition to DB transport errors.

pub mod memory_repo;
pub mod tracker_repo;
