//! Domain model for users, projects and logged work.
//!
//! # Responsibility
//! - Define the three persisted record kinds and their identities.
//! - Own field-level validation shared by every persistence backend.
//!
//! # Invariants
//! - `User` and `WorkEntry` ids are assigned by the store, never by callers.
//! - `Project` ids are caller supplied and act as the primary key.
//! - Work entries reference users/projects by key when written and carry
//!   resolved copies when read.

pub mod project;
pub mod user;
pub mod validation;
pub mod work_entry;
