//! Persistence context and the generic entity repository.
//!
//! # Responsibility
//! - Stage inserts/updates/deletes per scope and commit them atomically.
//! - Give every entity type the same CRUD and existence contract.
//!
//! # Invariants
//! - Nothing reaches the store until `Session::save()` is called.
//! - `get_by_id` is the only read that fails on missing data.
//! - Store failures are propagated unchanged; no retries happen here.

pub mod entity_repo;
pub mod error;
pub mod session;

mod schema;
