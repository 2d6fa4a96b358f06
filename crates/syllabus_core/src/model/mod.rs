//! Persistable domain records.
//!
//! # Responsibility
//! - Define the entity contract shared by every persisted record.
//! - Keep table mapping next to the record it describes.
//!
//! # Invariants
//! - Every entity has exactly one integer identity field.
//! - `UNASSIGNED_ID` marks records the store has not numbered yet.

pub mod document_template;
pub mod entity;
pub mod subject;
pub mod syllabus;
pub mod teacher;
