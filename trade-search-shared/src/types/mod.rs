//! This module defines the core data structures used across the trade search layer.

pub mod engine;
pub mod entity;
pub mod entity_document;
pub mod lenient;
pub mod search_query;
pub mod search_result;
