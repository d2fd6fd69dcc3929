//! Interface definitions for the search engine drivers.
//!
//! This module defines the abstract `SearchDriver` trait that allows the sync
//! and query layers to stay unaware of which engine family is configured.

mod search_driver;

pub use search_driver::SearchDriver;
