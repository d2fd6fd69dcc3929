//! OpenSearch implementation of the search driver.
//!
//! This module provides the query DSL translation and the index mappings for
//! OpenSearch-class engines.

mod driver;
mod index_config;

pub use driver::OpenSearchDriver;
pub use index_config::{company_index_settings, exchange_index_settings};
