//! Meilisearch implementation of the search driver.

mod driver;

pub use driver::MeilisearchDriver;
