//! Interface definitions for the search engine client.
//!
//! This module defines the abstract `BulkWriteClient` trait that allows for
//! dependency injection and swappable search backend implementations.

mod bulk_write_client;

pub use bulk_write_client::BulkWriteClient;
