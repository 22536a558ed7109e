//! Database repositories for the data access layer
//!
//! Each repository is responsible for a specific domain entity and provides
//! the queries the services need.

pub mod content;
