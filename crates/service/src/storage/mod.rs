//! Storage abstractions for the service layer
//!
//! File-backed record collections shared by every resource.

pub mod json_collection;
