//! Shared plumbing for the ensino especial services: logging bootstrap,
//! startup environment checks, response types and the admin listener.

pub mod types;
pub mod utils;
pub mod env;
pub mod admin_http;
