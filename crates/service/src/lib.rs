//! Service layer: the generic JSON record collection and everything around it.
//! - `record` defines what a stored record is and how partial updates merge.
//! - `storage` persists records as a JSON array file, one per resource.
//! - `resources` lists the resources and opens their collections.

pub mod errors;
pub mod ids;
pub mod metrics;
pub mod record;
pub mod resources;
pub mod runtime;
pub mod storage;
pub mod store;
