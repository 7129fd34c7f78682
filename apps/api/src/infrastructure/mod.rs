// Infrastructure layer module
// Adapters implementing the domain ports (stores, caches, message dispatch)

pub mod cache;
pub mod messaging;
pub mod repositories;
