pub mod cache_store;
pub mod user_repository;

pub use cache_store::{CacheError, CacheStore};
pub use user_repository::{RepositoryError, UserRepository};
