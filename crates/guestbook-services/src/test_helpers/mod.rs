//! In-memory repository and storage for service and API tests.

pub mod mock_repository;
pub mod mock_storage;

pub use mock_repository::InMemoryContentRepository;
pub use mock_storage::MockStorage;
