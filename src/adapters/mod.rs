pub mod postgres_profile_repository;
pub mod postgres_transaction_repository;

pub use postgres_profile_repository::PostgresProfileRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;
