pub mod memory;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
mod row;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "postgres")]
pub use postgres::PostgresRepository;
