pub mod entity;
pub mod migrations;
pub mod sea_repo;

#[cfg(test)]
pub mod memory;

#[cfg(test)]
pub use memory::InMemoryStorage;
pub use migrations::Migrator;
pub use sea_repo::SeaOrmStorage;
