pub mod catalog_repo;
pub mod memory;
pub mod models;
pub mod pg_session;
