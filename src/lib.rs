pub mod application;
pub mod config;
pub mod console;
pub mod db;
pub mod domain;
pub mod errors;
pub mod infrastructure;
pub mod schema;

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub use application::order_service::OrderService;
pub use application::placement::{
    place_order, Decline, FailureKind, OrderPlacement, PlacementError, PlacementOutcome,
    PlacementState, Step,
};
pub use config::AppConfig;
pub use console::Console;
pub use db::{establish_session, run_migrations};
pub use infrastructure::memory::InMemorySession;
pub use infrastructure::pg_session::PgSession;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
