pub mod order_service;
pub mod placement;
pub mod transaction;
