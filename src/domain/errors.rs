use thiserror::Error;

use super::order::ItemId;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failure at the store boundary: connectivity, statement execution,
/// constraint violations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug, Error)]
pub enum PriceLookupError {
    #[error("Price lookup for item {item_id} failed: {source}")]
    Store {
        item_id: ItemId,
        #[source]
        source: StoreError,
    },
    #[error("No price available for item {item_id}")]
    NoPrice { item_id: ItemId },
}

#[derive(Debug, Error)]
#[error("Inventory procedure call for item {item_id} failed: {source}")]
pub struct InventoryCallError {
    pub item_id: ItemId,
    #[source]
    pub source: StoreError,
}
