use bigdecimal::BigDecimal;

use super::catalog::{
    CategoryView, CustomerView, DiscountView, ItemUpdate, ItemView, NewItem, OrderLineView,
    OrderView, PaymentView, SalesSummary,
};
use super::errors::{InventoryCallError, PriceLookupError, StoreError};
use super::order::{CustomerId, ItemId, OrderId, OrderLineInput};

/// Auto-commit and transaction control on one live session.
///
/// Auto-commit is on by default. Turning it off opens a transaction that
/// lasts until `commit` or `rollback`; turning it back on while work is
/// pending commits that work.
pub trait TransactionControl {
    fn auto_commit(&self) -> bool;
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), StoreError>;
    fn commit(&mut self) -> Result<(), StoreError>;
    fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Statements the order-placement workflow issues directly.
pub trait OrderStore {
    /// Inserts an order row and returns the identity the store generated,
    /// or `None` when the store produced none.
    fn insert_order(&mut self, customer_id: CustomerId) -> Result<Option<OrderId>, StoreError>;
    /// Current list price of the item, `None` if the item does not exist.
    fn item_price(&mut self, item_id: ItemId) -> Result<Option<BigDecimal>, StoreError>;
    fn insert_order_line(&mut self, line: &OrderLineInput) -> Result<(), StoreError>;
}

/// Server-side `CalculateDiscountedPrice(item, quantity)`.
pub trait PriceOracle {
    fn discounted_price(
        &mut self,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<BigDecimal, PriceLookupError>;
}

/// Server-side `UpdateInventoryOnSale(item, quantity, OUT success)`.
pub trait InventoryGuard {
    /// `Ok(false)` means the store refused the decrement for lack of stock.
    fn try_reserve(&mut self, item_id: ItemId, quantity: i32) -> Result<bool, InventoryCallError>;
}

pub trait Catalog {
    fn list_items(&mut self) -> Result<Vec<ItemView>, StoreError>;
    fn list_categories(&mut self) -> Result<Vec<CategoryView>, StoreError>;
    fn list_discounts(&mut self) -> Result<Vec<DiscountView>, StoreError>;
    fn list_customers(&mut self) -> Result<Vec<CustomerView>, StoreError>;
    fn list_orders(&mut self) -> Result<Vec<OrderView>, StoreError>;
    fn list_payments(&mut self) -> Result<Vec<PaymentView>, StoreError>;
    fn list_order_lines(&mut self) -> Result<Vec<OrderLineView>, StoreError>;
    fn sales_summary(&mut self) -> Result<Vec<SalesSummary>, StoreError>;
    /// Inserts the item with an empty stock level and returns its id.
    fn insert_item(&mut self, item: &NewItem) -> Result<ItemId, StoreError>;
    /// Returns `false` when no item has the given id.
    fn update_item(&mut self, update: &ItemUpdate) -> Result<bool, StoreError>;
    /// Returns `false` when no item has the given id.
    fn delete_item(&mut self, item_id: ItemId) -> Result<bool, StoreError>;
}

/// Everything the console needs from one database session.
pub trait Session: TransactionControl + OrderStore + PriceOracle + InventoryGuard + Catalog {}

impl<T> Session for T where
    T: TransactionControl + OrderStore + PriceOracle + InventoryGuard + Catalog
{
}
