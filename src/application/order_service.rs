use bigdecimal::BigDecimal;

use crate::domain::catalog::{
    CategoryView, CustomerView, DiscountView, ItemUpdate, ItemView, NewItem, OrderLineView,
    OrderView, PaymentView, SalesSummary,
};
use crate::domain::errors::{PriceLookupError, StoreError};
use crate::domain::order::{ItemId, PlacementRequest, PriceQuery};
use crate::domain::ports::Session;

use super::placement::{place_order, PlacementError, PlacementOutcome};

/// Owns the process's single session and exposes every operation the
/// console offers.
pub struct OrderService<S> {
    session: S,
}

impl<S: Session> OrderService<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn into_inner(self) -> S {
        self.session
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn place_order(
        &mut self,
        request: &PlacementRequest,
    ) -> Result<PlacementOutcome, PlacementError> {
        place_order(&mut self.session, request)
    }

    /// Quotes a price through the store's discount function. Read-only, so
    /// no transaction is opened.
    pub fn check_price(&mut self, query: &PriceQuery) -> Result<BigDecimal, PriceLookupError> {
        self.session
            .discounted_price(query.item_id(), query.quantity())
    }

    pub fn list_items(&mut self) -> Result<Vec<ItemView>, StoreError> {
        self.session.list_items()
    }

    pub fn list_categories(&mut self) -> Result<Vec<CategoryView>, StoreError> {
        self.session.list_categories()
    }

    pub fn list_discounts(&mut self) -> Result<Vec<DiscountView>, StoreError> {
        self.session.list_discounts()
    }

    pub fn list_customers(&mut self) -> Result<Vec<CustomerView>, StoreError> {
        self.session.list_customers()
    }

    pub fn list_orders(&mut self) -> Result<Vec<OrderView>, StoreError> {
        self.session.list_orders()
    }

    pub fn list_payments(&mut self) -> Result<Vec<PaymentView>, StoreError> {
        self.session.list_payments()
    }

    pub fn list_order_lines(&mut self) -> Result<Vec<OrderLineView>, StoreError> {
        self.session.list_order_lines()
    }

    pub fn sales_summary(&mut self) -> Result<Vec<SalesSummary>, StoreError> {
        self.session.sales_summary()
    }

    pub fn insert_item(&mut self, item: &NewItem) -> Result<ItemId, StoreError> {
        let item_id = self.session.insert_item(item)?;
        log::info!("Inserted item {} '{}'", item_id, item.name);
        Ok(item_id)
    }

    pub fn update_item(&mut self, update: &ItemUpdate) -> Result<bool, StoreError> {
        self.session.update_item(update)
    }

    pub fn delete_item(&mut self, item_id: ItemId) -> Result<bool, StoreError> {
        self.session.delete_item(item_id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::infrastructure::memory::InMemorySession;

    #[test]
    fn check_price_does_not_open_a_transaction() {
        let mut session = InMemorySession::new();
        let item = session.add_item("Tea", BigDecimal::from_str("2.50").unwrap(), 1);
        let mut service = OrderService::new(session);

        let price = service
            .check_price(&PriceQuery::new(item, 4).unwrap())
            .expect("price lookup failed");

        assert_eq!(price, BigDecimal::from_str("10.00").unwrap());
        let session = service.into_inner();
        assert_eq!(session.commits(), 0);
        assert_eq!(session.rollbacks(), 0);
    }

    #[test]
    fn check_price_surfaces_function_failures() {
        let mut session = InMemorySession::new();
        session.faults_mut().fail_price_function = true;
        let mut service = OrderService::new(session);

        let err = service
            .check_price(&PriceQuery::new(1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, PriceLookupError::Store { item_id: 1, .. }));
    }

    #[test]
    fn place_order_goes_through_the_workflow() {
        let mut session = InMemorySession::new();
        let item = session.add_item("Tea", BigDecimal::from_str("2.50").unwrap(), 1);
        session.add_customer(1, "Ada", "Lovelace");
        let mut service = OrderService::new(session);

        let outcome = service
            .place_order(&PlacementRequest::new(1, item, 1).unwrap())
            .expect("placement failed");
        assert!(matches!(outcome, PlacementOutcome::Placed(_)));
        assert_eq!(service.list_orders().unwrap().len(), 1);
        assert_eq!(service.session().stock_of(item), Some(0));
    }
}
