//! In-process stand-in for the PostgreSQL session.
//!
//! Keeps committed state and, while auto-commit is off, a working copy that
//! `commit` publishes and `rollback` throws away. The two server-side
//! routines are reimplemented with the same rules as the migration.
//! [`FaultPlan`] makes individual round-trips fail on demand.

use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{Local, NaiveDate};

use crate::domain::catalog::{
    CategoryView, CustomerView, DiscountView, ItemUpdate, ItemView, NewItem, OrderLineView,
    OrderView, PaymentView, SalesSummary,
};
use crate::domain::errors::{InventoryCallError, PriceLookupError, StoreError};
use crate::domain::order::{CustomerId, ItemId, OrderId, OrderLineInput};
use crate::domain::ports::{Catalog, InventoryGuard, OrderStore, PriceOracle, TransactionControl};

/// Round-trips that should fail. A failing rollback behaves like a dropped
/// connection: the server discards the pending work but the caller sees an
/// error.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    pub fail_begin: bool,
    pub fail_insert_order: bool,
    pub omit_order_id: bool,
    pub fail_price_read: bool,
    pub fail_order_line: bool,
    pub fail_procedure: bool,
    pub fail_price_function: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
    pub fail_restore: bool,
}

#[derive(Debug, Clone)]
struct ItemRecord {
    name: String,
    price: BigDecimal,
    category_id: Option<i32>,
    discount_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    categories: Vec<CategoryView>,
    discounts: Vec<DiscountView>,
    customers: Vec<CustomerView>,
    items: BTreeMap<ItemId, ItemRecord>,
    inventory: BTreeMap<ItemId, i32>,
    orders: BTreeMap<OrderId, CustomerId>,
    order_lines: Vec<OrderLineInput>,
    payments: Vec<PaymentView>,
    next_item_id: ItemId,
    next_order_id: OrderId,
}

impl StoreState {
    fn discount_for(&self, record: &ItemRecord) -> Option<&DiscountView> {
        let id = record.discount_id?;
        self.discounts.iter().find(|d| d.id == id)
    }
}

#[derive(Debug)]
pub struct InMemorySession {
    committed: StoreState,
    pending: Option<StoreState>,
    auto_commit: bool,
    faults: FaultPlan,
    today: NaiveDate,
    commits: usize,
    rollbacks: usize,
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySession {
    pub fn new() -> Self {
        Self {
            committed: StoreState {
                next_item_id: 1,
                next_order_id: 1,
                ..StoreState::default()
            },
            pending: None,
            auto_commit: true,
            faults: FaultPlan::default(),
            today: Local::now().date_naive(),
            commits: 0,
            rollbacks: 0,
        }
    }

    pub fn faults_mut(&mut self) -> &mut FaultPlan {
        &mut self.faults
    }

    /// Date used to decide whether a discount is active.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Rollback attempts, including failed ones.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    pub fn add_item(&mut self, name: &str, price: BigDecimal, stock: i32) -> ItemId {
        let state = self.write_state();
        let id = state.next_item_id;
        state.next_item_id += 1;
        state.items.insert(
            id,
            ItemRecord {
                name: name.to_string(),
                price,
                category_id: None,
                discount_id: None,
            },
        );
        state.inventory.insert(id, stock);
        id
    }

    pub fn add_category(&mut self, id: i32, name: &str) {
        self.write_state().categories.push(CategoryView {
            id,
            name: name.to_string(),
            description: None,
        });
    }

    pub fn add_discount(&mut self, discount: DiscountView) {
        self.write_state().discounts.push(discount);
    }

    pub fn assign_discount(&mut self, item_id: ItemId, discount_id: Option<i32>) {
        if let Some(record) = self.write_state().items.get_mut(&item_id) {
            record.discount_id = discount_id;
        }
    }

    pub fn assign_category(&mut self, item_id: ItemId, category_id: Option<i32>) {
        if let Some(record) = self.write_state().items.get_mut(&item_id) {
            record.category_id = category_id;
        }
    }

    pub fn add_customer(&mut self, id: CustomerId, first_name: &str, last_name: &str) {
        self.write_state().customers.push(CustomerView {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: None,
            email: None,
        });
    }

    pub fn add_payment(&mut self, payment: PaymentView) {
        self.write_state().payments.push(payment);
    }

    pub fn stock_of(&self, item_id: ItemId) -> Option<i32> {
        self.read_state().inventory.get(&item_id).copied()
    }

    fn read_state(&self) -> &StoreState {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    fn write_state(&mut self) -> &mut StoreState {
        if self.auto_commit {
            &mut self.committed
        } else {
            self.pending.get_or_insert_with(|| self.committed.clone())
        }
    }

    fn injected(what: &str) -> StoreError {
        StoreError::Database(format!("injected failure: {what}"))
    }
}

impl TransactionControl for InMemorySession {
    fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), StoreError> {
        if enabled == self.auto_commit {
            return Ok(());
        }
        if enabled {
            if self.faults.fail_restore {
                return Err(Self::injected("set auto-commit on"));
            }
            if let Some(pending) = self.pending.take() {
                self.committed = pending;
                self.commits += 1;
            }
        } else if self.faults.fail_begin {
            return Err(Self::injected("begin"));
        }
        self.auto_commit = enabled;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.faults.fail_commit {
            return Err(Self::injected("commit"));
        }
        if let Some(pending) = self.pending.take() {
            self.committed = pending;
        }
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        self.rollbacks += 1;
        self.pending = None;
        if self.faults.fail_rollback {
            return Err(Self::injected("rollback"));
        }
        Ok(())
    }
}

impl OrderStore for InMemorySession {
    fn insert_order(&mut self, customer_id: CustomerId) -> Result<Option<OrderId>, StoreError> {
        if self.faults.fail_insert_order {
            return Err(Self::injected("insert order"));
        }
        let omit_id = self.faults.omit_order_id;
        let state = self.write_state();
        if !state.customers.iter().any(|c| c.id == customer_id) {
            return Err(StoreError::Database(
                "orders violates a foreign key constraint".to_string(),
            ));
        }
        let id = state.next_order_id;
        state.next_order_id += 1;
        state.orders.insert(id, customer_id);
        Ok(if omit_id { None } else { Some(id) })
    }

    fn item_price(&mut self, item_id: ItemId) -> Result<Option<BigDecimal>, StoreError> {
        if self.faults.fail_price_read {
            return Err(Self::injected("select price"));
        }
        Ok(self.read_state().items.get(&item_id).map(|r| r.price.clone()))
    }

    fn insert_order_line(&mut self, line: &OrderLineInput) -> Result<(), StoreError> {
        if self.faults.fail_order_line {
            return Err(Self::injected("insert order line"));
        }
        let state = self.write_state();
        if !state.orders.contains_key(&line.order_id) || !state.items.contains_key(&line.item_id) {
            return Err(StoreError::Database(
                "order_line violates a foreign key constraint".to_string(),
            ));
        }
        state.order_lines.push(line.clone());
        Ok(())
    }
}

impl PriceOracle for InMemorySession {
    fn discounted_price(
        &mut self,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<BigDecimal, PriceLookupError> {
        if self.faults.fail_price_function {
            return Err(PriceLookupError::Store {
                item_id,
                source: Self::injected("CalculateDiscountedPrice"),
            });
        }
        let state = self.read_state();
        let record = state
            .items
            .get(&item_id)
            .ok_or(PriceLookupError::NoPrice { item_id })?;
        let percentage = state
            .discount_for(record)
            .filter(|d| d.is_active_on(self.today))
            .map(|d| d.percentage.clone())
            .unwrap_or_default();
        let hundred = BigDecimal::from(100);
        let gross = &record.price * &BigDecimal::from(quantity);
        let net = gross * (hundred.clone() - percentage) / hundred;
        Ok(net.with_scale_round(2, RoundingMode::HalfUp))
    }
}

impl InventoryGuard for InMemorySession {
    fn try_reserve(&mut self, item_id: ItemId, quantity: i32) -> Result<bool, InventoryCallError> {
        if self.faults.fail_procedure {
            return Err(InventoryCallError {
                item_id,
                source: Self::injected("UpdateInventoryOnSale"),
            });
        }
        let state = self.write_state();
        match state.inventory.get_mut(&item_id) {
            Some(stock) if quantity > 0 && *stock >= quantity => {
                *stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Catalog for InMemorySession {
    fn list_items(&mut self) -> Result<Vec<ItemView>, StoreError> {
        let state = self.read_state();
        let mut items: Vec<ItemView> = state
            .items
            .iter()
            .map(|(id, r)| ItemView {
                id: *id,
                name: r.name.clone(),
                category: r.category_id.and_then(|c| {
                    state.categories.iter().find(|cat| cat.id == c).map(|cat| cat.name.clone())
                }),
                discount: state.discount_for(r).map(|d| d.description.clone()),
                price: r.price.clone(),
            })
            .collect();
        // Items without a category sort last, as in PostgreSQL.
        items.sort_by(|a, b| {
            let key = |i: &ItemView| (i.category.is_none(), i.category.clone(), i.name.clone());
            key(a).cmp(&key(b))
        });
        Ok(items)
    }

    fn list_categories(&mut self) -> Result<Vec<CategoryView>, StoreError> {
        let mut categories = self.read_state().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn list_discounts(&mut self) -> Result<Vec<DiscountView>, StoreError> {
        let mut discounts = self.read_state().discounts.clone();
        discounts.sort_by_key(|d| d.start_date);
        Ok(discounts)
    }

    fn list_customers(&mut self) -> Result<Vec<CustomerView>, StoreError> {
        let mut customers = self.read_state().customers.clone();
        customers.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(customers)
    }

    fn list_orders(&mut self) -> Result<Vec<OrderView>, StoreError> {
        let state = self.read_state();
        Ok(state
            .orders
            .iter()
            .map(|(id, customer_id)| {
                let customer = state.customers.iter().find(|c| c.id == *customer_id);
                OrderView {
                    id: *id,
                    customer_id: *customer_id,
                    first_name: customer.map(|c| c.first_name.clone()),
                    last_name: customer.map(|c| c.last_name.clone()),
                }
            })
            .collect())
    }

    fn list_payments(&mut self) -> Result<Vec<PaymentView>, StoreError> {
        let mut payments = self.read_state().payments.clone();
        payments.sort_by_key(|p| p.payment_date);
        Ok(payments)
    }

    fn list_order_lines(&mut self) -> Result<Vec<OrderLineView>, StoreError> {
        let state = self.read_state();
        let mut lines: Vec<OrderLineView> = state
            .order_lines
            .iter()
            .map(|l| OrderLineView {
                order_id: l.order_id,
                item_id: l.item_id,
                item_name: state.items.get(&l.item_id).map(|r| r.name.clone()),
                quantity: l.quantity,
                total: l.total.clone(),
            })
            .collect();
        lines.sort_by_key(|l| l.order_id);
        Ok(lines)
    }

    fn sales_summary(&mut self) -> Result<Vec<SalesSummary>, StoreError> {
        let state = self.read_state();
        let mut rows = Vec::new();
        for customer in &state.customers {
            let order_ids: Vec<OrderId> = state
                .orders
                .iter()
                .filter(|(_, c)| **c == customer.id)
                .map(|(id, _)| *id)
                .collect();
            if order_ids.is_empty() {
                continue;
            }
            let totals: Vec<&BigDecimal> = state
                .order_lines
                .iter()
                .filter(|l| order_ids.contains(&l.order_id))
                .map(|l| &l.total)
                .collect();
            let total_spent = if totals.is_empty() {
                None
            } else {
                Some(totals.into_iter().fold(BigDecimal::from(0), |acc, t| acc + t))
            };
            rows.push(SalesSummary {
                customer_name: format!("{} {}", customer.first_name, customer.last_name),
                order_count: order_ids.len() as i64,
                total_spent,
            });
        }
        rows.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));
        Ok(rows)
    }

    fn insert_item(&mut self, item: &NewItem) -> Result<ItemId, StoreError> {
        let state = self.write_state();
        let unknown_category = item
            .category_id
            .is_some_and(|id| !state.categories.iter().any(|c| c.id == id));
        let unknown_discount = item
            .discount_id
            .is_some_and(|id| !state.discounts.iter().any(|d| d.id == id));
        if unknown_category || unknown_discount {
            return Err(StoreError::Database(
                "item violates a foreign key constraint".to_string(),
            ));
        }
        let id = state.next_item_id;
        state.next_item_id += 1;
        state.items.insert(
            id,
            ItemRecord {
                name: item.name.clone(),
                price: item.price.clone(),
                category_id: item.category_id,
                discount_id: item.discount_id,
            },
        );
        state.inventory.insert(id, 0);
        Ok(id)
    }

    fn update_item(&mut self, update: &ItemUpdate) -> Result<bool, StoreError> {
        let Some(record) = self.write_state().items.get_mut(&update.id) else {
            return Ok(false);
        };
        record.name = update.name.clone();
        record.price = update.price.clone();
        Ok(true)
    }

    fn delete_item(&mut self, item_id: ItemId) -> Result<bool, StoreError> {
        let state = self.write_state();
        if !state.items.contains_key(&item_id) {
            return Ok(false);
        }
        if state.order_lines.iter().any(|l| l.item_id == item_id) {
            return Err(StoreError::Database(format!(
                "item {item_id} is still referenced from order_line"
            )));
        }
        state.items.remove(&item_id);
        state.inventory.remove(&item_id);
        Ok(true)
    }
}
