use bigdecimal::BigDecimal;

use super::errors::DomainError;

pub type CustomerId = i32;
pub type ItemId = i32;
pub type OrderId = i32;

/// A customer's request to buy `quantity` units of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    customer_id: CustomerId,
    item_id: ItemId,
    quantity: i32,
}

impl PlacementRequest {
    pub fn new(
        customer_id: CustomerId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<Self, DomainError> {
        validate_quantity(quantity)?;
        Ok(Self {
            customer_id,
            item_id,
            quantity,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// Item and quantity to quote through the discount function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuery {
    item_id: ItemId,
    quantity: i32,
}

impl PriceQuery {
    pub fn new(item_id: ItemId, quantity: i32) -> Result<Self, DomainError> {
        validate_quantity(quantity)?;
        Ok(Self { item_id, quantity })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}

fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be a positive integer, got {quantity}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineInput {
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub quantity: i32,
    pub total: BigDecimal,
}

impl OrderLineInput {
    /// Prices the line as `unit_price * quantity` without rounding.
    pub fn priced(
        order_id: OrderId,
        item_id: ItemId,
        unit_price: &BigDecimal,
        quantity: i32,
    ) -> Self {
        Self {
            order_id,
            item_id,
            quantity,
            total: unit_price * &BigDecimal::from(quantity),
        }
    }
}
