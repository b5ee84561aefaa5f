use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use super::order::{CustomerId, ItemId, OrderId};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub category: Option<String>,
    pub discount: Option<String>,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountView {
    pub id: i32,
    pub description: String,
    pub discount_type: String,
    pub percentage: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DiscountView {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerView {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// An order joined with its customer's name, when the customer still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentView {
    pub id: i32,
    pub order_id: OrderId,
    pub payment_type: String,
    pub amount: BigDecimal,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineView {
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub item_name: Option<String>,
    pub quantity: i32,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub customer_name: String,
    pub order_count: i64,
    pub total_spent: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub price: BigDecimal,
    pub category_id: Option<i32>,
    pub discount_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub id: ItemId,
    pub name: String,
    pub price: BigDecimal,
}
