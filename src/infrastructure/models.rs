use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Nullable, Numeric, Text};

use crate::domain::catalog::{
    CategoryView, CustomerView, DiscountView, PaymentView, SalesSummary,
};
use crate::domain::order::OrderLineInput;
use crate::schema::{category, customer, discount, item, order_line, orders, payment};

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_line)]
pub struct NewOrderLineRow {
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub total: BigDecimal,
}

impl From<&OrderLineInput> for NewOrderLineRow {
    fn from(line: &OrderLineInput) -> Self {
        Self {
            order_id: line.order_id,
            item_id: line.item_id,
            quantity: line.quantity,
            total: line.total.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = item)]
pub struct NewItemRow {
    pub name: String,
    pub price: BigDecimal,
    pub category_id: Option<i32>,
    pub discount_id: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryRow> for CategoryView {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = discount)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiscountRow {
    pub id: i32,
    pub description: String,
    pub discount_type: String,
    pub percentage: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<DiscountRow> for DiscountView {
    fn from(row: DiscountRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            discount_type: row.discount_type,
            percentage: row.percentage,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customer)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<CustomerRow> for CustomerView {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            email: row.email,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: i32,
    pub order_id: i32,
    pub payment_type: String,
    pub amount: BigDecimal,
    pub payment_date: NaiveDate,
}

impl From<PaymentRow> for PaymentView {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            payment_type: row.payment_type,
            amount: row.amount,
            payment_date: row.payment_date,
        }
    }
}

/// Result row of `SELECT CalculateDiscountedPrice(..) AS final_price`.
#[derive(Debug, QueryableByName)]
pub struct DiscountedPriceRow {
    #[diesel(sql_type = Nullable<Numeric>)]
    pub final_price: Option<BigDecimal>,
}

/// OUT parameters returned by `CALL UpdateInventoryOnSale(..)`.
#[derive(Debug, QueryableByName)]
pub struct InventoryOutcomeRow {
    #[diesel(sql_type = Nullable<Bool>)]
    pub success: Option<bool>,
}

#[derive(Debug, QueryableByName)]
pub struct SalesSummaryRow {
    #[diesel(sql_type = Text)]
    pub customer_name: String,
    #[diesel(sql_type = BigInt)]
    pub order_count: i64,
    #[diesel(sql_type = Nullable<Numeric>)]
    pub total_spent: Option<BigDecimal>,
}

impl From<SalesSummaryRow> for SalesSummary {
    fn from(row: SalesSummaryRow) -> Self {
        Self {
            customer_name: row.customer_name,
            order_count: row.order_count,
            total_spent: row.total_spent,
        }
    }
}
