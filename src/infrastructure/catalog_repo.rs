use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::domain::catalog::{
    CategoryView, CustomerView, DiscountView, ItemUpdate, ItemView, NewItem, OrderLineView,
    OrderView, PaymentView, SalesSummary,
};
use crate::domain::errors::StoreError;
use crate::domain::order::ItemId;
use crate::domain::ports::Catalog;
use crate::schema::{category, customer, discount, inventory, item, order_line, orders, payment};

use super::models::{
    CategoryRow, CustomerRow, DiscountRow, NewItemRow, PaymentRow, SalesSummaryRow,
};
use super::pg_session::PgSession;

impl Catalog for PgSession {
    fn list_items(&mut self) -> Result<Vec<ItemView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = item::table
            .left_join(category::table)
            .left_join(discount::table)
            .select((
                item::id,
                item::name,
                category::name.nullable(),
                discount::description.nullable(),
                item::price,
            ))
            .order((category::name.nullable().asc(), item::name.asc()))
            .load::<(i32, String, Option<String>, Option<String>, BigDecimal)>(conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, category, discount, price)| ItemView {
                id,
                name,
                category,
                discount,
                price,
            })
            .collect())
    }

    fn list_categories(&mut self) -> Result<Vec<CategoryView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = category::table
            .select(CategoryRow::as_select())
            .order(category::name.asc())
            .load(conn)?;
        Ok(rows.into_iter().map(CategoryView::from).collect())
    }

    fn list_discounts(&mut self) -> Result<Vec<DiscountView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = discount::table
            .select(DiscountRow::as_select())
            .order(discount::start_date.asc())
            .load(conn)?;
        Ok(rows.into_iter().map(DiscountView::from).collect())
    }

    fn list_customers(&mut self) -> Result<Vec<CustomerView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = customer::table
            .select(CustomerRow::as_select())
            .order((customer::last_name.asc(), customer::first_name.asc()))
            .load(conn)?;
        Ok(rows.into_iter().map(CustomerView::from).collect())
    }

    fn list_orders(&mut self) -> Result<Vec<OrderView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = orders::table
            .left_join(customer::table)
            .select((
                orders::id,
                orders::customer_id,
                customer::first_name.nullable(),
                customer::last_name.nullable(),
            ))
            .order(orders::id.asc())
            .load::<(i32, i32, Option<String>, Option<String>)>(conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, customer_id, first_name, last_name)| OrderView {
                id,
                customer_id,
                first_name,
                last_name,
            })
            .collect())
    }

    fn list_payments(&mut self) -> Result<Vec<PaymentView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = payment::table
            .select(PaymentRow::as_select())
            .order(payment::payment_date.asc())
            .load(conn)?;
        Ok(rows.into_iter().map(PaymentView::from).collect())
    }

    fn list_order_lines(&mut self) -> Result<Vec<OrderLineView>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = order_line::table
            .left_join(item::table)
            .select((
                order_line::order_id,
                order_line::item_id,
                item::name.nullable(),
                order_line::quantity,
                order_line::total,
            ))
            .order(order_line::order_id.asc())
            .load::<(i32, i32, Option<String>, i32, BigDecimal)>(conn)?;

        Ok(rows
            .into_iter()
            .map(|(order_id, item_id, item_name, quantity, total)| OrderLineView {
                order_id,
                item_id,
                item_name,
                quantity,
                total,
            })
            .collect())
    }

    fn sales_summary(&mut self) -> Result<Vec<SalesSummary>, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = diesel::sql_query(
            "SELECT customer_name, order_count, total_spent FROM sales_summary ORDER BY customer_name",
        )
        .load::<SalesSummaryRow>(conn)?;
        Ok(rows.into_iter().map(SalesSummary::from).collect())
    }

    fn insert_item(&mut self, new_item: &NewItem) -> Result<ItemId, StoreError> {
        let conn = self.conn_for_statement()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let item_id = diesel::insert_into(item::table)
                .values(&NewItemRow {
                    name: new_item.name.clone(),
                    price: new_item.price.clone(),
                    category_id: new_item.category_id,
                    discount_id: new_item.discount_id,
                })
                .returning(item::id)
                .get_result::<i32>(conn)?;

            diesel::insert_into(inventory::table)
                .values((inventory::item_id.eq(item_id), inventory::quantity.eq(0)))
                .execute(conn)?;

            Ok(item_id)
        })
    }

    fn update_item(&mut self, update: &ItemUpdate) -> Result<bool, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = diesel::update(item::table.find(update.id))
            .set((item::name.eq(&update.name), item::price.eq(&update.price)))
            .execute(conn)?;
        Ok(rows > 0)
    }

    fn delete_item(&mut self, item_id: ItemId) -> Result<bool, StoreError> {
        let conn = self.conn_for_statement()?;
        let rows = diesel::delete(item::table.find(item_id)).execute(conn)?;
        Ok(rows > 0)
    }
}
