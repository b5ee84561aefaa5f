use std::io::{BufRead, Write};

use super::Console;
use crate::domain::ports::Session;
use crate::errors::AppError;

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl<S: Session, R: BufRead, W: Write> Console<S, R, W> {
    pub(super) fn view_menu(&mut self) -> Result<(), AppError> {
        writeln!(self.out, "\n--- View Data ---")?;
        writeln!(self.out, "1. Items")?;
        writeln!(self.out, "2. Categories")?;
        writeln!(self.out, "3. Discounts")?;
        writeln!(self.out, "4. Customers")?;
        writeln!(self.out, "5. Orders")?;
        writeln!(self.out, "6. Payments")?;
        writeln!(self.out, "7. Order Lines")?;
        writeln!(self.out, "8. Sales Summary (View)")?;
        writeln!(self.out, "9. Back")?;

        match self.prompt("Enter choice")?.as_str() {
            "1" => self.show_items(),
            "2" => self.show_categories(),
            "3" => self.show_discounts(),
            "4" => self.show_customers(),
            "5" => self.show_orders(),
            "6" => self.show_payments(),
            "7" => self.show_order_lines(),
            "8" => self.show_sales_summary(),
            "9" => Ok(()),
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                Ok(())
            }
        }
    }

    fn show_items(&mut self) -> Result<(), AppError> {
        let items = self.service.list_items()?;
        writeln!(self.out, "\n--- Items ---")?;
        for item in &items {
            writeln!(
                self.out,
                "ID: {} | Item: {} | Price: {} | Category: {} | Discount: {}",
                item.id,
                item.name,
                item.price,
                or_dash(&item.category),
                or_dash(&item.discount)
            )?;
        }
        Ok(())
    }

    fn show_categories(&mut self) -> Result<(), AppError> {
        let categories = self.service.list_categories()?;
        writeln!(self.out, "\n--- Categories ---")?;
        for c in &categories {
            writeln!(
                self.out,
                "ID: {}, Name: {}, Description: {}",
                c.id,
                c.name,
                or_dash(&c.description)
            )?;
        }
        Ok(())
    }

    fn show_discounts(&mut self) -> Result<(), AppError> {
        let discounts = self.service.list_discounts()?;
        writeln!(self.out, "\n--- Discounts ---")?;
        for d in &discounts {
            writeln!(
                self.out,
                "ID: {}, Description: {}, Type: {}, Percentage: {}, Start: {}, End: {}",
                d.id, d.description, d.discount_type, d.percentage, d.start_date, d.end_date
            )?;
        }
        Ok(())
    }

    fn show_customers(&mut self) -> Result<(), AppError> {
        let customers = self.service.list_customers()?;
        writeln!(self.out, "\n--- Customers ---")?;
        for c in &customers {
            writeln!(
                self.out,
                "ID: {}, Name: {} {}, Phone: {}, Email: {}",
                c.id,
                c.first_name,
                c.last_name,
                or_dash(&c.phone),
                or_dash(&c.email)
            )?;
        }
        Ok(())
    }

    fn show_orders(&mut self) -> Result<(), AppError> {
        let orders = self.service.list_orders()?;
        writeln!(self.out, "\n--- Orders ---")?;
        for o in &orders {
            writeln!(
                self.out,
                "Order ID: {}, CustomerID: {}, Customer: {} {}",
                o.id,
                o.customer_id,
                or_dash(&o.first_name),
                or_dash(&o.last_name)
            )?;
        }
        Ok(())
    }

    fn show_payments(&mut self) -> Result<(), AppError> {
        let payments = self.service.list_payments()?;
        writeln!(self.out, "\n--- Payments ---")?;
        for p in &payments {
            writeln!(
                self.out,
                "ID: {}, OrderID: {}, Type: {}, Amount: {}, Date: {}",
                p.id, p.order_id, p.payment_type, p.amount, p.payment_date
            )?;
        }
        Ok(())
    }

    fn show_order_lines(&mut self) -> Result<(), AppError> {
        let lines = self.service.list_order_lines()?;
        writeln!(self.out, "\n--- OrderLines ---")?;
        for l in &lines {
            writeln!(
                self.out,
                "OrderID: {}, ItemID: {}, Item: {}, Quantity: {}, Total: {}",
                l.order_id,
                l.item_id,
                or_dash(&l.item_name),
                l.quantity,
                l.total
            )?;
        }
        Ok(())
    }

    fn show_sales_summary(&mut self) -> Result<(), AppError> {
        let rows = self.service.sales_summary()?;
        writeln!(self.out, "\n--- Sales Summary ---")?;
        for row in &rows {
            let total = row
                .total_spent
                .as_ref()
                .map_or_else(|| "0".to_string(), ToString::to_string);
            writeln!(
                self.out,
                "Customer: {} | Orders: {} | Total Spent: {}",
                row.customer_name, row.order_count, total
            )?;
        }
        Ok(())
    }
}
