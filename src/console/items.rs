use std::io::{BufRead, Write};

use super::Console;
use crate::domain::catalog::{ItemUpdate, NewItem};
use crate::domain::ports::Session;
use crate::errors::AppError;

impl<S: Session, R: BufRead, W: Write> Console<S, R, W> {
    pub(super) fn item_menu(&mut self) -> Result<(), AppError> {
        writeln!(self.out, "\n--- Manage Items ---")?;
        writeln!(self.out, "1. Insert Item")?;
        writeln!(self.out, "2. Update Item")?;
        writeln!(self.out, "3. Delete Item")?;
        writeln!(self.out, "4. Back")?;

        match self.prompt("Enter choice")?.as_str() {
            "1" => self.insert_item(),
            "2" => self.update_item(),
            "3" => self.delete_item(),
            "4" => Ok(()),
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                Ok(())
            }
        }
    }

    fn insert_item(&mut self) -> Result<(), AppError> {
        let name = self.prompt("Enter item name")?;
        if name.is_empty() {
            return Err(AppError::InvalidInput("item name must not be empty".to_string()));
        }
        let price = self.prompt_price("Enter item price")?;
        let category_id = self.prompt_optional_i32("Enter category ID (optional, blank for none)")?;
        let discount_id = self.prompt_optional_i32("Enter discount ID (optional, blank for none)")?;

        let item = NewItem {
            name,
            price,
            category_id,
            discount_id,
        };
        match self.service.insert_item(&item) {
            Ok(item_id) => writeln!(self.out, "Inserted item '{}' with ID {}", item.name, item_id)?,
            Err(e) => writeln!(self.out, "Error inserting item: {e}")?,
        }
        Ok(())
    }

    fn update_item(&mut self) -> Result<(), AppError> {
        let id = self.prompt_i32("Enter Item ID to update")?;
        let name = self.prompt("Enter new Name")?;
        if name.is_empty() {
            return Err(AppError::InvalidInput("item name must not be empty".to_string()));
        }
        let price = self.prompt_price("Enter new Price")?;

        let updated = self.service.update_item(&ItemUpdate { id, name, price })?;
        if updated {
            writeln!(self.out, "Item updated successfully.")?;
        } else {
            writeln!(self.out, "Item not found.")?;
        }
        Ok(())
    }

    fn delete_item(&mut self) -> Result<(), AppError> {
        let id = self.prompt_i32("Enter Item ID to delete")?;
        match self.service.delete_item(id) {
            Ok(true) => writeln!(self.out, "Item deleted successfully.")?,
            Ok(false) => writeln!(self.out, "Item not found.")?,
            Err(e) => writeln!(self.out, "Error deleting item (check constraints): {e}")?,
        }
        Ok(())
    }
}
