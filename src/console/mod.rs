//! Line-oriented menu over any reader and writer.
//!
//! Input problems abort the current action and return to the menu; store
//! errors from plain queries are printed the same way. End of input exits.

mod input;
mod items;
mod views;

use std::io::{BufRead, Write};

use crate::application::order_service::OrderService;
use crate::application::placement::{PlacementError, PlacementOutcome};
use crate::domain::order::{PlacementRequest, PriceQuery};
use crate::domain::ports::Session;
use crate::errors::AppError;

pub struct Console<S, R, W> {
    service: OrderService<S>,
    input: R,
    out: W,
}

impl<S: Session, R: BufRead, W: Write> Console<S, R, W> {
    pub fn new(service: OrderService<S>, input: R, out: W) -> Self {
        Self {
            service,
            input,
            out,
        }
    }

    pub fn into_parts(self) -> (OrderService<S>, W) {
        (self.service, self.out)
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        loop {
            self.print_main_menu()?;
            let choice = match self.prompt("Enter choice") {
                Ok(choice) => choice,
                Err(AppError::InputClosed) => break,
                Err(e) => return Err(e),
            };

            let result = match choice.as_str() {
                "1" => self.view_menu(),
                "2" => self.item_menu(),
                "3" => self.place_order(),
                "4" => self.check_price(),
                "5" => break,
                _ => writeln!(self.out, "Invalid option. Please try again.")
                    .map_err(AppError::from),
            };

            match result {
                Ok(()) => {}
                Err(AppError::InputClosed) => break,
                Err(e) if e.is_recoverable() => {
                    log::debug!("Console action aborted: {}", e);
                    writeln!(self.out, "{e}")?;
                }
                Err(e) => return Err(e),
            }
        }
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    fn print_main_menu(&mut self) -> Result<(), AppError> {
        writeln!(self.out)?;
        writeln!(self.out, "=== Supermarket Management System ===")?;
        writeln!(self.out, "1. View Data (Tables & Views)")?;
        writeln!(self.out, "2. Manage Items (Insert, Update, Delete)")?;
        writeln!(self.out, "3. Place Order (Transactional Workflow)")?;
        writeln!(self.out, "4. Check Price (Stored Function)")?;
        writeln!(self.out, "5. Exit")?;
        Ok(())
    }

    fn place_order(&mut self) -> Result<(), AppError> {
        writeln!(self.out, "\n--- Place Order (Transaction) ---")?;
        let customer_id = self.prompt_i32("Enter Customer ID")?;
        let item_id = self.prompt_i32("Enter Item ID")?;
        let quantity = self.prompt_i32("Enter Quantity")?;
        let request = PlacementRequest::new(customer_id, item_id, quantity)?;

        match self.service.place_order(&request) {
            Ok(PlacementOutcome::Placed(order_id)) => {
                writeln!(self.out, "Order placed successfully! Order ID: {order_id}")?
            }
            Ok(PlacementOutcome::Declined(decline)) => {
                writeln!(self.out, "Order declined, nothing was saved: {decline}")?
            }
            Err(e @ PlacementError::RollbackFailed { .. }) => {
                writeln!(self.out, "CRITICAL: {e}")?;
                writeln!(self.out, "Check the Orders and Order Lines before retrying.")?
            }
            Err(e) => writeln!(self.out, "Transaction failed! {e}")?,
        }
        Ok(())
    }

    fn check_price(&mut self) -> Result<(), AppError> {
        let item_id = self.prompt_i32("Enter Item ID")?;
        let quantity = self.prompt_i32("Enter Quantity")?;
        let query = PriceQuery::new(item_id, quantity)?;

        match self.service.check_price(&query) {
            Ok(price) => writeln!(self.out, "Calculated Price: {price}")?,
            Err(e) => writeln!(self.out, "Error checking price: {e}")?,
        }
        Ok(())
    }
}
