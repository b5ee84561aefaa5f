use std::io::{BufRead, Write};
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::Console;
use crate::domain::ports::Session;
use crate::errors::AppError;

impl<S: Session, R: BufRead, W: Write> Console<S, R, W> {
    /// Next trimmed line of input; `InputClosed` at end of input.
    pub(super) fn read_line(&mut self) -> Result<String, AppError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    pub(super) fn prompt(&mut self, label: &str) -> Result<String, AppError> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        self.read_line()
    }

    pub(super) fn prompt_i32(&mut self, label: &str) -> Result<i32, AppError> {
        let raw = self.prompt(label)?;
        parse_i32(&raw)
    }

    /// Blank input means "none".
    pub(super) fn prompt_optional_i32(&mut self, label: &str) -> Result<Option<i32>, AppError> {
        let raw = self.prompt(label)?;
        if raw.is_empty() {
            return Ok(None);
        }
        parse_i32(&raw).map(Some)
    }

    pub(super) fn prompt_price(&mut self, label: &str) -> Result<BigDecimal, AppError> {
        let raw = self.prompt(label)?;
        parse_price(&raw)
    }
}

fn parse_i32(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("'{raw}' is not a whole number")))
}

fn parse_price(raw: &str) -> Result<BigDecimal, AppError> {
    let price = BigDecimal::from_str(raw)
        .map_err(|_| AppError::InvalidInput(format!("'{raw}' is not a decimal price")))?;
    if price < BigDecimal::from(0) {
        return Err(AppError::InvalidInput(format!(
            "price must not be negative, got {raw}"
        )));
    }
    Ok(price)
}
