//! Receipt
//!
//! Checkout summary of a cart, rendered as a table.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    pricing::{TotalPriceError, line_total},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating line or cart totals.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Error calculating the cart total.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One rendered cart line.
#[derive(Debug, Clone)]
struct ReceiptLine {
    name: String,
    item_type: String,
    variant: String,
    quantity: u32,
    unit_price: Money<'static, Currency>,
    line_total: Money<'static, Currency>,
}

/// Checkout summary for a cart.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    count: u64,
    total: Money<'static, Currency>,
}

impl Receipt {
    /// Build a receipt from the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line or the total cannot be calculated.
    pub fn new(cart: &Cart) -> Result<Self, ReceiptError> {
        let lines = cart
            .iter()
            .map(|item| {
                Ok::<_, ReceiptError>(ReceiptLine {
                    name: item.name().to_string(),
                    item_type: item.key().item_type().to_string(),
                    variant: item.key().variant().unwrap_or_default().to_string(),
                    quantity: item.quantity(),
                    unit_price: *item.unit_price(),
                    line_total: line_total(item)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lines,
            count: cart.count(),
            total: cart.total()?,
        })
    }

    /// Total number of units
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Total amount payable
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.lines.is_empty() {
            writeln!(out, "Your cart is empty.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Item", "Type", "Variant", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.item_type.clone(),
                line.variant.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}")?;
        writeln!(out, "Items: {}", self.count)?;
        writeln!(out, "Total: {}", self.total)?;

        Ok(())
    }
}
