//! AURFC Hub
//!
//! Club store cart and junior player progression for the AURFC Hub: a keyed, merging cart
//! with exact money totals, pure progression reducers for experience, skills and badges, and
//! the JSON stores that keep both across sessions.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod items;
pub mod observability;
pub mod persistence;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod progress;
pub mod receipt;
pub mod records;
