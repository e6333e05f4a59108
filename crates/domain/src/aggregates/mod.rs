//! Aggregate roots - domain objects that own their related data
//!
//! The character snapshot owns every entity on the sheet; calculators take it
//! by reference (or `&mut` for named operations) and never hold on to it.

pub mod character;
pub mod derived;

pub use character::Character;
pub use derived::{DerivedStats, EncumbranceSummary, ShieldStatus, Strike};
