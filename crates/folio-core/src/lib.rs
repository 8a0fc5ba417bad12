//! Core types shared by the folio crates.

mod color;
mod geometry;

pub use color::{ColorToken, Theme};
pub use geometry::{Bounds, Point};
