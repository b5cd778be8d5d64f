//! A horizontally scrolling grid of reusable number cells.
//!
//! [`GridController`] owns the values `1..=30` and a [`cell_grid::CellGrid`] configured for
//! horizontal scrolling with estimated, self-sizing items. It registers [`NumberCell`] under
//! [`REUSE_IDENTIFIER`] and binds each index to its value as cells are dequeued.
//!
//! Like `cell-grid`, this crate holds no UI objects: the embedding layer passes screen bounds
//! and scroll offsets in and reads cell state (text, label frames) out.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cell;
mod controller;


pub use cell::{
    CONTENT_INSET, Color, ContentView, Font, FontWeight, Label, NUMBER_FONT, NumberCell,
};
pub use controller::{
    DataSource, ESTIMATED_ITEM_SIZE, GRID_HEIGHT, GridController, REUSE_IDENTIFIER, VALUE_COUNT,
    layout_options,
};
