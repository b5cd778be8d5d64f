//! A headless scrolling grid with reusable cells.
//!
//! The grid virtualizes a single section of items along one scroll axis: only items inside
//! the viewport (plus overscan) hold a cell, and cells scrolled out of view are parked in a
//! [`ReusePool`] keyed by reuse identifier until the next item needs one.
//!
//! It is UI-agnostic. The embedding layer is expected to provide:
//! - the parent bounds the container is laid out in
//! - scroll offsets
//! - a [`GridDataSource`] that configures cells, and optionally a [`GridDelegate`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod grid;
mod key;
mod layout;
mod options;
mod pool;
mod types;

#[cfg(test)]
mod tests;

pub use grid::{CellGrid, GridDataSource, GridDelegate};
pub use layout::FlowLayout;
pub use options::{ContainerPlacement, DEFAULT_ITEM_SPACING, GridLayoutOptions};
pub use pool::{GridCell, ReuseId, ReusePool};
pub use types::{
    Align, Axis, CellHandle, Frame, ScrollDirection, Size, VirtualItem, VirtualRange,
};
