use crate::{Axis, Size};

/// Default space between consecutive items on the scroll axis.
pub const DEFAULT_ITEM_SPACING: u32 = 10;

/// How the grid container is placed inside its parent.
///
/// The container always spans the parent's extent across the scroll axis' perpendicular edges
/// (leading/trailing for a horizontal grid). On the other axis it either fills the parent or
/// keeps a fixed extent centered in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerPlacement {
    #[default]
    Fill,
    /// Fixed extent, centered in the parent.
    Centered { extent: u32 },
}

/// Configuration for [`crate::FlowLayout`] and [`crate::CellGrid`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayoutOptions {
    pub count: usize,

    /// Size used for every item until its cell reports a fitting size.
    pub estimated_item_size: Size,

    pub axis: Axis,

    /// Items kept alive on each side of the visible range.
    pub overscan: usize,

    /// Space between consecutive items on the scroll axis.
    pub item_spacing: u32,

    /// Inset before the first item.
    pub inset_start: u32,
    /// Inset after the last item.
    pub inset_end: u32,

    pub placement: ContainerPlacement,

    /// Whether cells may replace the estimate with their own fitting size.
    pub self_sizing: bool,
}

impl GridLayoutOptions {
    /// Creates options for a horizontally scrolling grid.
    pub fn new(count: usize, estimated_item_size: Size) -> Self {
        Self {
            count,
            estimated_item_size,
            axis: Axis::Horizontal,
            overscan: 1,
            item_spacing: DEFAULT_ITEM_SPACING,
            inset_start: 0,
            inset_end: 0,
            placement: ContainerPlacement::Fill,
            self_sizing: true,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_item_spacing(mut self, item_spacing: u32) -> Self {
        self.item_spacing = item_spacing;
        self
    }

    pub fn with_insets(mut self, inset_start: u32, inset_end: u32) -> Self {
        self.inset_start = inset_start;
        self.inset_end = inset_end;
        self
    }

    pub fn with_placement(mut self, placement: ContainerPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_self_sizing(mut self, self_sizing: bool) -> Self {
        self.self_sizing = self_sizing;
        self
    }
}
