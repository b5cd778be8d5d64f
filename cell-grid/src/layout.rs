use alloc::vec::Vec;
use core::cmp;

use crate::fenwick::Fenwick;
use crate::{
    Align, Axis, ContainerPlacement, Frame, GridLayoutOptions, ScrollDirection, Size, VirtualItem,
    VirtualRange,
};

/// A single-line flow layout along one scroll axis.
///
/// Items start at their estimated size and can be measured later (self-sizing). Offsets are
/// kept in a prefix-sum tree so offset → index lookups stay logarithmic.
///
/// The layout holds no cells. [`crate::CellGrid`] drives it with viewport geometry and scroll
/// offsets and asks it which indexes should have a cell.
#[derive(Clone, Debug)]
pub struct FlowLayout {
    options: GridLayoutOptions,
    viewport: Size,
    scroll_offset: u64,
    scroll_direction: Option<ScrollDirection>,

    sizes: Vec<u32>, // main axis, no spacing
    cross_sizes: Vec<u32>,
    measured: Vec<bool>,
    sums: Fenwick,
}

impl FlowLayout {
    pub fn new(options: GridLayoutOptions) -> Self {
        gdebug!(
            count = options.count,
            overscan = options.overscan,
            spacing = options.item_spacing,
            "FlowLayout::new"
        );
        let mut layout = Self {
            options,
            viewport: Size::default(),
            scroll_offset: 0,
            scroll_direction: None,
            sizes: Vec::new(),
            cross_sizes: Vec::new(),
            measured: Vec::new(),
            sums: Fenwick::default(),
        };
        layout.rebuild_estimates();
        layout
    }

    pub fn options(&self) -> &GridLayoutOptions {
        &self.options
    }

    pub fn axis(&self) -> Axis {
        self.options.axis
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    /// Changes the item count. All measurements are discarded.
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.rebuild_estimates();
        self.scroll_offset = self.clamp_scroll_offset(self.scroll_offset);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
    }

    pub fn set_item_spacing(&mut self, item_spacing: u32) {
        if self.options.item_spacing == item_spacing {
            return;
        }
        self.options.item_spacing = item_spacing;
        self.rebuild_sums();
    }

    /// Computes the container frame inside `parent` according to the configured placement.
    pub fn container_frame(&self, parent: Frame) -> Frame {
        let axis = self.options.axis;
        match self.options.placement {
            ContainerPlacement::Fill => parent,
            ContainerPlacement::Centered { extent } => match axis {
                Axis::Horizontal => Frame::new(
                    parent.x,
                    parent.center_y() - extent as i64 / 2,
                    parent.width,
                    extent,
                ),
                Axis::Vertical => Frame::new(
                    parent.center_x() - extent as i64 / 2,
                    parent.y,
                    extent,
                    parent.height,
                ),
            },
        }
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Extent of the viewport on the scroll axis.
    pub fn viewport_main(&self) -> u32 {
        self.viewport.main(self.options.axis)
    }

    pub fn set_viewport_size(&mut self, viewport: Size) {
        if self.viewport == viewport {
            return;
        }
        gtrace!(
            width = viewport.width,
            height = viewport.height,
            "set_viewport_size"
        );
        self.viewport = viewport;
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        self.scroll_direction = match offset.cmp(&self.scroll_offset) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.scroll_offset = offset;
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Records the fitting size of an item. Returns the change of its main-axis extent.
    pub fn measure(&mut self, index: usize, size: Size) -> i64 {
        if index >= self.options.count {
            gwarn!(index, count = self.options.count, "measure: out-of-bounds index");
            return 0;
        }
        let axis = self.options.axis;
        let main = size.main(axis);
        self.cross_sizes[index] = size.cross(axis);
        self.measured[index] = true;

        let cur = self.sizes[index];
        if cur == main {
            return 0;
        }
        gtrace!(index, from = cur, to = main, "measure");
        self.sizes[index] = main;
        let delta = main as i64 - cur as i64;
        self.sums.add(index, delta);
        delta
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    pub fn reset_measurements(&mut self) {
        self.rebuild_estimates();
    }

    /// Length of the scrollable content on the scroll axis, insets included.
    pub fn total_size(&self) -> u64 {
        self.options.inset_start as u64 + self.sums.total() + self.options.inset_end as u64
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.viewport_main() as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    pub fn item(&self, index: usize) -> Option<VirtualItem> {
        (index < self.options.count).then(|| self.item_unchecked(index))
    }

    pub fn item_size(&self, index: usize) -> Option<Size> {
        let axis = self.options.axis;
        let main = *self.sizes.get(index)?;
        let cross = *self.cross_sizes.get(index)?;
        Some(Size::from_axes(axis, main, cross))
    }

    /// Frame of an item relative to the container, with the current scroll offset applied.
    ///
    /// Items are centered across the scroll axis.
    pub fn item_frame(&self, index: usize) -> Option<Frame> {
        let item = self.item(index)?;
        let axis = self.options.axis;
        let cross = self.cross_sizes[index];
        let main_origin = item.start as i64 - self.scroll_offset as i64;
        let cross_origin = (self.viewport.cross(axis) as i64 - cross as i64) / 2;
        Some(match axis {
            Axis::Horizontal => Frame::new(main_origin, cross_origin, item.size, cross),
            Axis::Vertical => Frame::new(cross_origin, main_origin, cross, item.size),
        })
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let count = self.options.count;
        if count == 0 {
            return None;
        }
        let inset = self.options.inset_start as u64;
        if offset < inset {
            return Some(0);
        }
        // Number of items that end at or before `offset` is the index of the item under it.
        let consumed = self.sums.lower_bound(offset - inset);
        Some(consumed.min(count - 1))
    }

    /// Indexes intersecting the viewport at the current scroll offset.
    pub fn visible_range(&self) -> VirtualRange {
        self.visible_range_for(self.scroll_offset, self.viewport_main())
    }

    /// Visible range extended by `overscan` on both sides.
    pub fn virtual_range(&self) -> VirtualRange {
        let mut range = self.visible_range();
        if range.is_empty() {
            return range;
        }
        let overscan = self.options.overscan;
        range.start_index = range.start_index.saturating_sub(overscan);
        range.end_index = cmp::min(self.options.count, range.end_index.saturating_add(overscan));
        range
    }

    pub fn visible_range_for(&self, scroll_offset: u64, viewport_main: u32) -> VirtualRange {
        let count = self.options.count;
        if count == 0 || viewport_main == 0 {
            return VirtualRange::EMPTY;
        }

        let view = viewport_main as u64;
        let total = self.total_size();
        let start = scroll_offset.min(total.saturating_sub(view));
        let end_inclusive = start.saturating_add(view).saturating_sub(1);
        if start >= total {
            return VirtualRange {
                start_index: count,
                end_index: count,
            };
        }

        let first = self.index_at_offset(start).unwrap_or(count);
        let last = self
            .index_at_offset(cmp::max(end_inclusive, start))
            .map(|i| i + 1)
            .unwrap_or(count);

        VirtualRange {
            start_index: first.min(count),
            end_index: last.min(count),
        }
    }

    pub fn for_each_virtual_item(&self, mut f: impl FnMut(VirtualItem)) {
        let range = self.virtual_range();
        if range.is_empty() {
            return;
        }

        let spacing = self.options.item_spacing as u64;
        let count = self.options.count;
        let mut start = self.start_of(range.start_index);
        for index in range.start_index..range.end_index {
            let size = self.sizes[index];
            f(VirtualItem { index, start, size });
            start = start.saturating_add(size as u64);
            if index + 1 < count {
                start = start.saturating_add(spacing);
            }
        }
    }

    /// Scroll offset that brings `index` into view with the given alignment (clamped).
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.options.count;
        if count == 0 {
            return 0;
        }
        let item = self.item_unchecked(index.min(count - 1));
        let view = self.viewport_main() as u64;

        let target = match align {
            Align::Start => item.start,
            Align::End => item.end().saturating_sub(view),
            Align::Center => {
                let center = item.start.saturating_add(item.size as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if item.start >= cur && item.end() <= cur_end {
                    cur
                } else if item.start < cur {
                    item.start
                } else {
                    item.end().saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    fn item_unchecked(&self, index: usize) -> VirtualItem {
        VirtualItem {
            index,
            start: self.start_of(index),
            size: self.sizes[index],
        }
    }

    fn start_of(&self, index: usize) -> u64 {
        self.options.inset_start as u64 + self.sums.prefix_sum(index)
    }

    fn rebuild_estimates(&mut self) {
        let count = self.options.count;
        let axis = self.options.axis;
        let estimate = self.options.estimated_item_size;
        self.sizes.clear();
        self.cross_sizes.clear();
        self.measured.clear();
        self.sizes.resize(count, estimate.main(axis));
        self.cross_sizes.resize(count, estimate.cross(axis));
        self.measured.resize(count, false);
        self.rebuild_sums();
    }

    fn rebuild_sums(&mut self) {
        self.sums = Fenwick::from_sizes(&self.sizes, self.options.item_spacing);
        debug_assert_eq!(self.sums.len(), self.sizes.len());
    }
}
