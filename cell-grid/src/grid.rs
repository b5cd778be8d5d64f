use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{
    Align, CellHandle, FlowLayout, Frame, GridCell, GridLayoutOptions, ReuseId, ReusePool,
    VirtualRange,
};

/// Upper bound on layout passes per update. Self-sizing can move the visible range; each pass
/// only measures cells that were just dequeued, so the range settles quickly.
const MAX_LAYOUT_PASSES: usize = 8;

/// Supplies the item count and configured cells to a [`CellGrid`].
pub trait GridDataSource<C> {
    /// Number of items in `section`. The grid has a single section, `0`.
    fn item_count(&self, section: usize) -> usize;

    /// Dequeues a cell from `pool`, configures it for `index`, and returns its handle.
    ///
    /// `index` is always `< item_count(0)`.
    fn cell_for_index(&self, pool: &mut ReusePool<C>, index: usize) -> CellHandle;
}

/// Display notifications from a [`CellGrid`].
pub trait GridDelegate<C> {
    fn will_display(&self, _cell: &C, _index: usize) {}

    fn did_end_displaying(&self, _cell: &C, _index: usize) {}
}

impl<C> GridDelegate<C> for () {}

/// A headless scrolling grid.
///
/// `CellGrid` owns the layout, the reuse pool, and the index → cell map of displayed items.
/// It asks its data source for cells only for indexes entering the (overscanned) visible range
/// and hands cells leaving it back to the pool.
pub struct CellGrid<C> {
    layout: FlowLayout,
    pool: ReusePool<C>,
    frame: Frame,
    displayed: BTreeMap<usize, CellHandle>,
}

impl<C: GridCell> CellGrid<C> {
    pub fn new(options: GridLayoutOptions) -> Self {
        Self {
            layout: FlowLayout::new(options),
            pool: ReusePool::new(),
            frame: Frame::default(),
            displayed: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    pub fn pool(&self) -> &ReusePool<C> {
        &self.pool
    }

    /// Direct pool access, for dequeuing cells outside a layout pass.
    ///
    /// Cells dequeued here are not displayed by the grid and stay in use until enqueued.
    pub fn pool_mut(&mut self) -> &mut ReusePool<C> {
        &mut self.pool
    }

    /// Registers the cell factory for `identifier`. See [`ReusePool::register`].
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        factory: impl Fn() -> C + 'static,
    ) -> ReuseId {
        self.pool.register(identifier, factory)
    }

    /// Container frame in parent coordinates, as computed by the last [`Self::layout_in`].
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Places the container inside `parent` and resizes the viewport to match.
    ///
    /// Call [`Self::layout_pass`] afterwards to update the displayed cells.
    pub fn layout_in(&mut self, parent: Frame) {
        self.frame = self.layout.container_frame(parent);
        gdebug!(
            x = self.frame.x,
            y = self.frame.y,
            width = self.frame.width,
            height = self.frame.height,
            "layout_in"
        );
        self.layout.set_viewport_size(self.frame.size());
        let clamped = self.layout.clamp_scroll_offset(self.layout.scroll_offset());
        self.layout.set_scroll_offset(clamped);
    }

    /// Drops every displayed cell, re-reads the item count, and lays out again.
    pub fn reload_data<S, D>(&mut self, source: &S, delegate: &D)
    where
        S: GridDataSource<C> + ?Sized,
        D: GridDelegate<C> + ?Sized,
    {
        let displayed = core::mem::take(&mut self.displayed);
        for (index, handle) in displayed {
            self.end_displaying(index, handle, delegate);
        }

        let count = source.item_count(0);
        gdebug!(count, "reload_data");
        if count == self.layout.count() {
            self.layout.reset_measurements();
        } else {
            self.layout.set_count(count);
        }
        self.layout_pass(source, delegate);
    }

    /// Scrolls to `offset` (clamped) and updates the displayed cells.
    pub fn scroll_to_offset<S, D>(&mut self, offset: u64, source: &S, delegate: &D) -> u64
    where
        S: GridDataSource<C> + ?Sized,
        D: GridDelegate<C> + ?Sized,
    {
        self.layout.set_scroll_offset_clamped(offset);
        gtrace!(offset = self.layout.scroll_offset(), "scroll_to_offset");
        self.layout_pass(source, delegate);
        self.layout.scroll_offset()
    }

    /// Scrolls `index` into view with `align` and updates the displayed cells.
    pub fn scroll_to_index<S, D>(
        &mut self,
        index: usize,
        align: Align,
        source: &S,
        delegate: &D,
    ) -> u64
    where
        S: GridDataSource<C> + ?Sized,
        D: GridDelegate<C> + ?Sized,
    {
        let offset = self.layout.scroll_to_index_offset(index, align);
        self.scroll_to_offset(offset, source, delegate)
    }

    /// Brings the displayed cells in line with the current virtual range.
    ///
    /// Cells outside the range go back to the pool; indexes entering it get a cell from
    /// `source`. With self-sizing enabled, each new cell's fitting size is recorded in the
    /// layout, and the pass repeats until the range stops moving.
    pub fn layout_pass<S, D>(&mut self, source: &S, delegate: &D)
    where
        S: GridDataSource<C> + ?Sized,
        D: GridDelegate<C> + ?Sized,
    {
        let mut range = self.layout.virtual_range();
        for _ in 0..MAX_LAYOUT_PASSES {
            self.recycle_outside(range, delegate);
            self.fill(range, source, delegate);

            let next = self.layout.virtual_range();
            if next == range {
                return;
            }
            gtrace!(
                from_start = range.start_index,
                from_end = range.end_index,
                to_start = next.start_index,
                to_end = next.end_index,
                "layout_pass: range moved after sizing"
            );
            range = next;
        }
        gwarn!(passes = MAX_LAYOUT_PASSES, "layout_pass: range did not settle");
    }

    /// Displayed cells in index order.
    pub fn visible_cells(&self) -> impl Iterator<Item = (usize, CellHandle)> + '_ {
        self.displayed.iter().map(|(&index, &handle)| (index, handle))
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn handle_at(&self, index: usize) -> Option<CellHandle> {
        self.displayed.get(&index).copied()
    }

    pub fn cell(&self, handle: CellHandle) -> Option<&C> {
        self.pool.get(handle)
    }

    /// Cell currently displayed for `index`.
    pub fn cell_at(&self, index: usize) -> Option<&C> {
        self.cell(self.handle_at(index)?)
    }

    /// Frame of item `index` relative to the container.
    pub fn cell_frame(&self, index: usize) -> Option<Frame> {
        self.layout.item_frame(index)
    }

    fn recycle_outside<D>(&mut self, range: VirtualRange, delegate: &D)
    where
        D: GridDelegate<C> + ?Sized,
    {
        let leaving: Vec<usize> = self
            .displayed
            .keys()
            .copied()
            .filter(|&index| !range.contains(index))
            .collect();
        for index in leaving {
            if let Some(handle) = self.displayed.remove(&index) {
                self.end_displaying(index, handle, delegate);
            }
        }
    }

    fn fill<S, D>(&mut self, range: VirtualRange, source: &S, delegate: &D)
    where
        S: GridDataSource<C> + ?Sized,
        D: GridDelegate<C> + ?Sized,
    {
        let estimate = self.layout.options().estimated_item_size;
        let self_sizing = self.layout.options().self_sizing;
        for index in range.start_index..range.end_index {
            if self.displayed.contains_key(&index) {
                continue;
            }
            let handle = source.cell_for_index(&mut self.pool, index);
            let cell = self.pool.get(handle);
            debug_assert!(
                cell.is_some(),
                "data source returned a cell that is not in use (index={index})"
            );
            let Some(cell) = cell else {
                gwarn!(index, slot = handle.slot(), "data source returned a free cell");
                continue;
            };
            if self_sizing {
                let size = cell.fitting_size(estimate);
                self.layout.measure(index, size);
            }
            delegate.will_display(cell, index);
            self.displayed.insert(index, handle);
        }
    }

    fn end_displaying<D>(&mut self, index: usize, handle: CellHandle, delegate: &D)
    where
        D: GridDelegate<C> + ?Sized,
    {
        if let Some(cell) = self.pool.get(handle) {
            delegate.did_end_displaying(cell, index);
        }
        self.pool.enqueue(handle);
    }
}

impl<C> core::fmt::Debug for CellGrid<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CellGrid")
            .field("layout", &self.layout)
            .field("pool", &self.pool)
            .field("frame", &self.frame)
            .field("displayed", &self.displayed)
            .finish()
    }
}
