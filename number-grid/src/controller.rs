use alloc::vec::Vec;

use cell_grid::{
    Align, Axis, CellGrid, CellHandle, ContainerPlacement, Frame, GridDataSource, GridDelegate,
    GridLayoutOptions, ReuseId, ReusePool, Size,
};

use crate::NumberCell;

/// Identifier the number cell factory is registered under.
pub const REUSE_IDENTIFIER: &str = "reusableCell";

/// Number of values shown by the grid (`1..=VALUE_COUNT`).
pub const VALUE_COUNT: usize = 30;

pub const ESTIMATED_ITEM_SIZE: Size = Size::new(100, 100);

/// Fixed height of the grid container, which is vertically centered in its parent.
pub const GRID_HEIGHT: u32 = 120;

/// Layout the controller configures its grid with.
pub fn layout_options() -> GridLayoutOptions {
    GridLayoutOptions::new(VALUE_COUNT, ESTIMATED_ITEM_SIZE)
        .with_axis(Axis::Horizontal)
        .with_placement(ContainerPlacement::Centered {
            extent: GRID_HEIGHT,
        })
        .with_self_sizing(true)
}

/// The integers `1..=30`, bound to number cells by index.
#[derive(Clone, Debug)]
pub struct DataSource {
    values: Vec<i64>,
    reuse_id: ReuseId,
}

impl DataSource {
    pub fn new(reuse_id: ReuseId) -> Self {
        Self {
            values: (1..=VALUE_COUNT as i64).collect(),
            reuse_id,
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }
}

impl GridDataSource<NumberCell> for DataSource {
    fn item_count(&self, _section: usize) -> usize {
        self.values.len()
    }

    fn cell_for_index(&self, pool: &mut ReusePool<NumberCell>, index: usize) -> CellHandle {
        debug_assert!(
            index < self.values.len(),
            "cell requested past the data source (index={index}, len={})",
            self.values.len()
        );
        let handle = pool.dequeue_id(self.reuse_id);
        let value = self.get(index);
        if value.is_none() {
            nwarn!(index, len = self.values.len(), "cell_for_index: index out of range");
        }
        if let Some(cell) = pool.get_mut(handle) {
            cell.set_value(value);
        }
        ntrace!(index, slot = handle.slot(), "cell_for_index");
        handle
    }
}

impl GridDelegate<NumberCell> for DataSource {
    fn will_display(&self, _cell: &NumberCell, _index: usize) {
        ntrace!(index = _index, value = ?_cell.value(), "will_display");
    }

    fn did_end_displaying(&self, _cell: &NumberCell, _index: usize) {
        ntrace!(index = _index, value = ?_cell.value(), "did_end_displaying");
    }
}

/// The screen: a horizontal grid of number cells bound to a [`DataSource`].
///
/// This type does not hold any UI objects. The embedding layer calls
/// [`GridController::view_did_load`] with the screen bounds once, then scrolls through
/// [`GridController::scroll_to`] / [`GridController::scroll_to_index`].
#[derive(Debug)]
pub struct GridController {
    grid: CellGrid<NumberCell>,
    source: DataSource,
}

impl GridController {
    pub fn new() -> Self {
        let mut grid = CellGrid::new(layout_options());
        let reuse_id = grid.register(REUSE_IDENTIFIER, NumberCell::new);
        ndebug!(identifier = REUSE_IDENTIFIER, count = VALUE_COUNT, "GridController::new");
        Self {
            grid,
            source: DataSource::new(reuse_id),
        }
    }

    pub fn grid(&self) -> &CellGrid<NumberCell> {
        &self.grid
    }

    pub fn data_source(&self) -> &DataSource {
        &self.source
    }

    /// Lays the grid out in `parent` and displays the first cells.
    pub fn view_did_load(&mut self, parent: Frame) {
        self.grid.layout_in(parent);
        self.grid.reload_data(&self.source, &self.source);
        ndebug!(
            displayed = self.grid.displayed_len(),
            allocated = self.grid.pool().allocated(),
            "view_did_load"
        );
    }

    /// Re-lays the grid out after the parent bounds changed.
    pub fn view_did_resize(&mut self, parent: Frame) {
        self.grid.layout_in(parent);
        self.grid.layout_pass(&self.source, &self.source);
    }

    pub fn reload_data(&mut self) {
        self.grid.reload_data(&self.source, &self.source);
    }

    /// Number of items; the grid has one section, so `section` is ignored.
    pub fn item_count(&self, section: usize) -> usize {
        self.source.item_count(section)
    }

    /// Dequeues a number cell and assigns it the value at `index`.
    ///
    /// The caller owns the returned cell until it hands it back with [`Self::recycle`].
    pub fn cell_for_index(&mut self, index: usize) -> CellHandle {
        self.source.cell_for_index(self.grid.pool_mut(), index)
    }

    /// Returns a cell obtained from [`Self::cell_for_index`] to the reuse pool.
    ///
    /// Cells the grid is displaying belong to the grid and are rejected.
    pub fn recycle(&mut self, handle: CellHandle) -> bool {
        if self.grid.visible_cells().any(|(_, displayed)| displayed == handle) {
            nwarn!(slot = handle.slot(), "recycle: cell is displayed by the grid");
            return false;
        }
        self.grid.pool_mut().enqueue(handle)
    }

    pub fn value_at(&self, index: usize) -> Option<i64> {
        self.source.get(index)
    }

    pub fn cell(&self, handle: CellHandle) -> Option<&NumberCell> {
        self.grid.cell(handle)
    }

    /// Scrolls to `offset` (clamped). Returns the applied offset.
    pub fn scroll_to(&mut self, offset: u64) -> u64 {
        self.grid.scroll_to_offset(offset, &self.source, &self.source)
    }

    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        self.grid
            .scroll_to_index(index, align, &self.source, &self.source)
    }

    /// Displayed cells in index order.
    pub fn visible_cells(&self) -> impl Iterator<Item = (usize, &NumberCell)> + '_ {
        self.grid
            .visible_cells()
            .filter_map(move |(index, handle)| Some((index, self.grid.cell(handle)?)))
    }

    /// Text of each displayed cell, in index order.
    pub fn visible_texts(&self) -> Vec<(usize, &str)> {
        self.visible_cells()
            .filter_map(|(index, cell)| Some((index, cell.text()?)))
            .collect()
    }
}

impl Default for GridController {
    fn default() -> Self {
        Self::new()
    }
}
