// Example: a strip of 1000 text cells, scrolled to the middle.
use cell_grid::{
    Align, CellGrid, CellHandle, Frame, GridCell, GridDataSource, GridLayoutOptions, ReuseId,
    ReusePool, Size,
};

#[derive(Default)]
struct TextCell {
    text: String,
}

impl GridCell for TextCell {
    fn prepare_for_reuse(&mut self) {
        self.text.clear();
    }
}

struct Rows {
    id: ReuseId,
}

impl GridDataSource<TextCell> for Rows {
    fn item_count(&self, _section: usize) -> usize {
        1_000
    }

    fn cell_for_index(&self, pool: &mut ReusePool<TextCell>, index: usize) -> CellHandle {
        let handle = pool.dequeue_id(self.id);
        if let Some(cell) = pool.get_mut(handle) {
            cell.text = format!("item {index}");
        }
        handle
    }
}

fn main() {
    let mut grid = CellGrid::new(GridLayoutOptions::new(1_000, Size::new(80, 40)));
    let rows = Rows {
        id: grid.register("text", TextCell::default),
    };
    grid.layout_in(Frame::new(0, 0, 640, 40));
    grid.reload_data(&rows, &());

    let offset = grid.scroll_to_index(500, Align::Center, &rows, &());
    println!("offset={offset} range={:?}", grid.layout().virtual_range());
    for (index, handle) in grid.visible_cells() {
        let text = grid.cell(handle).map_or("", |cell| cell.text.as_str());
        println!("{index:>4} {text:<10} {:?}", grid.cell_frame(index));
    }
    println!("allocated cells: {}", grid.pool().allocated());
}
