// Demo: lays the number grid out on a phone-sized screen and scrolls it end to end.
use anyhow::Result;
use cell_grid::{Align, Frame};
use number_grid::GridController;
use tracing_subscriber::EnvFilter;

const SCREEN: Frame = Frame::new(0, 0, 375, 812);
const SCROLL_STEP: u64 = 180;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(anyhow::Error::msg)?;

    let mut controller = GridController::new();
    controller.view_did_load(SCREEN);

    let frame = controller.grid().frame();
    tracing::info!(
        x = frame.x,
        y = frame.y,
        width = frame.width,
        height = frame.height,
        items = controller.item_count(0),
        "grid loaded"
    );

    let max = controller.grid().layout().max_scroll_offset();
    let mut offset = 0u64;
    loop {
        let applied = controller.scroll_to(offset);
        print_frame(&controller, applied);
        if applied >= max {
            break;
        }
        offset += SCROLL_STEP;
    }

    let applied = controller.scroll_to_index(0, Align::Start);
    print_frame(&controller, applied);

    tracing::info!(
        allocated = controller.grid().pool().allocated(),
        displayed = controller.grid().displayed_len(),
        "done"
    );
    Ok(())
}

fn print_frame(controller: &GridController, offset: u64) {
    let cells: Vec<String> = controller
        .visible_cells()
        .map(|(index, cell)| {
            let x = controller
                .grid()
                .cell_frame(index)
                .map_or(0, |frame| frame.x);
            format!("[{:>2} @{x:>4}]", cell.text().unwrap_or("-"))
        })
        .collect();
    println!("offset={offset:>5} {}", cells.join(" "));
}
