use crate::*;

use crate::fenwick::Fenwick;
use alloc::vec::Vec;
use core::cell::Cell;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start))
    }
}

#[derive(Debug, Default)]
struct TestCell {
    index: Option<usize>,
    width: Option<u32>,
    reuse_count: usize,
}

impl GridCell for TestCell {
    fn prepare_for_reuse(&mut self) {
        self.index = None;
        self.reuse_count += 1;
    }

    fn fitting_size(&self, estimated: Size) -> Size {
        match self.width {
            Some(width) => Size::new(width, estimated.height),
            None => estimated,
        }
    }
}

struct Source {
    count: usize,
    id: ReuseId,
    widths: Option<fn(usize) -> u32>,
}

impl GridDataSource<TestCell> for Source {
    fn item_count(&self, _section: usize) -> usize {
        self.count
    }

    fn cell_for_index(&self, pool: &mut ReusePool<TestCell>, index: usize) -> CellHandle {
        let handle = pool.dequeue_id(self.id);
        let cell = pool.get_mut(handle).unwrap();
        cell.index = Some(index);
        cell.width = self.widths.map(|w| w(index));
        handle
    }
}

#[derive(Default)]
struct CountingDelegate {
    shown: Cell<usize>,
    hidden: Cell<usize>,
}

impl GridDelegate<TestCell> for CountingDelegate {
    fn will_display(&self, cell: &TestCell, index: usize) {
        assert_eq!(cell.index, Some(index));
        self.shown.set(self.shown.get() + 1);
    }

    fn did_end_displaying(&self, cell: &TestCell, index: usize) {
        assert_eq!(cell.index, Some(index));
        self.hidden.set(self.hidden.get() + 1);
    }
}

fn options(count: usize) -> GridLayoutOptions {
    GridLayoutOptions::new(count, Size::new(100, 100))
}

fn grid(count: usize) -> (CellGrid<TestCell>, Source) {
    let mut g = CellGrid::new(options(count));
    let id = g.register("cell", TestCell::default);
    g.layout_in(Frame::new(0, 0, 400, 120));
    (
        g,
        Source {
            count,
            id,
            widths: None,
        },
    )
}

fn displayed_indexes(g: &CellGrid<TestCell>) -> Vec<usize> {
    g.visible_cells().map(|(i, _)| i).collect()
}

#[test]
fn fenwick_matches_naive_prefix_sums() {
    let mut rng = Lcg::new(7);
    let mut sizes: Vec<u32> = (0..37).map(|_| rng.gen_range_u64(1, 50) as u32).collect();
    let spacing = 3;
    let mut tree = Fenwick::from_sizes(&sizes, spacing);

    for _ in 0..200 {
        let i = rng.gen_range_u64(0, sizes.len() as u64) as usize;
        let next = rng.gen_range_u64(1, 50) as u32;
        tree.add(i, next as i64 - sizes[i] as i64);
        sizes[i] = next;

        let mut acc = 0u64;
        for (j, &s) in sizes.iter().enumerate() {
            assert_eq!(tree.prefix_sum(j), acc);
            acc += s as u64;
            if j + 1 < sizes.len() {
                acc += spacing as u64;
            }
        }
        assert_eq!(tree.total(), acc);
    }
}

#[test]
fn fenwick_lower_bound_counts_items_ending_before_target() {
    let tree = Fenwick::from_sizes(&[100, 100, 100], 10);
    assert_eq!(tree.lower_bound(0), 0);
    assert_eq!(tree.lower_bound(109), 0);
    assert_eq!(tree.lower_bound(110), 1);
    assert_eq!(tree.lower_bound(219), 1);
    assert_eq!(tree.lower_bound(220), 2);
    assert_eq!(tree.lower_bound(10_000), 3);
}

#[test]
fn horizontal_layout_ranges_and_total_size() {
    let mut layout = FlowLayout::new(options(30));
    layout.set_viewport_size(Size::new(400, 120));

    assert_eq!(layout.axis(), Axis::Horizontal);
    assert_eq!(layout.total_size(), 30 * 100 + 29 * 10);
    assert_eq!(layout.max_scroll_offset(), 3290 - 400);

    assert_eq!(
        layout.visible_range(),
        VirtualRange {
            start_index: 0,
            end_index: 4
        }
    );
    assert_eq!(
        layout.virtual_range(),
        VirtualRange {
            start_index: 0,
            end_index: 5
        }
    );

    layout.set_scroll_offset(115);
    assert_eq!(
        layout.visible_range(),
        VirtualRange {
            start_index: 1,
            end_index: 5
        }
    );
    assert_eq!(layout.scroll_direction(), Some(ScrollDirection::Forward));

    layout.set_scroll_offset_clamped(u64::MAX);
    assert_eq!(layout.scroll_offset(), 2890);
    assert_eq!(layout.visible_range().end_index, 30);
    assert_eq!(layout.virtual_range().end_index, 30);
}

#[test]
fn empty_layout_has_no_ranges() {
    let mut layout = FlowLayout::new(options(0));
    layout.set_viewport_size(Size::new(400, 120));
    assert!(layout.visible_range().is_empty());
    assert_eq!(layout.index_at_offset(0), None);
    assert_eq!(layout.scroll_to_index_offset(5, Align::Start), 0);

    let mut no_viewport = FlowLayout::new(options(10));
    no_viewport.set_scroll_offset(0);
    assert!(no_viewport.virtual_range().is_empty());
}

#[test]
fn item_frames_are_centered_across_the_scroll_axis() {
    let mut layout = FlowLayout::new(options(30).with_insets(5, 5));
    layout.set_viewport_size(Size::new(400, 120));

    assert_eq!(layout.item_frame(0), Some(Frame::new(5, 10, 100, 100)));
    assert_eq!(layout.item_frame(2), Some(Frame::new(225, 10, 100, 100)));

    layout.set_scroll_offset(200);
    assert_eq!(layout.item_frame(0), Some(Frame::new(-195, 10, 100, 100)));
    assert_eq!(layout.item_frame(30), None);

    let mut vertical = FlowLayout::new(options(3).with_axis(Axis::Vertical));
    vertical.set_viewport_size(Size::new(300, 150));
    assert_eq!(vertical.item_frame(1), Some(Frame::new(100, 110, 100, 100)));
}

#[test]
fn measuring_moves_following_items() {
    let mut layout = FlowLayout::new(options(5));
    layout.set_viewport_size(Size::new(400, 120));

    assert!(!layout.is_measured(1));
    assert_eq!(layout.measure(1, Size::new(40, 60)), -60);
    assert!(layout.is_measured(1));
    assert_eq!(layout.item_size(1), Some(Size::new(40, 60)));
    assert_eq!(layout.item(2).unwrap().start, 110 + 50);
    assert_eq!(layout.item_frame(1).unwrap().y, 30);
    assert_eq!(layout.total_size(), 4 * 100 + 40 + 4 * 10);

    assert_eq!(layout.measure(1, Size::new(40, 60)), 0);
    assert_eq!(layout.measure(99, Size::new(1, 1)), 0);

    layout.reset_measurements();
    assert!(!layout.is_measured(1));
    assert_eq!(layout.item(2).unwrap().start, 220);
}

#[test]
fn scroll_to_index_offsets() {
    let mut layout = FlowLayout::new(options(30));
    layout.set_viewport_size(Size::new(400, 120));

    assert_eq!(layout.scroll_to_index_offset(3, Align::Start), 330);
    assert_eq!(layout.scroll_to_index_offset(3, Align::End), 30);
    assert_eq!(layout.scroll_to_index_offset(3, Align::Center), 180);
    assert_eq!(layout.scroll_to_index_offset(29, Align::Start), 2890);
    assert_eq!(layout.scroll_to_index_offset(1, Align::Auto), 0);

    layout.set_scroll_offset(1000);
    assert_eq!(layout.scroll_to_index_offset(10, Align::Auto), 1000);
    assert_eq!(layout.scroll_to_index_offset(2, Align::Auto), 220);
    assert_eq!(layout.scroll_to_index_offset(20, Align::Auto), 2200 + 100 - 400);
}

#[test]
fn container_placement() {
    let parent = Frame::new(0, 0, 375, 812);

    let fill = FlowLayout::new(options(1));
    assert_eq!(fill.container_frame(parent), parent);

    let centered = FlowLayout::new(
        options(1).with_placement(ContainerPlacement::Centered { extent: 120 }),
    );
    assert_eq!(centered.container_frame(parent), Frame::new(0, 346, 375, 120));

    let column = FlowLayout::new(
        options(1)
            .with_axis(Axis::Vertical)
            .with_placement(ContainerPlacement::Centered { extent: 75 }),
    );
    assert_eq!(column.container_frame(parent), Frame::new(150, 0, 75, 812));
}

#[test]
fn pool_allocates_then_reuses() {
    let mut pool = ReusePool::<TestCell>::new();
    assert_eq!(pool.dequeue("cell"), None);
    assert!(!pool.is_registered("cell"));

    let id = pool.register("cell", TestCell::default);
    assert_eq!(pool.reuse_id("cell"), Some(id));

    let a = pool.dequeue("cell").unwrap();
    let b = pool.dequeue_id(id);
    assert_ne!(a, b);
    assert_eq!(pool.allocated(), 2);
    assert_eq!(pool.in_use(), 2);
    assert_eq!(pool.identifier_of(a), Some("cell"));

    pool.get_mut(a).unwrap().index = Some(4);
    assert!(pool.enqueue(a));
    assert!(!pool.enqueue(a));
    assert!(pool.get(a).is_none());
    assert_eq!(pool.free_len("cell"), 1);

    let c = pool.dequeue("cell").unwrap();
    assert_eq!(c, a);
    assert_eq!(pool.allocated(), 2);
    let reused = pool.get(c).unwrap();
    assert_eq!(reused.index, None);
    assert_eq!(reused.reuse_count, 1);
}

#[test]
fn pool_keeps_identifiers_apart() {
    let mut pool = ReusePool::<TestCell>::new();
    let wide = pool.register("wide", || TestCell {
        width: Some(300),
        ..TestCell::default()
    });
    let plain = pool.register("plain", TestCell::default);
    assert_eq!(pool.register("plain", TestCell::default), plain);

    let w = pool.dequeue_id(wide);
    pool.enqueue(w);
    assert_eq!(pool.free_len("wide"), 1);
    assert_eq!(pool.free_len("plain"), 0);

    let p = pool.dequeue_id(plain);
    assert_ne!(p, w);
    assert_eq!(pool.get(p).unwrap().width, None);
    assert_eq!(pool.free_len("wide"), 1);
}

#[test]
fn grid_displays_the_virtual_range() {
    let (mut g, source) = grid(30);
    let delegate = CountingDelegate::default();
    g.reload_data(&source, &delegate);

    assert_eq!(displayed_indexes(&g), [0, 1, 2, 3, 4]);
    assert_eq!(delegate.shown.get(), 5);
    assert_eq!(g.pool().allocated(), 5);
    for (index, handle) in g.visible_cells() {
        assert_eq!(g.cell(handle).unwrap().index, Some(index));
    }
    assert_eq!(g.cell_frame(1), Some(Frame::new(110, 10, 100, 100)));

    g.scroll_to_offset(660, &source, &delegate);
    assert_eq!(displayed_indexes(&g), [5, 6, 7, 8, 9, 10]);
    assert_eq!(delegate.hidden.get(), 5);
    assert_eq!(g.pool().allocated(), 6);
    assert_eq!(g.cell_at(7).unwrap().index, Some(7));
    assert!(g.cell_at(0).is_none());
}

#[test]
fn grid_reuses_cells_across_a_full_sweep() {
    let (mut g, source) = grid(30);
    g.reload_data(&source, &());

    let mut max_seen = g.displayed_len();
    let mut offset = 0u64;
    while offset < g.layout().max_scroll_offset() + 200 {
        g.scroll_to_offset(offset, &source, &());
        max_seen = max_seen.max(g.displayed_len());
        offset += 37;
    }
    while offset > 0 {
        offset = offset.saturating_sub(53);
        g.scroll_to_offset(offset, &source, &());
        max_seen = max_seen.max(g.displayed_len());
    }

    assert_eq!(g.pool().allocated(), max_seen);
    assert!(
        g.visible_cells()
            .any(|(_, handle)| g.cell(handle).unwrap().reuse_count > 0)
    );
}

#[test]
fn grid_random_scrolls_keep_cells_in_sync() {
    let (mut g, source) = grid(30);
    g.reload_data(&source, &());

    let mut rng = Lcg::new(0xC0FFEE);
    for _ in 0..500 {
        let target = rng.gen_range_u64(0, 4000);
        let applied = g.scroll_to_offset(target, &source, &());
        assert_eq!(applied, target.min(g.layout().max_scroll_offset()));

        let range = g.layout().virtual_range();
        let expected: Vec<usize> = (range.start_index..range.end_index).collect();
        assert_eq!(displayed_indexes(&g), expected);
        for (index, handle) in g.visible_cells() {
            assert_eq!(g.cell(handle).unwrap().index, Some(index));
        }
        assert_eq!(g.pool().in_use(), g.displayed_len());
    }
}

#[test]
fn grid_applies_fitting_sizes() {
    let mut g = CellGrid::new(options(30));
    let id = g.register("cell", TestCell::default);
    g.layout_in(Frame::new(0, 0, 400, 120));
    let source = Source {
        count: 30,
        id,
        widths: Some(|i| 40 + (i as u32 % 3) * 10),
    };
    g.reload_data(&source, &());

    for (index, _) in g.visible_cells() {
        assert!(g.layout().is_measured(index));
        let expected = 40 + (index as u32 % 3) * 10;
        assert_eq!(g.layout().item_size(index), Some(Size::new(expected, 100)));
    }
    // Narrower cells pull more items into the viewport than the estimate predicted.
    let range = g.layout().virtual_range();
    assert!(range.end_index > 5);
    assert_eq!(displayed_indexes(&g).len(), range.len());
}

#[test]
fn reload_with_a_new_count_clamps_scrolling() {
    let (mut g, mut source) = grid(30);
    g.reload_data(&source, &());
    g.scroll_to_index(29, Align::End, &source, &());
    assert_eq!(g.layout().scroll_offset(), 2890);

    source.count = 3;
    let delegate = CountingDelegate::default();
    g.reload_data(&source, &delegate);
    assert_eq!(g.layout().scroll_offset(), 0);
    assert_eq!(displayed_indexes(&g), [0, 1, 2]);
    assert!(delegate.hidden.get() > 0);
}

#[test]
fn layout_in_resizes_the_viewport() {
    let mut g = CellGrid::<TestCell>::new(
        options(30).with_placement(ContainerPlacement::Centered { extent: 120 }),
    );
    g.layout_in(Frame::new(0, 0, 375, 812));
    assert_eq!(g.frame(), Frame::new(0, 346, 375, 120));
    assert_eq!(g.layout().viewport_size(), Size::new(375, 120));
}

#[test]
fn virtual_items_start_at_the_naive_offsets() {
    let mut rng = Lcg::new(11);
    let (inset_start, spacing) = (5u64, 4u64);
    let mut layout = FlowLayout::new(
        options(40)
            .with_insets(inset_start as u32, 7)
            .with_item_spacing(spacing as u32)
            .with_overscan(2),
    );
    layout.set_viewport_size(Size::new(400, 120));
    for _ in 0..25 {
        let index = rng.gen_range_u64(0, 40) as usize;
        let width = rng.gen_range_u64(20, 160) as u32;
        layout.measure(index, Size::new(width, 100));
    }

    let sizes: Vec<u32> = (0..40)
        .map(|i| layout.item_size(i).unwrap().width)
        .collect();
    let expected_start = |index: usize| -> u64 {
        inset_start + sizes[..index].iter().map(|&s| s as u64 + spacing).sum::<u64>()
    };

    for _ in 0..50 {
        layout.set_scroll_offset_clamped(rng.gen_range_u64(0, 6000));
        let range = layout.virtual_range();
        assert!(!range.is_empty());

        let mut seen = Vec::new();
        layout.for_each_virtual_item(|item| seen.push(item));
        assert_eq!(seen.len(), range.len());
        for (item, index) in seen.iter().zip(range.start_index..range.end_index) {
            assert_eq!(item.index, index);
            assert_eq!(item.start, expected_start(index));
            assert_eq!(item.size, sizes[index]);
            assert_eq!(layout.item(index), Some(*item));
        }
    }

    let last = 39;
    assert_eq!(
        layout.total_size(),
        expected_start(last) + sizes[last] as u64 + 7
    );
}

#[test]
fn overscan_and_spacing_changes_move_the_ranges() {
    let mut layout = FlowLayout::new(options(30));
    layout.set_viewport_size(Size::new(400, 120));
    layout.set_scroll_offset(1100);
    let visible = VirtualRange {
        start_index: 10,
        end_index: 14,
    };
    assert_eq!(layout.visible_range(), visible);
    assert_eq!(
        layout.virtual_range(),
        VirtualRange {
            start_index: 9,
            end_index: 15
        }
    );

    layout.set_overscan(3);
    assert_eq!(
        layout.virtual_range(),
        VirtualRange {
            start_index: 7,
            end_index: 17
        }
    );
    layout.set_overscan(0);
    assert_eq!(layout.virtual_range(), visible);

    layout.set_item_spacing(0);
    assert_eq!(layout.total_size(), 3000);
    assert_eq!(layout.item(3).unwrap().start, 300);
    assert_eq!(
        layout.visible_range(),
        VirtualRange {
            start_index: 11,
            end_index: 15
        }
    );

    let built = FlowLayout::new(options(30).with_item_spacing(0).with_overscan(0));
    assert_eq!(built.options(), layout.options());
    assert_eq!(built.total_size(), layout.total_size());
}
