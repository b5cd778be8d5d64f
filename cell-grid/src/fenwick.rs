use alloc::vec::Vec;

/// Prefix sums over per-item extents (item size plus trailing spacing).
///
/// `tree` is 1-indexed: `tree[i]` holds the sum of the `lsb(i)` extents ending at item `i - 1`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    tree: Vec<u64>,
    total: u64,
}

impl Fenwick {
    /// Builds the tree in `O(n)`. Every item but the last is followed by `spacing`.
    pub(crate) fn from_sizes(sizes: &[u32], spacing: u32) -> Self {
        let n = sizes.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        for (i, &size) in sizes.iter().enumerate() {
            let node = i + 1;
            let mut extent = size as u64;
            if node < n {
                extent = extent.saturating_add(spacing as u64);
            }
            total = total.saturating_add(extent);
            tree[node] = tree[node].saturating_add(extent);
            let parent = node + lsb(node);
            if parent <= n {
                tree[parent] = tree[parent].saturating_add(tree[node]);
            }
        }
        Self { tree, total }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n || delta == 0 {
            return;
        }
        self.total = apply_delta(self.total, delta);
        let mut node = index + 1;
        while node <= n {
            self.tree[node] = apply_delta(self.tree[node], delta);
            node += lsb(node);
        }
    }

    /// Sum of the first `count` extents.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut node = count.min(self.len());
        let mut sum = 0u64;
        while node > 0 {
            sum = sum.saturating_add(self.tree[node]);
            node &= node - 1;
        }
        sum
    }

    /// Number of leading items whose combined extent is `<= target`.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        let mut idx = 0usize;
        let mut step = highest_power_of_two_leq(n);
        while step != 0 {
            let next = idx + step;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            step >>= 1;
        }
        idx
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        debug_assert!(
            value >= delta.unsigned_abs(),
            "Fenwick underflow (value={value}, delta={delta})"
        );
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
