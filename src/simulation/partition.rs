use std::ops::Range;

/// Fixed assignment of bodies to workers for the lifetime of a run.
///
/// Worker `w` of `W` owns the contiguous range `[w·N/W, (w+1)·N/W)`. Ranges are
/// disjoint, ordered, and cover `0..N`; some are empty when `W > N`.
///
/// # Examples
///
/// ```
/// use rs_barnes_hut::simulation::StaticPartition;
///
/// let partition = StaticPartition::contiguous(10, 3);
/// assert_eq!(partition.range(0), 0..3);
/// assert_eq!(partition.range(1), 3..6);
/// assert_eq!(partition.range(2), 6..10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPartition {
    ranges: Vec<Range<usize>>,
}

impl StaticPartition {
    pub fn contiguous(body_count: usize, workers: usize) -> Self {
        let workers = workers.max(1);
        let ranges = (0..workers)
            .map(|w| (w * body_count / workers)..((w + 1) * body_count / workers))
            .collect();
        Self { ranges }
    }

    pub fn workers(&self) -> usize {
        self.ranges.len()
    }

    pub fn range(&self, worker: usize) -> Range<usize> {
        self.ranges[worker].clone()
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Worker that owns body `index`.
    pub fn owner_of(&self, index: usize) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(&index))
    }

    /// Splits `items` into one disjoint mutable slice per worker, in worker order.
    ///
    /// `items` must have the length the partition was built for.
    pub fn split_mut<'a, T>(&self, items: &'a mut [T]) -> Vec<&'a mut [T]> {
        let mut rest = items;
        self.ranges
            .iter()
            .map(|r| {
                let (head, tail) = std::mem::take(&mut rest).split_at_mut(r.len());
                rest = tail;
                head
            })
            .collect()
    }
}
