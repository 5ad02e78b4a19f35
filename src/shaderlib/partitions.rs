//! Set-partition enumeration for the chain-rule generator
//!
//! Enumerates every partition of {1..n} exactly once via the canonical
//! restricted-growth sequence: element `i` carries the 1-based index of the
//! group it belongs to, and a group index may exceed the maximum of the
//! prefix by at most one. The successor function backtracks iteratively, so
//! enumeration depth is independent of the call stack and testable in
//! isolation against Bell numbers.
//!
//! Author: Moroya Sakamoto

/// Advance `partition` to the next restricted-growth sequence.
///
/// `max[i]` tracks the largest group index used before position `i`. Both
/// slices must have been initialized to the first partition (all elements in
/// group 1: `partition` all 1, `max` all 1 except `max[0] = 0`). Returns
/// false when the enumeration is exhausted.
pub fn next_partition(partition: &mut [usize], max: &mut [usize]) -> bool {
    for i in (1..partition.len()).rev() {
        if partition[i] <= max[i] {
            partition[i] += 1;
            for j in i + 1..partition.len() {
                partition[j] = 1;
                max[j] = max[j - 1].max(partition[j - 1]);
            }
            return true;
        }
    }
    false
}

/// Iterator over all set partitions of {1..n}.
///
/// Yields each partition as its restricted-growth sequence together with the
/// number of groups. For n = 0 a single empty partition is produced.
pub struct SetPartitions {
    partition: Vec<usize>,
    max: Vec<usize>,
    exhausted: bool,
    started: bool,
}

impl SetPartitions {
    /// Enumeration over partitions of an `n`-element set.
    pub fn new(n: usize) -> Self {
        let partition = vec![1; n];
        let mut max = vec![1; n];
        if n > 0 {
            max[0] = 0;
        }
        SetPartitions {
            partition,
            max,
            exhausted: false,
            started: false,
        }
    }

    /// Number of groups in the current partition.
    fn group_count(&self) -> usize {
        match self.partition.last() {
            Some(&last) => last.max(*self.max.last().expect("same length")),
            None => 0,
        }
    }
}

impl Iterator for SetPartitions {
    type Item = (Vec<usize>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.started {
            if self.partition.is_empty()
                || !next_partition(&mut self.partition, &mut self.max)
            {
                self.exhausted = true;
                return None;
            }
        }
        self.started = true;
        Some((self.partition.clone(), self.group_count()))
    }
}
