use std::ops::Range;

// the contiguous slice of the global point index range one worker owns.
// partitions for ranks 0..workers are pairwise disjoint and cover
// [0, m) exactly
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Partition {
    start: usize,
    length: usize,
}

impl Partition {
    // splits m items over the given worker count; the first m % workers
    // ranks take one extra item, and the start offset skips first the
    // longer ranges then the shorter ones
    pub fn for_rank(m: usize, workers: usize, rank: usize) -> Partition {
        let base = m / workers;
        let remainder = m % workers;
        if rank < remainder {
            Partition {
                start: rank * (base + 1),
                length: base + 1,
            }
        } else {
            Partition {
                start: remainder * (base + 1) + (rank - remainder) * base,
                length: base,
            }
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    // one past the last owned index
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn test_even_split() {
        assert_eq!(Partition::for_rank(8, 4, 0).range(), 0..2);
        assert_eq!(Partition::for_rank(8, 4, 1).range(), 2..4);
        assert_eq!(Partition::for_rank(8, 4, 3).range(), 6..8);
    }

    #[test]
    fn test_remainder_goes_to_low_ranks() {
        // 10 over 4: lengths 3, 3, 2, 2
        assert_eq!(Partition::for_rank(10, 4, 0).range(), 0..3);
        assert_eq!(Partition::for_rank(10, 4, 1).range(), 3..6);
        assert_eq!(Partition::for_rank(10, 4, 2).range(), 6..8);
        assert_eq!(Partition::for_rank(10, 4, 3).range(), 8..10);
    }

    #[test]
    fn test_more_workers_than_points() {
        // surplus ranks receive an empty range past the end
        assert_eq!(Partition::for_rank(2, 4, 1).range(), 1..2);
        assert_eq!(Partition::for_rank(2, 4, 2).range(), 2..2);
        assert_eq!(Partition::for_rank(2, 4, 3).range(), 2..2);
    }
}
