pub mod local;
pub mod mpi;

use crate::common::CommError;

// the collective communication capability the clustering core needs:
// the worker topology plus the two element-wise all-reduce shapes used
// each iteration. every operation blocks until all workers in the run
// have issued the matching call, and returns the identical combined
// vector to every caller
pub trait Collectives {
    // this worker's 0-indexed rank
    fn rank(&self) -> usize;

    // the number of workers in the run
    fn size(&self) -> usize;

    // element-wise maximum all-reduce, in place
    // buf: this worker's contribution, replaced with the combined result
    fn reduce_max(&self, buf: &mut [i32]) -> Result<(), CommError>;

    // element-wise sum all-reduce over a wide-integer vector, in place
    // buf: this worker's contribution, replaced with the combined result
    fn reduce_sum_wide(&self, buf: &mut [i64]) -> Result<(), CommError>;

    // element-wise sum all-reduce, in place
    // buf: this worker's contribution, replaced with the combined result
    fn reduce_sum(&self, buf: &mut [i32]) -> Result<(), CommError>;
}
