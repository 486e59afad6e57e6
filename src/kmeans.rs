use crate::collectives::Collectives;
use crate::common::{CommError, ConfigError};
use crate::partition::Partition;
use crate::point::{Centroid, Point};

// one SPMD worker's view of a distributed k-means run. every worker
// holds the full point set but assigns only its own partition; the
// merged view is rebuilt each iteration through two collective
// reductions, so the final centroids are identical on every rank and
// independent of the worker count
pub struct DistributedKMeans<C: Collectives> {
    comm: C,
    dims: usize,
    k: usize,
    iterations: usize,
    partition: Partition,
    // the global assignment vector; only this worker's partition holds
    // authoritative values before reconciliation, the rest stays at the
    // zero baseline
    assignments: Vec<i32>,
    // per-cluster coordinate sums (k * dims) and point counts (k);
    // reused across iterations, zeroed before each assignment pass
    cluster_sums: Vec<i64>,
    cluster_counts: Vec<i32>,
}

impl<C: Collectives> DistributedKMeans<C> {
    // validates the run configuration and binds the working buffers.
    // every rank receives the same m, dims, k and iteration count, so
    // this check passes or fails identically everywhere before any
    // collective call is issued
    pub fn new(
        comm: C,
        m: usize,
        dims: usize,
        k: usize,
        iterations: usize,
    ) -> Result<DistributedKMeans<C>, ConfigError> {
        if m == 0 {
            return Err(ConfigError::InvalidPointCount);
        }
        if dims == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if k == 0 {
            return Err(ConfigError::InvalidClusterCount);
        }
        if iterations == 0 {
            return Err(ConfigError::InvalidIterationCount);
        }
        if k > m {
            return Err(ConfigError::TooManyClusters);
        }
        let partition = Partition::for_rank(m, comm.size(), comm.rank());
        Ok(DistributedKMeans {
            comm,
            dims,
            k,
            iterations,
            partition,
            assignments: vec![0; m],
            cluster_sums: vec![0; k * dims],
            cluster_counts: vec![0; k],
        })
    }

    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    // the globally summed per-cluster point counts from the most recent
    // iteration
    pub fn counts(&self) -> &[i32] {
        &self.cluster_counts
    }

    // runs the configured number of iterations; there is no convergence
    // check, so every rank performs the same number of collective calls
    pub fn train(
        &mut self,
        points: &mut [Point],
        centroids: &mut [Centroid],
    ) -> Result<(), CommError> {
        for _ in 0..self.iterations {
            self.run_iteration(points, centroids)?;
        }
        Ok(())
    }

    // one assign -> reconcile -> aggregate -> reconcile -> update pass,
    // mutating points and centroids in place. centroids are identical on
    // every rank afterwards
    pub fn run_iteration(
        &mut self,
        points: &mut [Point],
        centroids: &mut [Centroid],
    ) -> Result<(), CommError> {
        debug_assert_eq!(points.len(), self.assignments.len());
        debug_assert_eq!(centroids.len(), self.k);

        // fresh accumulators for this round
        for slot in self.assignments.iter_mut() {
            *slot = 0;
        }
        for sum in self.cluster_sums.iter_mut() {
            *sum = 0;
        }
        for count in self.cluster_counts.iter_mut() {
            *count = 0;
        }

        self.assign_owned(points, centroids);
        self.comm.reduce_max(&mut self.assignments)?;
        self.apply_merged_assignments(points);
        self.aggregate_owned(points);
        self.comm.reduce_sum_wide(&mut self.cluster_sums)?;
        self.comm.reduce_sum(&mut self.cluster_counts)?;
        self.update_centroids(centroids);
        Ok(())
    }

    // assigns every point in the owned partition to its nearest
    // centroid. the strict less-than keeps the first minimum, so a tie
    // always goes to the lower-indexed centroid
    fn assign_owned(&mut self, points: &mut [Point], centroids: &[Centroid]) {
        for i in self.partition.range() {
            let mut best_dist = i64::MAX;
            let mut best_cluster = 0;
            for (j, centroid) in centroids.iter().enumerate() {
                let dist = points[i].squared_distance(centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best_cluster = j as i32;
                }
            }
            points[i].set_cluster(best_cluster);
            self.assignments[i] = best_cluster;
        }
    }

    // copies the max-merged assignments into the points outside the
    // owned partition; inside it the values are already correct. the
    // max-combine over the zero baseline works because only the owning
    // rank ever writes a given index, but it cannot distinguish "no
    // contribution" from a genuine assignment to cluster 0 (kept from
    // the reference protocol; a corrected design would use a -1
    // sentinel with a reduction that tolerates it)
    fn apply_merged_assignments(&self, points: &mut [Point]) {
        for i in 0..self.partition.start() {
            points[i].set_cluster(self.assignments[i]);
        }
        for i in self.partition.end()..points.len() {
            points[i].set_cluster(self.assignments[i]);
        }
    }

    // accumulates counts and coordinate sums over the owned partition
    // only; the collective sum merges the other partitions' shares
    fn aggregate_owned(&mut self, points: &[Point]) {
        for i in self.partition.range() {
            let cluster = points[i].cluster() as usize;
            self.cluster_counts[cluster] += 1;
            let sums = &mut self.cluster_sums[cluster * self.dims..(cluster + 1) * self.dims];
            for (sum, coord) in sums.iter_mut().zip(points[i].coords().iter()) {
                *sum += *coord as i64;
            }
        }
    }

    // moves each centroid to the truncated integer mean of its assigned
    // points; a cluster that received no points keeps its previous
    // coordinates, with no reseeding
    fn update_centroids(&self, centroids: &mut [Centroid]) {
        for (i, centroid) in centroids.iter_mut().enumerate() {
            let count = self.cluster_counts[i] as i64;
            if count > 0 {
                let sums = &self.cluster_sums[i * self.dims..(i + 1) * self.dims];
                centroid.set_to_mean(sums, count);
            }
        }
    }
}

// the sum of all centroid coordinates, used to verify that separate
// runs produced the same result
pub fn checksum(centroids: &[Centroid]) -> i64 {
    let mut total = 0i64;
    for centroid in centroids {
        for coord in centroid.coords() {
            total += *coord as i64;
        }
    }
    total
}
