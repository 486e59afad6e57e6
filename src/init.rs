use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::point::{Centroid, Point};

// selects k initial centroids by shuffling the point indices with a
// seeded generator and copying the first k points' coordinates. the
// same seed yields the same selection, and every rank holds the full
// dataset, so all ranks derive identical starting centroids with no
// communication
pub fn choose_initial_centroids(points: &[Point], k: usize, seed: u64) -> Vec<Centroid> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    let mut generator = StdRng::seed_from_u64(seed);
    for i in 0..indices.len() {
        let j = generator.gen_range(0, indices.len());
        indices.swap(i, j);
    }
    indices
        .iter()
        .take(k)
        .map(|&i| Centroid::from_point(&points[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::choose_initial_centroids;
    use crate::point::Point;

    fn sample_points() -> Vec<Point> {
        (0..10).map(|i| Point::new(vec![i, -i])).collect()
    }

    #[test]
    fn test_selection_is_deterministic() {
        let points = sample_points();
        let first = choose_initial_centroids(&points, 4, 42);
        let second = choose_initial_centroids(&points, 4, 42);
        assert_eq!(first, second);
    }

    #[test]
    fn test_centroids_are_distinct_points() {
        let points = sample_points();
        let centroids = choose_initial_centroids(&points, 10, 7);
        assert_eq!(10, centroids.len());
        // a shuffle selects every point exactly once at k = m
        for point in points.iter() {
            assert!(centroids.iter().any(|c| c.coords() == point.coords()));
        }
    }
}
