use std::fs::File;
use std::io::{BufReader, Read};

use crate::common::TrainingError;

// a dataset entry: integer coordinates plus the cluster it currently
// belongs to. the cluster field starts at 0 and only becomes meaningful
// after the first assignment pass
#[derive(Debug, PartialEq, Clone)]
pub struct Point {
    coords: Vec<i32>,
    cluster: i32,
}

impl Point {
    pub fn new(coords: Vec<i32>) -> Point {
        Point { coords, cluster: 0 }
    }

    pub fn coords(&self) -> &[i32] {
        &self.coords
    }

    pub fn cluster(&self) -> i32 {
        self.cluster
    }

    pub fn set_cluster(&mut self, id: i32) {
        self.cluster = id;
    }

    // squared euclidean distance to a centroid; differences are widened
    // to i64 before squaring so D * (max coordinate difference)^2 cannot
    // overflow for bounded coordinate magnitudes
    pub fn squared_distance(&self, centroid: &Centroid) -> i64 {
        let mut dist = 0i64;
        for (a, b) in self.coords.iter().zip(centroid.coords().iter()) {
            let diff = *a as i64 - *b as i64;
            dist += diff * diff;
        }
        dist
    }
}

// a cluster centre on the integer coordinate grid; unlike a Point it
// carries no assignment of its own
#[derive(Debug, PartialEq, Clone)]
pub struct Centroid {
    coords: Vec<i32>,
}

impl Centroid {
    pub fn new(coords: Vec<i32>) -> Centroid {
        Centroid { coords }
    }

    pub fn from_point(point: &Point) -> Centroid {
        Centroid { coords: point.coords().to_vec() }
    }

    pub fn coords(&self) -> &[i32] {
        &self.coords
    }

    // replaces the coordinates with the truncated integer mean of the
    // summed coordinates, keeping centroids on the integer grid
    pub(crate) fn set_to_mean(&mut self, sums: &[i64], count: i64) {
        for (coord, sum) in self.coords.iter_mut().zip(sums.iter()) {
            *coord = (*sum / count) as i32;
        }
    }
}

// parses exactly m points of the given dimension from whitespace
// separated integer fields; line structure is not significant
pub fn parse_points(text: &str, m: usize, dims: usize) -> Result<Vec<Point>, TrainingError> {
    let mut fields = text.split_whitespace();
    let mut points = Vec::with_capacity(m);
    for _ in 0..m {
        let mut coords = Vec::with_capacity(dims);
        for _ in 0..dims {
            let field = match fields.next() {
                Some(f) => f,
                None => return Err(TrainingError::InvalidData),
            };
            let value = match field.parse::<i32>() {
                Ok(v) => v,
                Err(_) => return Err(TrainingError::InvalidData),
            };
            coords.push(value);
        }
        points.push(Point::new(coords));
    }
    return Ok(points);
}

// reads the full dataset from a text file
// file: the opened dataset file
// m: the number of points the file must contain
// dims: the dimension of every point
// return: the points, or an error for unreadable or short data
pub fn points_from_file(file: &File, m: usize, dims: usize) -> Result<Vec<Point>, TrainingError> {
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    if reader.read_to_string(&mut contents).is_err() {
        return Err(TrainingError::FileReadFailed);
    }
    return parse_points(&contents, m, dims);
}

#[cfg(test)]
mod tests {
    use super::{parse_points, Centroid, Point};
    use crate::common::TrainingError;

    #[test]
    fn test_parse_points() {
        // test a plain dataset
        let expected = vec![Point::new(vec![1, 2]), Point::new(vec![-3, 4])];
        let actual = parse_points("1 2\n-3 4\n", 2, 2);
        assert_eq!(Ok(expected), actual, "parse_points failed: plain dataset");

        // test that line breaks are not significant
        let expected = vec![Point::new(vec![1, 2]), Point::new(vec![3, 4])];
        let actual = parse_points("1 2 3 4", 2, 2);
        assert_eq!(Ok(expected), actual, "parse_points failed: single line");

        // test malformed fields
        let actual = parse_points("1 abc", 1, 2);
        assert_eq!(Err(TrainingError::InvalidData), actual, "parse_points failed: malformed");

        // test short data
        let actual = parse_points("1 2 3", 2, 2);
        assert_eq!(Err(TrainingError::InvalidData), actual, "parse_points failed: short data");
    }

    #[test]
    fn test_squared_distance() {
        let point = Point::new(vec![1, 2]);
        let centroid = Centroid::new(vec![4, 6]);
        assert_eq!(25, point.squared_distance(&centroid));

        // distances must survive coordinates a plain i32 product would not
        let point = Point::new(vec![1_000_000, 1_000_000]);
        let centroid = Centroid::new(vec![-1_000_000, -1_000_000]);
        assert_eq!(8_000_000_000_000, point.squared_distance(&centroid));
    }

    #[test]
    fn test_set_to_mean() {
        let mut centroid = Centroid::new(vec![0, 0]);
        // truncating division, not rounding
        centroid.set_to_mean(&[21, -21], 2);
        assert_eq!(&[10, -10], centroid.coords());
    }
}
