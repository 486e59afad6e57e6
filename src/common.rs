// fatal configuration problems; every rank checks these identically
// before the first collective call so no rank can hang in a
// half-started protocol
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidPointCount,
    InvalidDimensions,
    InvalidClusterCount,
    InvalidIterationCount,
    TooManyClusters,
}

#[derive(Debug, PartialEq)]
pub enum TrainingError {
    InvalidData,

    FileReadFailed,
}

// a collective call that cannot complete; reported instead of the
// indefinite hang a mismatched reduction would otherwise produce
#[derive(Debug, PartialEq)]
pub enum CommError {
    ProtocolViolation,
}
