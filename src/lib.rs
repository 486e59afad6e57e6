pub mod collectives;
pub mod common;
pub mod init;
pub mod kmeans;
pub mod partition;
pub mod point;
