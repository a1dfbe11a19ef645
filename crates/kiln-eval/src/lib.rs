pub mod aspects;
pub mod edges;
pub mod outcome;
