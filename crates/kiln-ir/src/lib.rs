pub mod lift;
pub mod program;
pub mod types;
