pub mod builder;
pub mod generator;
pub mod generators;
pub mod registry;
pub mod rng;
pub mod weighted;
