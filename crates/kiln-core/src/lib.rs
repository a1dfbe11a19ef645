pub mod fuzzer;
pub mod runner;
