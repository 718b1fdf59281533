pub mod calendar;
#[cfg(feature = "cli")]
pub mod cli;
pub mod constants;
pub mod deadline;
pub mod domain;
pub mod grid;
pub mod project;
pub mod storage;
