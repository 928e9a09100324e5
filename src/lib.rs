//! Small command line habit tracker. Every tracked weekday of a month gets a status such as
//! `yes`, `no` or `sick`, kept in a single JSON file, and the month can be printed as a report
//! with completion percentages.
//!

pub mod cli;
pub mod tracker;
pub mod utils;
