//! statmake CLI library.

pub mod cli;
pub mod io;
pub mod parallel;
pub mod stat;

pub use stat::StatJob;
