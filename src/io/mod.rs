//! Report directory persistence

pub mod report;
