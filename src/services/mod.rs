//! Core services: severity rollup, suite tree, history linearization,
//! artifact relocation, counters, skip merging and the merge engine

pub mod engine;
pub mod linearize;
pub mod merge;
pub mod relocate;
pub mod severity;
pub mod skips;
pub mod stats;
pub mod tree;
