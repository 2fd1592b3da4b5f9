//! Local diff source for offline review targets

pub mod local;

pub use local::{parse_diff_stats, DiffFileStat, LocalDiffSource};
