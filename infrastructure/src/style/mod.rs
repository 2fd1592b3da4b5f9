//! Style-check tool

pub mod checker;

pub use checker::check_style;
