//! Instruction templates for the review pipeline stages

pub mod template;

pub use template::StagePrompts;
