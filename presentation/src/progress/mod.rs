//! Progress reporting for review runs

pub mod reporter;

pub use reporter::ConsoleProgress;
