//! Report rendering for the console

pub mod console;

pub use console::ConsoleFormatter;
