//! Review target identification: PR locators and local diff paths.

pub mod locator;

pub use locator::{PrLocator, ReviewTarget, TargetError};
