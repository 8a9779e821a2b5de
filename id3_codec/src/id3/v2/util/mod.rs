//! Utilities for working with ID3v2 data

pub mod bits;
pub(crate) mod pairs;
pub mod synchsafe;
pub mod upgrade;
