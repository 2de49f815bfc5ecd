//! Helper functions shared by loaders and templates

mod date;

pub use date::*;
