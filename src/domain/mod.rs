pub mod filter;
pub mod model;

pub use filter::{DocumentFilter, TextMatch};
