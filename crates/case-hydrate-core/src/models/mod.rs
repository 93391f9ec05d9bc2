//! Domain models for the lookup store.

mod category;
mod lookup;

pub use category::*;
pub use lookup::*;
