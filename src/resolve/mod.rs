//! Free-text entity resolution
//!
//! Turns user-typed tokens (inventory codes, picker labels) into identifiers.

pub mod catalog;
pub mod normalize;
pub mod resolver;
pub mod typeahead;

pub use catalog::{CatalogIndex, Lookup};
pub use normalize::normalize;
pub use resolver::{EntityResolver, Target};
pub use typeahead::{SearchOutcome, Typeahead};
