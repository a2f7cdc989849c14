//! Query system for analyzed strings
//!
//! Structured parameters and free text both become [`FilterCriteria`], which
//! [`translate`] turns into the [`RecordPredicate`] that stores execute.

mod criteria;
mod natural;
mod params;
mod translate;
mod types;

pub use criteria::FilterCriteria;
pub use natural::parse_natural_language;
pub use params::FilterParams;
pub use translate::{case_variants, translate, Condition, RecordPredicate};
pub use types::{InterpretedQuery, QueryError, QueryResult};
