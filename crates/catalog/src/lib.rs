//! Pattern catalog: declarative descriptions of recurring Sky timers.
//!
//! The catalog is pure data. Each pattern declares its recurrence kind,
//! anchor time, interval, and (for rotating patterns) the per-cycle variant
//! data. Validation happens once at construction; the calculator can then
//! assume every pattern is well-formed.

pub mod catalog;
pub mod error;
pub mod pattern;

mod builtin;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use pattern::{
    Recurrence, RecurrencePattern, RotationSpec, ShardColor, Variant, VariantSelector,
    WindowOffsets,
};
