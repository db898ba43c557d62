//! Occurrence calculator: pure functions mapping (pattern, reference
//! instant) to concrete occurrence windows.
//!
//! Nothing here reads a clock. Every operation takes the reference instant
//! as a parameter and does all day-boundary arithmetic in the pattern's
//! declared timezone, which keeps results deterministic and concurrent
//! calls trivially safe.

pub mod calc;
pub mod next;
pub mod occurrence;

pub use calc::{occurrences_covering, OCCURRENCE_COUNT};
pub use next::{next_matching_occurrence, FoundOccurrence, NextOccurrence, VariantFilter};
pub use occurrence::{Occurrence, OccurrenceSet, SelectedVariant};
