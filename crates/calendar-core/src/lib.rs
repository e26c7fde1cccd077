// Core calendar abstractions
//
// This crate defines the Event entity, the half-open TimeRange with its
// overlap predicate, input validation for writes, and the EventError
// taxonomy. It has no dependency on storage or transport.

pub mod error;
pub mod event;
pub mod time_range;
pub mod timestamp;

pub use error::{EventError, Result};
pub use event::{Event, EventFields, EventPatch, EventWrite, OverlapWarning};
pub use time_range::TimeRange;
pub use timestamp::parse_timestamp;
