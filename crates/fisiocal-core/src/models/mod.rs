//! Data models for clinic entities.
//!
//! - `Student`, `Slot`, `ModalityDetails`: the roster as served by the API
//! - `Physiotherapist`: used to filter the roster
//! - `CalendarEvent`: one projected occurrence of a group of students

pub mod calendar;
pub mod physiotherapist;
pub mod student;

pub use calendar::CalendarEvent;
pub use physiotherapist::Physiotherapist;
pub use student::{ModalityDetails, Slot, Student, CLINIC_CLOSING_HOUR, CLINIC_OPENING_HOUR};
