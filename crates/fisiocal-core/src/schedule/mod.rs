//! Weekly schedule projection.
//!
//! Students book recurring weekly slots (weekday + hour). The projector
//! turns those slots into concrete calendar events, one per occupied
//! date/hour, from the Monday of the current week through the end of the
//! current month. Students sharing a slot are grouped into one event.
//!
//! Projection is pure: it never reads the clock or touches the network.
//! Callers pass the reference date and an already-fetched roster.

pub mod error;
pub mod projector;
pub mod window;

pub use error::SlotError;
pub use projector::{default_title, project, Projector, DEFAULT_EVENT_COLOR};
pub use window::ProjectionWindow;
