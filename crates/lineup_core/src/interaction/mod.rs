//! Pointer interaction over the field.
//!
//! `DragController` repositions starters; `PlaceFromList` drops bench players
//! onto the field. Neither keeps listeners alive outside an active gesture.

pub mod drag;
pub mod listeners;
pub mod place;

pub use drag::{CursorStyle, DragController, DragPhase};
pub use listeners::{ListenerGuard, ListenerKind, ListenerRegistry};
pub use place::PlaceFromList;
