pub mod element;
pub mod events;
pub mod kind;

pub use element::{ElementHeader, ElementId, ElementType};
pub use events::{ElementEvent, ElementEventBroadcaster, ElementEventType};
pub use kind::{ParentKind, ParentKindSet, UnknownParentKind};
