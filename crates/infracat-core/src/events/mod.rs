//! Element change events.
//!
//! Catalog backends publish an [`ElementEvent`] after every successful
//! mutation. Subscribers (the discovery listener among them) receive events
//! through an [`ElementEventBroadcaster`], a thin wrapper over a tokio
//! broadcast channel.
//!
//! ```text
//!   catalog mutation ──▶ ElementEventBroadcaster ──▶ subscriber 1
//!                                              └──▶ subscriber 2
//! ```

pub mod broadcaster;
pub mod types;

pub use broadcaster::ElementEventBroadcaster;
pub use types::{ElementEvent, ElementEventType};
