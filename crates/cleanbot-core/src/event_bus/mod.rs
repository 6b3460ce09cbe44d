//! # Event Bus Module
//!
//! Publish/subscribe channel between the designer, the scheduler and
//! whatever front end is attached. Publishers emit typed events without
//! knowing subscribers; subscribers filter by category.
//!
//! ```rust,ignore
//! use cleanbot_core::event_bus::{event_bus, AppEvent, EventCategory, EventFilter};
//!
//! let id = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Notice]),
//!     |event| {
//!         if let AppEvent::Notice(notice) = event {
//!             println!("{}", notice.message);
//!         }
//!     },
//! );
//! event_bus().unsubscribe(id);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
