pub mod bus;
pub mod catalog;
pub mod center;
pub mod feed;
pub mod format;

pub use bus::{BusConfig, NotificationBus, Subscription};
