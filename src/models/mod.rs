pub mod block;
pub mod event;
pub mod notification;
pub mod obra;
pub mod stats;
