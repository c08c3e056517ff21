//! Logging infrastructure: structured room publication logging.
//!
//! Provides [`JsonlRoomPublisher`], a JSONL file writer that implements
//! the [`RoomPublisher`](tablepick_application::RoomPublisher) port.

mod jsonl_publisher;

pub use jsonl_publisher::JsonlRoomPublisher;
