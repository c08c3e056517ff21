//! Group rooms: membership, voting, and the final decision
//!
//! A [`Room`] is a pure reducer over [`RoomEvent`]s. The application layer
//! owns one single-writer actor per room that feeds it events in order and
//! performs the returned [`RoomEffect`]s.

pub mod entities;
pub mod event;
#[allow(clippy::module_inception)]
pub mod room;
pub mod tally;

pub use entities::{Decision, DecisionSource, MemberId, RoomCode, RoomPhase, RoomSummary, RoomView};
pub use event::{RoomEffect, RoomEvent, RoomRejection};
pub use room::Room;
pub use tally::{Tally, TallyEntry};
