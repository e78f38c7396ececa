//! Rating prompt decision engine for apprate
//!
//! This crate is the heart of apprate, containing:
//! - Prompt conditions (launch counts, whole days, terminal decisions)
//! - Response flow (star threshold routing, decision persistence)
//! - The engine facade the presentation layer talks to
//!
//! Decision state machine, per installation:
//! Undecided -> RemindLater -> (RemindLater | Rated | DeclinedPermanently | FeedbackGiven).
//! The last three are terminal and only a reset leaves them.

mod conditions;
mod engine;
mod events;
mod response;

pub use conditions::*;
pub use engine::*;
pub use events::*;
pub use response::*;
