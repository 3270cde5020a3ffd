//! Game rules: resolving a player's session, scoring guesses and turning
//! scores into something to show.
//!
//! - [`resolver`]: token → [`Session`](crate::session::Session)
//! - [`processor`]: raw guess → scored [`GuessRecord`](crate::session::GuessRecord)
//! - [`presenter`]: score → bar width and phrase

pub mod presenter;
pub mod processor;
pub mod resolver;

pub use presenter::{ScoreBand, ScoreDisplay, present};
pub use processor::{parse_guess, process_guess};
pub use resolver::resolve_session;
