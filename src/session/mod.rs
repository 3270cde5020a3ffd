//! Player sessions and their in-memory store.
//!
//! Each session ties a cookie token to one secret word and the guesses made
//! against it. Sessions live in memory only and are evicted after a period
//! of inactivity.
//!
//! # Architecture
//!
//! - [`Session`]: one player's game state
//! - [`SessionStore`]: thread-safe map of all live sessions
//!
//! # Example
//!
//! ```rust
//! use semantic_guess::services::SecretWord;
//! use semantic_guess::session::{GuessRecord, SessionStore};
//!
//! let store = SessionStore::new();
//! let secret = SecretWord { word: "chien".into(), category: "animaux".into() };
//! let session = store.insert_if_absent("token", secret);
//! session.record_guess(GuessRecord::new("chat", 0.8));
//!
//! assert_eq!(session.guess_count(), 1);
//! ```

mod store;

pub use store::{GuessRecord, Session, SessionStore};
