//! Photo feed: pagination state and the machine that drives it.
//!
//! ```text
//! FeedMessage → FeedMachine::update → Option<FetchRequest> → FetchWorker
//!      ↑                                                         │
//!      └──────────────── FeedMessage::Completed ─────────────────┘
//! ```

pub mod machine;
pub mod state;
pub mod worker;

pub use machine::{FeedMachine, FeedMessage, FetchRequest};
pub use state::{FeedPhase, FeedState, FETCH_FAILED_MESSAGE, NO_PHOTOS_MESSAGE};
pub use worker::FetchWorker;
