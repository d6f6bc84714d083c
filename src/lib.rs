//! # Solgrid
//!
//! A terminal gallery for Mars rover photos.
//!
//! ## Architecture
//!
//! ```text
//! Key press → FeedMachine → FetchRequest → FetchWorker → PhotoFetcher
//!                 ↑                                           │
//!                 └────────── FeedMessage::Completed ─────────┘
//! ```
//!
//! - [`fetcher`]: HTTP client for the rover photo and manifest endpoints
//! - [`feed`]: Paginated feed state machine and its background worker
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse Curiosity, sol 1000
//! solgrid
//!
//! # Start somewhere else
//! solgrid tui --rover spirit --sol 42
//!
//! # Print two pages of photos
//! solgrid photos --rover curiosity --sol 1000 --pages 2
//!
//! # Recent sols with photos
//! solgrid manifest --rover perseverance
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct holds the loaded config and
/// the shared HTTP client.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/solgrid/config.toml`, supporting:
/// - API base URL, key and timeout
/// - Startup rover and sol
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Command-line interface using clap.
///
/// - `tui [--rover] [--sol]` - Launch the gallery (default)
/// - `photos` - Print photos for a rover and sol
/// - `manifest` - Print recent sols from the mission manifest
pub mod cli;

/// Core domain models.
///
/// - [`Rover`](domain::Rover): The four supported rovers
/// - [`Photo`](domain::Photo): One image with camera and rover metadata
/// - [`FeedQuery`](domain::FeedQuery): Rover and sol being browsed
/// - [`Manifest`](domain::Manifest): Per-rover mission summary
pub mod domain;

/// Feed state machine.
pub mod feed;

/// Rover photo API access.
///
/// - [`PhotoFetcher`](fetcher::PhotoFetcher): Async trait for page fetches
/// - [`HttpPhotoClient`](fetcher::HttpPhotoClient): reqwest-based implementation
pub mod fetcher;

/// Terminal user interface.
///
/// Header with rover and sol selectors, a photo card grid over a drifting
/// starfield, and a detail view for the selected photo.
///
/// Keybindings: hjkl/arrows move, Tab switches rover, e edits the sol,
/// Enter opens a photo, n loads more, r retries, q quits.
pub mod tui;
