//! UI Module - terminal output for relpub
//!
//! ```text
//! ┌─────────────┐
//! │  dist cmd   │
//! └──────┬──────┘
//!        │ reports through
//!        ▼
//! ┌─────────────┐        ┌─────────────┐
//! │   Output    │ spawns │    Actor    │  upload progress bar
//! └──────┬──────┘───────▶└──────┬──────┘
//!        │ styles with          │ draws with
//!        ▼                      ▼
//! ┌─────────────┐        ┌─────────────┐
//! │    Theme    │        │  Progress   │  counters, bar, ETA, speed
//! └─────────────┘        └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`theme`] - Icons and bar geometry
//! - [`progress`] - Pure progress state and formatting
//! - [`actor`] - Render thread behind the progress bar
//! - [`output`] - Public API for commands to use

pub mod actor;
pub mod output;
pub mod progress;
pub mod theme;

// Re-export main types for convenience
pub use actor::TerminalProgress;
pub use output::Output;
pub use theme::Theme;
