//! # Core Application Logic
//!
//! This module contains Parley's conversation logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Transcript (data)    │
//!                    │  • Controller (submit)  │
//!                    │  • Scheduler (later)    │
//!                    │                         │
//!                    │  No terminal. No I/O.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │   Plain    │
//!             │  Adapter   │          │ line mode  │
//!             │ (ratatui)  │          │  (stdin)   │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`transcript`]: append-only message history with change notifications
//! - [`controller`]: the submit protocol and deferred replies
//! - [`scheduler`]: deadline-ordered queue on tokio's clock
//! - [`responder`]: how a reply is produced
//! - [`input`]: where submitted text comes from
//! - [`action`]: user intents and the `update()` reducer
//! - [`config`]: layered settings

pub mod action;
pub mod config;
pub mod controller;
pub mod input;
pub mod responder;
pub mod scheduler;
pub mod transcript;
