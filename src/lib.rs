//! Library crate for userdesk.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote user service client and wire model (`api`)
//! - Application state and update loop (`app`)
//! - Error types (`error`)
//! - Centralized user store with subscribe/notify (`store`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdesk` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod store;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// The wire model and the service seam shared across the crate.
pub use api::{Address, User, UserService};
/// The error taxonomy for remote calls.
pub use error::ApiError;
