//! View controller for the video metadata page.
//!
//! The controller owns a [`RenderTarget`] (the page) and turns user actions
//! into writes on it: validate and submit a URL, render the result or the
//! error, reset. The network call itself sits behind [`ExtractBackend`], so the
//! same controller drives the terminal UI, the one-shot CLI and the tests.
//!
//! ```
//! use vidmeta_view::{PageState, Slot, ViewController, ViewOptions};
//!
//! let mut view = ViewController::new(PageState::default(), ViewOptions::default());
//! assert!(view.begin("   ").is_none());
//! assert_eq!(view.target().error_text(), "Please enter a valid YouTube URL.");
//! assert!(!view.target().details_visible());
//! assert_eq!(view.target().slot(Slot::Title), "");
//! ```
pub mod backend;
pub mod controller;
pub mod date;
pub mod page;
pub mod render;

pub use backend::{ExtractBackend, ExtractError, HttpBackend};
pub use controller::{PendingRequest, Ticket, ViewController, ViewOptions};
pub use page::PageState;
pub use render::{RenderTarget, Slot};
pub use vidmeta_common::ExtractionResult;
