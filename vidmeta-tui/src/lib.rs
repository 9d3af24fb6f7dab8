//! Terminal page for the extractor: ratatui rendering of a [`vidmeta_view::PageState`].
mod app;
mod feeders;
mod input;
mod styles;
mod view;

pub use app::{Action, App, TuiMsg, run};
pub use view::{draw, render};
