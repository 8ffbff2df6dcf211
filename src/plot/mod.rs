//! Terminal plots.

pub mod ascii;

pub use ascii::render_history_plot;
