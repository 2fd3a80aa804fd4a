//! Terminal pages.

pub mod assistant;
pub mod banner;
pub mod form;
pub mod input;
pub mod narration;
pub mod render;
pub mod shell;

pub use banner::{Banner, Reporter, TerminalReporter};
pub use render::{render_itinerary, timeline_labels};
