//! Document renderers.
//!
//! - [`HtmlDocumentRenderer`] - Self-contained, print-ready HTML (A4 sheets)

pub mod html_renderer;

pub use html_renderer::HtmlDocumentRenderer;
