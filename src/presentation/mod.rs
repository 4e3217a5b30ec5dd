// Presentation layer - HTTP surface and HTML rendering
pub mod app_state;
pub mod handlers;
pub mod heatmap;
pub mod page;
pub mod router;
