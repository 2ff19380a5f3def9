// Report layout: static font metrics, greedy word wrap, A4 pagination.

pub mod encoding;
pub mod font_metrics;
pub mod page;
pub mod wrap;

pub use page::{default_page_config, PageConfig};
