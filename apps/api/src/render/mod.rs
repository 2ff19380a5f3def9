// Report rendering. CPU-bound work must run inside tokio::task::spawn_blocking.

pub mod pdf;

pub use pdf::render_pdf;
