pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    load_urls_from_file, load_urls_from_source, parse_url_line, render_reports,
    settings_from_args,
};
