//! HTML processing

mod sanitizer;

pub use sanitizer::HtmlSanitizer;
