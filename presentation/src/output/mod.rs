//! Output formatting and response panels

pub mod console;
pub mod formatter;
pub mod json;
pub mod panel;
