//! Tool functions grouped by concern

pub mod content;
pub mod convert;
pub mod document;
