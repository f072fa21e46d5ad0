//! JavaScript runtime text, compiled in from the adjacent asset files.

/// Emitted before any compiled code; defines `println`.
pub const JS_PREAMBLE: &str = include_str!("../../assets/jsPreamble.js");

/// Emitted after all compiled code; invokes `main` when present.
pub const JS_POSTAMBLE: &str = include_str!("../../assets/jsPostamble.js");
