//! # biggie-base
//!
//! Structural atoms shared by every stage of the Big compiler:
//!
//! - [`Span`] — byte-offset source locations
//! - [`Interner`]/[`Name`] — string interning for O(1) name comparison
//! - [`diagnostic`] — the caret-and-underline error renderer
//! - [`suggest`] — edit-distance lookup for "did you mean" hints
//!
//! This crate knows nothing about Big syntax or I/O. It provides only the
//! generic infrastructure the language and compile crates build on.

pub mod diagnostic;
pub mod intern;
pub mod span;
pub mod suggest;

pub use intern::{Interner, Name};
pub use span::Span;
