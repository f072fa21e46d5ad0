//! String interning.
//!
//! Identifier and literal text flows through every compiler stage: scanner,
//! parser, binder, emitters. Interning stores each unique string once and
//! hands out integer [`Name`] handles, so name equality during scope lookup
//! is an integer compare and tokens stay `Copy`-sized.
//!
//! ```
//! use biggie_base::Interner;
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("main");
//! let b = interner.intern("main");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), "main");
//! ```

use std::collections::HashMap;

/// A lightweight handle to an interned string.
///
/// `Name`s are `Copy`, compare in O(1), and hash as integers. Use
/// [`Interner::resolve`] to get the text back.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    /// The empty string, always at index 0.
    pub const EMPTY: Name = Name(0);

    /// Internal index of this name, for dense side tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Stores each unique string once and maps it to a [`Name`].
pub struct Interner {
    map: HashMap<String, Name>,
    strings: Vec<String>,
}

impl Interner {
    /// Creates an interner with only the empty string pre-interned.
    pub fn new() -> Self {
        Interner {
            map: HashMap::new(),
            strings: vec![String::new()],
        }
    }

    /// Interns a string, returning its handle. Interning the same text twice
    /// returns the same handle.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.map.get(text) {
            return name;
        }
        let name = Name(self.strings.len() as u32);
        self.strings.push(text.to_string());
        self.map.insert(text.to_string(), name);
        name
    }

    /// Returns the text for `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` was not created by this interner.
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.0 as usize]
    }

    /// Looks up existing text without interning it.
    pub fn lookup(&self, text: &str) -> Option<Name> {
        self.map.get(text).copied()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if only the empty string is present.
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_name() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern("x"), interner.intern("x"));
    }

    #[test]
    fn different_text_different_name() {
        let mut interner = Interner::new();
        assert_ne!(interner.intern("x"), interner.intern("y"));
    }

    #[test]
    fn resolve_round_trips() {
        let mut interner = Interner::new();
        let name = interner.intern("println");
        assert_eq!(interner.resolve(name), "println");
    }

    #[test]
    fn lookup_does_not_intern() {
        let mut interner = Interner::new();
        assert_eq!(interner.lookup("missing"), None);
        let name = interner.intern("present");
        assert_eq!(interner.lookup("present"), Some(name));
    }

    #[test]
    fn empty_name_is_reserved() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert!(interner.is_empty());
    }
}
