//! Code emission.
//!
//! Four independent backends walk a bound, lowered [`SourceFile`] and write
//! target text into an [`EmitSink`]. The walks share their shape but not
//! their code: each backend is one file, deliberately free of shared
//! abstraction so it can be edited without touching the others.
//!
//! Emission never fails: a construct a backend does not support becomes a
//! machine-readable `ERROR: Unexpected node <kind>` comment in the output,
//! and the walk continues.

pub mod c;
pub mod cpp;
pub mod js;
mod js_runtime;
pub mod wat;

use std::fmt;

use biggie_base::Interner;
use biggie_language::ast::SourceFile;

/// Output buffer shared by all emitters.
///
/// `append` is the workhorse. `prepend` exists because the Wat backend only
/// knows its `(data ...)` directives and module header after the function
/// bodies are emitted; `remove` un-emits trailing characters (separator
/// cleanup, brace fixups). `indent_level` is advisory: the C, C++, and JS
/// backends emit one tab per level at statement starts, the Wat backend
/// ignores it.
#[derive(Debug, Default)]
pub struct EmitSink {
    buffer: String,
    pub indent_level: usize,
}

impl EmitSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn prepend(&mut self, text: &str) {
        self.buffer.insert_str(0, text);
    }

    /// Deletes the last `count` characters.
    pub fn remove(&mut self, count: usize) {
        for _ in 0..count {
            self.buffer.pop();
        }
    }

    /// Appends one tab per indent level.
    pub fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push('\t');
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

impl fmt::Write for EmitSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

/// Emission target, selected from the output file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    C,
    Cpp,
    Js,
    Wat,
}

impl Target {
    pub fn from_extension(extension: &str) -> Option<Target> {
        match extension {
            "c" => Some(Target::C),
            "cpp" | "cc" | "cxx" => Some(Target::Cpp),
            "js" | "mjs" => Some(Target::Js),
            "wat" => Some(Target::Wat),
            _ => None,
        }
    }

    pub fn emit(self, file: &SourceFile, interner: &Interner) -> String {
        match self {
            Target::C => c::emit(file, interner),
            Target::Cpp => cpp::emit(file, interner),
            Target::Js => js::emit(file, interner),
            Target::Wat => wat::emit(file, interner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_append_prepend_remove() {
        let mut sink = EmitSink::new();
        sink.append("body");
        sink.prepend("head ");
        sink.append(", ");
        sink.remove(2);
        assert_eq!(sink.finish(), "head body");
    }

    #[test]
    fn sink_indents_with_tabs() {
        let mut sink = EmitSink::new();
        sink.indent_level = 2;
        sink.indent();
        sink.append("x");
        assert_eq!(sink.finish(), "\t\tx");
    }

    #[test]
    fn target_from_extension() {
        assert_eq!(Target::from_extension("c"), Some(Target::C));
        assert_eq!(Target::from_extension("cpp"), Some(Target::Cpp));
        assert_eq!(Target::from_extension("js"), Some(Target::Js));
        assert_eq!(Target::from_extension("wat"), Some(Target::Wat));
        assert_eq!(Target::from_extension("exe"), None);
    }
}
