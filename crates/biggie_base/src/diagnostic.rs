//! Diagnostic rendering.
//!
//! One renderer serves every phase that reports against source text: the
//! parser and the binder both format their errors through [`render`], which
//! produces the `error:` label, the offending line behind a line-number
//! gutter, a caret underline, and an optional did-you-mean line. The
//! driver's `--debug` traces reuse the same small set of ANSI codes through
//! [`phase_label`] and [`note_label`].
//!
//! Only the codes these renderers actually emit are defined here; every
//! span of color is reset before the next plain segment.

use crate::span::Span;

const RESET: &str = "\x1b[0m";
const BOLD_RED: &str = "\x1b[1m\x1b[31m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

/// Renders an error against its source text.
///
/// ```text
/// error: cannot find 'cuont' in this scope
///
///    2 | return cuont;
///      | ^^^^^
///      | help: did you mean 'count'?
/// ```
///
/// The suggestion line is omitted when `suggestion` is `None`.
pub fn render(message: &str, source: &str, span: Span, suggestion: Option<&str>) -> String {
    let (line_num, line_start, line_content) = find_context(source, span);
    let col = span.start.saturating_sub(line_start);
    let underline = format!("{}{}", " ".repeat(col), "^".repeat(span.len().max(1)));

    let mut rendered = format!(
        "{}error{}: {}\n\n{}{:4} |{} {}\n     {}|{} {}{}{}",
        BOLD_RED, RESET, message, BLUE, line_num, RESET, line_content, BLUE, RESET, RED,
        underline, RESET,
    );

    if let Some(suggestion) = suggestion {
        rendered.push_str(&format!(
            "\n     {}|{} {}help{}: did you mean '{}{}{}'?",
            BLUE, RESET, CYAN, RESET, GREEN, suggestion, RESET
        ));
    }

    rendered
}

/// Finds the 1-based line number, line start offset, and line text
/// containing `span.start`.
pub fn find_context(source: &str, span: Span) -> (usize, usize, &str) {
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= span.start {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|off| line_start + off)
        .unwrap_or(source.len());

    (line_num, line_start, &source[line_start..line_end])
}

/// Colors a phase name for `--debug` traces (`compiling`, `parsed`, ...).
pub fn phase_label(text: &str) -> String {
    format!("{}{}{}", CYAN, text, RESET)
}

/// Colors an advisory note label.
pub fn note_label(text: &str) -> String {
    format!("{}{}{}", YELLOW, text, RESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_underlines_the_span() {
        let source = "var x: int32 = ;\n";
        let rendered = render("no expression", source, Span::new(15, 16), None);
        assert!(rendered.contains("no expression"));
        assert!(rendered.contains("var x: int32 = ;"));
        assert!(rendered.contains('^'));
        assert!(!rendered.contains("help"));
    }

    #[test]
    fn render_appends_the_suggestion_line() {
        let source = "return cuont;";
        let rendered = render(
            "cannot find 'cuont' in this scope",
            source,
            Span::new(7, 12),
            Some("count"),
        );
        assert!(rendered.contains("did you mean"));
        assert!(rendered.contains("count"));
    }

    #[test]
    fn find_context_locates_later_lines() {
        let source = "first\nsecond\nthird";
        let (line, start, content) = find_context(source, Span::new(7, 8));
        assert_eq!(line, 2);
        assert_eq!(start, 6);
        assert_eq!(content, "second");
    }

    #[test]
    fn labels_wrap_and_reset() {
        let label = phase_label("parsed");
        assert!(label.starts_with("\x1b[36m"));
        assert!(label.contains("parsed"));
        assert!(label.ends_with("\x1b[0m"));
    }
}
