//! Markdown Rendering
//!
//! Turns assistant replies into HTML (for web transcripts) or ANSI text (for
//! the terminal). Code blocks are highlighted with syntect in both cases.
//!
//! Raw HTML embedded in a reply is escaped rather than passed through, and
//! links or images pointing anywhere but http(s), mailto or a relative path
//! are reduced to their text, so a reply cannot inject markup or script into
//! the transcript.

use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

/// CSS class carried by every highlighted `<code>` element
pub const HIGHLIGHT_CLASS: &str = "highlighted";

const TERMINAL_THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

fn find_syntax(lang: Option<&str>) -> &'static SyntaxReference {
    let ss = syntax_set();
    lang.and_then(|l| ss.find_syntax_by_token(l))
        .unwrap_or_else(|| ss.find_syntax_plain_text())
}

fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Escape text so it renders literally inside HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail
    let _ = escape_html(&mut out, text);
    out
}

/// Drop control characters other than newline and tab, so text printed to a
/// terminal cannot carry escape sequences
pub fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(*c, '\n' | '\t'))
        .collect()
}

/// Whether a link or image destination may be emitted as-is
fn is_safe_destination(dest: &str) -> bool {
    let dest = dest.trim();
    match dest.find(|c| matches!(c, ':' | '/' | '?' | '#')) {
        Some(idx) if dest[idx..].starts_with(':') => {
            let scheme = dest[..idx].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

/// Render Markdown to HTML with highlighted code blocks
pub fn to_html(text: &str) -> String {
    let mut events = Vec::new();
    // (language, accumulated source) of the code block being read
    let mut code: Option<(Option<String>, String)> = None;
    // Unsafe links and images keep their text but lose the element
    let mut dropped_link = false;
    let mut dropped_image = false;

    for event in Parser::new_ext(text, options()) {
        match event {
            Event::Start(Tag::Link(_, ref dest, _)) if !is_safe_destination(dest) => {
                tracing::debug!(destination = ?dest, "Dropping link with unsafe destination");
                dropped_link = true;
            }
            Event::End(Tag::Link(..)) if dropped_link => dropped_link = false,
            Event::Start(Tag::Image(_, ref dest, _)) if !is_safe_destination(dest) => {
                tracing::debug!(destination = ?dest, "Dropping image with unsafe source");
                dropped_image = true;
            }
            Event::End(Tag::Image(..)) if dropped_image => dropped_image = false,
            Event::Start(Tag::CodeBlock(kind)) => {
                code = Some((fence_language(&kind), String::new()));
            }
            Event::End(Tag::CodeBlock(_)) => {
                if let Some((lang, source)) = code.take() {
                    events.push(Event::Html(highlight_block(&source, lang.as_deref()).into()));
                }
            }
            Event::Text(t) if code.is_some() => {
                if let Some((_, source)) = code.as_mut() {
                    source.push_str(&t);
                }
            }
            Event::Html(raw) => events.push(Event::Text(raw)),
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Highlight one code block as `<pre><code>` with class-annotated spans
fn highlight_block(source: &str, lang: Option<&str>) -> String {
    let class = match lang {
        Some(l) => format!("{} language-{}", HIGHLIGHT_CLASS, escape(l)),
        None => HIGHLIGHT_CLASS.to_string(),
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(find_syntax(lang), syntax_set(), ClassStyle::Spaced);

    for line in LinesWithEndings::from(source) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::debug!(error = %e, "Highlighting failed, emitting plain code block");
            return format!("<pre><code class=\"{}\">{}</code></pre>\n", class, escape(source));
        }
    }

    format!("<pre><code class=\"{}\">{}</code></pre>\n", class, generator.finalize())
}

/// Render Markdown for a 24-bit colour terminal.
///
/// Prose is kept verbatim; only code blocks are rewritten as highlighted
/// text without their fences.
pub fn to_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut block: Option<(std::ops::Range<usize>, Option<String>, String)> = None;

    for (event, range) in Parser::new_ext(text, options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                out.push_str(&text[cursor..range.start]);
                block = Some((range, fence_language(&kind), String::new()));
            }
            Event::Text(t) if block.is_some() => {
                if let Some((_, _, source)) = block.as_mut() {
                    source.push_str(&t);
                }
            }
            Event::End(Tag::CodeBlock(_)) => {
                if let Some((start_range, lang, source)) = block.take() {
                    out.push_str(&highlight_terminal(&source, lang.as_deref()));
                    cursor = start_range.end.max(cursor);
                }
            }
            _ => {}
        }
    }

    out.push_str(&text[cursor..]);
    out
}

fn highlight_terminal(source: &str, lang: Option<&str>) -> String {
    let theme = match theme_set().themes.get(TERMINAL_THEME) {
        Some(theme) => theme,
        None => return source.to_string(),
    };

    let mut highlighter = HighlightLines::new(find_syntax(lang), theme);
    let mut out = String::with_capacity(source.len() * 2);

    for line in LinesWithEndings::from(source) {
        match highlighter.highlight_line(line, syntax_set()) {
            Ok(ranges) => out.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
            Err(_) => out.push_str(line),
        }
    }

    out.push_str("\x1b[0m");
    if !source.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_code_is_highlighted() {
        let html = to_html("Try this:\n\n```rust\nfn main() { let x = 1; }\n```\n");

        assert!(html.contains("<p>Try this:</p>"));
        assert!(html.contains("<pre><code class=\"highlighted language-rust\">"));
        assert!(html.contains("<span class=\""));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_still_wrapped() {
        let html = to_html("```klingon\nqapla'\n```\n");
        assert!(html.contains("<pre><code class=\"highlighted language-klingon\">"));
        assert!(html.contains("qapla"));
    }

    #[test]
    fn test_indented_code_block() {
        let html = to_html("    let x = 1;\n");
        assert!(html.contains("<pre><code class=\"highlighted\">"));
    }

    #[test]
    fn test_inline_formatting() {
        let html = to_html("**bold** and `code`");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = to_html("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_script_links_become_text() {
        let html = to_html("[click me](javascript:alert(document.cookie))");
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("<a "));
        assert!(html.contains("click me"));

        let html = to_html("<JavaScript:alert(1)>");
        assert!(!html.contains("href"));
    }

    #[test]
    fn test_data_destinations_are_dropped() {
        let html = to_html("![chart](data:text/html;base64,PHNjcmlwdD4=) and [x](data:text/html,hi)");
        assert!(!html.contains("data:"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<a "));
        assert!(html.contains("chart"));
    }

    #[test]
    fn test_safe_links_are_kept() {
        let html = to_html("[docs](https://example.com/a?b=1) [help](/help#keys) [mail](mailto:ops@example.com)");
        assert!(html.contains("<a href=\"https://example.com/a?b=1\">docs</a>"));
        assert!(html.contains("<a href=\"/help#keys\">help</a>"));
        assert!(html.contains("<a href=\"mailto:ops"));

        let html = to_html("![logo](https://example.com/logo.png)");
        assert!(html.contains("<img src=\"https://example.com/logo.png\""));
    }

    #[test]
    fn test_info_string_markup_is_escaped() {
        let html = to_html("```\"><img src=x onerror=alert(1)>\nlet x = 1;\n```\n");
        assert!(!html.contains("<img"));
        assert!(html.contains("language-&quot;&gt;&lt;img"));
    }

    #[test]
    fn test_strip_control() {
        assert_eq!(strip_control("a\x1b[2Jb\x07\tc\nd"), "a[2Jb\tc\nd");
    }

    #[test]
    fn test_escape_plain_text() {
        assert_eq!(
            escape("<b>\"hi\" & bye</b>"),
            "&lt;b&gt;&quot;hi&quot; &amp; bye&lt;/b&gt;"
        );
    }

    #[test]
    fn test_ansi_keeps_prose_and_drops_fences() {
        let out = to_ansi("Run:\n\n```sh\necho hi\n```\nDone.\n");
        assert!(out.starts_with("Run:\n\n"));
        assert!(!out.contains("```"));
        assert!(out.contains("\x1b[38;2;"));
        assert!(out.contains("echo"));
        assert!(out.ends_with("Done.\n"));
    }

    #[test]
    fn test_ansi_without_code_is_verbatim() {
        let text = "just *some* words";
        assert_eq!(to_ansi(text), text);
    }
}
