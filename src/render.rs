// src/render.rs

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;

/// Converts raw bot text into safe display text: interprets lightweight
/// markup and strips decorative symbols. Raw HTML never passes through.
pub trait Renderer {
    fn render(&self, text: &str) -> String;
}

// Emoticons, pictographs, transport, flags, misc symbols, dingbats.
static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "[\\x{1F600}-\\x{1F64F}\\x{1F300}-\\x{1F5FF}\\x{1F680}-\\x{1F6FF}\
         \\x{1F1E0}-\\x{1F1FF}\\x{2600}-\\x{26FF}\\x{2700}-\\x{27BF}]",
    )
    .unwrap()
});

pub fn strip_emojis(text: &str) -> String {
    EMOJI_RE.replace_all(text, "").into_owned()
}

/// Markdown-flavored renderer. Flattens markup to plain text suitable for
/// the chat view: list bullets, preserved code fences, dropped HTML.
#[derive(Debug, Default, Clone)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        MarkdownRenderer
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, text: &str) -> String {
        let stripped = strip_emojis(text);
        let mut out = String::new();
        // Tracks ordered-list counters; None marks an unordered list.
        let mut list_stack: Vec<Option<u64>> = Vec::new();

        for event in Parser::new(&stripped) {
            match event {
                Event::Start(Tag::List(start)) => list_stack.push(start),
                Event::End(TagEnd::List(_)) => {
                    list_stack.pop();
                    if !out.ends_with("\n\n") {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => match list_stack.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => out.push_str("- "),
                },
                Event::End(TagEnd::Item) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    match kind {
                        CodeBlockKind::Fenced(lang) => {
                            out.push_str(&format!("```{}\n", lang));
                        }
                        CodeBlockKind::Indented => out.push_str("```\n"),
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n");
                }
                Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) => {
                    out.push_str("\n\n");
                }
                Event::Text(t) => out.push_str(&t),
                Event::Code(t) => {
                    out.push('`');
                    out.push_str(&t);
                    out.push('`');
                }
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => out.push_str("---\n"),
                // Untrusted markup is dropped, not forwarded.
                Event::Html(_) | Event::InlineHtml(_) => {}
                _ => {}
            }
        }

        out.trim_end().to_string()
    }
}
