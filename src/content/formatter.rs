//! Content formatter for the small markdown-like grammar used in post bodies
//!
//! Rules run in a fixed order, each over the output of the previous one:
//! paragraphs, bold, bullet lists, fenced code, inline code, then headings,
//! quotes and status icons. Fenced blocks are cut out of the raw text before
//! anything else runs and put back at the end, so no rule reaches inside them.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::helpers::html_escape;

lazy_static! {
    static ref FENCE: Regex = Regex::new(r"```(\w+)?\n([\s\S]*?)```").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref BULLET_RUN: Regex = Regex::new(r"(?m)(?:^• [^\n]*\n?)+").unwrap();
    static ref BULLET_ITEM: Regex = Regex::new(r"(?m)^• (.*)$").unwrap();
    static ref NUMBERED_RUN: Regex = Regex::new(r"(?m)(?:^\d+\. [^\n]*\n?)+").unwrap();
    static ref NUMBERED_ITEM: Regex = Regex::new(r"(?m)^\d+\. (.*)$").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`\n]+)`").unwrap();
    static ref H3: Regex = Regex::new(r"(?m)^### (.*)$").unwrap();
    static ref H2: Regex = Regex::new(r"(?m)^## (.*)$").unwrap();
    static ref QUOTE: Regex = Regex::new(r"(?m)^> (.*)$").unwrap();
    static ref BLOCK_START: Regex =
        Regex::new(r"^<(?:p|ul|ol|li|pre|h[1-6]|blockquote|div|table)[\s>]").unwrap();
}

/// Fenced blocks are swapped for these markers while the other rules run.
const FENCE_OPEN: char = '\u{E000}';
const FENCE_CLOSE: char = '\u{E001}';

/// Convert a text block into an HTML fragment.
///
/// Total and deterministic: malformed fences or stray backticks stay in the
/// output as literal text.
pub fn format_content(text: &str) -> String {
    let mut fences = Vec::new();
    let mut formatted = FENCE
        .replace_all(text, |caps: &Captures| {
            let language = caps.get(1).map_or("code", |m| m.as_str());
            let code = caps.get(2).map_or("", |m| m.as_str());
            fences.push(format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                language,
                html_escape(code.trim())
            ));
            format!("{}{}{}", FENCE_OPEN, fences.len() - 1, FENCE_CLOSE)
        })
        .into_owned();

    formatted = formatted.replace("\n\n", "</p><p>");
    formatted = BOLD.replace_all(&formatted, "<strong>$1</strong>").into_owned();
    formatted = wrap_list_runs(&formatted, &BULLET_RUN, &BULLET_ITEM, "ul");
    formatted = wrap_list_runs(&formatted, &NUMBERED_RUN, &NUMBERED_ITEM, "ol");
    formatted = INLINE_CODE
        .replace_all(&formatted, "<code>$1</code>")
        .into_owned();
    formatted = H3.replace_all(&formatted, "<h3>$1</h3>").into_owned();
    formatted = H2.replace_all(&formatted, "<h2>$1</h2>").into_owned();
    formatted = QUOTE
        .replace_all(&formatted, "<blockquote>$1</blockquote>")
        .into_owned();
    formatted = formatted
        .replace('✅', r#"<span class="icon-check">✅</span>"#)
        .replace('❌', r#"<span class="icon-cross">❌</span>"#);

    for (index, block) in fences.iter().enumerate() {
        let marker = format!("{}{}{}", FENCE_OPEN, index, FENCE_CLOSE);
        formatted = formatted.replace(&marker, block);
    }

    if BLOCK_START.is_match(&formatted) {
        formatted
    } else {
        format!("<p>{}</p>", formatted)
    }
}

/// Turn each run of consecutive list lines into one `<ul>`/`<ol>`
fn wrap_list_runs(text: &str, run: &Regex, item: &Regex, tag: &str) -> String {
    run.replace_all(text, |caps: &Captures| {
        let items = item.replace_all(&caps[0], "<li>$1</li>");
        format!("<{tag}>{items}</{tag}>")
    })
    .into_owned()
}
