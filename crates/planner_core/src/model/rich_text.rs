//! Rich-text document model for routine cells.
//!
//! # Responsibility
//! - Represent cell content as an ordered list of styled text runs.
//! - Parse untrusted markup into runs and serialize runs back to a small,
//!   canonical markup subset.
//!
//! # Invariants
//! - Only `b`, `i`, `u`, `s`, `br` and `span style="color: ..."` are ever
//!   emitted; every other tag is dropped (its text is kept, except inside
//!   `script`/`style`).
//! - Serialization is canonical: adjacent runs with equal style are merged and
//!   tags nest in a fixed order, so parse→serialize is idempotent.
//! - Text is always entity-escaped on output.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^<>]*)>").expect("valid tag regex"));
static STYLE_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|[;\s"'])color\s*:\s*([^;"']+)"#).expect("valid style color regex")
});
static FONT_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bcolor\s*=\s*["']?([^"'\s>]+)"#).expect("valid font color regex")
});
static SAFE_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3}|#[0-9a-fA-F]{6}|[a-zA-Z]{3,20})$").expect("valid color regex")
});

/// Inline styling applied to one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Validated CSS color (`#rgb`, `#rrggbb` or a plain color name).
    pub color: Option<String>,
}

/// Contiguous text sharing one style. `\n` marks a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

/// Ordered styled runs making up one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleTag {
    Bold,
    Italic,
    Underline,
    Strike,
    Color,
    Neutral,
}

#[derive(Debug, Clone)]
struct OpenTag {
    name: String,
    kind: StyleTag,
    color: Option<String>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text in a single unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.push(text, TextStyle::default());
        doc
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Appends a run, merging with the previous one when styles match.
    pub fn push(&mut self, text: impl Into<String>, style: TextStyle) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.style == style {
                last.text.push_str(&text);
                return;
            }
        }
        self.runs.push(TextRun { text, style });
    }

    /// Text content without styling.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Parses arbitrary (possibly hostile) markup.
    pub fn from_markup(markup: &str) -> Self {
        let mut doc = Self::new();
        let mut stack: Vec<OpenTag> = Vec::new();
        let mut skipping: Option<String> = None;
        let mut cursor = 0;

        for caps in TAG_RE.captures_iter(markup) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let closing = !caps[1].is_empty();
            let name = caps[2].to_ascii_lowercase();
            let attrs = caps.get(3).map_or("", |m| m.as_str());

            if skipping.is_none() {
                let text = decode_entities(&markup[cursor..whole.start()]);
                doc.push(text, current_style(&stack));
            }
            cursor = whole.end();

            if skipping.is_some() {
                if closing && skipping.as_deref() == Some(name.as_str()) {
                    skipping = None;
                }
                continue;
            }

            if closing {
                if let Some(position) = stack.iter().rposition(|open| open.name == name) {
                    stack.truncate(position);
                }
                continue;
            }

            match name.as_str() {
                "script" | "style" | "iframe" | "object" | "template" => {
                    if !attrs.trim_end().ends_with('/') {
                        skipping = Some(name.clone());
                    }
                }
                "br" => doc.push("\n", current_style(&stack)),
                "div" | "p" => {
                    if !doc.is_empty() && !doc.plain_text().ends_with('\n') {
                        doc.push("\n", current_style(&stack));
                    }
                    stack.push(OpenTag {
                        name: name.clone(),
                        kind: StyleTag::Neutral,
                        color: None,
                    });
                }
                _ => {
                    let (kind, color) = classify(&name, attrs);
                    if attrs.trim_end().ends_with('/') {
                        continue;
                    }
                    stack.push(OpenTag {
                        name: name.clone(),
                        kind,
                        color,
                    });
                }
            }
        }

        if skipping.is_none() {
            let text = decode_entities(&markup[cursor..]);
            doc.push(text, current_style(&stack));
        }
        doc
    }

    /// Serializes to canonical markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            let style = &run.style;
            let mut open_tags = Vec::new();
            if let Some(color) = style.color.as_deref() {
                out.push_str(&format!("<span style=\"color: {color}\">"));
                open_tags.push("span");
            }
            for (enabled, tag) in [
                (style.bold, "b"),
                (style.italic, "i"),
                (style.underline, "u"),
                (style.strike, "s"),
            ] {
                if enabled {
                    out.push_str(&format!("<{tag}>"));
                    open_tags.push(tag);
                }
            }
            out.push_str(&escape_text(&run.text));
            for tag in open_tags.iter().rev() {
                out.push_str(&format!("</{tag}>"));
            }
        }
        out
    }
}

fn classify(name: &str, attrs: &str) -> (StyleTag, Option<String>) {
    match name {
        "b" | "strong" => (StyleTag::Bold, None),
        "i" | "em" => (StyleTag::Italic, None),
        "u" | "ins" => (StyleTag::Underline, None),
        "s" | "strike" | "del" => (StyleTag::Strike, None),
        "span" => match extract_color(&STYLE_COLOR_RE, attrs) {
            Some(color) => (StyleTag::Color, Some(color)),
            None => (StyleTag::Neutral, None),
        },
        "font" => match extract_color(&FONT_COLOR_RE, attrs) {
            Some(color) => (StyleTag::Color, Some(color)),
            None => (StyleTag::Neutral, None),
        },
        _ => (StyleTag::Neutral, None),
    }
}

fn extract_color(pattern: &Regex, attrs: &str) -> Option<String> {
    let raw = pattern.captures(attrs)?.get(1)?.as_str().trim().to_ascii_lowercase();
    SAFE_COLOR_RE.is_match(&raw).then_some(raw)
}

fn current_style(stack: &[OpenTag]) -> TextStyle {
    let mut style = TextStyle::default();
    for open in stack {
        match open.kind {
            StyleTag::Bold => style.bold = true,
            StyleTag::Italic => style.italic = true,
            StyleTag::Underline => style.underline = true,
            StyleTag::Strike => style.strike = true,
            StyleTag::Color => style.color = open.color.clone(),
            StyleTag::Neutral => {}
        }
    }
    style
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            decode_entity(entity).map(|ch| (ch, end + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = entity.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code).filter(|ch| *ch != '\0')
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}
