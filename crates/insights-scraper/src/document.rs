//! Regex-level helpers for picking values out of fetched page markup.
//!
//! None of these parse HTML properly. They find opening tags, match class
//! tokens, and balance same-name tags to find an element's inner markup,
//! which is enough for the handful of shapes the extraction rules look for.

use std::cell::OnceCell;
use std::sync::LazyLock;

use regex::Regex;

static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<([a-z][a-z0-9-]*)\b([^>]*)>").expect("valid open tag regex")
});
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(/?)([a-z][a-z0-9-]*)\b[^>]*?(/?)>").expect("valid any tag regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([^\s=<>/"']+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attr regex")
});
static TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("valid script regex")
});
static TEXT_NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)>([^<]+)<").expect("valid text node regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*([km])?\b").expect("valid count regex")
});

/// A fragment of markup handed to the extraction rules. Its text runs are
/// computed on first use and shared by every rule that reads them.
#[derive(Debug)]
pub(crate) struct Document<'a> {
    html: &'a str,
    text: OnceCell<Vec<String>>,
}

impl<'a> Document<'a> {
    pub(crate) fn new(html: &'a str) -> Self {
        Self {
            html,
            text: OnceCell::new(),
        }
    }

    pub(crate) fn html(&self) -> &'a str {
        self.html
    }

    pub(crate) fn text_nodes(&self) -> &[String] {
        self.text.get_or_init(|| text_nodes(self.html))
    }
}

/// How a class token must relate to the requested class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassMatch {
    /// A token equal to the name.
    Exact,
    /// A token containing the name anywhere.
    Contains,
    /// A token equal to the name or a modifier of it (`name-v2`), but not a
    /// BEM child element (`name__title`). Used to find repeating containers
    /// without splitting on their descendants.
    Block,
}

impl ClassMatch {
    fn matches(self, token: &str, name: &str) -> bool {
        match self {
            Self::Exact => token == name,
            Self::Contains => token.contains(name),
            Self::Block => {
                token == name
                    || token
                        .strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('-') && !rest.contains("__"))
            }
        }
    }
}

/// An element located in a document: its opening tag attributes and the
/// markup between its opening and matching closing tag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Element<'a> {
    pub(crate) attrs: &'a str,
    pub(crate) inner: &'a str,
}

impl Element<'_> {
    pub(crate) fn attr(&self, name: &str) -> Option<String> {
        extract_attr(self.attrs, name)
    }

    /// Visible text of the element, or `None` when it is blank.
    pub(crate) fn text(&self) -> Option<String> {
        non_empty(clean_text(self.inner))
    }
}

/// Value of attribute `name` within an opening tag's attribute text.
pub(crate) fn extract_attr(tag: &str, name: &str) -> Option<String> {
    ATTR_RE
        .captures_iter(tag)
        .find(|c| c.get(1).is_some_and(|n| n.as_str().eq_ignore_ascii_case(name)))
        .and_then(|c| c.get(2).or_else(|| c.get(3)))
        .and_then(|m| non_empty(decode_entities(m.as_str().trim())))
}

fn has_class(attrs: &str, name: &str, mode: ClassMatch) -> bool {
    extract_attr(attrs, "class").is_some_and(|classes| {
        classes
            .split_whitespace()
            .any(|token| mode.matches(token, name))
    })
}

/// Byte offset of the closing tag that balances an opening `tag` whose
/// content starts at `from`. Unclosed elements run to the end of the input.
fn matching_close(html: &str, tag: &str, from: usize) -> (usize, usize) {
    let mut depth = 1usize;
    for caps in ANY_TAG_RE.captures_iter(&html[from..]) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if !name.as_str().eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return (from + whole.start(), from + whole.end());
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    (html.len(), html.len())
}

/// An opening tag found in a document.
struct OpenTag<'a> {
    name: &'a str,
    attrs: &'a str,
    start: usize,
    end: usize,
}

fn open_tags(html: &str) -> impl Iterator<Item = OpenTag<'_>> + '_ {
    OPEN_TAG_RE.captures_iter(html).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(OpenTag {
            name: caps.get(1)?.as_str(),
            attrs: caps.get(2)?.as_str(),
            start: whole.start(),
            end: whole.end(),
        })
    })
}

/// The element opened by `open`. Void elements (`img`, `meta`, ...) have
/// empty inner markup.
fn element<'a>(html: &'a str, open: &OpenTag<'a>) -> Element<'a> {
    let inner = if is_void(open.name) || open.attrs.trim_end().ends_with('/') {
        ""
    } else {
        let (close_start, _) = matching_close(html, open.name, open.end);
        &html[open.end..close_start]
    };
    Element {
        attrs: open.attrs,
        inner,
    }
}

fn is_void(tag: &str) -> bool {
    ["img", "meta", "link", "br", "hr", "input", "source", "area", "base", "wbr"]
        .iter()
        .any(|void| tag.eq_ignore_ascii_case(void))
}

fn tag_matches(tag: &str, wanted: Option<&str>) -> bool {
    wanted.is_none_or(|w| tag.eq_ignore_ascii_case(w))
}

/// Elements carrying a class that matches `name` under `mode`. `tag` of
/// `None` accepts any element.
pub(crate) fn find_all_by_class<'a>(
    html: &'a str,
    tag: Option<&str>,
    name: &str,
    mode: ClassMatch,
) -> Vec<Element<'a>> {
    open_tags(html)
        .filter(|open| tag_matches(open.name, tag) && has_class(open.attrs, name, mode))
        .map(|open| element(html, &open))
        .collect()
}

pub(crate) fn find_by_class<'a>(
    html: &'a str,
    tag: Option<&str>,
    name: &str,
    mode: ClassMatch,
) -> Option<Element<'a>> {
    open_tags(html)
        .find(|open| tag_matches(open.name, tag) && has_class(open.attrs, name, mode))
        .map(|open| element(html, &open))
}

/// First element whose attribute `attr` contains `fragment`.
pub(crate) fn find_by_attr<'a>(
    html: &'a str,
    tag: Option<&str>,
    attr: &str,
    fragment: &str,
) -> Option<Element<'a>> {
    open_tags(html)
        .find(|open| {
            tag_matches(open.name, tag)
                && extract_attr(open.attrs, attr).is_some_and(|v| v.contains(fragment))
        })
        .map(|open| element(html, &open))
}

/// All elements with the given tag name.
pub(crate) fn find_all_tags<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    open_tags(html)
        .filter(|open| open.name.eq_ignore_ascii_case(tag))
        .map(|open| element(html, &open))
        .collect()
}

/// Markup of each repeating container, outermost first and in document
/// order. A container nested inside an earlier match is part of that match,
/// not a block of its own.
pub(crate) fn split_blocks<'a>(html: &'a str, tags: &[&str], name: &str) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut covered_until = 0usize;
    for open in open_tags(html) {
        if open.start < covered_until {
            continue;
        }
        let wanted = tags.iter().any(|t| t.eq_ignore_ascii_case(open.name));
        if !wanted || !has_class(open.attrs, name, ClassMatch::Block) {
            continue;
        }
        let (_, close_end) = matching_close(html, open.name, open.end);
        blocks.push(&html[open.start..close_end]);
        covered_until = close_end;
    }
    blocks
}

/// `content` of the first `<meta>` whose `property` or `name` equals `key`.
pub(crate) fn meta_content(html: &str, key: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let matches_key = ["property", "name"]
            .iter()
            .any(|attr| extract_attr(tag, attr).is_some_and(|v| v.eq_ignore_ascii_case(key)));
        if matches_key {
            extract_attr(tag, "content").and_then(|c| non_empty(clean_text(&c)))
        } else {
            None
        }
    })
}

/// Text of the document `<title>`, with any ` | Site` suffix removed.
pub(crate) fn document_title(html: &str) -> Option<String> {
    let raw = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))?;
    let head = raw.split(" | ").next().unwrap_or(&raw).trim().to_string();
    non_empty(head)
}

/// Non-blank text runs between tags, in document order.
pub(crate) fn text_nodes(html: &str) -> Vec<String> {
    let visible = SCRIPT_STYLE_RE.replace_all(html, " ");
    TEXT_NODE_RE
        .captures_iter(&visible)
        .filter_map(|c| c.get(1))
        .filter_map(|m| non_empty(clean_text(m.as_str())))
        .collect()
}

/// Value shown next to a label, either as `Label: value` in one text run or as
/// a label run immediately followed by a value run (the `<dt>`/`<dd>` shape).
pub(crate) fn labelled_value(nodes: &[String], label: &str) -> Option<String> {
    let label_lower = label.to_lowercase();
    nodes.iter().enumerate().find_map(|(i, text)| {
        let lower = text.to_lowercase();
        if lower == label_lower {
            return nodes.get(i + 1).cloned();
        }
        lower
            .strip_prefix(&label_lower)
            .and_then(|rest| rest.trim_start().strip_prefix(':'))
            .and_then(|_| text.split_once(':'))
            .and_then(|(_, value)| non_empty(value.trim().to_string()))
    })
}

/// First number in `text`, honouring `K`/`M` suffixes and thousands commas.
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT_RE.captures(text)?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(suffix) if suffix == "k" => 1_000.0,
        Some(suffix) if suffix == "m" => 1_000_000.0,
        _ => 1.0,
    };
    if multiplier > 1.0 || digits.contains('.') {
        let value: f64 = digits.parse().ok()?;
        let scaled = (value * multiplier).round();
        if !scaled.is_finite() || scaled < 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = scaled as u64;
        return Some(count);
    }
    digits.parse().ok()
}

/// Strip tags, decode the common entities, and collapse whitespace.
pub(crate) fn clean_text(input: &str) -> String {
    let no_tags = TAGS_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Resolve `href` against `base_url`; absolute URLs pass through.
pub(crate) fn absolutize_url(base_url: &str, href: &str) -> Option<String> {
    let base = reqwest::Url::parse(base_url).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}
