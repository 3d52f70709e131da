/// Minimal HTML scraping helpers
///
/// This module handles:
/// - Locating elements by tag (with nesting) and class
/// - Extracting page titles and links
/// - Converting an HTML `<table>` into a `RawTable`
///
/// The pages we read are machine-generated and regular, so a handful of
/// regexes plus a nesting-aware tag scanner is enough.
use crate::types::{Cell, HeaderCell, RawTable};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex");
    static ref TITLE: Regex = Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid title regex");
    static ref DIV_TAG: Regex = Regex::new(r"(?is)<(/?)div\b([^>]*)>").expect("valid div regex");
    static ref TABLE_TAG: Regex = Regex::new(r"(?is)<(/?)table\b([^>]*)>").expect("valid table regex");
    static ref CLASS_ATTR: Regex = Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).expect("valid class regex");
    static ref HREF_ATTR: Regex = Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']*)["']"#).expect("valid href regex");
    static ref COLSPAN_ATTR: Regex = Regex::new(r#"(?i)\bcolspan\s*=\s*["']?(\d+)"#).expect("valid colspan regex");
    static ref ANCHOR: Regex = Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("valid anchor regex");
    static ref THEAD: Regex = Regex::new(r"(?is)<thead\b[^>]*>(.*?)</thead\s*>").expect("valid thead regex");
    static ref ROW: Regex = Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").expect("valid row regex");
    static ref CELL: Regex =
        Regex::new(r"(?is)<(td|th)\b([^>]*)>(.*?)</(?:td|th)\s*>").expect("valid cell regex");
    static ref LINE_BREAK: Regex = Regex::new(r"(?i)<br\s*/?>").expect("valid br regex");
    static ref ANY_TAG: Regex = Regex::new(r"(?s)<[^>]*>").expect("valid tag regex");
}

/// Tags the scanner knows how to match with nesting
#[derive(Debug, Clone, Copy)]
pub enum Tag {
    Div,
    Table,
}

impl Tag {
    fn pattern(self) -> &'static Regex {
        match self {
            Tag::Div => &DIV_TAG,
            Tag::Table => &TABLE_TAG,
        }
    }
}

/// A located element: its attribute string and inner HTML
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    pub attrs: &'a str,
    pub inner: &'a str,
}

/// A hyperlink found in a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// Remove `<!-- ... -->` blocks (tables hidden in comments are not part of the page)
pub fn strip_comments(html: &str) -> Cow<'_, str> {
    COMMENT.replace_all(html, "")
}

/// Text of the `<title>` element
pub fn page_title(html: &str) -> Option<String> {
    TITLE.captures(html).map(|c| cell_text(&c[1])).filter(|t| !t.is_empty())
}

/// First element of `tag` whose attributes satisfy `want`, matched with nesting
pub fn find_element<'a, F>(html: &'a str, tag: Tag, want: F) -> Option<Element<'a>>
where
    F: Fn(&str) -> bool,
{
    let mut tags = tag.pattern().captures_iter(html);

    while let Some(open) = tags.next() {
        let is_closing = !open[1].is_empty();
        let attrs = open.get(2).map(|m| m.as_str()).unwrap_or("");
        if is_closing || !want(attrs) {
            continue;
        }
        let content_start = open.get(0)?.end();

        let mut depth = 1usize;
        for next in tags.by_ref() {
            if next[1].is_empty() {
                depth += 1;
                continue;
            }
            depth -= 1;
            if depth == 0 {
                let content_end = next.get(0)?.start();
                return Some(Element { attrs, inner: &html[content_start..content_end] });
            }
        }

        // Unclosed element runs to the end of the document
        return Some(Element { attrs, inner: &html[content_start..] });
    }

    None
}

/// True if the attribute string carries `class` among its class tokens
pub fn has_class(attrs: &str, class: &str) -> bool {
    CLASS_ATTR
        .captures(attrs)
        .map(|c| c[1].split_whitespace().any(|token| token == class))
        .unwrap_or(false)
}

/// First element of `tag` with the given class
pub fn element_by_class<'a>(html: &'a str, tag: Tag, class: &str) -> Option<Element<'a>> {
    find_element(html, tag, |attrs| has_class(attrs, class))
}

/// Every `<a href>` in a fragment, in document order
pub fn links(fragment: &str) -> Vec<Link> {
    ANCHOR
        .captures_iter(fragment)
        .filter_map(|c| {
            let href = HREF_ATTR.captures(&c[1])?;
            Some(Link { href: html_escape::decode_html_entities(&href[1]).to_string(), text: cell_text(&c[2]) })
        })
        .collect()
}

/// Visible text of an HTML fragment: tags dropped, entities decoded, whitespace collapsed
pub fn cell_text(fragment: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(fragment, " ");
    let no_tags = ANY_TAG.replace_all(&with_breaks, "");
    let decoded = html_escape::decode_html_entities(&no_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first table on the page, outside HTML comments
pub fn first_table(html: &str) -> Option<RawTable> {
    let visible = strip_comments(html);
    find_element(&visible, Tag::Table, |_| true).map(|table| parse_table(table.inner))
}

/// Largest colspan browsers honor
const MAX_COLSPAN: usize = 1000;

struct HtmlCell {
    text: String,
    is_header: bool,
    colspan: usize,
}

fn parse_rows(fragment: &str) -> Vec<Vec<HtmlCell>> {
    ROW.captures_iter(fragment)
        .map(|row| {
            CELL.captures_iter(&row[1])
                .map(|c| HtmlCell {
                    text: cell_text(&c[3]),
                    is_header: c[1].eq_ignore_ascii_case("th"),
                    colspan: COLSPAN_ATTR
                        .captures(&c[2])
                        .and_then(|m| m[1].parse::<usize>().ok())
                        .filter(|n| *n > 0)
                        .map(|n| n.min(MAX_COLSPAN))
                        .unwrap_or(1),
                })
                .collect()
        })
        .filter(|cells: &Vec<HtmlCell>| !cells.is_empty())
        .collect()
}

/// Repeat each cell across its colspan
fn expand_row(cells: &[HtmlCell]) -> Vec<String> {
    cells.iter().flat_map(|c| std::iter::repeat(c.text.clone()).take(c.colspan)).collect()
}

/// Convert the inner HTML of a `<table>` into a `RawTable`.
///
/// Header rows come from `<thead>`, or failing that from the leading rows made
/// only of `<th>` cells. Every other row is data, including header rows the
/// site repeats inside the body.
pub fn parse_table(table_inner: &str) -> RawTable {
    let (mut header_rows, body_html) = match THEAD.captures(table_inner) {
        Some(thead) => (parse_rows(&thead[1]), THEAD.replacen(table_inner, 1, "")),
        None => (Vec::new(), Cow::Borrowed(table_inner)),
    };

    let mut body_rows = parse_rows(&body_html);
    if header_rows.is_empty() {
        let leading = body_rows.iter().take_while(|row| row.iter().all(|c| c.is_header)).count();
        header_rows = body_rows.drain(..leading).collect();
    }

    let header_levels: Vec<Vec<String>> = header_rows.iter().map(|r| expand_row(r)).collect();
    let body: Vec<Vec<String>> = body_rows.iter().map(|r| expand_row(r)).collect();

    let width = header_levels
        .iter()
        .map(|r| r.len())
        .chain(body.iter().map(|r| r.len()))
        .max()
        .unwrap_or(0);

    let headers = (0..width)
        .map(|col| HeaderCell(header_levels.iter().map(|level| level.get(col).cloned().unwrap_or_default()).collect()))
        .collect();

    let rows = body
        .into_iter()
        .map(|texts| {
            let mut cells: Vec<Cell> = texts.iter().map(|t| Cell::from_text(t)).collect();
            cells.resize(width, Cell::Empty);
            cells
        })
        .collect();

    RawTable { headers, rows }
}
