//! Thin helpers over `scraper` used by every parser.
//!
//! A selector that matches nothing is a normal outcome here: every helper
//! returns an empty collection or `None` rather than an error.

use scraper::{ElementRef, Html, Node, Selector};

/// Parse a CSS selector, logging and returning `None` for invalid input.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::debug!("Invalid selector {css:?}: {e:?}");
            None
        }
    }
}

/// All elements of the document matching `css`, in document order.
pub fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(selector) => document.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// All descendants of `element` matching `css`, in document order.
pub fn select_in<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(selector) => element.select(&selector).collect(),
        None => Vec::new(),
    }
}

pub fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    document.select(&selector).next()
}

pub fn first_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    element.select(&selector).next()
}

/// Recursive visible text with whitespace collapsed.
pub fn text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of the element's direct text children only.
pub fn own_text(element: ElementRef) -> String {
    let joined = element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(text.to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

pub fn attr(element: ElementRef, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Joined text of every match, or an empty string.
pub fn select_text(document: &Html, css: &str) -> String {
    let parts: Vec<String> = select(document, css)
        .into_iter()
        .map(text)
        .filter(|t| !t.is_empty())
        .collect();
    parts.join(" ")
}

/// Text of the first match, when it is non-empty.
pub fn first_text(document: &Html, css: &str) -> Option<String> {
    first_match(document, css)
        .map(text)
        .filter(|t| !t.is_empty())
}

/// Non-empty texts of every match.
pub fn texts(document: &Html, css: &str) -> Vec<String> {
    select(document, css)
        .into_iter()
        .map(text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text of the first selector (in priority order) with a non-empty match.
pub fn first_text_of(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| first_text(document, css))
}

/// Like [`first_text_of`], scoped to the descendants of `element`.
pub fn first_text_in(element: ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        first_in(element, css)
            .map(text)
            .filter(|t| !t.is_empty())
    })
}

/// The `content` attribute of the first matching meta-like element.
pub fn meta_content(document: &Html, css: &str) -> Option<String> {
    first_match(document, css).and_then(|element| attr(element, "content"))
}

/// Text content of the whole document body.
pub fn document_text(document: &Html) -> String {
    match first_match(document, "body") {
        Some(body) => text(body),
        None => collapse_whitespace(&document.root_element().text().collect::<Vec<_>>().join(" ")),
    }
}

/// Replace non-breaking spaces and collapse whitespace runs to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Make `href` absolute against `base`. Protocol-relative links get `https:`.
pub fn absolute_url(href: &str, base: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), href)
    }
}
