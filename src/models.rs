//! Data models for configured sources and the rows they produce.
//!
//! - [`Source`]: a named news homepage plus the selectors used to read it
//! - [`ElementSelector`]: an element-type + class match rule
//! - [`FieldValue`]: the tagged result of extracting one field from an article node
//! - [`ExtractedRow`]: one output record, as written to the CSV sink
//!
//! The CSV column names are capitalized (`Source,Title,Description`), hence the
//! `#[serde(rename)]` attributes on [`ExtractedRow`].

use crate::errors::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("valid regex"));
static CLASS_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[A-Za-z_\P{ASCII}][A-Za-z0-9_\P{ASCII}-]*$").expect("valid regex")
});

/// Sentinel written when an article node has no title element.
pub const TITLE_NOT_FOUND: &str = "Title not found";
/// Sentinel written when an article node has no description element.
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";

/// A structural match rule: an element of type `element` carrying `class`
/// among its classes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElementSelector {
    /// Tag name, e.g. `article` or `h2`.
    pub element: String,
    /// One class name, e.g. `story__title`.
    pub class: String,
}

impl ElementSelector {
    pub fn new(element: &str, class: &str) -> Self {
        Self {
            element: element.to_string(),
            class: class.to_string(),
        }
    }

    /// Both parts must be single CSS identifiers, so a value such as
    /// `story__title, p` cannot widen the rendered selector.
    pub fn check(&self) -> Result<(), Error> {
        if !TAG_NAME.is_match(&self.element) {
            return Err(Error::Parse(format!("`{}` is not a tag name", self.element)));
        }
        if !CLASS_NAME.is_match(&self.class) {
            return Err(Error::Parse(format!("`{}` is not a single class name", self.class)));
        }
        Ok(())
    }

    /// Render as a CSS selector, e.g. `h2.story__title`.
    pub fn to_css(&self) -> String {
        format!("{}.{}", self.element, self.class)
    }
}

/// A news homepage and the selectors used to read articles off it.
///
/// Sources are immutable once configured; the default configuration holds
/// exactly two of them (see [`Source::dawn`] and [`Source::bbc`]).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Label written to the `Source` column, e.g. `"Dawn.com"`.
    pub name: String,
    /// Homepage URL fetched once per run.
    pub url: String,
    /// Matches one article container per story.
    pub container: ElementSelector,
    /// Matches the title element inside a container.
    pub title: ElementSelector,
    /// Matches the description element inside a container.
    pub description: ElementSelector,
}

impl Source {
    /// Dawn.com front page.
    pub fn dawn() -> Self {
        Self {
            name: "Dawn.com".to_string(),
            url: "https://www.dawn.com".to_string(),
            container: ElementSelector::new("article", "story"),
            title: ElementSelector::new("h2", "story__title"),
            description: ElementSelector::new("div", "story__excerpt"),
        }
    }

    /// BBC.com front page.
    pub fn bbc() -> Self {
        Self {
            name: "BBC.com".to_string(),
            url: "https://www.bbc.com".to_string(),
            container: ElementSelector::new("div", "gs-c-promo-body"),
            title: ElementSelector::new("h3", "gs-c-promo-heading__title"),
            description: ElementSelector::new("p", "gs-c-promo-summary"),
        }
    }
}

/// Result of looking up one field inside an article node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The field element exists; holds its raw visible text.
    Found(String),
    /// No matching descendant.
    Absent,
}

impl FieldValue {
    /// Normalize found text with `normalize`, or fall back to `sentinel`
    /// verbatim when the field is absent.
    pub fn resolve(self, normalize: impl Fn(&str) -> String, sentinel: &str) -> String {
        match self {
            FieldValue::Found(text) => normalize(&text),
            FieldValue::Absent => sentinel.to_string(),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRow {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_selector_to_css() {
        assert_eq!(ElementSelector::new("h2", "story__title").to_css(), "h2.story__title");
        assert_eq!(
            ElementSelector::new("div", "gs-c-promo-body").to_css(),
            "div.gs-c-promo-body"
        );
    }

    #[test]
    fn test_check_accepts_plain_identifiers() {
        assert!(ElementSelector::new("h2", "story__title").check().is_ok());
        assert!(ElementSelector::new("div", "gs-c-promo-body").check().is_ok());
        assert!(ElementSelector::new("section", "-lead").check().is_ok());
    }

    #[test]
    fn test_check_rejects_values_that_change_selector_meaning() {
        for (element, class) in [
            ("h2", "story__title, p"),
            ("h2", "a b"),
            ("h2", "x > p"),
            ("h2", "x[href]"),
            ("h2", "x.y"),
            ("h2", "2col"),
            ("h2", ""),
            ("h2, p", "story"),
            ("*", "story"),
            ("", "story"),
        ] {
            let err = ElementSelector::new(element, class).check().unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "{element:?} {class:?}");
        }
    }

    #[test]
    fn test_default_sources() {
        let dawn = Source::dawn();
        assert_eq!(dawn.name, "Dawn.com");
        assert_eq!(dawn.url, "https://www.dawn.com");
        assert_eq!(dawn.container.to_css(), "article.story");

        let bbc = Source::bbc();
        assert_eq!(bbc.name, "BBC.com");
        assert_eq!(bbc.description.to_css(), "p.gs-c-promo-summary");
    }

    #[test]
    fn test_found_value_is_normalized() {
        let value = FieldValue::Found("Hello, World!".to_string());
        assert_eq!(value.resolve(|s| s.to_lowercase(), TITLE_NOT_FOUND), "hello, world!");
    }

    #[test]
    fn test_absent_value_uses_sentinel_verbatim() {
        let resolved = FieldValue::Absent.resolve(|s| s.to_lowercase(), TITLE_NOT_FOUND);
        assert_eq!(resolved, "Title not found");
    }

    #[test]
    fn test_source_deserializes_from_yaml() {
        let yaml = r#"
name: Example
url: https://example.com
container: { element: li, class: item }
title: { element: a, class: headline }
description: { element: span, class: blurb }
"#;
        let source: Source = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(source.name, "Example");
        assert_eq!(source.title.to_css(), "a.headline");
    }
}
