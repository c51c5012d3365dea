//! Article location and field extraction over a parsed homepage.
//!
//! Selectors are compiled once per source into a [`SourceSelectors`]; the
//! same routine then serves every source, only the selectors differ.

use crate::errors::Error;
use crate::models::{ElementSelector, FieldValue, Source};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// Compiled selectors for one [`Source`].
#[derive(Debug, Clone)]
pub struct SourceSelectors {
    pub container: Selector,
    pub title: Selector,
    pub description: Selector,
}

impl SourceSelectors {
    /// Compile the three selectors of `source`.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] naming the offending selector.
    pub fn compile(source: &Source) -> Result<Self, Error> {
        Ok(Self {
            container: compile_selector(&source.container)?,
            title: compile_selector(&source.title)?,
            description: compile_selector(&source.description)?,
        })
    }
}

fn compile_selector(rule: &ElementSelector) -> Result<Selector, Error> {
    rule.check()?;
    let css = rule.to_css();
    Selector::parse(&css).map_err(|e| Error::Parse(format!("`{css}`: {e}")))
}

/// Return every element of `document` matching `container`, in document order.
///
/// A page whose structure doesn't match yields an empty list, not an error.
#[instrument(level = "debug", skip_all)]
pub fn locate<'a>(document: &'a Html, container: &Selector) -> Vec<ElementRef<'a>> {
    let nodes: Vec<ElementRef<'a>> = document.select(container).collect();
    debug!(count = nodes.len(), "Located article nodes");
    nodes
}

/// Look up the first descendant of `node` matching `field`.
///
/// Returns the element's visible text, i.e. every text node beneath it
/// concatenated in order, with entities already decoded by the parser.
pub fn extract(node: &ElementRef<'_>, field: &Selector) -> FieldValue {
    match node.select(field).next() {
        Some(el) => FieldValue::Found(el.text().collect::<String>()),
        None => FieldValue::Absent,
    }
}
