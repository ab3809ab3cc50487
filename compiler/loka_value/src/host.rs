//! Host document interfaces.
//!
//! The evaluator never implements the document. It reaches elements, queries,
//! attributes and the page-level global namespace only through these traits;
//! an embedding supplies the implementation (`loka_dom` provides an in-memory
//! one).

use std::fmt;
use std::rc::Rc;

use crate::Value;

/// Shared handle to a host element.
pub type ElementRef = Rc<dyn Element>;

/// Failure reported by the host document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
    #[error("{0}")]
    Other(String),
}

/// One element of the host document.
pub trait Element: fmt::Debug {
    /// Stable identity within the document; equal ids are the same element.
    fn node_id(&self) -> usize;

    /// Lower-case tag name.
    fn tag_name(&self) -> String;

    /// Concatenated text of the element and its descendants.
    fn text_content(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn set_attribute(&self, name: &str, value: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Whether this element matches `selector`.
    fn matches(&self, selector: &str) -> Result<bool, DomError>;

    /// Descendants matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, DomError>;

    fn query_first(&self, selector: &str) -> Result<Option<ElementRef>, DomError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Whether `other` is a strict descendant of this element.
    fn contains(&self, other: &dyn Element) -> bool;

    /// The rendered value of a style property, `None` when unset.
    fn computed_style(&self, property: &str) -> Option<String>;

    fn previous_sibling(&self) -> Option<ElementRef>;

    fn next_sibling(&self) -> Option<ElementRef>;

    /// A native property (`id`, `value`, `textContent`, methods, ...).
    /// `None` means the element has no such property.
    fn property(&self, name: &str) -> Option<Value>;
}

/// The page: document-wide queries and the global namespace.
pub trait Host {
    /// Elements matching `selector` anywhere in the document.
    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, DomError>;

    fn element_by_id(&self, id: &str) -> Option<ElementRef>;

    fn body(&self) -> Option<ElementRef>;

    /// A name in the page-level global namespace.
    fn global(&self, name: &str) -> Option<Value>;
}

/// A host with an empty document and no globals.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHost;

impl Host for NoHost {
    fn query_all(&self, _selector: &str) -> Result<Vec<ElementRef>, DomError> {
        Ok(Vec::new())
    }

    fn element_by_id(&self, _id: &str) -> Option<ElementRef> {
        None
    }

    fn body(&self) -> Option<ElementRef> {
        None
    }

    fn global(&self, _name: &str) -> Option<Value> {
        None
    }
}
