//! Loka DOM - an in-memory document for headless hosts and tests.
//!
//! Implements the `Host` and `Element` interfaces from `loka_value` over an
//! arena-backed element tree with attributes, class lists, inline styles and
//! a CSS selector engine.
//!
//! ```text
//! let doc = Document::new();
//! let list = doc.create_element("ul").with_id("items");
//! doc.body_element().append_child(&list);
//! list.append_child(&doc.create_element("li").with_class("done").with_text("a"));
//! ```

mod document;
mod element;
mod selector;

pub use document::Document;
pub use element::ElementHandle;
