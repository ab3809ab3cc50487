//! Document storage and the page-level host.
//!
//! Elements live in an arena (`Tree::nodes`) and are addressed by index, so
//! an element handle is a shared pointer to the tree plus a `usize`. Indices
//! are never reused; detached elements keep their slot.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use loka_value::{DomError, ElementRef, Host, Value};

use crate::element::ElementHandle;
use crate::selector::SelectorList;

#[derive(Debug, Default)]
pub(crate) struct NodeData {
    pub(crate) tag: String,
    pub(crate) attrs: IndexMap<String, String>,
    /// Text directly inside this element, before its children.
    pub(crate) text: String,
    pub(crate) children: Vec<usize>,
    pub(crate) parent: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct Tree {
    pub(crate) nodes: Vec<NodeData>,
}

impl Tree {
    pub(crate) fn tag(&self, node: usize) -> &str {
        self.nodes.get(node).map_or("", |data| data.tag.as_str())
    }

    pub(crate) fn attr(&self, node: usize, name: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub(crate) fn has_class(&self, node: usize, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    pub(crate) fn parent(&self, node: usize) -> Option<usize> {
        self.nodes.get(node)?.parent
    }

    pub(crate) fn children(&self, node: usize) -> &[usize] {
        self.nodes.get(node).map_or(&[], |data| data.children.as_slice())
    }

    fn sibling(&self, node: usize, offset: isize) -> Option<usize> {
        let siblings = self.children(self.parent(node)?);
        let position = siblings.iter().position(|&n| n == node)?;
        siblings.get(position.checked_add_signed(offset)?).copied()
    }

    pub(crate) fn previous_sibling(&self, node: usize) -> Option<usize> {
        self.sibling(node, -1)
    }

    pub(crate) fn next_sibling(&self, node: usize) -> Option<usize> {
        self.sibling(node, 1)
    }

    pub(crate) fn text_content(&self, node: usize) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: usize, out: &mut String) {
        if let Some(data) = self.nodes.get(node) {
            out.push_str(&data.text);
            for &child in &data.children {
                self.collect_text(child, out);
            }
        }
    }

    /// Strict descendants of `root` in document order.
    pub(crate) fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub(crate) fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Descendants of `root` (and `root` itself when `inclusive`) matching
    /// `selector`.
    pub(crate) fn query(
        &self,
        root: usize,
        selector: &str,
        inclusive: bool,
    ) -> Result<Vec<usize>, DomError> {
        let list = SelectorList::parse(selector)?;
        let candidates = if inclusive {
            std::iter::once(root).chain(self.descendants(root)).collect()
        } else {
            self.descendants(root)
        };
        Ok(candidates
            .into_iter()
            .filter(|&node| list.matches(self, node))
            .collect())
    }
}

/// Shared state behind a document and all of its element handles.
#[derive(Debug, Default)]
pub(crate) struct DomState {
    pub(crate) tree: Tree,
    pub(crate) globals: IndexMap<String, Value>,
}

/// An in-memory document rooted at a `<body>` element.
///
/// Cloning a `Document` clones the handle; both clones see the same tree.
#[derive(Clone, Debug)]
pub struct Document {
    state: Rc<RefCell<DomState>>,
}

const BODY: usize = 0;

impl Document {
    pub fn new() -> Self {
        let mut state = DomState::default();
        state.tree.nodes.push(NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        });
        Document {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// The root `<body>` element.
    pub fn body_element(&self) -> ElementHandle {
        ElementHandle::new(Rc::clone(&self.state), BODY)
    }

    /// A new element, not yet attached anywhere.
    pub fn create_element(&self, tag: &str) -> ElementHandle {
        let index = {
            let mut state = self.state.borrow_mut();
            state.tree.nodes.push(NodeData {
                tag: tag.to_ascii_lowercase(),
                ..NodeData::default()
            });
            state.tree.nodes.len() - 1
        };
        ElementHandle::new(Rc::clone(&self.state), index)
    }

    /// Bind a name in the page-level global namespace.
    pub fn define_global(&self, name: impl Into<String>, value: Value) {
        self.state.borrow_mut().globals.insert(name.into(), value);
    }

    /// Elements matching `selector`, including the body itself.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementHandle>, DomError> {
        let nodes = self.state.borrow().tree.query(BODY, selector, true)?;
        Ok(nodes
            .into_iter()
            .map(|node| ElementHandle::new(Rc::clone(&self.state), node))
            .collect())
    }

    pub fn element_with_id(&self, id: &str) -> Option<ElementHandle> {
        let node = {
            let state = self.state.borrow();
            let tree = &state.tree;
            std::iter::once(BODY)
                .chain(tree.descendants(BODY))
                .find(|&node| tree.attr(node, "id") == Some(id))
        }?;
        Some(ElementHandle::new(Rc::clone(&self.state), node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Document {
    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, DomError> {
        Ok(self
            .select(selector)?
            .into_iter()
            .map(ElementHandle::into_ref)
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.element_with_id(id).map(ElementHandle::into_ref)
    }

    fn body(&self) -> Option<ElementRef> {
        Some(self.body_element().into_ref())
    }

    fn global(&self, name: &str) -> Option<Value> {
        self.state.borrow().globals.get(name).cloned()
    }
}
