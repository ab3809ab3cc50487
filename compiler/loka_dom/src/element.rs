//! Element handles and their scripting surface.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use loka_value::{DomError, Element, ElementRef, FunctionValue, Invocation, Value};

use crate::document::DomState;

/// Handle to one element of a [`Document`](crate::Document).
#[derive(Clone)]
pub struct ElementHandle {
    state: Rc<RefCell<DomState>>,
    index: usize,
}

impl ElementHandle {
    pub(crate) fn new(state: Rc<RefCell<DomState>>, index: usize) -> Self {
        ElementHandle { state, index }
    }

    /// Erase into the evaluator's element reference type.
    pub fn into_ref(self) -> ElementRef {
        Rc::new(self)
    }

    pub fn to_value(&self) -> Value {
        Value::Element(self.clone().into_ref())
    }

    fn handle(&self, index: usize) -> ElementHandle {
        ElementHandle::new(Rc::clone(&self.state), index)
    }

    // Building

    /// Append `child` as the last child, detaching it from any old parent.
    pub fn append_child(&self, child: &ElementHandle) -> &Self {
        let mut state = self.state.borrow_mut();
        let nodes = &mut state.tree.nodes;
        if let Some(old_parent) = nodes.get(child.index).and_then(|data| data.parent) {
            if let Some(data) = nodes.get_mut(old_parent) {
                data.children.retain(|&n| n != child.index);
            }
        }
        if let Some(data) = nodes.get_mut(child.index) {
            data.parent = Some(self.index);
        }
        if let Some(data) = nodes.get_mut(self.index) {
            data.children.push(child.index);
        }
        self
    }

    #[must_use]
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.write_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    /// Add one class to the class list.
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        let classes = match self.read_attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.with_attr("class", &classes)
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Inline style declarations, e.g. `"color: red; display: none"`.
    #[must_use]
    pub fn with_style(self, declarations: &str) -> Self {
        self.with_attr("style", declarations)
    }

    pub fn set_text(&self, text: &str) {
        if let Some(data) = self.state.borrow_mut().tree.nodes.get_mut(self.index) {
            data.text = text.to_string();
        }
    }

    pub fn remove_attribute(&self, name: &str) {
        if let Some(data) = self.state.borrow_mut().tree.nodes.get_mut(self.index) {
            data.attrs.shift_remove(&name.to_ascii_lowercase());
        }
    }

    fn read_attr(&self, name: &str) -> Option<String> {
        self.state
            .borrow()
            .tree
            .attr(self.index, name)
            .map(str::to_string)
    }

    fn write_attr(&self, name: &str, value: &str) {
        if let Some(data) = self.state.borrow_mut().tree.nodes.get_mut(self.index) {
            data.attrs
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    fn query_nodes(&self, selector: &str) -> Result<Vec<ElementRef>, DomError> {
        let nodes = self.state.borrow().tree.query(self.index, selector, false)?;
        Ok(nodes
            .into_iter()
            .map(|node| self.handle(node).into_ref())
            .collect())
    }

    fn inline_style(&self, property: &str) -> Option<String> {
        let style = self.read_attr("style")?;
        style.split(';').find_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            (name.trim().eq_ignore_ascii_case(property)).then(|| value.trim().to_string())
        })
    }

    fn parent_handle(&self) -> Option<ElementHandle> {
        let parent = self.state.borrow().tree.parent(self.index)?;
        Some(self.handle(parent))
    }

    fn closest(&self, selector: &str) -> Result<Option<ElementHandle>, DomError> {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            if element.matches(selector)? {
                return Ok(Some(element));
            }
            current = element.parent_handle();
        }
        Ok(None)
    }

    /// A native method bound to this element.
    fn method(
        &self,
        name: &'static str,
        body: impl Fn(&ElementHandle, &Invocation<'_>) -> Result<Value, DomError> + 'static,
    ) -> Value {
        let this = self.clone();
        Value::Function(FunctionValue::native(name, move |call| {
            body(&this, &call).map_err(Into::into)
        }))
    }
}

fn element_or_null(handle: Option<ElementHandle>) -> Value {
    handle.map_or(Value::Null, |handle| handle.to_value())
}

fn selector_arg(call: &Invocation<'_>) -> String {
    call.arg(0).to_display_string()
}

impl Element for ElementHandle {
    fn node_id(&self) -> usize {
        self.index
    }

    fn tag_name(&self) -> String {
        self.state.borrow().tree.tag(self.index).to_string()
    }

    fn text_content(&self) -> String {
        self.state.borrow().tree.text_content(self.index)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.read_attr(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.write_attr(name, value);
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().tree.has_class(self.index, class)
    }

    fn matches(&self, selector: &str) -> Result<bool, DomError> {
        let list = crate::selector::SelectorList::parse(selector)?;
        Ok(list.matches(&self.state.borrow().tree, self.index))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, DomError> {
        self.query_nodes(selector)
    }

    fn contains(&self, other: &dyn Element) -> bool {
        self.state
            .borrow()
            .tree
            .is_ancestor(self.index, other.node_id())
    }

    fn computed_style(&self, property: &str) -> Option<String> {
        if let Some(value) = self.inline_style(property) {
            return Some(value);
        }
        match property {
            "display" => Some(
                match self.tag_name().as_str() {
                    "span" | "a" | "b" | "i" | "em" | "strong" | "label" | "img" => "inline",
                    "li" => "list-item",
                    _ => "block",
                }
                .to_string(),
            ),
            "visibility" => Some("visible".to_string()),
            "opacity" => Some("1".to_string()),
            _ => None,
        }
    }

    fn previous_sibling(&self) -> Option<ElementRef> {
        let sibling = self.state.borrow().tree.previous_sibling(self.index)?;
        Some(self.handle(sibling).into_ref())
    }

    fn next_sibling(&self) -> Option<ElementRef> {
        let sibling = self.state.borrow().tree.next_sibling(self.index)?;
        Some(self.handle(sibling).into_ref())
    }

    fn property(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => Value::string(self.read_attr("id").unwrap_or_default()),
            "className" => Value::string(self.read_attr("class").unwrap_or_default()),
            "tagName" => Value::string(self.tag_name().to_ascii_uppercase()),
            "textContent" | "innerText" => Value::string(self.text_content()),
            "value" => Value::string(self.read_attr("value").unwrap_or_default()),
            "children" => {
                let children: Vec<ElementRef> = self
                    .state
                    .borrow()
                    .tree
                    .children(self.index)
                    .iter()
                    .map(|&child| self.handle(child).into_ref())
                    .collect();
                Value::node_list(children)
            }
            "childElementCount" => {
                let count = self.state.borrow().tree.children(self.index).len();
                Value::number(f64::from(u32::try_from(count).unwrap_or(u32::MAX)))
            }
            "parentElement" => element_or_null(self.parent_handle()),
            "firstElementChild" | "lastElementChild" => {
                let child = {
                    let state = self.state.borrow();
                    let children = state.tree.children(self.index);
                    if name == "firstElementChild" {
                        children.first().copied()
                    } else {
                        children.last().copied()
                    }
                };
                element_or_null(child.map(|index| self.handle(index)))
            }
            "nextElementSibling" => self.next_sibling().map_or(Value::Null, Value::Element),
            "previousElementSibling" => {
                self.previous_sibling().map_or(Value::Null, Value::Element)
            }

            "getAttribute" => self.method("getAttribute", |el, call| {
                Ok(el
                    .read_attr(&selector_arg(call))
                    .map_or(Value::Null, Value::from))
            }),
            "setAttribute" => self.method("setAttribute", |el, call| {
                el.write_attr(&selector_arg(call), &call.arg(1).to_display_string());
                Ok(Value::Undefined)
            }),
            "hasAttribute" => self.method("hasAttribute", |el, call| {
                Ok(Value::Bool(el.read_attr(&selector_arg(call)).is_some()))
            }),
            "removeAttribute" => self.method("removeAttribute", |el, call| {
                el.remove_attribute(&selector_arg(call));
                Ok(Value::Undefined)
            }),
            "querySelector" => self.method("querySelector", |el, call| {
                let first = el.query_nodes(&selector_arg(call))?.into_iter().next();
                Ok(first.map_or(Value::Null, Value::Element))
            }),
            "querySelectorAll" => self.method("querySelectorAll", |el, call| {
                Ok(Value::node_list(el.query_nodes(&selector_arg(call))?))
            }),
            "matches" => self.method("matches", |el, call| {
                Ok(Value::Bool(el.matches(&selector_arg(call))?))
            }),
            "closest" => self.method("closest", |el, call| {
                Ok(element_or_null(el.closest(&selector_arg(call))?))
            }),
            "contains" => self.method("contains", |el, call| {
                Ok(Value::Bool(
                    call.arg(0)
                        .as_element()
                        .is_some_and(|other| other.node_id() == el.index || el.contains(&**other)),
                ))
            }),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>#{}", self.tag_name(), self.index)
    }
}
