//! Element handles.
//!
//! An [`Element`] is a cheap `Arc` handle over the node's state: tag,
//! attribute table, child list, form state, and event listeners. Clones
//! share the node; equality is identity. Parents are weak references, so a
//! detached subtree is owned by whoever holds its root handle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::warn;

use super::event::{DomEvent, EventKind, EventListenerId};
use super::node::{Node, TextNode};
use super::parser;
use crate::value::Value;

/// The writable element properties the property binder can address.
///
/// This is the whole surface: a closed capability set instead of free-form
/// property reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    TextContent,
    InnerHtml,
    ClassName,
    Disabled,
    Checked,
    Selected,
    Value,
}

#[derive(Default, Clone)]
struct FormState {
    checked: bool,
    disabled: bool,
    selected: bool,
    /// The live `value` property; falls back to the `value` attribute when
    /// never written.
    value: Option<String>,
}

struct EventListenerEntry {
    id: u64,
    kind: EventKind,
    handler: Arc<dyn Fn(&DomEvent) + Send + Sync>,
}

static EVENT_LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) struct ElementInner {
    tag: String,
    document_root: bool,
    attributes: RwLock<IndexMap<String, String>>,
    children: RwLock<Vec<Node>>,
    parent: RwLock<Weak<ElementInner>>,
    form: RwLock<FormState>,
    listeners: RwLock<Vec<EventListenerEntry>>,
}

/// An element node. Clones share the node; equality is identity.
pub struct Element {
    inner: Arc<ElementInner>,
}

impl Element {
    pub(crate) fn create(tag: &str) -> Self {
        Self::build(tag, false)
    }

    pub(crate) fn create_root(tag: &str) -> Self {
        Self::build(tag, true)
    }

    fn build(tag: &str, document_root: bool) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                tag: tag.to_ascii_lowercase(),
                document_root,
                attributes: RwLock::new(IndexMap::new()),
                children: RwLock::new(Vec::new()),
                parent: RwLock::new(Weak::new()),
                form: RwLock::new(FormState::default()),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<ElementInner>) -> Self {
        Self { inner }
    }

    pub fn tag(&self) -> String {
        self.inner.tag.clone()
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.read().get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.read().contains_key(name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .attributes
            .write()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.inner.attributes.write().shift_remove(name);
    }

    /// A snapshot of the attribute table in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.inner
            .attributes
            .read()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Class list
    // ------------------------------------------------------------------

    pub fn class_name(&self) -> String {
        self.attribute("class").unwrap_or_default()
    }

    pub fn set_class_name(&self, value: &str) {
        self.set_attribute("class", value);
    }

    pub fn class_list_contains(&self, class: &str) -> bool {
        self.class_name()
            .split_whitespace()
            .any(|token| token == class)
    }

    /// Add or remove one class token depending on `force`.
    pub fn class_list_toggle(&self, class: &str, force: bool) {
        let mut tokens: Vec<String> = self
            .class_name()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let present = tokens.iter().any(|token| token == class);

        if force && !present {
            tokens.push(class.to_string());
        } else if !force && present {
            tokens.retain(|token| token != class);
        } else {
            return;
        }
        self.set_class_name(&tokens.join(" "));
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    /// A snapshot of the child list.
    pub fn children(&self) -> Vec<Node> {
        self.inner.children.read().clone()
    }

    pub fn element_children(&self) -> Vec<Element> {
        self.inner
            .children
            .read()
            .iter()
            .filter_map(|child| child.as_element().cloned())
            .collect()
    }

    pub fn element_child_count(&self) -> usize {
        self.inner
            .children
            .read()
            .iter()
            .filter(|child| child.as_element().is_some())
            .count()
    }

    pub fn element_child(&self, index: usize) -> Option<Element> {
        self.inner
            .children
            .read()
            .iter()
            .filter_map(|child| child.as_element())
            .nth(index)
            .cloned()
    }

    pub fn first_element_child(&self) -> Option<Element> {
        self.element_child(0)
    }

    pub fn last_element_child(&self) -> Option<Element> {
        self.inner
            .children
            .read()
            .iter()
            .rev()
            .find_map(|child| child.as_element().cloned())
    }

    /// Append a node, detaching it from its current parent first.
    pub fn append_child(&self, child: impl Into<Node>) {
        let child = child.into();
        child.detach();
        child.set_parent_weak(Arc::downgrade(&self.inner));
        self.inner.children.write().push(child);
    }

    /// Insert `new_child` before `reference`; appends when `reference` is
    /// not among the children.
    pub fn insert_before(&self, new_child: impl Into<Node>, reference: &Node) {
        let new_child = new_child.into();
        new_child.detach();
        new_child.set_parent_weak(Arc::downgrade(&self.inner));

        let mut children = self.inner.children.write();
        match children.iter().position(|candidate| candidate == reference) {
            Some(position) => children.insert(position, new_child),
            None => children.push(new_child),
        }
    }

    pub fn remove_child(&self, child: &Node) {
        let removed = {
            let mut children = self.inner.children.write();
            match children.iter().position(|candidate| candidate == child) {
                Some(position) => {
                    children.remove(position);
                    true
                }
                None => false,
            }
        };
        if removed {
            child.clear_parent();
        }
    }

    fn replace_children(&self, new_children: Vec<Node>) {
        let old_children = std::mem::take(&mut *self.inner.children.write());
        for child in &old_children {
            child.clear_parent();
        }
        for child in new_children {
            self.append_child(child);
        }
    }

    /// Detach from the parent, if any.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(&Node::Element(self.clone()));
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.inner.parent.read().upgrade().map(Element::from_inner)
    }

    /// Whether the element is attached to the document.
    pub fn is_connected(&self) -> bool {
        let mut current = self.clone();
        loop {
            if current.inner.document_root {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The topmost ancestor (self when detached).
    pub fn root(&self) -> Element {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The nearest self-or-ancestor carrying `attribute_name`.
    pub fn closest(&self, attribute_name: &str) -> Option<Element> {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            if element.has_attribute(attribute_name) {
                return Some(element);
            }
            current = element.parent();
        }
        None
    }

    /// Every descendant element in document order.
    pub fn descendant_elements(&self) -> Vec<Element> {
        fn visit(element: &Element, out: &mut Vec<Element>) {
            for child in element.children() {
                if let Node::Element(child_element) = child {
                    out.push(child_element.clone());
                    visit(&child_element, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(self, &mut out);
        out
    }

    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<Element> {
        let tag = tag.to_ascii_lowercase();
        self.descendant_elements()
            .into_iter()
            .filter(|element| element.inner.tag == tag)
            .collect()
    }

    pub fn get_elements_by_class_name(&self, class: &str) -> Vec<Element> {
        self.descendant_elements()
            .into_iter()
            .filter(|element| element.class_list_contains(class))
            .collect()
    }

    /// A deep copy: tag, attributes, and subtree. Event listeners and live
    /// form state are not copied.
    pub fn clone_node_deep(&self) -> Element {
        let copy = Element::create(&self.inner.tag);
        *copy.inner.attributes.write() = self.inner.attributes.read().clone();
        for child in self.children() {
            match child {
                Node::Element(element) => copy.append_child(element.clone_node_deep()),
                Node::Text(text) => copy.append_child(TextNode::new(&text.data())),
            }
        }
        copy
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// The concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        fn collect(element: &Element, out: &mut String) {
            for child in element.children() {
                match child {
                    Node::Text(text) => out.push_str(&text.data()),
                    Node::Element(child_element) => collect(&child_element, out),
                }
            }
        }
        let mut out = String::new();
        collect(self, &mut out);
        out
    }

    /// Replace the child list with a single text node (or nothing for "").
    pub fn set_text_content(&self, text: &str) {
        let new_children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::Text(TextNode::new(text))]
        };
        self.replace_children(new_children);
    }

    /// Serialize the child list to markup.
    pub fn inner_html(&self) -> String {
        parser::serialize_children(self)
    }

    /// Replace the child list with parsed markup.
    pub fn set_inner_html(&self, html: &str) {
        self.replace_children(parser::parse_fragment(html));
    }

    // ------------------------------------------------------------------
    // Form state
    // ------------------------------------------------------------------

    pub fn checked(&self) -> bool {
        self.inner.form.read().checked
    }

    /// Set the checked flag. Checking a named radio clears the rest of its
    /// group, scoped to the tree this element is attached to.
    pub fn set_checked(&self, checked: bool) {
        if checked && self.inner.tag == "input" && self.input_type() == "radio" {
            let name = self.name();
            if !name.is_empty() {
                for other in self.root().descendant_elements() {
                    if other != *self
                        && other.inner.tag == "input"
                        && other.input_type() == "radio"
                        && other.name() == name
                    {
                        other.inner.form.write().checked = false;
                    }
                }
            }
        }
        self.inner.form.write().checked = checked;
    }

    pub fn disabled(&self) -> bool {
        self.inner.form.read().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.form.write().disabled = disabled;
    }

    pub fn selected(&self) -> bool {
        self.inner.form.read().selected
    }

    pub fn set_selected(&self, selected: bool) {
        self.inner.form.write().selected = selected;
    }

    /// The live value: for selects, the selected (or first) option's value;
    /// otherwise the value property, falling back to the `value` attribute.
    pub fn value(&self) -> String {
        match self.inner.tag.as_str() {
            "select" => {
                let options = self.options();
                options
                    .iter()
                    .find(|option| option.selected())
                    .or_else(|| options.first())
                    .map(|option| option.value())
                    .unwrap_or_default()
            }
            "option" => {
                let form_value = self.inner.form.read().value.clone();
                form_value
                    .or_else(|| self.attribute("value"))
                    .unwrap_or_else(|| self.text_content().trim().to_string())
            }
            _ => {
                let form_value = self.inner.form.read().value.clone();
                form_value
                    .or_else(|| self.attribute("value"))
                    .unwrap_or_default()
            }
        }
    }

    /// Write the live value. On a select this moves the selection to the
    /// first option with a matching value, clearing the others.
    pub fn set_value(&self, value: &str) {
        if self.inner.tag == "select" {
            let mut matched = false;
            for option in self.options() {
                let select_this = !matched && option.value() == value;
                if select_this {
                    matched = true;
                }
                option.set_selected(select_this);
            }
        } else {
            self.inner.form.write().value = Some(value.to_string());
        }
    }

    /// The `type` attribute, lowercased.
    pub fn input_type(&self) -> String {
        self.attribute("type")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// The `name` attribute.
    pub fn name(&self) -> String {
        self.attribute("name").unwrap_or_default()
    }

    /// All descendant `option` elements in document order.
    pub fn options(&self) -> Vec<Element> {
        self.get_elements_by_tag_name("option")
    }

    pub fn selected_options(&self) -> Vec<Element> {
        self.options()
            .into_iter()
            .filter(|option| option.selected())
            .collect()
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Write one of the narrow property set, coercing the value per
    /// property: content properties stringify, flag properties use
    /// truthiness. A non-string `InnerHtml` write is skipped.
    pub fn set_prop(&self, prop: Prop, value: &Value) {
        match prop {
            Prop::TextContent => self.set_text_content(&value.to_string()),
            Prop::InnerHtml => match value {
                Value::Str(html) => self.set_inner_html(html),
                other => {
                    warn!(found = other.type_name(), "ignoring non-string innerHTML write");
                }
            },
            Prop::ClassName => self.set_class_name(&value.to_string()),
            Prop::Disabled => self.set_disabled(value.truthy()),
            Prop::Checked => self.set_checked(value.truthy()),
            Prop::Selected => self.set_selected(value.truthy()),
            Prop::Value => self.set_value(&value.to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &self,
        kind: EventKind,
        handler: Arc<dyn Fn(&DomEvent) + Send + Sync>,
    ) -> EventListenerId {
        let id = EVENT_LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .push(EventListenerEntry { id, kind, handler });
        EventListenerId(id)
    }

    pub fn remove_event_listener(&self, id: EventListenerId) {
        self.inner.listeners.write().retain(|entry| entry.id != id.0);
    }

    /// Synchronously invoke every listener registered for `kind`.
    pub fn dispatch(&self, kind: EventKind) {
        let handlers: Vec<Arc<dyn Fn(&DomEvent) + Send + Sync>> = self
            .inner
            .listeners
            .read()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| Arc::clone(&entry.handler))
            .collect();

        let event = DomEvent {
            target: self.clone(),
            kind,
        };
        for handler in handlers {
            (handler.as_ref())(&event);
        }
    }

    /// Simulate user activation: checkboxes toggle, radios check, both then
    /// fire `change`.
    pub fn click(&self) {
        if self.inner.tag != "input" {
            return;
        }
        match self.input_type().as_str() {
            "checkbox" => {
                let next = !self.checked();
                self.set_checked(next);
                self.dispatch(EventKind::Change);
            }
            "radio" => {
                self.set_checked(true);
                self.dispatch(EventKind::Change);
            }
            _ => {}
        }
    }

    pub(crate) fn set_parent_weak(&self, parent: Weak<ElementInner>) {
        *self.inner.parent.write() = parent;
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.inner.tag)
            .field("attributes", &*self.inner.attributes.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::document::Document;
    use super::*;

    #[test]
    fn attributes_round_trip() {
        let document = Document::new();
        let div = document.create_element("div");

        div.set_attribute("title", "hello");
        assert_eq!(div.attribute("title"), Some("hello".to_string()));

        div.remove_attribute("title");
        assert!(!div.has_attribute("title"));
    }

    #[test]
    fn class_list_toggle_adds_and_removes_tokens() {
        let document = Document::new();
        let div = document.create_element("div");
        div.set_class_name("a b");

        div.class_list_toggle("c", true);
        assert_eq!(div.class_name(), "a b c");

        div.class_list_toggle("b", false);
        assert_eq!(div.class_name(), "a c");

        div.class_list_toggle("a", true); // already present
        assert_eq!(div.class_name(), "a c");
    }

    #[test]
    fn connectivity_follows_the_parent_chain() {
        let document = Document::new();
        let outer = document.create_element("div");
        let inner = document.create_element("span");
        outer.append_child(inner.clone());

        assert!(!inner.is_connected());

        document.body().append_child(outer.clone());
        assert!(inner.is_connected());

        outer.remove();
        assert!(!inner.is_connected());
    }

    #[test]
    fn append_reparents_the_node() {
        let document = Document::new();
        let first = document.create_element("div");
        let second = document.create_element("div");
        let child = document.create_element("span");

        first.append_child(child.clone());
        second.append_child(child.clone());

        assert_eq!(first.element_child_count(), 0);
        assert_eq!(second.element_child_count(), 1);
        assert_eq!(child.parent(), Some(second));
    }

    #[test]
    fn set_text_content_replaces_the_subtree() {
        let document = Document::new();
        let div = document.create_element("div");
        div.set_inner_html("<span>a</span><span>b</span>");
        assert_eq!(div.text_content(), "ab");

        div.set_text_content("plain");
        assert_eq!(div.children().len(), 1);
        assert_eq!(div.text_content(), "plain");
    }

    #[test]
    fn closest_finds_self_and_ancestors() {
        let document = Document::new();
        let outer = document.create_element("ul");
        let item = document.create_element("li");
        let span = document.create_element("span");
        outer.append_child(item.clone());
        item.append_child(span.clone());
        item.set_attribute("item-index", "0");

        assert_eq!(span.closest("item-index"), Some(item.clone()));
        assert_eq!(item.closest("item-index"), Some(item));
        assert_eq!(outer.closest("item-index"), None);
    }

    #[test]
    fn radio_group_is_exclusive_on_set_checked() {
        let document = Document::new();
        let radios: Vec<Element> = (0..3)
            .map(|i| {
                let radio = document.create_element("input");
                radio.set_attribute("type", "radio");
                radio.set_attribute("name", "group");
                radio.set_attribute("value", &i.to_string());
                document.body().append_child(radio.clone());
                radio
            })
            .collect();

        radios[0].set_checked(true);
        radios[2].set_checked(true);

        let states: Vec<bool> = radios.iter().map(Element::checked).collect();
        assert_eq!(states, vec![false, false, true]);
    }

    #[test]
    fn select_value_tracks_the_selected_option() {
        let document = Document::new();
        let select = document.create_element("select");
        for i in 0..3 {
            let option = document.create_element("option");
            option.set_attribute("value", &i.to_string());
            select.append_child(option);
        }

        // no explicit selection: first option wins
        assert_eq!(select.value(), "0");

        select.set_value("2");
        assert_eq!(select.value(), "2");
        assert_eq!(select.selected_options().len(), 1);

        select.set_value("missing");
        assert!(select.selected_options().is_empty());
    }

    #[test]
    fn clone_node_deep_copies_structure_but_not_identity() {
        let document = Document::new();
        let item = document.create_element("li");
        item.set_attribute("class", "row");
        item.set_inner_html("<span>x</span>");

        let copy = item.clone_node_deep();
        assert_ne!(copy, item);
        assert_eq!(copy.class_name(), "row");
        assert_eq!(copy.inner_html(), "<span>x</span>");
    }

    #[test]
    fn dispatch_reaches_matching_listeners_only() {
        let document = Document::new();
        let input = document.create_element("input");
        let fired = Arc::new(std::sync::atomic::AtomicI32::new(0));

        let fired_clone = fired.clone();
        let id = input.add_event_listener(
            EventKind::Change,
            Arc::new(move |_: &DomEvent| {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        input.dispatch(EventKind::Input);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        input.dispatch(EventKind::Change);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        input.remove_event_listener(id);
        input.dispatch(EventKind::Change);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
