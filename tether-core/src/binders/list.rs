//! List Reconciliation Engine
//!
//! Keeps a container's element children index-aligned with a reactive
//! collection, without re-rendering the whole list.
//!
//! # How it works
//!
//! At bind time an [`ElementList`] captures its item factory (an explicit
//! creator function, or a deep clone of the container's first existing
//! child used as a template) and then discards the container's content
//! entirely. From then on only collection events drive the DOM:
//!
//! - `Replace` rebuilds every index (resize, then repopulate);
//! - `Resize` appends missing items through the factory, populating each
//!   new slot from the corresponding collection index, or removes items
//!   from the end;
//! - `Set` stamps the item's index-tracking attribute and hands an item
//!   descriptor to the user's setter, which alone decides which sub-parts
//!   of the DOM item change (commonly via [`get_diffs`]);
//! - `Remove` removes the DOM child at that index. Subsequent positions
//!   are not restamped immediately; the collection's follow-up
//!   `Set`/`Resize` events reconcile them.
//!
//! Item-level callbacks can recover "which row is this" through the
//! [`ListItemHelper`] lookups, which read the index-tracking attribute off
//! the nearest self-or-ancestor item element.

use std::hash::Hash;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use indexmap::IndexMap;
use tracing::debug;

use crate::diff::get_diffs;
use crate::dom::Element;
use crate::error::BindError;
use crate::options::BindOptions;
use crate::reactive::{Collection, ListChange, Unsubscriber};

/// Attribute stamped on every list item, tracking its index.
const ITEM_INDEX_ATTR: &str = "item-index";

/// Everything a list item setter needs to know about one update; built
/// fresh per call.
#[derive(Debug, Clone)]
pub struct ListItemSetterDetails<T> {
    /// The DOM item being updated.
    pub item_element: Element,
    pub index: usize,
    /// The collection value for this index.
    pub value: T,
    /// The previous value, when the update came from an indexed write.
    pub old_value: Option<T>,
    /// The collection's current length.
    pub length: usize,
}

/// Template access and row lookups handed to item factories and setters.
#[derive(Clone)]
pub struct ListItemHelper {
    template: Option<Element>,
}

impl ListItemHelper {
    fn new(template: Option<Element>) -> Self {
        Self { template }
    }

    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// A fresh deep clone of the captured template, if one exists.
    pub fn template(&self) -> Option<Element> {
        self.template.as_ref().map(Element::clone_node_deep)
    }

    /// The nearest self-or-ancestor element stamped as a list item.
    pub fn list_item(&self, node: &Element) -> Option<Element> {
        node.closest(ITEM_INDEX_ATTR)
    }

    /// Like [`ListItemHelper::list_item`], but tracking a custom attribute.
    pub fn list_item_by_attr(&self, node: &Element, attr_name: &str) -> Option<Element> {
        node.closest(attr_name)
    }

    /// The enclosing list item's current index, read off its stamp.
    pub fn list_item_index(&self, node: &Element) -> Option<usize> {
        self.list_item(node)?
            .attribute(ITEM_INDEX_ATTR)?
            .parse()
            .ok()
    }

    /// Delegates to [`get_diffs`] for per-key change detection.
    pub fn diffs<K, V>(
        &self,
        new_object: &IndexMap<K, V>,
        old_object: Option<&IndexMap<K, V>>,
        custom_compare: Option<&dyn Fn(&V, &V) -> bool>,
    ) -> IndexMap<K, bool>
    where
        K: Clone + Hash + Eq,
        V: PartialEq,
    {
        get_diffs(new_object, old_object, custom_compare)
    }
}

/// The index-aligned correspondence between collection positions and the
/// container's element children.
struct ElementList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    root: Element,
    collection: Collection<T>,
    item_value_setter: Box<dyn Fn(&ListItemHelper, &ListItemSetterDetails<T>) + Send + Sync>,
    item_creator: Box<dyn Fn(&ListItemHelper) -> Element + Send + Sync>,
    helper: ListItemHelper,
}

impl<T> ElementList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn new<F, C>(
        collection: &Collection<T>,
        element: &Element,
        item_value_setter: F,
        element_item_creator: Option<C>,
    ) -> Result<Self, BindError>
    where
        F: Fn(&ListItemHelper, &ListItemSetterDetails<T>) + Send + Sync + 'static,
        C: Fn(&ListItemHelper) -> Element + Send + Sync + 'static,
    {
        let template = element.first_element_child().map(|child| child.clone_node_deep());
        let helper = ListItemHelper::new(template.clone());

        // Only collection-driven state is authoritative from here on.
        element.set_inner_html("");

        let item_creator: Box<dyn Fn(&ListItemHelper) -> Element + Send + Sync> =
            match element_item_creator {
                Some(creator) => Box::new(move |helper| creator(helper)),
                None => {
                    let template = template.ok_or(BindError::MissingItemTemplate)?;
                    Box::new(move |_helper| template.clone_node_deep())
                }
            };

        Ok(Self {
            root: element.clone(),
            collection: collection.clone(),
            item_value_setter: Box::new(item_value_setter),
            item_creator,
            helper,
        })
    }

    /// Rebuild from a full array: resize, then repopulate every index.
    fn set_data(&self, values: &[T]) {
        self.set_element_list_size(values.len());
        for (index, value) in values.iter().enumerate() {
            self.set_element_item_value(index, value.clone(), None);
        }
    }

    /// Append missing items (populating each from the collection) or remove
    /// from the end until the child count matches `size`.
    fn set_element_list_size(&self, size: usize) {
        let current = self.root.element_child_count();
        if current == size {
            return;
        }
        debug!(current, size, "resizing element list");

        if current < size {
            let values = self.collection.get();
            for index in current..size {
                self.append_element_list_item(values.get(index).cloned(), index);
            }
        } else {
            for _ in size..current {
                self.remove_last_element_list_item();
            }
        }
    }

    /// Stamp the item at `index` and hand it to the user setter.
    fn set_element_item_value(&self, index: usize, value: T, old_value: Option<T>) {
        let Some(item_element) = self.root.element_child(index) else {
            return;
        };
        item_element.set_attribute(ITEM_INDEX_ATTR, &index.to_string());

        let details = ListItemSetterDetails {
            item_element,
            index,
            value,
            old_value,
            length: self.collection.len(),
        };
        (self.item_value_setter)(&self.helper, &details);
    }

    fn append_element_list_item(&self, value: Option<T>, index: usize) {
        let item_element = (self.item_creator)(&self.helper);
        self.root.append_child(item_element);

        if let Some(value) = value {
            self.set_element_item_value(index, value, None);
        }
    }

    fn remove_element_list_item(&self, index: usize) {
        if let Some(item) = self.root.element_child(index) {
            item.remove();
        }
    }

    fn remove_last_element_list_item(&self) {
        if let Some(item) = self.root.last_element_child() {
            item.remove();
        }
    }
}

/// Bind a collection to a container element, keeping one child element per
/// collection index.
///
/// Items are created through `element_item_creator` when given; otherwise
/// the container's first existing child is captured as a template and
/// cloned per item. With neither, the call fails. Either way the
/// container's existing content is discarded at bind time.
pub fn bind_to_list<T, F, C>(
    collection: &Collection<T>,
    list_element: &Element,
    item_value_setter: F,
    element_item_creator: Option<C>,
    options: &BindOptions,
) -> Result<Unsubscriber, BindError>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&ListItemHelper, &ListItemSetterDetails<T>) + Send + Sync + 'static,
    C: Fn(&ListItemHelper) -> Element + Send + Sync + 'static,
{
    let list = Arc::new(ElementList::new(
        collection,
        list_element,
        item_value_setter,
        element_item_creator,
    )?);
    list.set_data(&collection.get());

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let watched = list_element.clone();
    let autodisconnect = options.autodisconnect;

    let subscription = collection.subscribe(
        Arc::new(move |change: &ListChange<T>| {
            if autodisconnect && !watched.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }

            match change {
                ListChange::Replace { values } => list.set_data(values),
                ListChange::Resize { len } => list.set_element_list_size(*len),
                ListChange::Set {
                    index,
                    value,
                    old_value,
                } => list.set_element_item_value(*index, value.clone(), old_value.clone()),
                ListChange::Remove { index } => list.remove_element_list_item(*index),
            }
        }),
        Duration::ZERO,
    );

    let _ = handle.set(subscription.clone());
    Ok(subscription)
}
