//! Template Compiler
//!
//! Compiles tagged-template-style input (literal markup parts interleaved
//! with expressions) into a live DOM subtree with bindings already wired.
//!
//! # How compilation works
//!
//! 1. Literal parts and expressions are concatenated. Reactive expressions
//!    become numbered `{{i}}` tokens recorded in a transient index map;
//!    static expressions are stringified inline and never re-bound.
//! 2. The concatenated markup is parsed. Exactly one top-level node is
//!    required.
//! 3. One walk over the root and every descendant element and text node
//!    finds the placeholders:
//!    - a text node containing tokens is split into static and reactive
//!      segments, each reactive segment becoming its own text node wired
//!      through the text binder (tokens with unknown indices stay as
//!      literal text);
//!    - a `ref` attribute registers the element in the fragment's refs map;
//!    - an attribute whose entire value is one token is queued for
//!      directive dispatch.
//! 4. Directive dispatch by attribute name: `v-text`, `v-html`, `v-show`,
//!    `v-disabled` bind the corresponding binder and remove the directive
//!    attribute; any other attribute name binds the attribute binder under
//!    that name. Each directive requires a specific value type at
//!    resolution time; the first violation aborts the compile. Bindings
//!    already made by then are not torn down.
//! 5. Every binding's unsubscriber lands in the returned [`Fragment`].
//!
//! [`TemplateCompiler`] is the curried variant: it pre-binds a document and
//! an options object so repeated compilations share configuration.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::binders::{bind_to_attr, bind_to_disabled, bind_to_html, bind_to_show, bind_to_text};
use crate::dom::{Document, Element, Node};
use crate::error::BindError;
use crate::options::{BindOptions, ShowOptions};
use crate::reactive::{Atom, Change, Computed, Listener, Source, Unsubscriber};
use crate::value::{ToValue, Value};

/// The output of template compilation: the detached root node (the caller
/// inserts it into the document), the named element references, and the
/// composite teardown for every binding made during the compile.
pub struct Fragment {
    pub root: Node,
    /// Elements carrying a `ref` attribute, keyed by its value; last write
    /// wins on duplicates.
    pub refs: IndexMap<String, Element>,
    unsubscribers: Vec<Unsubscriber>,
}

impl Fragment {
    /// Tear down every binding created for this fragment.
    pub fn unsubscribe(&self) {
        for unsubscriber in &self.unsubscribers {
            unsubscriber.unsubscribe();
        }
    }

    /// The root, when it is an element.
    pub fn root_element(&self) -> Option<&Element> {
        self.root.as_element()
    }
}

/// Object-safe view of a reactive source on the dynamic surface.
trait ErasedValueSource: Send + Sync {
    fn value(&self) -> Value;
    fn subscribe_value(&self, listener: Listener<Value>, debounce: Duration) -> Unsubscriber;
}

struct SourceAdapter<S, T> {
    source: S,
    _value: PhantomData<fn() -> T>,
}

impl<S, T> ErasedValueSource for SourceAdapter<S, T>
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    fn value(&self) -> Value {
        self.source.get().to_value()
    }

    fn subscribe_value(&self, listener: Listener<Value>, debounce: Duration) -> Unsubscriber {
        self.source.subscribe(
            Arc::new(move |change: &Change<T>| {
                let mapped = Change {
                    value: change.value.to_value(),
                    old_value: change.old_value.as_ref().map(ToValue::to_value),
                };
                (listener.as_ref())(&mapped)
            }),
            debounce,
        )
    }
}

/// A type-erased reactive source of [`Value`]s, usable with any scalar
/// binder.
#[derive(Clone)]
pub struct DynSource {
    inner: Arc<dyn ErasedValueSource>,
}

impl DynSource {
    pub fn new<S, T>(source: &S) -> Self
    where
        S: Source<T> + Clone + 'static,
        T: ToValue + Clone + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(SourceAdapter {
                source: source.clone(),
                _value: PhantomData,
            }),
        }
    }
}

impl Source<Value> for DynSource {
    fn get(&self) -> Value {
        self.inner.value()
    }

    fn subscribe(&self, listener: Listener<Value>, debounce: Duration) -> Unsubscriber {
        self.inner.subscribe_value(listener, debounce)
    }
}

/// One expression slot of a template: a reactive source that becomes a live
/// binding, or a static value stringified inline.
pub enum TemplateExpr {
    Source(DynSource),
    Static(Value),
}

impl TemplateExpr {
    /// Wrap any reactive source.
    pub fn source<S, T>(source: &S) -> Self
    where
        S: Source<T> + Clone + 'static,
        T: ToValue + Clone + Send + Sync + 'static,
    {
        TemplateExpr::Source(DynSource::new(source))
    }

    /// Wrap a static value.
    pub fn value(value: impl Into<Value>) -> Self {
        TemplateExpr::Static(value.into())
    }
}

impl<T> From<&Atom<T>> for TemplateExpr
where
    T: ToValue + Clone + PartialEq + Send + Sync + 'static,
{
    fn from(source: &Atom<T>) -> Self {
        TemplateExpr::source(source)
    }
}

impl<T> From<&Computed<T>> for TemplateExpr
where
    T: ToValue + Clone + PartialEq + Send + Sync + 'static,
{
    fn from(source: &Computed<T>) -> Self {
        TemplateExpr::source(source)
    }
}

impl From<&DynSource> for TemplateExpr {
    fn from(source: &DynSource) -> Self {
        TemplateExpr::Source(source.clone())
    }
}

impl From<&str> for TemplateExpr {
    fn from(text: &str) -> Self {
        TemplateExpr::Static(Value::from(text))
    }
}

impl From<String> for TemplateExpr {
    fn from(text: String) -> Self {
        TemplateExpr::Static(Value::from(text))
    }
}

impl From<i64> for TemplateExpr {
    fn from(number: i64) -> Self {
        TemplateExpr::Static(Value::from(number))
    }
}

impl From<f64> for TemplateExpr {
    fn from(number: f64) -> Self {
        TemplateExpr::Static(Value::from(number))
    }
}

impl From<bool> for TemplateExpr {
    fn from(flag: bool) -> Self {
        TemplateExpr::Static(Value::from(flag))
    }
}

/// One piece of a placeholder-bearing text node.
enum Segment {
    Static(String),
    Reactive(DynSource),
}

/// Split text around `{{i}}` tokens, resolving each against the expression
/// map. Tokens with unknown indices stay as literal text.
fn split_placeholders(
    text: &str,
    storage: &HashMap<usize, DynSource>,
) -> (SmallVec<[Segment; 4]>, bool) {
    let mut segments: SmallVec<[Segment; 4]> = SmallVec::new();
    let mut any_reactive = false;
    let mut static_start = 0;
    let mut cursor = 0;

    while let Some(open_offset) = text[cursor..].find("{{") {
        let open = cursor + open_offset;
        let Some(close_offset) = text[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + close_offset;
        let token = &text[open + 2..close];

        if !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(index) = token.parse::<usize>() {
                segments.push(Segment::Static(text[static_start..open].to_string()));
                match storage.get(&index) {
                    Some(source) => {
                        any_reactive = true;
                        segments.push(Segment::Reactive(source.clone()));
                    }
                    None => {
                        segments.push(Segment::Static(text[open..close + 2].to_string()));
                    }
                }
                cursor = close + 2;
                static_start = cursor;
                continue;
            }
        }
        cursor = open + 2;
    }

    segments.push(Segment::Static(text[static_start..].to_string()));
    (segments, any_reactive)
}

/// The index of the placeholder token when `value` is exactly one token.
fn placeholder_index(value: &str) -> Option<usize> {
    let token = value.strip_prefix("{{")?.strip_suffix("}}")?;
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// The root and every descendant element and text node, in document order.
fn walk(root: &Node) -> Vec<Node> {
    fn visit(node: &Node, out: &mut Vec<Node>) {
        out.push(node.clone());
        if let Node::Element(element) = node {
            for child in element.children() {
                visit(&child, out);
            }
        }
    }
    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

fn is_text_like(value: &Value) -> bool {
    matches!(value, Value::Str(_) | Value::Num(_))
}

/// Compile a template into a live fragment.
///
/// `literals` are the markup parts around the expressions, so
/// `literals.len()` must be `expressions.len() + 1`, the shape a tagged
/// template literal produces.
pub fn html(
    document: &Document,
    literals: &[&str],
    expressions: Vec<TemplateExpr>,
    options: &BindOptions,
) -> Result<Fragment, BindError> {
    if literals.len() != expressions.len() + 1 {
        return Err(BindError::TemplateArity {
            literals: literals.len(),
            expressions: expressions.len(),
        });
    }

    // 1. Interleave literals and expressions into markup.
    let mut storage: HashMap<usize, DynSource> = HashMap::new();
    let mut markup = String::new();
    for (index, literal) in literals.iter().enumerate() {
        markup.push_str(literal);
        if let Some(expression) = expressions.get(index) {
            match expression {
                TemplateExpr::Source(source) => {
                    storage.insert(index, source.clone());
                    markup.push_str(&format!("{{{{{index}}}}}"));
                }
                TemplateExpr::Static(value) => markup.push_str(&value.to_string()),
            }
        }
    }

    // 2. Parse; exactly one top-level node.
    let mut nodes = document.parse_fragment(markup.trim());
    if nodes.len() != 1 {
        return Err(BindError::TemplateRootCount { found: nodes.len() });
    }
    let root = nodes.remove(0);

    // 3. Locate placeholders.
    let mut text_patches: Vec<(Node, SmallVec<[Segment; 4]>)> = Vec::new();
    let mut attr_patches: Vec<(Element, String, DynSource)> = Vec::new();
    let mut refs: IndexMap<String, Element> = IndexMap::new();

    for node in walk(&root) {
        match &node {
            Node::Text(text) => {
                let (segments, any_reactive) = split_placeholders(&text.data(), &storage);
                if any_reactive {
                    text_patches.push((node.clone(), segments));
                }
            }
            Node::Element(element) => {
                for (name, value) in element.attributes() {
                    if name == "ref" {
                        refs.insert(value, element.clone());
                        continue;
                    }
                    if let Some(index) = placeholder_index(&value) {
                        if let Some(source) = storage.get(&index) {
                            attr_patches.push((element.clone(), name, source.clone()));
                        }
                    }
                }
            }
        }
    }
    debug!(
        text_bindings = text_patches.len(),
        attribute_bindings = attr_patches.len(),
        refs = refs.len(),
        "compiled template"
    );

    let mut unsubscribers: Vec<Unsubscriber> = Vec::new();

    // 4. Split placeholder-bearing text nodes into static and live parts.
    for (original, segments) in text_patches {
        let Some(parent) = original.parent() else {
            continue;
        };
        for segment in segments {
            match segment {
                Segment::Static(content) => {
                    if !content.is_empty() {
                        parent.insert_before(document.create_text_node(&content), &original);
                    }
                }
                Segment::Reactive(source) => {
                    let value = source.get();
                    if !is_text_like(&value) {
                        return Err(BindError::TextType {
                            found: value.type_name(),
                        });
                    }
                    let live = document.create_text_node(&value.to_string());
                    let live_node = Node::Text(live);
                    unsubscribers.push(bind_to_text(&source, &live_node, options));
                    parent.insert_before(live_node, &original);
                }
            }
        }
        original.remove();
    }

    // 5. Directive dispatch for whole-attribute placeholders.
    for (element, name, source) in attr_patches {
        let value = source.get();
        match name.as_str() {
            "v-text" => {
                if !is_text_like(&value) {
                    return Err(BindError::DirectiveType {
                        directive: "v-text",
                        expected: "string or number",
                        found: value.type_name(),
                    });
                }
                unsubscribers.push(bind_to_text(&source, &Node::Element(element.clone()), options));
                element.remove_attribute("v-text");
            }
            "v-html" => {
                if value.as_str().is_none() {
                    return Err(BindError::DirectiveType {
                        directive: "v-html",
                        expected: "string",
                        found: value.type_name(),
                    });
                }
                unsubscribers.push(bind_to_html(&source, &element, options));
                element.remove_attribute("v-html");
            }
            "v-show" => {
                if !matches!(value, Value::Bool(_)) {
                    return Err(BindError::DirectiveType {
                        directive: "v-show",
                        expected: "boolean",
                        found: value.type_name(),
                    });
                }
                let show_options = ShowOptions {
                    bind: options.clone(),
                    ..ShowOptions::default()
                };
                unsubscribers.push(bind_to_show(&source, &element, &show_options));
                element.remove_attribute("v-show");
            }
            "v-disabled" => {
                if !matches!(value, Value::Bool(_)) {
                    return Err(BindError::DirectiveType {
                        directive: "v-disabled",
                        expected: "boolean",
                        found: value.type_name(),
                    });
                }
                unsubscribers.push(bind_to_disabled(&source, &element, options));
                element.remove_attribute("v-disabled");
            }
            _ => {
                if !matches!(value, Value::Str(_) | Value::Null) {
                    return Err(BindError::AttributeType {
                        name: name.clone(),
                        found: value.type_name(),
                    });
                }
                unsubscribers.push(bind_to_attr(&source, &element, &name, options));
            }
        }
    }

    Ok(Fragment {
        root,
        refs,
        unsubscribers,
    })
}

/// The curried compile entry point: a fixed document and options object
/// shared by repeated compilations.
#[derive(Clone)]
pub struct TemplateCompiler {
    document: Document,
    options: BindOptions,
}

impl TemplateCompiler {
    pub fn new(document: &Document, options: &BindOptions) -> Self {
        Self {
            document: document.clone(),
            options: options.clone(),
        }
    }

    pub fn compile(
        &self,
        literals: &[&str],
        expressions: Vec<TemplateExpr>,
    ) -> Result<Fragment, BindError> {
        html(&self.document, literals, expressions, &self.options)
    }
}
