//! Integration Tests for the Binding Layer
//!
//! These tests drive the binders, the list engine, and the template
//! compiler together against the in-memory document, covering the
//! end-to-end scenarios the crate promises: idempotent initial sync,
//! debounce coalescing, autodisconnect, list reconciliation, two-way round
//! trips, and live template fragments.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indexmap::IndexMap;

use tether_core::{
    bind_to_attr, bind_to_checkbox, bind_to_checkbox_values, bind_to_class_name,
    bind_to_css_class, bind_to_disabled, bind_to_html, bind_to_input_value, bind_to_list,
    bind_to_multiple_select, bind_to_property, bind_to_radios, bind_to_select_element,
    bind_to_show, bind_to_text, get_diffs, html, Atom, BindOptions, Collection, Computed,
    CssClassOptions, Document, Element, EventKind, InputOptions, ListItemHelper,
    ListItemSetterDetails, Node, Prop, ShowOptions, TemplateCompiler, TemplateExpr, Value,
};

fn defaults() -> BindOptions {
    BindOptions::default()
}

fn autodisconnecting() -> BindOptions {
    BindOptions {
        autodisconnect: true,
        ..BindOptions::default()
    }
}

fn selected_values(select: &Element) -> Vec<String> {
    select
        .selected_options()
        .iter()
        .map(Element::value)
        .collect()
}

/// Initial sync happens inside the bind call; no event is required.
#[test]
fn attribute_binding_syncs_immediately_and_tracks_changes() {
    let document = Document::new();
    let div = document.create_element("div");
    document.body().append_child(div.clone());

    let atom = Atom::new(Some("test-value".to_string()));
    bind_to_attr(&atom, &div, "test", &autodisconnecting());

    assert_eq!(div.attribute("test"), Some("test-value".to_string()));

    atom.set(Some("123".to_string()));
    assert_eq!(div.attribute("test"), Some("123".to_string()));
}

/// A null value removes the attribute entirely.
#[test]
fn attribute_binding_removes_on_null() {
    let document = Document::new();
    let div = document.create_element("div");
    document.body().append_child(div.clone());

    let atom = Atom::new(Some("test-value".to_string()));
    bind_to_attr(&atom, &div, "test", &defaults());

    atom.set(None);
    assert!(!div.has_attribute("test"));
}

/// Once the element has left the document, the next notification
/// unsubscribes instead of writing, and stays unsubscribed.
#[test]
fn autodisconnect_stops_writes_after_removal() {
    let document = Document::new();
    let div = document.create_element("div");
    document.body().append_child(div.clone());

    let atom = Atom::new(Some("first".to_string()));
    bind_to_attr(&atom, &div, "test", &autodisconnecting());

    div.remove();
    atom.set(Some("second".to_string()));
    assert_eq!(div.attribute("test"), Some("first".to_string()));

    // even if the element is re-attached, the binding is gone
    document.body().append_child(div.clone());
    atom.set(Some("third".to_string()));
    assert_eq!(div.attribute("test"), Some("first".to_string()));
}

/// Show binder defaults: class `d-none` present exactly while the value is
/// falsy.
#[test]
fn show_binder_toggles_the_hide_class() {
    let document = Document::new();
    let div = document.create_element("div");
    document.body().append_child(div.clone());

    let visible = Atom::new(true);
    bind_to_show(&visible, &div, &ShowOptions::default());
    assert!(!div.class_list_contains("d-none"));

    visible.set(false);
    assert!(div.class_list_contains("d-none"));

    visible.set(true);
    assert!(!div.class_list_contains("d-none"));
}

/// A custom hide class and other classes on the element are preserved.
#[test]
fn show_binder_respects_a_custom_hide_class() {
    let document = Document::new();
    let div = document.create_element("div");
    div.set_class_name("keep-me");
    document.body().append_child(div.clone());

    let visible = Atom::new(false);
    let options = ShowOptions {
        hide_class_name: "hidden".to_string(),
        ..ShowOptions::default()
    };
    bind_to_show(&visible, &div, &options);

    assert!(div.class_list_contains("hidden"));
    assert!(div.class_list_contains("keep-me"));
}

/// Default css-class polarity: class present iff value truthy; the
/// `remove_class` option inverts it.
#[test]
fn css_class_binder_polarity() {
    let document = Document::new();
    let direct = document.create_element("div");
    let inverted = document.create_element("div");

    let flag = Atom::new(true);
    bind_to_css_class(&flag, &direct, "active", &CssClassOptions::default());
    bind_to_css_class(
        &flag,
        &inverted,
        "inactive",
        &CssClassOptions {
            remove_class: true,
            ..CssClassOptions::default()
        },
    );

    assert!(direct.class_list_contains("active"));
    assert!(!inverted.class_list_contains("inactive"));

    flag.set(false);
    assert!(!direct.class_list_contains("active"));
    assert!(inverted.class_list_contains("inactive"));
}

/// The className binder replaces the whole class attribute.
#[test]
fn class_name_binder_overwrites() {
    let document = Document::new();
    let div = document.create_element("div");

    let class = Atom::new("class_0".to_string());
    bind_to_class_name(&class, &div, &defaults());
    assert_eq!(div.class_name(), "class_0");

    class.set("class_1".to_string());
    assert_eq!(div.class_name(), "class_1");
}

/// The html binder re-parses markup into the element on every change.
#[test]
fn html_binder_replaces_content() {
    let document = Document::new();
    let div = document.create_element("div");

    let markup = Atom::new(r#"<span class="test">123</span>"#.to_string());
    bind_to_html(&markup, &div, &defaults());

    assert_eq!(div.get_elements_by_class_name("test").len(), 1);
    assert_eq!(div.text_content(), "123");

    markup.set("<b>x</b>".to_string());
    assert_eq!(div.inner_html(), "<b>x</b>");
}

/// The disabled binder drives the form-control flag.
#[test]
fn disabled_binder_follows_the_source() {
    let document = Document::new();
    let button = document.create_element("button");

    let disabled = Atom::new(true);
    bind_to_disabled(&disabled, &button, &defaults());
    assert!(button.disabled());

    disabled.set(false);
    assert!(!button.disabled());
}

/// The property binder addresses the narrow property surface directly.
#[test]
fn property_binder_writes_the_selected_prop() {
    let document = Document::new();
    let input = document.create_element("input");

    let checked = Atom::new(true);
    bind_to_property(&checked, &input, Prop::Checked, &defaults());
    assert!(input.checked());

    checked.set(false);
    assert!(!input.checked());
}

/// A computed feeds a one-way binder like any other source.
#[test]
fn computed_drives_a_text_binding() {
    let document = Document::new();
    let span = document.create_element("span");

    let first = Atom::new("Ada".to_string());
    let last = Atom::new("Lovelace".to_string());
    let full = {
        let (first, last) = (first.clone(), last.clone());
        let (first_dep, last_dep) = (first.clone(), last.clone());
        Computed::new(
            move || format!("{} {}", first.get(), last.get()),
            &[&first_dep, &last_dep],
        )
    };

    bind_to_text(&full, &Node::Element(span.clone()), &defaults());
    assert_eq!(span.text_content(), "Ada Lovelace");

    first.set("Grace".to_string());
    assert_eq!(span.text_content(), "Grace Lovelace");
}

/// Rapid mutations within the debounce window collapse to one trailing
/// write reflecting the final value.
#[test]
fn debounced_binding_coalesces_rapid_writes() {
    let document = Document::new();
    let span = document.create_element("span");

    let text = Atom::new("start".to_string());
    let options = BindOptions {
        debounce_time: Duration::from_millis(40),
        ..BindOptions::default()
    };
    bind_to_text(&text, &Node::Element(span.clone()), &options);
    assert_eq!(span.text_content(), "start");

    text.set("a".to_string());
    text.set("b".to_string());
    text.set("c".to_string());
    // still within the quiescence window
    assert_eq!(span.text_content(), "start");

    thread::sleep(Duration::from_millis(150));
    assert_eq!(span.text_content(), "c");
}

/// Unsubscribing detaches the binding; further writes change nothing, and
/// a second unsubscribe is harmless.
#[test]
fn unsubscribe_is_final_and_idempotent() {
    let document = Document::new();
    let span = document.create_element("span");

    let text = Atom::new("one".to_string());
    let unsubscriber = bind_to_text(&text, &Node::Element(span.clone()), &defaults());

    text.set("two".to_string());
    assert_eq!(span.text_content(), "two");

    unsubscriber.unsubscribe();
    unsubscriber.unsubscribe();
    text.set("three".to_string());
    assert_eq!(span.text_content(), "two");
}

/// An empty list bound with a template grows to three items and shrinks
/// back, contents index-aligned.
#[test]
fn list_tracks_push_and_pop() {
    let document = Document::new();
    let container = document.create_element("div");
    document.body().append_child(container.clone());
    container.set_inner_html("<span></span>");

    let collection = Collection::new(Vec::<String>::new());
    bind_to_list(
        &collection,
        &container,
        |_helper: &ListItemHelper, details: &ListItemSetterDetails<String>| {
            details.item_element.set_text_content(&details.value);
        },
        None::<fn(&ListItemHelper) -> Element>,
        &defaults(),
    )
    .expect("bind");

    collection.push("1".to_string());
    collection.push("2".to_string());
    collection.push("3".to_string());

    let texts: Vec<String> = container
        .element_children()
        .iter()
        .map(Element::text_content)
        .collect();
    assert_eq!(texts, vec!["1", "2", "3"]);

    collection.pop();
    let texts: Vec<String> = container
        .element_children()
        .iter()
        .map(Element::text_content)
        .collect();
    assert_eq!(texts, vec!["1", "2"]);
}

/// Updating one index touches only that item, and the diff helper reports
/// exactly the changed keys.
#[test]
fn list_item_updates_are_scoped_by_diffs() {
    type Row = IndexMap<String, String>;
    fn row(a: &str, b: &str) -> Row {
        IndexMap::from([
            ("a".to_string(), a.to_string()),
            ("b".to_string(), b.to_string()),
        ])
    }

    let document = Document::new();
    let container = document.create_element("div");
    document.body().append_child(container.clone());
    container.set_inner_html(
        r#"<p class="row"><span class="a"></span><span class="b"></span></p>"#,
    );

    let collection = Collection::new(Vec::<Row>::new());
    let writes = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let writes_clone = writes.clone();

    bind_to_list(
        &collection,
        &container,
        move |_helper: &ListItemHelper, details: &ListItemSetterDetails<Row>| {
            let diffs = get_diffs(&details.value, details.old_value.as_ref(), None);
            if diffs["a"] {
                let cell = details.item_element.get_elements_by_class_name("a")[0].clone();
                cell.set_text_content(&details.value["a"]);
                writes_clone.lock().push((details.index, "a"));
            }
            if diffs["b"] {
                let cell = details.item_element.get_elements_by_class_name("b")[0].clone();
                cell.set_text_content(&details.value["b"]);
                writes_clone.lock().push((details.index, "b"));
            }
        },
        None::<fn(&ListItemHelper) -> Element>,
        &defaults(),
    )
    .expect("bind");

    collection.set(vec![row("1", "x"), row("2", "y")]);
    writes.lock().clear();

    collection.update_item(1, row("2", "z"));

    assert_eq!(*writes.lock(), vec![(1, "b")]);
    let rows = container.get_elements_by_class_name("row");
    assert_eq!(rows[0].text_content(), "1x");
    assert_eq!(rows[1].text_content(), "2z");
}

/// Multi-select selection follows the collection through replacement,
/// splice, and pops, and user changes flow back.
#[test]
fn multiple_select_round_trip() {
    let document = Document::new();
    let select = document.create_element("select");
    select.set_attribute("multiple", "");
    for i in 0..10 {
        let option = document.create_element("option");
        option.set_attribute("value", &i.to_string());
        select.append_child(option);
    }
    document.body().append_child(select.clone());

    let collection = Collection::new(vec!["2".to_string()]);
    bind_to_multiple_select(&collection, &select, &autodisconnecting());
    assert_eq!(selected_values(&select), vec!["2"]);

    collection.set(vec!["0".to_string(), "1".to_string(), "5".to_string()]);
    assert_eq!(selected_values(&select), vec!["0", "1", "5"]);

    collection.splice(1, 1, Vec::new());
    assert_eq!(selected_values(&select), vec!["0", "5"]);

    collection.pop();
    assert_eq!(selected_values(&select), vec!["0"]);

    collection.pop();
    assert!(selected_values(&select).is_empty());

    // user selects option "4"
    select.options()[4].set_selected(true);
    select.dispatch(EventKind::Change);
    assert_eq!(collection.get(), vec!["4".to_string()]);

    // detached element: the next notification unsubscribes without writing
    select.remove();
    collection.set(vec!["5".to_string(), "6".to_string()]);
    assert_eq!(selected_values(&select), vec!["4"]);
}

/// Checkbox two-way round trip.
#[test]
fn checkbox_round_trip() {
    let document = Document::new();
    let checkbox = document.create_element("input");
    checkbox.set_attribute("type", "checkbox");
    document.body().append_child(checkbox.clone());

    let atom = Atom::new(true);
    bind_to_checkbox(&atom, &checkbox, &defaults());
    assert!(checkbox.checked());

    atom.set(false);
    assert!(!checkbox.checked());

    checkbox.click();
    assert!(atom.get());

    checkbox.click();
    assert!(!atom.get());
}

/// Checkbox group: membership drives checks, checks drive membership.
#[test]
fn checkbox_group_round_trip() {
    let document = Document::new();
    let checkboxes: Vec<Element> = (0..4)
        .map(|i| {
            let checkbox = document.create_element("input");
            checkbox.set_attribute("type", "checkbox");
            checkbox.set_attribute("value", &i.to_string());
            document.body().append_child(checkbox.clone());
            checkbox
        })
        .collect();

    let collection = Collection::new(vec!["1".to_string(), "3".to_string()]);
    bind_to_checkbox_values(&collection, &checkboxes, &defaults());

    let states: Vec<bool> = checkboxes.iter().map(Element::checked).collect();
    assert_eq!(states, vec![false, true, false, true]);

    collection.set(vec!["0".to_string()]);
    let states: Vec<bool> = checkboxes.iter().map(Element::checked).collect();
    assert_eq!(states, vec![true, false, false, false]);

    checkboxes[2].click();
    assert_eq!(collection.get(), vec!["0".to_string(), "2".to_string()]);
}

/// A radio group follows the source exclusively, and user activation flows
/// back.
#[test]
fn radio_group_round_trip() {
    let document = Document::new();
    let radios: Vec<Element> = (0..10)
        .map(|i| {
            let radio = document.create_element("input");
            radio.set_attribute("type", "radio");
            radio.set_attribute("name", "yo");
            radio.set_attribute("value", &i.to_string());
            document.body().append_child(radio.clone());
            radio
        })
        .collect();

    let current = Atom::new("8".to_string());
    bind_to_radios(&current, &radios, &defaults());

    let states: Vec<bool> = radios.iter().map(Element::checked).collect();
    assert_eq!(states.iter().filter(|checked| **checked).count(), 1);
    assert!(states[8]);

    current.set("1".to_string());
    let states: Vec<bool> = radios.iter().map(Element::checked).collect();
    assert_eq!(states.iter().filter(|checked| **checked).count(), 1);
    assert!(states[1]);

    radios[4].click();
    assert_eq!(current.get(), "4");
}

/// An empty radio list or group name binds to nothing, harmlessly.
#[test]
fn radio_group_without_name_is_a_noop() {
    let document = Document::new();
    let unnamed = document.create_element("input");
    unnamed.set_attribute("type", "radio");

    let current = Atom::new("1".to_string());
    let unsubscriber = bind_to_radios(&current, &[unnamed.clone()], &defaults());
    unsubscriber.unsubscribe();

    let none: Vec<Element> = Vec::new();
    let unsubscriber = bind_to_radios(&current, &none, &defaults());
    unsubscriber.unsubscribe();

    assert!(!unnamed.checked());
}

/// Single select: source moves the selection, changes flow back.
#[test]
fn single_select_round_trip() {
    let document = Document::new();
    let select = document.create_element("select");
    for i in 0..10 {
        let option = document.create_element("option");
        option.set_attribute("value", &i.to_string());
        select.append_child(option);
    }
    document.body().append_child(select.clone());

    let atom = Atom::new("2".to_string());
    bind_to_select_element(&atom, &select, &defaults());
    assert_eq!(select.value(), "2");

    atom.set("0".to_string());
    assert_eq!(select.value(), "0");

    select.set_value("1");
    select.dispatch(EventKind::Change);
    assert_eq!(atom.get(), "1");
}

/// Text input: source writes the value, keystrokes write back.
#[test]
fn input_value_round_trip() {
    let document = Document::new();
    let input = document.create_element("input");
    input.set_attribute("type", "text");
    document.body().append_child(input.clone());

    let atom = Atom::new("wow".to_string());
    bind_to_input_value(&atom, &input, &InputOptions::default());
    assert_eq!(input.value(), "wow");

    atom.set("321".to_string());
    assert_eq!(input.value(), "321");

    input.set_value("hello");
    input.dispatch(EventKind::Input);
    assert_eq!(atom.get(), "hello");
}

/// Number input: forced lazy, float-parsed, and a non-numeric entry lands
/// as NaN in the source.
#[test]
fn number_input_parses_floats_and_accepts_nan() {
    let document = Document::new();
    let input = document.create_element("input");
    input.set_attribute("type", "number");
    document.body().append_child(input.clone());

    let atom = Atom::new(1024.0_f64);
    bind_to_input_value(&atom, &input, &InputOptions::default());
    assert_eq!(input.value(), "1024");

    atom.set(321.0);
    assert_eq!(input.value(), "321");

    input.set_value("1000");
    input.dispatch(EventKind::Change);
    assert_eq!(atom.get(), 1000.0);

    input.set_value("hello");
    input.dispatch(EventKind::Change);
    assert!(atom.get().is_nan());
}

/// Number inputs commit on change, not per keystroke, even when lazy is
/// explicitly off.
#[test]
fn number_input_ignores_per_keystroke_events() {
    let document = Document::new();
    let input = document.create_element("input");
    input.set_attribute("type", "number");
    document.body().append_child(input.clone());

    let atom = Atom::new(1.0_f64);
    bind_to_input_value(
        &atom,
        &input,
        &InputOptions {
            lazy: false,
            ..InputOptions::default()
        },
    );

    input.set_value("2");
    input.dispatch(EventKind::Input);
    assert_eq!(atom.get(), 1.0);

    input.dispatch(EventKind::Change);
    assert_eq!(atom.get(), 2.0);
}

/// A compiled fragment exposes refs and keeps its text binding live
/// without reparsing.
#[test]
fn template_fragment_is_live() {
    let document = Document::new();
    let greeting = Atom::new("hi".to_string());

    let fragment = html(
        &document,
        &["<span ref=\"tmp\">", "</span>"],
        vec![TemplateExpr::from(&greeting)],
        &defaults(),
    )
    .expect("compile");

    document.body().append_child(fragment.root.clone());
    assert_eq!(fragment.refs["tmp"].text_content(), "hi");

    greeting.set("bye".to_string());
    assert_eq!(fragment.refs["tmp"].text_content(), "bye");

    fragment.unsubscribe();
    greeting.set("gone".to_string());
    assert_eq!(fragment.refs["tmp"].text_content(), "bye");
}

/// The curried compiler pre-binds document and options; mixed static and
/// reactive expressions land where they should.
#[test]
fn template_compiler_handles_mixed_expressions() {
    let document = Document::new();
    let class = Atom::new("test_class".to_string());
    let label = Atom::new("test_class".to_string());

    let compiler = TemplateCompiler::new(&document, &defaults());
    let fragment = compiler
        .compile(
            &[
                "\n<strong class=\"text-danger\" fail=\"{{1231231}}\">\n  <span ref=\"tmp\" class=\"",
                "\">",
                "",
                " sasa</span>\n</strong>",
            ],
            vec![
                TemplateExpr::from(&class),
                TemplateExpr::from(&label),
                TemplateExpr::from(2_i64),
            ],
        )
        .expect("compile");

    document.body().append_child(fragment.root.clone());

    class.set("lalalalla".to_string());
    label.set("12345".to_string());

    assert_eq!(fragment.refs["tmp"].class_name(), "lalalalla");
    assert_eq!(fragment.refs["tmp"].text_content(), "123452 sasa");

    // unresolved token stays literal on the untouched attribute
    let root = fragment.root_element().expect("element root");
    assert_eq!(root.attribute("fail"), Some("{{1231231}}".to_string()));
}

/// Directive dispatch: v-show and v-disabled bind and strip their
/// attributes.
#[test]
fn template_directives_bind_and_strip() {
    let document = Document::new();
    let visible = Atom::new(false);
    let disabled = Atom::new(true);

    let fragment = html(
        &document,
        &["<button v-show=\"", "\" v-disabled=\"", "\">go</button>"],
        vec![TemplateExpr::from(&visible), TemplateExpr::from(&disabled)],
        &defaults(),
    )
    .expect("compile");

    let button = fragment.root_element().expect("element root").clone();
    assert!(!button.has_attribute("v-show"));
    assert!(!button.has_attribute("v-disabled"));
    assert!(button.class_list_contains("d-none"));
    assert!(button.disabled());

    visible.set(true);
    disabled.set(false);
    assert!(!button.class_list_contains("d-none"));
    assert!(!button.disabled());
}

/// v-text drives an element's text content through a directive.
#[test]
fn template_v_text_directive() {
    let document = Document::new();
    let label = Atom::new(Value::Num(7.0));

    let fragment = html(
        &document,
        &["<span v-text=\"", "\">placeholder</span>"],
        vec![TemplateExpr::from(&label)],
        &defaults(),
    )
    .expect("compile");

    let span = fragment.root_element().expect("element root").clone();
    assert_eq!(span.text_content(), "7");

    label.set(Value::Str("seven".to_string()));
    assert_eq!(span.text_content(), "seven");
}
