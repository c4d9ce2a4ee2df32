//! Binding Options
//!
//! Options merge in increasing precedence: library defaults, then the
//! structural defaults of a specific binder, then whatever the call site
//! passes. The layering is explicit: there is no process-wide mutable
//! default object; binder-specific option structs embed [`BindOptions`] and
//! add their own fields with their own `Default` impls.

use std::time::Duration;

/// Options shared by every binder.
#[derive(Debug, Clone)]
pub struct BindOptions {
    /// Debounce window applied to the reactive subscription. Zero delivers
    /// notifications synchronously.
    pub debounce_time: Duration,

    /// When set, a notification arriving after the bound node has left the
    /// document tears the subscription down instead of writing to the DOM.
    pub autodisconnect: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            debounce_time: Duration::ZERO,
            autodisconnect: false,
        }
    }
}

/// Options for [`bind_to_css_class`](crate::bind_to_css_class).
#[derive(Debug, Clone, Default)]
pub struct CssClassOptions {
    pub bind: BindOptions,

    /// When false (the default) the class is present iff the value is
    /// truthy; when true the polarity is inverted.
    pub remove_class: bool,
}

/// Options for [`bind_to_show`](crate::bind_to_show).
#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub bind: BindOptions,

    /// The class that hides the element.
    pub hide_class_name: String,

    /// Inherited css-class polarity; defaults to true so the hide class is
    /// present when the value is falsy.
    pub remove_class: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            bind: BindOptions::default(),
            hide_class_name: "d-none".to_string(),
            remove_class: true,
        }
    }
}

/// Options for [`bind_to_input_value`](crate::bind_to_input_value).
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    pub bind: BindOptions,

    /// When set, the DOM side listens for `change` (commit) instead of
    /// `input` (per keystroke). Number inputs are always lazy.
    pub lazy: bool,
}
