//! Element Binders
//!
//! A binder establishes and maintains a live synchronization between one
//! reactive source and one DOM target aspect. One-way binders are setter
//! policies over the shared [`binder`] core; two-way binders additionally
//! wire a DOM event listener and write user edits back into the source.
//!
//! Every binder returns an [`Unsubscriber`](crate::reactive::Unsubscriber)
//! tearing down the reactive subscription and, for two-way binders, the DOM
//! event listener wired alongside it.

mod attribute;
mod binder;
mod checkboxes_values;
mod class_name;
mod css_class;
mod disabled;
mod html;
mod list;
mod property;
mod show;
mod text;
mod two_way;

pub use attribute::bind_to_attr;
pub use checkboxes_values::bind_to_checkbox_values;
pub use class_name::bind_to_class_name;
pub use css_class::bind_to_css_class;
pub use disabled::bind_to_disabled;
pub use html::bind_to_html;
pub use list::{bind_to_list, ListItemHelper, ListItemSetterDetails};
pub use property::bind_to_property;
pub use show::bind_to_show;
pub use text::bind_to_text;
pub use two_way::{
    bind_to_checkbox, bind_to_input_value, bind_to_multiple_select, bind_to_radios,
    bind_to_select_element,
};
