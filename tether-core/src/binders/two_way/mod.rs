//! Two-Way Binders
//!
//! Each binder here wires both directions: a DOM event listener writing
//! user edits into the source, and a reactive subscription writing source
//! changes into the DOM. Loop prevention relies on the source's own
//! equality suppression: the echo of a DOM-originated write arrives as an
//! equal value and notifies nobody. Teardown (explicit or via
//! autodisconnect) removes the DOM listener and the subscription together.

mod checkbox;
mod input_value;
mod multiple_select;
mod radios;
mod select;

pub use checkbox::bind_to_checkbox;
pub use input_value::bind_to_input_value;
pub use multiple_select::bind_to_multiple_select;
pub use radios::bind_to_radios;
pub use select::bind_to_select_element;
