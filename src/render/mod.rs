//! Rendering: field descriptors to controls, and controls to an HTML page.

pub mod control;
pub mod html;

pub use control::{
    Choice, ControlInput, InputType, InteractiveControl, UNSELECTED_LABEL, Widget, render,
};
pub use html::{PageModel, render_page};
