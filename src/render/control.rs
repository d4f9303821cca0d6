//! Field renderer: one `InteractiveControl` per field descriptor.
//!
//! | kind                  | widget                          | value  |
//! |-----------------------|---------------------------------|--------|
//! | text, email           | single-line input               | string |
//! | textarea              | multi-line input                | string |
//! | select                | dropdown with a blank sentinel  | string |
//! | radio                 | choices grouped by field id     | string |
//! | checkbox              | toggle                          | bool   |
//!
//! Controls never write form state themselves. `InteractiveControl::handle`
//! turns raw input into a `FieldValue` and passes it to the caller's
//! `on_field_change`, which is the only writer.

use crate::error::{FormError, Result};
use crate::form::FieldValue;
use crate::schema::{FieldDescriptor, FieldKind};
use serde::Deserialize;

pub const UNSELECTED_LABEL: &str = "Select an option";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    TextInput {
        input_type: InputType,
        value: String,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
    },
    /// First choice is the blank "unselected" sentinel.
    Dropdown { choices: Vec<Choice> },
    RadioGroup { group: String, choices: Vec<Choice> },
    Toggle { checked: bool },
}

/// Raw input as it comes off a control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlInput {
    Text(String),
    Checked(bool),
    Choice(String),
}

impl ControlInput {
    fn describe(&self) -> String {
        match self {
            ControlInput::Text(_) => "text input".to_string(),
            ControlInput::Checked(_) => "a toggle".to_string(),
            ControlInput::Choice(v) => format!("choice '{}'", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveControl<'a> {
    pub field: &'a FieldDescriptor,
    /// Asterisk next to the label.
    pub required_marker: bool,
    pub widget: Widget,
    /// Inline message under the control.
    pub error: Option<String>,
}

/// Build the control for `field` showing `value` and `error`.
pub fn render<'a>(
    field: &'a FieldDescriptor,
    value: Option<&FieldValue>,
    error: Option<&str>,
) -> InteractiveControl<'a> {
    let text = value.and_then(FieldValue::as_text).unwrap_or("");

    let widget = match field.kind {
        FieldKind::Text | FieldKind::Email => Widget::TextInput {
            input_type: if field.kind == FieldKind::Email {
                InputType::Email
            } else {
                InputType::Text
            },
            value: text.to_string(),
            placeholder: field.placeholder.clone(),
        },
        FieldKind::Textarea => Widget::TextArea {
            value: text.to_string(),
            placeholder: field.placeholder.clone(),
        },
        FieldKind::Select => {
            let sentinel = Choice {
                value: String::new(),
                label: UNSELECTED_LABEL.to_string(),
                selected: text.is_empty(),
            };
            let mut choices = vec![sentinel];
            choices.extend(choices_for(field, text));
            Widget::Dropdown { choices }
        }
        FieldKind::Radio => Widget::RadioGroup {
            group: field.id.clone(),
            choices: choices_for(field, text),
        },
        FieldKind::Checkbox => Widget::Toggle {
            checked: value.and_then(FieldValue::as_bool).unwrap_or(false),
        },
    };

    InteractiveControl {
        field,
        required_marker: field.required,
        widget,
        error: error.filter(|e| !e.is_empty()).map(str::to_string),
    }
}

fn choices_for(field: &FieldDescriptor, selected: &str) -> Vec<Choice> {
    field
        .options()
        .iter()
        .map(|o| Choice {
            value: o.value.clone(),
            label: o.label.clone(),
            selected: !selected.is_empty() && o.value == selected,
        })
        .collect()
}

impl InteractiveControl<'_> {
    /// Convert `input` to this control's value type and pass it on.
    ///
    /// Input the control could not have produced (a toggle on a text box, a
    /// choice outside the option list) is refused and `on_field_change` is
    /// not called.
    pub fn handle<F>(&self, input: ControlInput, on_field_change: F) -> Result<()>
    where
        F: FnOnce(&FieldDescriptor, FieldValue),
    {
        let value = match (&self.widget, input) {
            (Widget::TextInput { .. } | Widget::TextArea { .. }, ControlInput::Text(s)) => {
                FieldValue::Text(s)
            }
            // The sentinel is "" and always selectable.
            (Widget::Dropdown { choices }, ControlInput::Choice(v))
                if choices.iter().any(|c| c.value == v) =>
            {
                FieldValue::Text(v)
            }
            (Widget::RadioGroup { choices, .. }, ControlInput::Choice(v))
                if choices.iter().any(|c| c.value == v) =>
            {
                FieldValue::Text(v)
            }
            (Widget::Toggle { .. }, ControlInput::Checked(b)) => FieldValue::Bool(b),
            (_, other) => {
                return Err(FormError::Input {
                    field: self.field.id.clone(),
                    input: other.describe(),
                });
            }
        };
        on_field_change(self.field, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChoiceOption, ValidationRule};
    use pretty_assertions::assert_eq;

    fn field(kind: FieldKind, options: Option<Vec<(&str, &str)>>) -> FieldDescriptor {
        FieldDescriptor {
            id: "f".to_string(),
            kind,
            label: "F".to_string(),
            required: true,
            placeholder: Some("type here".to_string()),
            validation: None,
            options: options.map(|os| {
                os.into_iter()
                    .map(|(v, l)| ChoiceOption {
                        value: v.to_string(),
                        label: l.to_string(),
                    })
                    .collect()
            }),
        }
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn text_like_kinds_render_text_inputs() {
        let email = field(FieldKind::Email, None);
        let c = render(&email, Some(&text("a@b.co")), None);
        assert_eq!(
            c.widget,
            Widget::TextInput {
                input_type: InputType::Email,
                value: "a@b.co".to_string(),
                placeholder: Some("type here".to_string()),
            }
        );
        assert!(c.required_marker);

        let area = field(FieldKind::Textarea, None);
        assert!(matches!(
            render(&area, None, None).widget,
            Widget::TextArea { ref value, .. } if value.is_empty()
        ));
    }

    #[test]
    fn select_has_sentinel_and_marks_selection() {
        let f = field(FieldKind::Select, Some(vec![("us", "United States"), ("ca", "Canada")]));
        let Widget::Dropdown { choices } = render(&f, Some(&text("ca")), None).widget else {
            panic!("expected dropdown");
        };
        let summary: Vec<(&str, bool)> = choices
            .iter()
            .map(|c| (c.value.as_str(), c.selected))
            .collect();
        assert_eq!(summary, vec![("", false), ("us", false), ("ca", true)]);
        assert_eq!(choices[0].label, UNSELECTED_LABEL);
    }

    #[test]
    fn select_without_options_is_only_the_sentinel() {
        let f = field(FieldKind::Select, None);
        let Widget::Dropdown { choices } = render(&f, None, None).widget else {
            panic!("expected dropdown");
        };
        assert_eq!(choices.len(), 1);
        assert!(choices[0].selected);
    }

    #[test]
    fn radio_groups_by_field_id() {
        let f = field(FieldKind::Radio, Some(vec![("email", "Email"), ("phone", "Phone")]));
        let Widget::RadioGroup { group, choices } = render(&f, None, None).widget else {
            panic!("expected radio group");
        };
        assert_eq!(group, "f");
        assert!(choices.iter().all(|c| !c.selected));

        let empty = field(FieldKind::Radio, None);
        assert_eq!(
            render(&empty, None, None).widget,
            Widget::RadioGroup { group: "f".to_string(), choices: vec![] }
        );
    }

    #[test]
    fn checkbox_reads_boolean_value() {
        let f = field(FieldKind::Checkbox, None);
        assert_eq!(render(&f, None, None).widget, Widget::Toggle { checked: false });
        assert_eq!(
            render(&f, Some(&FieldValue::Bool(true)), None).widget,
            Widget::Toggle { checked: true }
        );
    }

    #[test]
    fn empty_error_is_not_shown() {
        let f = field(FieldKind::Text, None);
        assert_eq!(render(&f, None, Some("")).error, None);
        assert_eq!(render(&f, None, Some("bad")).error.as_deref(), Some("bad"));
    }

    #[test]
    fn every_kind_reports_through_one_callback() {
        let cases = [
            (field(FieldKind::Text, None), ControlInput::Text("x".into()), text("x")),
            (field(FieldKind::Textarea, None), ControlInput::Text("y".into()), text("y")),
            (
                field(FieldKind::Select, Some(vec![("a", "A")])),
                ControlInput::Choice("a".into()),
                text("a"),
            ),
            (
                field(FieldKind::Select, Some(vec![("a", "A")])),
                ControlInput::Choice("".into()),
                text(""),
            ),
            (
                field(FieldKind::Radio, Some(vec![("b", "B")])),
                ControlInput::Choice("b".into()),
                text("b"),
            ),
            (field(FieldKind::Checkbox, None), ControlInput::Checked(true), FieldValue::Bool(true)),
        ];
        for (f, input, expected) in cases {
            let mut seen = None;
            render(&f, None, None)
                .handle(input, |field, value| seen = Some((field.id.clone(), value)))
                .unwrap();
            assert_eq!(seen, Some(("f".to_string(), expected)));
        }
    }

    #[test]
    fn mismatched_input_is_refused() {
        let radio = field(FieldKind::Radio, Some(vec![("b", "B")]));
        let mut called = false;
        let err = render(&radio, None, None)
            .handle(ControlInput::Choice("z".into()), |_, _| called = true)
            .unwrap_err();
        assert!(!called);
        assert_eq!(err.to_string(), "field 'f' cannot accept choice 'z'");

        let mut rule_field = field(FieldKind::Text, None);
        rule_field.validation = Some(ValidationRule {
            pattern: ".".to_string(),
            message: "m".to_string(),
        });
        assert!(
            render(&rule_field, None, None)
                .handle(ControlInput::Checked(true), |_, _| {})
                .is_err()
        );
    }
}
