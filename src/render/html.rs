use crate::form::{FieldErrors, FormState};
use crate::render::control::{Choice, InteractiveControl, Widget, render};
use crate::schema::{SchemaDocument, ViolationList};
use crate::theme::Theme;

/// Everything the preview page shows.
pub struct PageModel<'a> {
    /// The active document, or why there is none.
    pub document: Result<&'a SchemaDocument, &'a ViolationList>,
    pub values: &'a FormState,
    pub errors: &'a FieldErrors,
    pub notice: Option<&'a str>,
    pub theme: Theme,
    pub submissions: usize,
}

/// Render a self-contained HTML preview of the form (or the schema errors).
///
/// Important: we avoid `format!()` for the page shell because the CSS is full
/// of `{}`, which would conflict with Rust formatting.
pub fn render_page(page: &PageModel<'_>) -> String {
    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  body.light { background: #fff; color: #222; }
  body.dark { background: #1b1d21; color: #e6e6e6; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  main { max-width: 640px; margin: 0 auto; padding: 16px; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; font-size: 13px; }
  .field { margin-bottom: 16px; display: flex; flex-direction: column; gap: 4px; }
  .field input[type=text], .field input[type=email], .field textarea, .field select {
    padding: 6px 8px; border: 1px solid #ccc; border-radius: 6px; font: inherit;
  }
  .required { color: #c62828; margin-left: 2px; }
  .field-error { color: #c62828; font-size: 13px; margin: 0; }
  .radio-group { display: flex; gap: 12px; flex-wrap: wrap; }
  .notice { padding: 8px 12px; border-radius: 6px; background: #e8f5e9; color: #1b5e20; margin-bottom: 12px; }
  .violations { padding: 12px; border: 1px solid #f5c2c7; background: #fdf0f1; color: #842029; border-radius: 6px; }
  .violations code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }
  .muted { color: #777; font-size: 13px; }
</style>
</head>
<body class="__THEME__">
<header>
  <span class="pill">submissions: <b>__SUBMISSIONS__</b></span>
  <span class="pill">theme: <b>__THEME__</b></span>
</header>
<main>
__BODY__
</main>
</body>
</html>
"#;

    let (title, body) = match page.document {
        Ok(doc) => (doc.form_title.as_str(), form_body(doc, page)),
        Err(violations) => ("Invalid schema", violations_body(violations)),
    };

    TEMPLATE
        .replace("__TITLE__", &escape(title))
        .replace("__THEME__", page.theme.as_str())
        .replace("__SUBMISSIONS__", &page.submissions.to_string())
        .replace("__BODY__", &body)
}

fn form_body(doc: &SchemaDocument, page: &PageModel<'_>) -> String {
    let mut out = String::new();
    if let Some(notice) = page.notice {
        out.push_str(&format!("<div class=\"notice\" role=\"status\">{}</div>\n", escape(notice)));
    }
    out.push_str(&format!("<h1>{}</h1>\n", escape(&doc.form_title)));
    out.push_str(&format!("<p class=\"muted\">{}</p>\n", escape(&doc.form_description)));
    out.push_str("<form id=\"form\">\n");
    for field in &doc.fields {
        let control = render(field, page.values.get(&field.id), page.errors.get(&field.id));
        out.push_str(&control_html(&control));
    }
    out.push_str("<button type=\"submit\">Submit</button>\n</form>");
    out
}

fn violations_body(violations: &ViolationList) -> String {
    let mut out =
        String::from("<div class=\"violations\" role=\"alert\">\n<h2>Schema errors</h2>\n<ul>\n");
    for v in violations {
        if v.path.is_empty() {
            out.push_str(&format!("<li>{}</li>\n", escape(&v.message)));
        } else {
            out.push_str(&format!(
                "<li><code>{}</code>: {}</li>\n",
                escape(&v.path),
                escape(&v.message)
            ));
        }
    }
    out.push_str("</ul>\n</div>");
    out
}

fn control_html(c: &InteractiveControl<'_>) -> String {
    let id = escape(&c.field.id);
    let label = escape(&c.field.label);
    let marker = if c.required_marker {
        "<span class=\"required\">*</span>"
    } else {
        ""
    };
    let required = if c.field.required { " required" } else { "" };

    let mut out = String::from("<div class=\"field\">\n");
    match &c.widget {
        Widget::TextInput {
            input_type,
            value,
            placeholder,
        } => {
            out.push_str(&format!("<label for=\"{id}\">{label}{marker}</label>\n"));
            out.push_str(&format!(
                "<input type=\"{}\" id=\"{id}\" name=\"{id}\" value=\"{}\"{}{required}>\n",
                input_type.as_str(),
                escape(value),
                placeholder_attr(placeholder.as_deref()),
            ));
        }
        Widget::TextArea { value, placeholder } => {
            out.push_str(&format!("<label for=\"{id}\">{label}{marker}</label>\n"));
            out.push_str(&format!(
                "<textarea id=\"{id}\" name=\"{id}\" rows=\"4\"{}{required}>{}</textarea>\n",
                placeholder_attr(placeholder.as_deref()),
                escape(value),
            ));
        }
        Widget::Dropdown { choices } => {
            out.push_str(&format!("<label for=\"{id}\">{label}{marker}</label>\n"));
            out.push_str(&format!("<select id=\"{id}\" name=\"{id}\"{required}>\n"));
            for choice in choices {
                out.push_str(&format!(
                    "<option value=\"{}\"{}>{}</option>\n",
                    escape(&choice.value),
                    if choice.selected { " selected" } else { "" },
                    escape(&choice.label),
                ));
            }
            out.push_str("</select>\n");
        }
        Widget::RadioGroup { group, choices } => {
            out.push_str(&format!("<span>{label}{marker}</span>\n"));
            out.push_str("<div class=\"radio-group\" role=\"radiogroup\">\n");
            for choice in choices {
                out.push_str(&radio_html(group, choice, required));
            }
            out.push_str("</div>\n");
        }
        Widget::Toggle { checked } => {
            let checked = if *checked { " checked" } else { "" };
            out.push_str(&format!(
                "<label><input type=\"checkbox\" id=\"{id}\" name=\"{id}\"{checked}{required}>"
            ));
            out.push_str(&format!(" {label}{marker}</label>\n"));
        }
    }
    if let Some(err) = &c.error {
        out.push_str(&format!("<p class=\"field-error\">{}</p>\n", escape(err)));
    }
    out.push_str("</div>\n");
    out
}

fn radio_html(group: &str, choice: &Choice, required: &str) -> String {
    format!(
        "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{}{required}> {}</label>\n",
        escape(group),
        escape(&choice.value),
        if choice.selected { " checked" } else { "" },
        escape(&choice.label),
    )
}

fn placeholder_attr(placeholder: Option<&str>) -> String {
    placeholder
        .map(|p| format!(" placeholder=\"{}\"", escape(p)))
        .unwrap_or_default()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
