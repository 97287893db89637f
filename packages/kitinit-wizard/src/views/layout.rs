//! GOV.UK Design System markup shared by every page.

use std::fmt::Write;

pub const STYLESHEET_PATH: &str = "/assets/all.css";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn page(title: &str, back_link: Option<&str>, main: &str) -> String {
    let back = back_link
        .map(|href| {
            format!(
                r#"<a href="{}" class="govuk-back-link">Back</a>"#,
                escape(href)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="govuk-template">
<head>
  <meta charset="utf-8">
  <title>{title} - Create a GOV.UK prototype</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="stylesheet" href="{css}">
</head>
<body class="govuk-template__body">
  <header class="govuk-header" role="banner">
    <div class="govuk-header__container govuk-width-container">
      <span class="govuk-header__service-name">Create a GOV.UK prototype</span>
    </div>
  </header>
  <div class="govuk-width-container">
    {back}
    <main class="govuk-main-wrapper" id="main-content" role="main">
      <div class="govuk-grid-row">
        <div class="govuk-grid-column-two-thirds">
{main}
        </div>
      </div>
    </main>
  </div>
</body>
</html>
"#,
        title = escape(title),
        css = STYLESHEET_PATH,
        back = back,
        main = main,
    )
}

/// A form posting back to `action`, closed by a submit button.
pub fn form(action: &str, fields: &str, button: &str) -> String {
    format!(
        r#"<form method="post" action="{}" novalidate>
{}
<button type="submit" class="govuk-button" data-module="govuk-button">{}</button>
</form>"#,
        escape(action),
        fields,
        escape(button)
    )
}

pub fn error_summary(errors: &[(&str, &str)]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut items = String::new();
    for (target, message) in errors {
        let _ = write!(
            items,
            r##"<li><a href="#{}">{}</a></li>"##,
            escape(target),
            escape(message)
        );
    }
    format!(
        r#"<div class="govuk-error-summary" data-module="govuk-error-summary">
  <div role="alert">
    <h2 class="govuk-error-summary__title">There is a problem</h2>
    <div class="govuk-error-summary__body">
      <ul class="govuk-list govuk-error-summary__list">{}</ul>
    </div>
  </div>
</div>"#,
        items
    )
}

pub enum RadioItem {
    Option {
        value: String,
        /// Already escaped label HTML.
        label_html: String,
        checked: bool,
        /// Already escaped HTML revealed when this option is chosen.
        conditional_html: Option<String>,
    },
    Divider(&'static str),
}

impl RadioItem {
    pub fn text(value: impl Into<String>, label: &str) -> Self {
        RadioItem::Option {
            value: value.into(),
            label_html: escape(label),
            checked: false,
            conditional_html: None,
        }
    }

    pub fn html(value: impl Into<String>, label_html: String) -> Self {
        RadioItem::Option {
            value: value.into(),
            label_html,
            checked: false,
            conditional_html: None,
        }
    }

    pub fn checked(mut self, on: bool) -> Self {
        if let RadioItem::Option { checked, .. } = &mut self {
            *checked = on;
        }
        self
    }

    pub fn conditional(mut self, html: String) -> Self {
        if let RadioItem::Option {
            conditional_html, ..
        } = &mut self
        {
            *conditional_html = Some(html);
        }
        self
    }
}

pub fn radios(name: &str, legend: &str, hint: Option<&str>, items: &[RadioItem]) -> String {
    let mut body = String::new();
    let mut index = 0;
    for item in items {
        match item {
            RadioItem::Divider(text) => {
                let _ = write!(
                    body,
                    r#"<div class="govuk-radios__divider">{}</div>"#,
                    escape(text)
                );
            }
            RadioItem::Option {
                value,
                label_html,
                checked,
                conditional_html,
            } => {
                index += 1;
                let id = format!("{}-{}", name, index);
                let _ = write!(
                    body,
                    r#"<div class="govuk-radios__item"><input class="govuk-radios__input" id="{id}" name="{name}" type="radio" value="{value}"{checked}><label class="govuk-label govuk-radios__label" for="{id}">{label}</label></div>"#,
                    id = escape(&id),
                    name = escape(name),
                    value = escape(value),
                    checked = if *checked { " checked" } else { "" },
                    label = label_html,
                );
                if let Some(html) = conditional_html {
                    let _ = write!(
                        body,
                        r#"<div class="govuk-radios__conditional" id="conditional-{}">{}</div>"#,
                        escape(&id),
                        html
                    );
                }
            }
        }
    }
    fieldset(legend, hint, &format!(
        r#"<div class="govuk-radios" data-module="govuk-radios">{}</div>"#,
        body
    ))
}

pub fn checkboxes(
    name: &str,
    legend: &str,
    hint: Option<&str>,
    items: &[(&str, &str, Option<&str>, bool)],
) -> String {
    let mut body = String::new();
    for (index, (value, label, item_hint, checked)) in items.iter().enumerate() {
        let id = format!("{}-{}", name, index + 1);
        let hint_html = item_hint
            .map(|h| {
                format!(
                    r#"<div class="govuk-hint govuk-checkboxes__hint">{}</div>"#,
                    escape(h)
                )
            })
            .unwrap_or_default();
        let _ = write!(
            body,
            r#"<div class="govuk-checkboxes__item"><input class="govuk-checkboxes__input" id="{id}" name="{name}" type="checkbox" value="{value}"{checked}><label class="govuk-label govuk-checkboxes__label" for="{id}">{label}</label>{hint}</div>"#,
            id = escape(&id),
            name = escape(name),
            value = escape(value),
            checked = if *checked { " checked" } else { "" },
            label = escape(label),
            hint = hint_html,
        );
    }
    fieldset(legend, hint, &format!(
        r#"<div class="govuk-checkboxes" data-module="govuk-checkboxes">{}</div>"#,
        body
    ))
}

fn fieldset(legend: &str, hint: Option<&str>, inner: &str) -> String {
    let hint_html = hint
        .map(|h| format!(r#"<div class="govuk-hint">{}</div>"#, escape(h)))
        .unwrap_or_default();
    format!(
        r#"<div class="govuk-form-group"><fieldset class="govuk-fieldset"><legend class="govuk-fieldset__legend govuk-fieldset__legend--l"><h1 class="govuk-fieldset__heading">{}</h1></legend>{}{}</fieldset></div>"#,
        escape(legend),
        hint_html,
        inner
    )
}

/// A text input; `error` switches the group into its error state.
pub fn text_input(name: &str, label: &str, value: &str, error: Option<&str>) -> String {
    let (group_class, error_html) = match error {
        Some(message) => (
            " govuk-form-group--error",
            format!(
                r#"<p id="{}-error" class="govuk-error-message"><span class="govuk-visually-hidden">Error:</span> {}</p>"#,
                escape(name),
                escape(message)
            ),
        ),
        None => ("", String::new()),
    };
    format!(
        r#"<div class="govuk-form-group{group_class}"><h1 class="govuk-label-wrapper"><label class="govuk-label govuk-label--l" for="{name}">{label}</label></h1>{error}<input class="govuk-input" id="{name}" name="{name}" type="text" value="{value}"></div>"#,
        group_class = group_class,
        name = escape(name),
        label = escape(label),
        error = error_html,
        value = escape(value),
    )
}

pub struct SummaryRow {
    pub key: String,
    /// Already escaped value HTML.
    pub value_html: String,
    pub change_href: String,
}

pub fn summary_list(rows: &[SummaryRow]) -> String {
    let mut body = String::new();
    for row in rows {
        let _ = write!(
            body,
            r#"<div class="govuk-summary-list__row"><dt class="govuk-summary-list__key">{key}</dt><dd class="govuk-summary-list__value">{value}</dd><dd class="govuk-summary-list__actions"><a class="govuk-link" href="{href}">Change<span class="govuk-visually-hidden"> {lower}</span></a></dd></div>"#,
            key = escape(&row.key),
            value = row.value_html,
            href = escape(&row.change_href),
            lower = escape(&row.key.to_lowercase()),
        );
    }
    format!(r#"<dl class="govuk-summary-list">{}</dl>"#, body)
}

pub fn heading(text: &str) -> String {
    format!(r#"<h1 class="govuk-heading-l">{}</h1>"#, escape(text))
}

pub fn paragraph(text: &str) -> String {
    format!(r#"<p class="govuk-body">{}</p>"#, escape(text))
}
