//! Named styles applied through a `style` template filter.
//!
//! Styles are looked up by name when a template runs `{{ value | style("name") }}`.
//! With color off the filter passes text through unchanged. Unknown names are
//! prefixed with `(!?)` so typos in templates show up in the output.

use console::{Style, Term};
use minijinja::{Environment, Error, Value};
use serde::Serialize;
use std::collections::HashMap;

pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

#[derive(Clone, Default)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named style, replacing any previous one with the same name.
    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            // console decides on its own whether stdout takes colors; we already did
            Some(style) if use_color => style.clone().force_styling(true).apply_to(text).to_string(),
            Some(_) => text.to_string(),
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    }
}

/// Whether stdout supports colors.
pub fn detect_color() -> bool {
    Term::stdout().features().colors_supported()
}

pub fn render_with_color<T: Serialize>(
    template: &str,
    data: &T,
    theme: &Theme,
    use_color: bool,
) -> Result<String, Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    let theme = theme.clone();
    env.add_filter("style", move |value: Value, name: String| -> String {
        theme.apply(&name, &value.to_string(), use_color)
    });

    env.add_template_owned("_inline".to_string(), template.to_string())?;
    let tmpl = env.get_template("_inline")?;
    tmpl.render(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Data {
        message: String,
    }

    fn theme() -> Theme {
        Theme::new().add("ok", Style::new().green())
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let output = render_with_color(
            r#"{{ message | style("ok") }}"#,
            &Data {
                message: "done".into(),
            },
            &theme(),
            false,
        )
        .unwrap();
        assert_eq!(output, "done");
    }

    #[test]
    fn colored_output_wraps_text() {
        let output = render_with_color(
            r#"{{ message | style("ok") }}"#,
            &Data {
                message: "done".into(),
            },
            &theme(),
            true,
        )
        .unwrap();
        assert!(output.contains("done"));
        assert!(output.contains("\u{1b}["));
    }

    #[test]
    fn unknown_style_is_flagged() {
        assert_eq!(theme().apply("typo", "Hello", false), "(!?) Hello");
        assert_eq!(theme().apply("ok", "Hello", false), "Hello");
    }

    #[test]
    fn block_lines_do_not_emit_newlines() {
        #[derive(Serialize)]
        struct Items {
            items: Vec<String>,
        }
        let template = "{% for i in items %}\n{{ i }}\n{% endfor %}\n";
        let output = render_with_color(
            template,
            &Items {
                items: vec!["a".into(), "b".into()],
            },
            &theme(),
            false,
        )
        .unwrap();
        assert_eq!(output, "a\nb\n");
    }
}
