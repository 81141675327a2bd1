use super::theme::Theme;
use console::Style;
use once_cell::sync::Lazy;

pub mod names {
    pub const HEADER: &str = "header";
    pub const INDEX: &str = "index";
    pub const MUTED: &str = "muted";
    pub const FIELD: &str = "field";
    pub const TITLE: &str = "title";
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

pub static ROWZ_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add(names::HEADER, Style::new().bold())
        .add(names::INDEX, Style::new().yellow())
        .add(names::MUTED, Style::new().color256(245).italic())
        .add(names::FIELD, Style::new().cyan())
        .add(names::TITLE, Style::new().bold())
        .add(names::INFO, Style::new().dim())
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow())
        .add(names::ERROR, Style::new().red())
});
