//! # CLI Templates
//!
//! Terminal output is rendered from minijinja templates kept as separate files, so the
//! layout can be edited and diffed without touching Rust code. They are embedded here as
//! string constants.
//!
//! Templates are rendered with `trim_blocks` and `lstrip_blocks`: a line holding only a
//! block tag produces no output, and a line that ends in a block tag needs an empty line
//! after it to emit its newline.
//!
//! Width math (padding, truncation) happens in Rust before rendering; templates only
//! choose styles and arrange pre-computed strings.

pub const TABLE_TEMPLATE: &str = include_str!("templates/table.tmp");
pub const RECORD_TEMPLATE: &str = include_str!("templates/record.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
pub const PAIRS_TEMPLATE: &str = include_str!("templates/pairs.tmp");
pub const TEXT_LIST_TEMPLATE: &str = include_str!("templates/text_list.tmp");
