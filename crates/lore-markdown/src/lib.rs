//! Line-oriented markdown dialect renderer for the Lore wiki.
//!
//! The dialect is deliberately small:
//!
//! - headings `#`, `##`, `###`
//! - unordered lists (`- item`)
//! - pipe tables with a `---` separator row
//! - inline `***bold italic***`, `**bold**`, `*italic*`, `` `code` ``
//! - inline links `[text](href)`
//!
//! Anything else becomes a paragraph. Rendering never fails: malformed input
//! degrades to literal paragraph text.
//!
//! # Example
//!
//! ```
//! use lore_markdown::MarkdownEngine;
//!
//! let result = MarkdownEngine::new()
//!     .with_title_extraction()
//!     .render_document("# Mining\n\n- **Ore**\n- *Gems*");
//!
//! assert_eq!(result.title.as_deref(), Some("Mining"));
//! assert!(result.html.contains("<li><strong>Ore</strong></li>"));
//! ```

mod engine;
mod inline;
mod util;

pub use engine::{MarkdownEngine, RenderResult, render};
pub use inline::render_inline;
pub use util::escape_html;
