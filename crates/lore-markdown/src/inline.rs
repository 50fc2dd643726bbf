//! Inline formatting passes.
//!
//! Inline text is formatted by ordered substitution passes. Each pass only
//! looks at text no earlier pass has wrapped, so `***x***` becomes bold-italic
//! once and is never picked apart again by the bold or italic passes.
//!
//! Order:
//! 1. links `[text](href)` (link text gets passes 2-5 on its own)
//! 2. `***bold italic***`
//! 3. `**bold**`
//! 4. `*italic*`
//! 5. `` `code` ``

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::util::escape_html;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[([^\]]+)\]\(([^)\s"]+)\)"#).unwrap());
static BOLD_ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").unwrap());

/// Piece of a line during inline formatting.
#[derive(Debug)]
enum Segment {
    /// Text later passes may still format.
    Text(String),
    /// Markup produced by an earlier pass; opaque from now on.
    Html(String),
}

/// Apply all inline passes to a line of text.
///
/// Text outside recognized spans is emitted verbatim.
pub fn render_inline(text: &str) -> String {
    let segments = vec![Segment::Text(text.to_owned())];
    let segments = apply_pass(segments, &LINK_RE, |caps| {
        format!(
            r#"<a href="{}">{}</a>"#,
            &caps[2],
            render_emphasis(&caps[1])
        )
    });
    join(run_emphasis_passes(segments))
}

/// Emphasis and code passes only, used for link text.
fn render_emphasis(text: &str) -> String {
    join(run_emphasis_passes(vec![Segment::Text(text.to_owned())]))
}

fn run_emphasis_passes(segments: Vec<Segment>) -> Vec<Segment> {
    let segments = apply_pass(segments, &BOLD_ITALIC_RE, |caps| {
        format!("<strong><em>{}</em></strong>", &caps[1])
    });
    let segments = apply_pass(segments, &BOLD_RE, |caps| {
        format!("<strong>{}</strong>", &caps[1])
    });
    let segments = apply_pass(segments, &ITALIC_RE, |caps| format!("<em>{}</em>", &caps[1]));
    apply_pass(segments, &CODE_RE, |caps| {
        format!("<code>{}</code>", escape_html(&caps[1]))
    })
}

/// Text content of a line once formatted: the spans the passes would wrap lose
/// their markers, link text replaces the link.
pub(crate) fn strip_inline(text: &str) -> String {
    let segments = apply_pass(vec![Segment::Text(text.to_owned())], &LINK_RE, |caps| {
        strip_emphasis(&caps[1])
    });
    join(run_strip_passes(segments))
}

fn strip_emphasis(text: &str) -> String {
    join(run_strip_passes(vec![Segment::Text(text.to_owned())]))
}

fn run_strip_passes(segments: Vec<Segment>) -> Vec<Segment> {
    [&*BOLD_ITALIC_RE, &*BOLD_RE, &*ITALIC_RE, &*CODE_RE]
        .into_iter()
        .fold(segments, |segments, re| {
            apply_pass(segments, re, |caps| caps[1].to_owned())
        })
}

/// Run one substitution pass over the still-unformatted text segments.
fn apply_pass(
    segments: Vec<Segment>,
    re: &Regex,
    wrap: impl Fn(&Captures<'_>) -> String,
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let Segment::Text(text) = segment else {
            out.push(segment);
            continue;
        };

        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                out.push(Segment::Text(text[last..whole.start()].to_owned()));
            }
            out.push(Segment::Html(wrap(&caps)));
            last = whole.end();
        }
        if last < text.len() {
            out.push(Segment::Text(text[last..].to_owned()));
        }
    }

    out
}

fn join(segments: Vec<Segment>) -> String {
    segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(s) | Segment::Html(s) => s,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render_inline("Just text."), "Just text.");
    }

    #[test]
    fn test_bold_italic_nested_once() {
        let html = render_inline("***Legendary***");

        assert_eq!(html, "<strong><em>Legendary</em></strong>");
        assert!(!html.contains('*'));
        assert_eq!(html.matches("<strong>").count(), 1);
        assert_eq!(html.matches("<em>").count(), 1);
    }

    #[test]
    fn test_bold() {
        assert_eq!(
            render_inline("a **strong** word"),
            "a <strong>strong</strong> word"
        );
    }

    #[test]
    fn test_italic() {
        assert_eq!(render_inline("a *soft* word"), "a <em>soft</em> word");
    }

    #[test]
    fn test_code_is_escaped() {
        assert_eq!(
            render_inline("use `<b>` here"),
            "use <code>&lt;b&gt;</code> here"
        );
    }

    #[test]
    fn test_mixed_spans_on_one_line() {
        assert_eq!(
            render_inline("***all*** and **bold** and *it* and `code`"),
            "<strong><em>all</em></strong> and <strong>bold</strong> and <em>it</em> and <code>code</code>"
        );
    }

    #[test]
    fn test_bold_contents_not_reformatted() {
        // The bold pass wraps first; italic never sees the inner markers.
        assert_eq!(
            render_inline("**a *b* c**"),
            "<strong>a *b* c</strong>"
        );
    }

    #[test]
    fn test_code_markers_inside_bold_stay_literal() {
        assert_eq!(render_inline("**`x`**"), "<strong>`x`</strong>");
    }

    #[test]
    fn test_unclosed_markers_degrade_to_text() {
        assert_eq!(render_inline("**unclosed"), "**unclosed");
        assert_eq!(render_inline("`tick"), "`tick");
    }

    #[test]
    fn test_strip_inline() {
        assert_eq!(strip_inline("**Mining**"), "Mining");
        assert_eq!(strip_inline("***Legendary*** `Sword`"), "Legendary Sword");
        assert_eq!(
            strip_inline("[*Troll* Leather](#sectionWiki/Items/Troll-Leather) gloves"),
            "Troll Leather gloves"
        );
        assert_eq!(strip_inline("**a *b* c**"), "a *b* c");
        assert_eq!(strip_inline("**unclosed"), "**unclosed");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("See [Leatherworking](#sectionWiki/Skills/Leatherworking)."),
            r##"See <a href="#sectionWiki/Skills/Leatherworking">Leatherworking</a>."##
        );
    }

    #[test]
    fn test_link_text_gets_emphasis() {
        assert_eq!(
            render_inline("[**Troll Leather**](#sectionWiki/Items/Troll-Leather)"),
            r##"<a href="#sectionWiki/Items/Troll-Leather"><strong>Troll Leather</strong></a>"##
        );
    }

    #[test]
    fn test_link_href_protected_from_emphasis() {
        assert_eq!(
            render_inline("[x](#a*b*c)"),
            r##"<a href="#a*b*c">x</a>"##
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert_eq!(
            render_inline(r##"<a href="#sectionWiki/Skills">Skills</a>"##),
            r##"<a href="#sectionWiki/Skills">Skills</a>"##
        );
    }
}
