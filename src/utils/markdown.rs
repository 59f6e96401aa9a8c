use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const SAFE_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Renders user-written markdown to HTML. Raw HTML in the source is emitted as
/// escaped text and links or images with other schemes lose their target.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::Start(Tag::Link(kind, dest, title)) => Event::Start(Tag::Link(kind, safe_dest(dest), title)),
        Event::Start(Tag::Image(kind, dest, title)) => Event::Start(Tag::Image(kind, safe_dest(dest), title)),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn safe_dest(dest: CowStr<'_>) -> CowStr<'_> {
    let lower = dest.trim().to_ascii_lowercase();
    if SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        dest
    } else {
        CowStr::Borrowed("#")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_common_markup() {
        let out = render_markdown("## Focus\n\n**Rust** and *Go*\n\n- one\n- two\n\n1. first\n");
        assert!(out.contains("<h2>Focus</h2>"));
        assert!(out.contains("<strong>Rust</strong>"));
        assert!(out.contains("<em>Go</em>"));
        assert!(out.contains("<ul>\n<li>one</li>"));
        assert!(out.contains("<ol>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let out = render_markdown("hi <script>alert(1)</script>\n\n<div onclick=\"x()\">block</div>");
        assert!(!out.contains("<script>"));
        assert!(!out.contains("<div"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn only_web_links_keep_their_target() {
        let out = render_markdown("[site](https://example.com) [bad](javascript:alert(1))");
        assert!(out.contains(r#"<a href="https://example.com">site</a>"#));
        assert!(!out.contains("javascript:"));
        assert!(out.contains(r##"<a href="#">bad</a>"##));
    }
}
