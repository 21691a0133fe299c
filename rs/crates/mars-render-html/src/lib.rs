//! mars-render-html — Render DomNode trees to HTML strings
//!
//! Events are written as `data-a_<event>` attributes and keys as `data-key`,
//! which is what the dashboard's delegated click listener reads.

use mars_dom::DomNode;

/// Void elements that must not have closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Mount point used when `PageOptions::mount_selector` is not set.
pub const DEFAULT_MOUNT: &str = "#root";

/// Render a DomNode tree to an HTML string.
pub fn render_to_html(node: &DomNode) -> String {
    let mut buf = String::with_capacity(4096);
    write_node(node, &mut buf);
    buf
}

/// Options for rendering a full HTML page.
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub root: DomNode,
    pub title: Option<String>,
    pub description: Option<String>,
    pub styles: Vec<String>,
    pub inline_css: Option<String>,
    pub scripts: Vec<String>,
    /// Inline script blocks injected after external scripts.
    pub inline_scripts: Vec<String>,
    pub mount_selector: Option<String>,
}

impl PageOptions {
    pub fn new(root: DomNode) -> Self {
        Self {
            root,
            title: None,
            description: None,
            styles: Vec::new(),
            inline_css: None,
            scripts: Vec::new(),
            inline_scripts: Vec::new(),
            mount_selector: None,
        }
    }
}

/// Render a full HTML page with the body mounted under the root container.
pub fn render_page(opts: &PageOptions) -> String {
    let body_html = render_to_html(&opts.root);

    let mut html = String::with_capacity(body_html.len() + 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");

    if let Some(title) = &opts.title {
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    }
    if let Some(desc) = &opts.description {
        html.push_str(&format!("<meta name=\"description\" content=\"{}\" />\n", escape_attr(desc)));
    }

    for href in &opts.styles {
        html.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\" />\n", escape_attr(href)));
    }
    if let Some(css) = &opts.inline_css {
        html.push_str(&format!("<style>{}</style>\n", css));
    }

    html.push_str("</head>\n<body>\n");

    let mount = opts.mount_selector.as_deref().unwrap_or(DEFAULT_MOUNT);
    let id = mount.trim_start_matches('#');
    html.push_str(&format!("<div id=\"{}\">{}</div>\n", escape_attr(id), body_html));

    for src in &opts.scripts {
        html.push_str(&format!("<script src=\"{}\"></script>\n", escape_attr(src)));
    }
    for script in &opts.inline_scripts {
        html.push_str("<script>\n");
        html.push_str(script);
        html.push_str("\n</script>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

fn write_node(node: &DomNode, buf: &mut String) {
    if node.is_bare_text() {
        if let Some(text) = &node.text {
            buf.push_str(&escape_html(text));
        }
        return;
    }

    let is_void = VOID_ELEMENTS.contains(&node.tag.as_str());

    buf.push('<');
    buf.push_str(&node.tag);

    if let Some(key) = &node.key {
        buf.push_str(" data-key=\"");
        buf.push_str(&escape_attr(key));
        buf.push('"');
    }

    if let Some(attrs) = &node.attrs {
        // Sort for deterministic output
        let mut keys: Vec<&String> = attrs.keys().collect();
        keys.sort();
        for k in keys {
            buf.push(' ');
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(&attrs[k]));
            buf.push('"');
        }
    }

    // Event attributes → data-a_ prefix
    if let Some(events) = &node.events {
        let mut keys: Vec<&String> = events.keys().collect();
        keys.sort();
        for k in keys {
            buf.push_str(" data-a_");
            buf.push_str(k);
            buf.push_str("=\"");
            buf.push_str(&escape_attr(&events[k]));
            buf.push('"');
        }
    }

    buf.push('>');

    if is_void {
        return;
    }

    if let Some(text) = &node.text {
        buf.push_str(&escape_html(text));
    }

    for child in node.children_iter() {
        write_node(child, buf);
    }

    buf.push_str("</");
    buf.push_str(&node.tag);
    buf.push('>');
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mars_dom::DomNode;

    #[test]
    fn test_simple_render() {
        let node = DomNode::element("div")
            .with_key("rovers")
            .with_class("row")
            .with_child(DomNode::text("h5", "Curiosity"))
            .with_child(
                DomNode::text("button", "See Latest Image")
                    .with_attr("data-rover", "Curiosity")
                    .on("click", "select_rover"),
            );

        let html = render_to_html(&node);
        assert!(html.starts_with("<div data-key=\"rovers\" class=\"row\">"));
        assert!(html.contains("<h5>Curiosity</h5>"));
        assert!(html.contains(
            "<button data-rover=\"Curiosity\" data-a_click=\"select_rover\">See Latest Image</button>"
        ));
    }

    #[test]
    fn test_void_element() {
        let node = DomNode::element("img")
            .with_attr("src", "a.jpg")
            .with_attr("alt", "Mast Camera");
        let html = render_to_html(&node);
        assert_eq!(html, "<img alt=\"Mast Camera\" src=\"a.jpg\">");
    }

    #[test]
    fn test_escaping_and_bare_text() {
        let node = DomNode::element("p")
            .with_attr("title", "\"quoted\" & <tagged>")
            .with_child(DomNode::bare_text("a < b"))
            .with_child(DomNode::element("br"))
            .with_child(DomNode::bare_text("c & d"));
        let html = render_to_html(&node);
        assert_eq!(
            html,
            "<p title=\"&quot;quoted&quot; &amp; &lt;tagged&gt;\">a &lt; b<br>c &amp; d</p>"
        );
    }

    #[test]
    fn test_page_mounts_body_under_root() {
        let mut opts = PageOptions::new(DomNode::text("header", "Mars Dashboard"));
        opts.title = Some("Mars Dashboard".into());
        opts.inline_scripts.push("console.log(1);".into());

        let page = render_page(&opts);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Mars Dashboard</title>"));
        assert!(page.contains("<div id=\"root\"><header>Mars Dashboard</header></div>"));
        assert!(page.contains("<script>\nconsole.log(1);\n</script>"));
    }
}
