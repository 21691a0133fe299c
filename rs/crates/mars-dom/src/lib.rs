//! mars-dom — UI node tree for the Mars dashboard
//!
//! Views build `DomNode` trees; renderers turn them into markup. Events are
//! recorded as `event name → action name` pairs so the browser side can wire
//! them through a single delegated listener instead of inline handlers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tag of a bare text leaf: its text is written (escaped) with no surrounding element.
pub const TEXT_TAG: &str = "#text";

/// A single node in the UI tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomNode {
    /// HTML tag name (e.g. "div", "button", "img")
    pub tag: String,

    /// Stable identity, rendered as `data-key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// HTML attributes (class, src, data-*, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<HashMap<String, String>>,

    /// Map of DOM event name → action name (e.g. "click" → "select_rover")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<HashMap<String, String>>,

    /// Text content, written before children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DomNode>>,
}

/// A complete tree wrapping the root node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: DomNode,
}

impl DomNode {
    /// Create an empty element
    pub fn element(tag: &str) -> Self {
        DomNode {
            tag: tag.to_string(),
            key: None,
            attrs: None,
            events: None,
            text: None,
            children: None,
        }
    }

    /// Create a simple text node
    pub fn text(tag: &str, content: &str) -> Self {
        Self::element(tag).with_text(content)
    }

    /// Create a bare text leaf, for text interleaved with elements.
    pub fn bare_text(content: &str) -> Self {
        Self::text(TEXT_TAG, content)
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    /// Bind a DOM event to a named action.
    pub fn on(mut self, event: &str, action: &str) -> Self {
        self.events
            .get_or_insert_with(HashMap::new)
            .insert(event.to_string(), action.to_string());
        self
    }

    pub fn with_text(mut self, content: &str) -> Self {
        self.text = Some(content.to_string());
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = DomNode>,
    {
        self.children.get_or_insert_with(Vec::new).extend(children);
        self
    }

    /// Get a class attribute if present
    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(name).map(|s| s.as_str())
    }

    pub fn is_bare_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Iterate over children (empty slice if none)
    pub fn children_iter(&self) -> &[DomNode] {
        match &self.children {
            Some(c) => c,
            None => &[],
        }
    }

    /// Get an event action by event name
    pub fn event(&self, name: &str) -> Option<&str> {
        self.events.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// Concatenated text of this node and its descendants, depth-first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// All nodes in the subtree (self included) matching `pred`, depth-first.
    pub fn find_all<F>(&self, pred: F) -> Vec<&DomNode>
    where
        F: Fn(&DomNode) -> bool,
    {
        let mut out = Vec::new();
        collect_matching(self, &pred, &mut out);
        out
    }
}

fn collect_text(node: &DomNode, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in node.children_iter() {
        collect_text(child, out);
    }
}

fn collect_matching<'a, F>(node: &'a DomNode, pred: &F, out: &mut Vec<&'a DomNode>)
where
    F: Fn(&DomNode) -> bool,
{
    if pred(node) {
        out.push(node);
    }
    for child in node.children_iter() {
        collect_matching(child, pred, out);
    }
}

/// Parse a snapshot from a JSON string
pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a single DomNode from a JSON string
pub fn parse_node(json: &str) -> Result<DomNode, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "root": {
                "tag": "div",
                "key": "rovers",
                "children": [
                    { "tag": "h5", "text": "Curiosity" },
                    { "tag": "button", "events": { "click": "select_rover" }, "text": "See Latest Image" }
                ]
            }
        }"#;

        let snap = parse_snapshot(json).unwrap();
        assert_eq!(snap.root.tag, "div");
        assert_eq!(snap.root.key.as_deref(), Some("rovers"));
        assert_eq!(snap.root.children_iter().len(), 2);
        assert_eq!(snap.root.children_iter()[1].event("click"), Some("select_rover"));
    }

    #[test]
    fn test_builder_and_queries() {
        let node = DomNode::element("div")
            .with_class("card")
            .with_child(DomNode::text("h5", "Spirit"))
            .with_child(
                DomNode::text("button", "Go")
                    .with_attr("data-rover", "Spirit")
                    .on("click", "select_rover"),
            );

        assert_eq!(node.class(), Some("card"));
        assert_eq!(node.text_content(), "SpiritGo");

        let buttons = node.find_all(|n| n.tag == "button");
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].attr("data-rover"), Some("Spirit"));
        assert_eq!(buttons[0].event("click"), Some("select_rover"));
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let json = serde_json::to_string(&DomNode::text("p", "hi")).unwrap();
        assert_eq!(json, r#"{"tag":"p","text":"hi"}"#);
    }
}
