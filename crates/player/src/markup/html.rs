//! Lenient HTML tree builder.
//!
//! Good enough for the server-rendered fragments the game sends: tags,
//! attributes, text and comments. Unmatched closing tags are ignored and
//! unclosed elements are closed at the end of input.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
        .expect("valid regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").expect("valid regex")
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            Node::Text(_) => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl OpenElement {
    fn close(self) -> Node {
        Node::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

/// Parse markup into a forest of nodes, in document order
pub fn parse(html: &str) -> Vec<Node> {
    let mut roots = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut cursor = 0;

    for caps in TAG_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut stack, &mut roots, &html[cursor..whole.start()]);
        cursor = whole.end();

        // Comment
        let Some(tag) = caps.get(2) else {
            continue;
        };
        let tag = tag.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            close_element(&mut stack, &mut roots, &tag);
            continue;
        }

        let element = OpenElement {
            attributes: parse_attributes(caps.get(3).map_or("", |m| m.as_str())),
            tag,
            children: Vec::new(),
        };
        if self_closing || VOID_ELEMENTS.contains(&element.tag.as_str()) {
            attach(&mut stack, &mut roots, element.close());
        } else {
            stack.push(element);
        }
    }

    push_text(&mut stack, &mut roots, &html[cursor..]);
    while let Some(element) = stack.pop() {
        attach(&mut stack, &mut roots, element.close());
    }
    roots
}

fn attach(stack: &mut [OpenElement], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn push_text(stack: &mut [OpenElement], roots: &mut Vec<Node>, raw: &str) {
    if !raw.is_empty() {
        attach(stack, roots, Node::Text(decode_entities(raw)));
    }
}

fn close_element(stack: &mut Vec<OpenElement>, roots: &mut Vec<Node>, tag: &str) {
    let Some(position) = stack.iter().rposition(|open| open.tag == tag) else {
        return;
    };
    while stack.len() > position {
        if let Some(element) = stack.pop() {
            attach(stack, roots, element.close());
        }
    }
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or(String::new(), |m| decode_entities(m.as_str()));
            Some((name, value))
        })
        .collect()
}

/// Decode character references; unknown named references are left as-is
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    ENTITY_RE
        .replace_all(raw, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let body = caps.get(1).map_or("", |m| m.as_str());
            decode_reference(body).unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}

fn decode_reference(body: &str) -> Option<String> {
    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let numeric = body.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}
