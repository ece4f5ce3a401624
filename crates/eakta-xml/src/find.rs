#![forbid(unsafe_code)]

//! Element lookup helpers.
//!
//! XML-DSig elements are matched on namespace and local name.  Dossier and
//! XAdES elements are matched on local name alone: producers disagree on
//! the namespace revision they bind those prefixes to.

type Node<'a> = roxmltree::Node<'a, 'a>;

fn is_named(n: &Node<'_>, ns_uri: &str, local_name: &str) -> bool {
    n.is_element()
        && n.tag_name().name() == local_name
        && n.tag_name().namespace().unwrap_or("") == ns_uri
}

fn is_local(n: &Node<'_>, local_name: &str) -> bool {
    n.is_element() && n.tag_name().name() == local_name
}

/// First child element with the given namespace and local name.
pub fn child<'a>(parent: Node<'a>, ns_uri: &str, local_name: &str) -> Option<Node<'a>> {
    parent.children().find(|n| is_named(n, ns_uri, local_name))
}

/// All child elements with the given namespace and local name.
pub fn children<'a>(parent: Node<'a>, ns_uri: &str, local_name: &str) -> Vec<Node<'a>> {
    parent
        .children()
        .filter(|n| is_named(n, ns_uri, local_name))
        .collect()
}

/// First descendant element (excluding `node` itself) with the given
/// namespace and local name, in document order.
pub fn descendant<'a>(node: Node<'a>, ns_uri: &str, local_name: &str) -> Option<Node<'a>> {
    node.descendants()
        .skip(1)
        .find(|n| is_named(n, ns_uri, local_name))
}

/// First child element with the given local name, any namespace.
pub fn child_local<'a>(parent: Node<'a>, local_name: &str) -> Option<Node<'a>> {
    parent.children().find(|n| is_local(n, local_name))
}

/// All child elements with the given local name, any namespace.
pub fn children_local<'a>(parent: Node<'a>, local_name: &str) -> Vec<Node<'a>> {
    parent.children().filter(|n| is_local(n, local_name)).collect()
}

/// Text of the first child node when it is a text node.
pub fn first_text<'a>(node: Node<'a>) -> Option<&'a str> {
    node.first_child().filter(|c| c.is_text()).and_then(|c| c.text())
}

/// Text of the first child node, trimmed, or `None` when empty.
pub fn trimmed_text<'a>(node: Node<'a>) -> Option<&'a str> {
    first_text(node).map(str::trim).filter(|t| !t.is_empty())
}
