use types::{Mapping, Value};

use crate::scanner::TagKind;
use crate::scope::ScopeNode;
use crate::template::Template;

/// One link in the scoped name-resolution chain: the value the current
/// scope renders against, plus the enclosing scope's frame.
pub(crate) struct Frame<'a> {
    parent: Option<&'a Frame<'a>>,
    value: &'a Value,
}

impl<'a> Frame<'a> {
    pub(crate) fn root(value: &'a Value) -> Frame<'a> {
        Frame {
            parent: None,
            value,
        }
    }

    /// Dotted-path lookup.
    ///
    /// Only the first path component may fall back to the parent chain.
    /// Once it is found, locally or in an ancestor, the rest of the path
    /// resolves strictly inside that value; an intermediate miss fails the
    /// whole lookup with no further fallback.
    fn resolve(&self, key: &str) -> Option<&'a Value> {
        let (first, rest) = match key.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (key, None),
        };

        let local = match self.value {
            Value::Mapping(mapping) => mapping.get(first),
            _ => None,
        };

        match local {
            Some(found) => match rest {
                Some(rest) => resolve_path(found, rest),
                None => Some(found),
            },
            None => self.parent.and_then(|parent| parent.resolve(key)),
        }
    }
}

fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut found = value;

    for component in path.split('.') {
        match found {
            Value::Mapping(mapping) => found = mapping.get(component)?,
            _ => return None,
        }
    }

    Some(found)
}

/// Render one scope node against the value at the head of `frame`.
///
/// Pure and single-pass: recursion is bounded by the depth of the scope
/// tree plus the depth of partial indirection.
pub(crate) fn render_scope(node: &ScopeNode, frame: &Frame, template: &Template) -> String {
    match frame.value {
        Value::Boolean(value) => {
            if node.is_positive() == *value {
                render_detached(node, frame, template)
            } else {
                String::new()
            }
        }
        Value::Text(text) => text.clone(),
        Value::Mapping(_) => render_body(node, frame, template),
        Value::Sequence(items) => {
            if node.is_positive() && !items.is_empty() {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| {
                        render_scope(
                            node,
                            &Frame {
                                parent: Some(frame),
                                value: item,
                            },
                            template,
                        )
                    })
                    .collect();

                rendered.join(&node.delimiter)
            } else if !node.is_positive() && items.is_empty() {
                render_detached(node, frame, template)
            } else {
                String::new()
            }
        }
    }
}

/// Render a node's body once with no value of its own; names still resolve
/// through the enclosing chain.
fn render_detached(node: &ScopeNode, frame: &Frame, template: &Template) -> String {
    let empty = Value::Mapping(Mapping::new());

    render_scope(
        node,
        &Frame {
            parent: Some(frame),
            value: &empty,
        },
        template,
    )
}

/// The dictionary-scope walk: splice the literal text around each child
/// with that child's replacement, in source order.
fn render_body(node: &ScopeNode, frame: &Frame, template: &Template) -> String {
    let text = template.text();
    let document_end = text.len();

    let mut output = String::new();
    let mut cursor = node.inner_start();

    for child in &node.children {
        output.push_str(&text[cursor..child.start_tag.span.start]);
        cursor = child.outer_end(document_end);

        match &child.start_tag.kind {
            TagKind::Comment => {}
            TagKind::Partial { indirect } => {
                output.push_str(&render_partial(child, *indirect, frame, template));
            }
            _ => match frame.resolve(&child.name) {
                Some(found) => output.push_str(&render_scope(
                    child,
                    &Frame {
                        parent: Some(frame),
                        value: found,
                    },
                    template,
                )),
                // A missing name renders a negative section's body; the
                // inverted-section idiom.
                None if !child.is_positive() => {
                    output.push_str(&render_detached(child, frame, template));
                }
                None => {}
            },
        }
    }

    output.push_str(&text[cursor..node.inner_end(document_end)]);
    output
}

/// Splice in another template from the owning library, rendered against
/// the same mapping and chain. A missing library, template, or non-text
/// indirection key renders as empty text.
fn render_partial(node: &ScopeNode, indirect: bool, frame: &Frame, template: &Template) -> String {
    let Some(library) = template.library() else {
        return String::new();
    };

    let name = if indirect {
        match frame.resolve(&node.name).and_then(Value::as_text) {
            Some(name) => name.to_string(),
            None => return String::new(),
        }
    } else {
        node.name.clone()
    };

    match library.lookup(&name) {
        Some(partial) => {
            let chained = Frame {
                parent: Some(frame),
                value: frame.value,
            };

            render_scope(partial.root(), &chained, partial.as_ref())
        }
        None => String::new(),
    }
}
