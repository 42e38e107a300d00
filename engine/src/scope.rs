use span::Span;

use crate::scanner::{Tag, TagKind};

/// One node of the nested section structure derived from matching tags.
///
/// Children are ordered by source position and never overlap. The tree is
/// immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeNode {
    pub name: String,
    /// Synthetic and zero-width for the root
    pub start_tag: Tag,
    /// None while a section was never closed; its body then runs to the
    /// end of the document
    pub end_tag: Option<Tag>,
    /// Separator between rendered array items, from the open tag's `|`
    /// suffix
    pub delimiter: String,
    pub children: Vec<ScopeNode>,
}

impl ScopeNode {
    /// An open section, pending its close tag
    fn section(tag: Tag) -> Self {
        let delimiter = match &tag.kind {
            TagKind::SectionOpen { delimiter, .. } => delimiter.clone(),
            _ => String::new(),
        };

        ScopeNode {
            name: tag.name.clone(),
            start_tag: tag,
            end_tag: None,
            delimiter,
            children: vec![],
        }
    }

    /// A parameter, comment, or partial: closed on arrival, no children
    fn leaf(tag: Tag) -> Self {
        ScopeNode {
            name: tag.name.clone(),
            end_tag: Some(tag.clone()),
            start_tag: tag,
            delimiter: String::new(),
            children: vec![],
        }
    }

    /// The synthetic whole-document scope: a positive section with
    /// zero-width open and close tags at the document edges
    fn root(full_range: Span) -> Self {
        ScopeNode {
            name: String::new(),
            start_tag: Tag {
                kind: TagKind::SectionOpen {
                    delimiter: String::new(),
                    positive: true,
                },
                name: String::new(),
                span: full_range.start..full_range.start,
            },
            end_tag: Some(Tag {
                kind: TagKind::SectionClose,
                name: String::new(),
                span: full_range.end..full_range.end,
            }),
            delimiter: String::new(),
            children: vec![],
        }
    }

    /// Section polarity: `#` sections and plain tags render on truthy
    /// values, `!` sections and comments on falsy ones.
    pub fn is_positive(&self) -> bool {
        match &self.start_tag.kind {
            TagKind::SectionOpen { positive, .. } => *positive,
            TagKind::Comment => false,
            _ => true,
        }
    }

    /// First byte of the node's body, just past the open tag
    pub(crate) fn inner_start(&self) -> usize {
        self.start_tag.span.end
    }

    /// One past the last byte of the body. Leaves have empty bodies;
    /// unclosed sections run to the end of the document.
    pub(crate) fn inner_end(&self, document_end: usize) -> usize {
        match &self.end_tag {
            Some(tag) => tag.span.start.max(self.inner_start()),
            None => document_end,
        }
    }

    /// One past the last byte the node covers, close tag included
    pub(crate) fn outer_end(&self, document_end: usize) -> usize {
        match &self.end_tag {
            Some(tag) => tag.span.end,
            None => document_end,
        }
    }
}

/// Nest a flat tag sequence into a scope tree rooted at a synthetic
/// whole-document section.
///
/// Building is pure and deterministic: the same tags and range always
/// produce a structurally identical tree.
pub fn build_scope_tree(tags: Vec<Tag>, full_range: Span) -> ScopeNode {
    let mut stack = vec![ScopeNode::root(full_range)];

    for tag in tags {
        match tag.kind {
            TagKind::SectionOpen { .. } => stack.push(ScopeNode::section(tag)),
            TagKind::Parameter | TagKind::Comment | TagKind::Partial { .. } => {
                current(&mut stack).children.push(ScopeNode::leaf(tag));
            }
            TagKind::SectionClose => {
                // A close that doesn't match the innermost open section is
                // skipped and closes nothing; the root never matches.
                if stack.len() > 1 && current(&mut stack).name == tag.name {
                    let mut section = stack.pop().unwrap();
                    section.end_tag = Some(tag);
                    current(&mut stack).children.push(section);
                }
            }
        }
    }

    // Sections left open at the end of the document stay without a real
    // close tag and nest back into their parents as-is.
    while stack.len() > 1 {
        let section = stack.pop().unwrap();
        current(&mut stack).children.push(section);
    }

    stack.pop().unwrap()
}

fn current(stack: &mut [ScopeNode]) -> &mut ScopeNode {
    stack.last_mut().unwrap()
}
