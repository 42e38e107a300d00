use errors::ScanError;
use span::{Span, Spanned};

/// Opens every tag
pub const OPEN_DELIMITER: &str = "{{";

/// Closes every tag
pub const CLOSE_DELIMITER: &str = "}}";

/// What kind of directive a tag is
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagKind {
    /// `{{key}}`
    Parameter,
    /// `{{#name}}` or `{{!name}}`, with an optional `|delimiter` suffix
    SectionOpen { delimiter: String, positive: bool },
    /// `{{//anything}}`
    Comment,
    /// `{{/name}}`
    SectionClose,
    /// `{{^name}}`, or `{{^[key]}}` when the template name is looked up
    /// under `key` at render time
    Partial { indirect: bool },
}

/// A single `{{...}}` occurrence in template text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    /// The tag payload after the directive marker
    pub name: String,
    /// Covers the whole token, delimiters included
    pub span: Span,
}

/// Scan template text for tags, left to right and non-overlapping.
///
/// Scanning stops at the first unterminated or unclassifiable tag; tags
/// found before that point are kept and the rest of the text is left for
/// the renderer to treat as literal.
pub fn scan(input: &str) -> Vec<Tag> {
    scan_tags(input).0
}

/// [scan], but also reporting why scanning stopped early, if it did.
pub(crate) fn scan_tags(input: &str) -> (Vec<Tag>, Option<Spanned<ScanError>>) {
    let mut tags = vec![];
    let mut cursor = 0;

    while let Some(found) = input[cursor..].find(OPEN_DELIMITER) {
        let open = cursor + found;
        let content_start = open + OPEN_DELIMITER.len();

        let content_end = match input[content_start..].find(CLOSE_DELIMITER) {
            Some(found) => content_start + found,
            None => return (tags, Some((ScanError::UnterminatedTag, open..input.len()))),
        };

        let end = content_end + CLOSE_DELIMITER.len();

        match classify(&input[content_start..content_end]) {
            Ok((kind, name)) => tags.push(Tag {
                kind,
                name,
                span: open..end,
            }),
            Err(err) => return (tags, Some((err, open..end))),
        }

        cursor = end;
    }

    (tags, None)
}

/// Classify the literal content between a tag's delimiters.
///
/// The content is used exactly as written; no whitespace is trimmed.
pub fn classify(content: &str) -> Result<(TagKind, String), ScanError> {
    if content.is_empty() {
        return Err(ScanError::EmptyTag);
    }

    if let Some(rest) = content.strip_prefix('#') {
        return Ok(section_open(rest, true));
    }

    if let Some(rest) = content.strip_prefix('!') {
        return Ok(section_open(rest, false));
    }

    if content.starts_with("//") {
        return Ok((TagKind::Comment, String::new()));
    }

    if let Some(rest) = content.strip_prefix('/') {
        return Ok((TagKind::SectionClose, rest.to_string()));
    }

    if let Some(rest) = content.strip_prefix('^') {
        let (indirect, name) = match rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            Some(inner) => (true, inner),
            None => (false, rest),
        };

        return Ok((TagKind::Partial { indirect }, name.to_string()));
    }

    Ok((TagKind::Parameter, content.to_string()))
}

fn section_open(rest: &str, positive: bool) -> (TagKind, String) {
    // The delimiter is everything after the last `|`; the default is the
    // empty string, meaning no separator between array items.
    let (name, delimiter) = match rest.rfind('|') {
        Some(at) => (&rest[..at], &rest[at + 1..]),
        None => (rest, ""),
    };

    (
        TagKind::SectionOpen {
            delimiter: delimiter.to_string(),
            positive,
        },
        name.to_string(),
    )
}
