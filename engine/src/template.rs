use std::sync::{Arc, OnceLock, RwLock, Weak};

use errors::TemplateError;
use span::Spanned;
use types::{Mapping, Value};

use crate::library::Library;
use crate::render::{render_scope, Frame};
use crate::scanner::{scan, scan_tags};
use crate::scope::{build_scope_tree, ScopeNode};

/// A single template: raw text plus a scope tree built lazily on first
/// render and cached for the life of the template.
///
/// Rendering is pure, so one template may be rendered from many threads
/// at once; the one-time tree build is guarded by the [OnceLock].
pub struct Template {
    text: String,
    tree: OnceLock<ScopeNode>,
    /// Weak so a library and its templates never form a cycle
    pub(crate) library: RwLock<Weak<Library>>,
}

impl Template {
    /// No validation happens here; questionable tag syntax surfaces
    /// through [Template::check] and never fails a render.
    pub fn new(text: impl Into<String>) -> Self {
        Template {
            text: text.into(),
            tree: OnceLock::new(),
            library: RwLock::new(Weak::new()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn root(&self) -> &ScopeNode {
        self.tree
            .get_or_init(|| build_scope_tree(scan(&self.text), 0..self.text.len()))
    }

    /// The library this template was last registered under, if it is
    /// still alive. Partials resolve against it.
    pub(crate) fn library(&self) -> Option<Arc<Library>> {
        self.library.read().unwrap().upgrade()
    }

    /// Render against a substitution mapping.
    ///
    /// Always produces a string: unresolved names and missing partials
    /// render as empty text, and negative sections render their body when
    /// their name is missing.
    pub fn render(&self, substitutions: Mapping) -> String {
        let value = Value::Mapping(substitutions);

        render_scope(self.root(), &Frame::root(&value), self)
    }

    /// Report why tag scanning stopped before the end of the template, if
    /// it did. Diagnostic only; rendering treats the unscanned remainder
    /// as literal text.
    pub fn check(&self) -> Vec<Spanned<TemplateError>> {
        match scan_tags(&self.text).1 {
            Some((err, span)) => vec![(err.into(), span)],
            None => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use errors::ScanError;
    use pretty_assertions::assert_eq;

    use super::*;

    macro_rules! render_test {
        ($test_name:ident, $template:expr, $substitutions:expr, $result:expr) => {
            #[test]
            fn $test_name() {
                let template = Template::new($template);

                assert_eq!($result, template.render($substitutions));
            }
        };
    }

    fn subs(entries: &[(&str, Value)]) -> Mapping {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn item(entries: &[(&str, Value)]) -> Value {
        Value::Mapping(subs(entries))
    }

    render_test!(
        literal_text_untouched,
        "no tags at all",
        subs(&[("tagName", Value::from("B"))]),
        "no tags at all"
    );

    render_test!(
        text_replacement,
        "{{tagName}}",
        subs(&[("tagName", Value::from("Result"))]),
        "Result"
    );

    render_test!(
        dict_replacement,
        "A{{tagName}}C{{tag2}}E",
        subs(&[("tagName", Value::from("B")), ("tag2", Value::from("D"))]),
        "ABCDE"
    );

    render_test!(
        dotted_path_replacement,
        "A{{super.tag}}C",
        subs(&[("super", item(&[("tag", Value::from("B"))]))]),
        "ABC"
    );

    render_test!(
        missing_parameter_renders_empty,
        "A{{missingTagName}}E",
        subs(&[("tagName", Value::from("B"))]),
        "AE"
    );

    render_test!(
        empty_array_elides_section,
        "A{{#tagName}}C{{/tagName}}E",
        subs(&[("tagName", Value::from(vec![]))]),
        "AE"
    );

    render_test!(
        array_renders_once_per_item,
        "A{{#tagName}}{{subTag}}{{super}}{{/tagName}}E",
        subs(&[
            (
                "tagName",
                Value::from(vec![
                    item(&[("subTag", Value::from("A"))]),
                    item(&[("subTag", Value::from("B"))]),
                ])
            ),
            ("super", Value::from("D")),
        ]),
        "AADBDE"
    );

    render_test!(
        array_items_joined_with_delimiter,
        "A{{#tagName|,}}{{subTag}}{{super}}{{/tagName}}E",
        subs(&[
            (
                "tagName",
                Value::from(vec![
                    item(&[("subTag", Value::from("A"))]),
                    item(&[("subTag", Value::from("B"))]),
                ])
            ),
            ("super", Value::from("D")),
        ]),
        "AAD,BDE"
    );

    render_test!(
        negative_section_renders_for_empty_array,
        "A{{!tagName}}  There is no content.  {{/tagName}}E",
        subs(&[("tagName", Value::from(vec![])), ("super", Value::from("D"))]),
        "A  There is no content.  E"
    );

    render_test!(
        negative_section_renders_for_missing_name,
        "A{{!missingTagName}}The content was missing, but super is {{super}}.{{/missingTagName}}E",
        subs(&[("tagName", Value::from(vec![])), ("super", Value::from("D"))]),
        "AThe content was missing, but super is D.E"
    );

    render_test!(
        negative_section_elides_non_empty_array,
        "A{{!tagName}}C{{/tagName}}E",
        subs(&[("tagName", Value::from(vec![Value::from("x")]))]),
        "AE"
    );

    render_test!(
        comment_contributes_nothing,
        "A{{//tagName}}E",
        subs(&[("tagName", Value::from(vec![])), ("super", Value::from("D"))]),
        "AE"
    );

    render_test!(
        true_renders_positive_section,
        "A{{#flag}}yes{{/flag}}B",
        subs(&[("flag", Value::from(true))]),
        "AyesB"
    );

    render_test!(
        false_elides_positive_section,
        "A{{#flag}}yes{{/flag}}B",
        subs(&[("flag", Value::from(false))]),
        "AB"
    );

    render_test!(
        false_renders_negative_section,
        "A{{!flag}}no{{/flag}}B",
        subs(&[("flag", Value::from(false))]),
        "AnoB"
    );

    render_test!(
        boolean_section_still_sees_outer_scope,
        "{{#flag}}value is {{tagName}}{{/flag}}",
        subs(&[("flag", Value::from(true)), ("tagName", Value::from("B"))]),
        "value is B"
    );

    render_test!(
        parameter_resolving_to_boolean_renders_empty_body,
        "A{{flag}}B",
        subs(&[("flag", Value::from(true))]),
        "AB"
    );

    render_test!(
        mismatched_close_stays_literal,
        "A{{#a}}B{{/b}}C{{/a}}D",
        subs(&[("a", item(&[]))]),
        "AB{{/b}}CD"
    );

    render_test!(
        unclosed_section_runs_to_document_end,
        "A{{#a}}B{{x}}",
        subs(&[("a", item(&[("x", Value::from("C"))]))]),
        "ABC"
    );

    render_test!(
        unclosed_section_with_missing_name_elides_rest,
        "A{{#a}}B{{x}}",
        subs(&[]),
        "A"
    );

    render_test!(
        unterminated_tag_stays_literal,
        "A{{tagName}}B{{broken",
        subs(&[("tagName", Value::from("X"))]),
        "AXB{{broken"
    );

    render_test!(
        empty_tag_stops_scanning_but_keeps_prior_tags,
        "A{{tagName}}B{{}}C{{tagName}}D",
        subs(&[("tagName", Value::from("X"))]),
        "AXB{{}}C{{tagName}}D"
    );

    #[test]
    fn renders_are_repeatable() {
        let template = Template::new("A{{tagName}}C");

        assert_eq!(
            "ABC",
            template.render(subs(&[("tagName", Value::from("B"))]))
        );
        assert_eq!(
            "ABC",
            template.render(subs(&[("tagName", Value::from("B"))]))
        );
    }

    #[test]
    fn check_reports_unterminated_tag() {
        let template = Template::new("A{{tagName}}B{{broken");

        assert_eq!(
            vec![(ScanError::UnterminatedTag.into(), 13..21)],
            template.check()
        );
    }

    #[test]
    fn check_reports_empty_tag() {
        let template = Template::new("{{}}");

        assert_eq!(vec![(ScanError::EmptyTag.into(), 0..4)], template.check());
    }

    #[test]
    fn check_is_empty_for_clean_templates() {
        let template = Template::new("A{{tagName}}C");

        assert_eq!(Vec::<(TemplateError, span::Span)>::new(), template.check());
    }
}
