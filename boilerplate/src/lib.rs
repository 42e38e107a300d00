//! A mustache-flavored text templating engine.
//!
//! Tags are wrapped in `{{ ... }}` and no whitespace is allowed inside
//! them. Sections open with `#` (or `!` for the negated form) and close
//! with `/`; an open tag may carry a `|delimiter` suffix used to join
//! array items. `//` starts a comment tag. `^name` splices in another
//! template from the same [Library], and `^[key]` looks the template name
//! up in the substitutions first.
//!
//! Rendering never fails: unresolved names, missing partials, and
//! malformed tags all degrade to empty or literal text.

pub use engine::{Library, ScopeNode, Tag, TagKind, Template, build_scope_tree, classify, scan};
pub use errors::*;
pub use span::*;
pub use types::{Mapping, Value};
