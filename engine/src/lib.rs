pub use library::Library;
pub use scanner::{classify, scan, Tag, TagKind};
pub use scope::{build_scope_tree, ScopeNode};
pub use template::Template;

mod library;
mod render;
mod scanner;
mod scope;
mod template;
