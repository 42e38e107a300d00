use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::template::Template;

/// A name-keyed store of templates, shared by partial resolution.
///
/// Reads happen during rendering and writes during registration, possibly
/// from different threads; the lock admits many concurrent readers and one
/// writer at a time. No ordering is promised across concurrent writers.
#[derive(Default)]
pub struct Library {
    templates: RwLock<HashMap<String, Arc<Template>>>,
}

impl Library {
    pub fn new() -> Arc<Library> {
        Arc::new(Library::default())
    }

    /// Wrap each entry's text in a [Template] and register it under the
    /// entry's key.
    pub fn with_templates<I, K, V>(templates: I) -> Arc<Library>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let library = Library::new();

        for (key, text) in templates {
            library.add_template(Template::new(text), &key.into());
        }

        library
    }

    /// Register under `key`, overwriting any previous entry, and bind the
    /// template's backlink so its partials resolve against this library.
    pub fn add_template(self: &Arc<Library>, template: Template, key: &str) -> Arc<Template> {
        let template = Arc::new(template);

        *template.library.write().unwrap() = Arc::downgrade(self);

        self.templates
            .write()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&template));

        template
    }

    pub fn lookup(&self, key: &str) -> Option<Arc<Template>> {
        self.templates.read().unwrap().get(key).cloned()
    }
}
