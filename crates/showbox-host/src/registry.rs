use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::example::ExampleFactory;

/// Index of a descriptor in the catalog.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DescriptorId(usize);

impl DescriptorId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// One discovered example type and the file it came from.
pub struct ExampleDescriptor {
    id: DescriptorId,
    type_name: String,
    caption: String,
    origin: PathBuf,
    is_feature: bool,
    factory: Rc<dyn ExampleFactory>,
}

impl ExampleDescriptor {
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared caption; empty until an instance sets one.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn is_feature(&self) -> bool {
        self.is_feature
    }

    pub fn factory(&self) -> &Rc<dyn ExampleFactory> {
        &self.factory
    }

    /// Final path component of the origin, e.g. `welcome.demo`.
    pub fn file_name(&self) -> String {
        self.origin
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn file_stem(&self) -> Option<&str> {
        self.origin.file_stem().and_then(|s| s.to_str())
    }
}

impl fmt::Debug for ExampleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleDescriptor")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("origin", &self.origin)
            .field("is_feature", &self.is_feature)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("`{type_name}` from {} is already registered", origin.display())]
    DuplicateRegistration { type_name: String, origin: PathBuf },

    #[error("cannot register `{type_name}`: no source file is being loaded")]
    MissingSource { type_name: String },

    #[error("no initial example: no file named welcome.* declares an example")]
    NoInitialExample,
}

/// Ordered catalog of every example and feature type discovered at startup.
///
/// Filled by the loader, then shared read-only with the host.
#[derive(Default)]
pub struct Registry {
    catalog: Vec<ExampleDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor attributed to `source`, the file being loaded.
    pub fn register(
        &mut self,
        factory: Rc<dyn ExampleFactory>,
        is_feature: bool,
        source: &Path,
    ) -> Result<DescriptorId, RegistryError> {
        let type_name = factory.type_name().to_string();
        if source.as_os_str().is_empty() {
            return Err(RegistryError::MissingSource { type_name });
        }
        if self.catalog.iter().any(|d| d.origin == source && d.type_name == type_name) {
            return Err(RegistryError::DuplicateRegistration { type_name, origin: source.to_path_buf() });
        }

        let id = DescriptorId(self.catalog.len());
        log::debug!(
            "registered {} `{}` from {}",
            if is_feature { "feature" } else { "example" },
            type_name,
            source.display()
        );
        self.catalog.push(ExampleDescriptor {
            id,
            caption: factory.declared_caption().to_string(),
            type_name,
            origin: source.to_path_buf(),
            is_feature,
            factory,
        });
        Ok(id)
    }

    /// Non-feature descriptors in discovery order.
    pub fn list_examples(&self) -> Vec<&ExampleDescriptor> {
        self.catalog.iter().filter(|d| !d.is_feature).collect()
    }

    /// Feature descriptors in discovery order.
    pub fn list_features(&self) -> Vec<&ExampleDescriptor> {
        self.catalog.iter().filter(|d| d.is_feature).collect()
    }

    /// The first example declared in a file named `welcome.*`.
    pub fn initial_example(&self) -> Result<&ExampleDescriptor, RegistryError> {
        self.catalog
            .iter()
            .find(|d| !d.is_feature && d.file_stem() == Some("welcome"))
            .ok_or(RegistryError::NoInitialExample)
    }

    /// The first descriptor loaded from `path`.
    pub fn find_by_source(&self, path: &Path) -> Option<&ExampleDescriptor> {
        self.catalog.iter().find(|d| d.origin == path)
    }

    /// The first example whose type name or file stem is `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&ExampleDescriptor> {
        self.catalog
            .iter()
            .filter(|d| !d.is_feature)
            .find(|d| d.type_name == name || d.file_stem() == Some(name))
    }

    pub fn get(&self, id: DescriptorId) -> Option<&ExampleDescriptor> {
        self.catalog.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExampleDescriptor> {
        self.catalog.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::example::{Example, ExampleError, ExampleOptions};
    use crate::facade::HostFacade;

    /// Factory for a type with no behavior.
    pub(crate) struct Named(pub &'static str);

    struct Inert;
    impl Example for Inert {}

    impl ExampleFactory for Named {
        fn type_name(&self) -> &str {
            self.0
        }

        fn instantiate(
            &self,
            _width: f32,
            _height: f32,
            _options: &ExampleOptions,
            _facade: &mut HostFacade,
        ) -> Result<Box<dyn Example>, ExampleError> {
            Ok(Box::new(Inert))
        }
    }

    fn named(name: &'static str) -> Rc<dyn ExampleFactory> {
        Rc::new(Named(name))
    }

    #[test]
    fn keeps_discovery_order_and_splits_features() {
        let mut reg = Registry::new();
        reg.register(named("A"), false, Path::new("/d/a.demo")).unwrap();
        reg.register(named("F"), true, Path::new("/d/features/f.demo")).unwrap();
        reg.register(named("B"), false, Path::new("/d/b.demo")).unwrap();

        let examples: Vec<_> = reg.list_examples().into_iter().map(|d| d.type_name()).collect();
        let features: Vec<_> = reg.list_features().into_iter().map(|d| d.type_name()).collect();
        assert_eq!(examples, ["A", "B"]);
        assert_eq!(features, ["F"]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn same_name_in_two_files_is_two_descriptors() {
        let mut reg = Registry::new();
        let a = reg.register(named("Player"), false, Path::new("/d/cptn.demo")).unwrap();
        let b = reg.register(named("Player"), false, Path::new("/d/tutorial.demo")).unwrap();
        assert_ne!(a, b);
        assert_ne!(reg.get(a).unwrap().origin(), reg.get(b).unwrap().origin());
    }

    #[test]
    fn duplicate_in_same_file_is_rejected() {
        let mut reg = Registry::new();
        reg.register(named("A"), false, Path::new("/d/a.demo")).unwrap();
        let err = reg.register(named("A"), false, Path::new("/d/a.demo")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRegistration { .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn empty_source_is_rejected() {
        let mut reg = Registry::new();
        let err = reg.register(named("A"), false, Path::new("")).unwrap_err();
        assert!(matches!(err, RegistryError::MissingSource { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn initial_example_is_the_welcome_file() {
        let mut reg = Registry::new();
        reg.register(named("Tutorial"), false, Path::new("/d/tutorial.demo")).unwrap();
        reg.register(named("Hello"), true, Path::new("/d/features/welcome.demo")).unwrap();
        assert!(matches!(reg.initial_example(), Err(RegistryError::NoInitialExample)));

        reg.register(named("Welcome"), false, Path::new("/d/welcome.demo")).unwrap();
        assert_eq!(reg.initial_example().unwrap().type_name(), "Welcome");
    }

    #[test]
    fn lookups() {
        let mut reg = Registry::new();
        reg.register(named("Player"), false, Path::new("/d/cptn.demo")).unwrap();
        reg.register(named("Star"), false, Path::new("/d/cptn.demo")).unwrap();
        assert_eq!(reg.find_by_source(Path::new("/d/cptn.demo")).unwrap().type_name(), "Player");
        assert!(reg.find_by_source(Path::new("/d/none.demo")).is_none());
        assert_eq!(reg.find_by_name("Star").unwrap().file_name(), "cptn.demo");
        assert_eq!(reg.find_by_name("cptn").unwrap().type_name(), "Player");
        assert!(reg.find_by_name("nope").is_none());
    }
}
