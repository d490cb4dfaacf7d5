//! Discovery pass: glob for demo files, evaluate each into its own module,
//! register what it declares.
//!
//! A file that fails to read, parse, evaluate, or register is reported to the
//! [`DiagnosticSink`] and skipped; discovery always carries on with the next
//! file.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use showbox_script::{ScriptError, load_module};
use thiserror::Error;

use crate::registry::{Registry, RegistryError};
use crate::script_example::ScriptExampleFactory;

/// Receives one line per failed file.
pub trait DiagnosticSink {
    fn report(&mut self, line: &str);
}

/// Sends diagnostics to the logger at error level, or straight to stderr
/// when the logger filters errors out (e.g. `RUST_LOG=off`).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, line: &str) {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
}

impl DiagnosticSink for Vec<String> {
    fn report(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// The file currently being loaded. Set right before evaluation, cleared after.
#[derive(Debug, Default)]
pub struct LoadContext {
    current: Option<PathBuf>,
}

impl LoadContext {
    pub fn enter(&mut self, path: PathBuf) {
        self.current = Some(path);
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid pattern: {0}")]
    Pattern(String),

    #[error("{0}")]
    Glob(String),
}

/// A load error tied to the file (or pattern) it came from.
#[derive(Debug, Error)]
#[error("cannot load {}: {source}", path.display())]
pub struct LoadFailure {
    pub path: PathBuf,
    pub source: LoadError,
}

impl LoadFailure {
    fn new(path: impl Into<PathBuf>, source: impl Into<LoadError>) -> Self {
        Self { path: path.into(), source: source.into() }
    }
}

/// Totals for one discovery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Files that loaded cleanly.
    pub loaded: usize,
    /// Example and feature types registered.
    pub registered: usize,
    /// Diagnostics emitted: failed files and bad pattern alternatives.
    pub failed: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) loaded, {} type(s) registered, {} failure(s)",
            self.loaded, self.registered, self.failed
        )
    }
}

/// Fills a [`Registry`] from demo files on disk.
pub struct Loader<'r, S: DiagnosticSink = LogSink> {
    registry: &'r mut Registry,
    sink: S,
    context: LoadContext,
    visited: HashSet<PathBuf>,
}

impl<'r> Loader<'r> {
    pub fn new(registry: &'r mut Registry) -> Self {
        Self::with_sink(registry, LogSink)
    }
}

impl<'r, S: DiagnosticSink> Loader<'r, S> {
    pub fn with_sink(registry: &'r mut Registry, sink: S) -> Self {
        Self { registry, sink, context: LoadContext::default(), visited: HashSet::new() }
    }

    /// Loads every file matching `pattern`.
    ///
    /// `{a,b}` groups are expanded first; alternatives are globbed in order,
    /// each one's matches sorted. A file already visited by this loader is
    /// skipped.
    pub fn discover_and_load(&mut self, pattern: &str) -> LoadReport {
        let mut report = LoadReport::default();

        for alternative in expand_braces(pattern) {
            let entries = match glob::glob(&alternative) {
                Ok(entries) => entries,
                Err(e) => {
                    self.fail(&mut report, LoadFailure::new(&alternative, LoadError::Pattern(e.to_string())));
                    continue;
                }
            };

            let mut matches = Vec::new();
            for entry in entries {
                match entry {
                    Ok(path) => matches.push(path),
                    Err(e) => {
                        let path = e.path().to_path_buf();
                        self.fail(&mut report, LoadFailure::new(path, LoadError::Glob(e.error().to_string())));
                    }
                }
            }
            matches.sort();

            for path in matches {
                if path.is_dir() {
                    continue;
                }
                let canonical = match path.canonicalize() {
                    Ok(p) => p,
                    Err(e) => {
                        self.fail(&mut report, LoadFailure::new(path, e));
                        continue;
                    }
                };
                if !self.visited.insert(canonical.clone()) {
                    log::debug!("skipping {}: already loaded", canonical.display());
                    continue;
                }
                match self.load_canonical(&canonical) {
                    Ok(n) => {
                        report.loaded += 1;
                        report.registered += n;
                    }
                    Err(failure) => self.fail(&mut report, failure),
                }
            }
        }

        report
    }

    /// Loads one file and returns how many types it registered.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, LoadFailure> {
        let canonical = path.canonicalize().map_err(|e| LoadFailure::new(path, e))?;
        self.visited.insert(canonical.clone());
        self.load_canonical(&canonical)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn fail(&mut self, report: &mut LoadReport, failure: LoadFailure) {
        report.failed += 1;
        self.sink.report(&failure.to_string());
    }

    fn load_canonical(&mut self, path: &Path) -> Result<usize, LoadFailure> {
        self.context.enter(path.to_path_buf());
        let result = self.evaluate_current();
        self.context.clear();
        result.map_err(|e| LoadFailure::new(path, e))
    }

    fn evaluate_current(&mut self) -> Result<usize, LoadError> {
        let origin = self.context.current().map(Path::to_path_buf).unwrap_or_default();
        let text = fs::read_to_string(&origin)?;
        let module = load_module(&text)?;
        let source: Rc<str> = Rc::from(text);

        let mut registered = 0;
        for decl in module.examples() {
            let factory = ScriptExampleFactory::new(Rc::clone(&module), Rc::clone(decl), Rc::clone(&source));
            self.registry.register(Rc::new(factory), decl.is_feature, &origin)?;
            registered += 1;
        }
        log::debug!("loaded {} ({} type(s))", origin.display(), registered);
        Ok(registered)
    }
}

/// Expands `{a,b}` alternatives, including nested groups, left to right.
///
/// `"d/{*.demo,features/*.demo}"` becomes `["d/*.demo", "d/features/*.demo"]`.
/// A pattern without a complete group is returned unchanged.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = first_group(pattern) else {
        return vec![pattern.to_string()];
    };
    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    split_alternatives(&pattern[open + 1..close])
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

/// Byte offsets of the first balanced top-level `{ ... }`.
fn first_group(pattern: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in pattern.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, i));
                }
            }
            _ => {}
        }
    }
    None
}

fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[last..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    fn pattern(dir: &TempDir) -> String {
        format!("{}/{{*.demo,features/*.demo}}", dir.path().display())
    }

    fn load(dir: &TempDir) -> (Registry, LoadReport, Vec<String>) {
        let mut registry = Registry::new();
        let mut loader = Loader::with_sink(&mut registry, Vec::new());
        let report = loader.discover_and_load(&pattern(dir));
        let diagnostics = loader.into_sink();
        (registry, report, diagnostics)
    }

    #[test]
    fn brace_expansion() {
        assert_eq!(expand_braces("d/{*.demo,features/*.demo}"), ["d/*.demo", "d/features/*.demo"]);
        assert_eq!(expand_braces("{a,b}{1,2}"), ["a1", "a2", "b1", "b2"]);
        assert_eq!(expand_braces("x{a,{b,c}}"), ["xa", "xb", "xc"]);
        assert_eq!(expand_braces("plain/*.demo"), ["plain/*.demo"]);
        assert_eq!(expand_braces("open{a,b"), ["open{a,b"]);
        assert_eq!(expand_braces("e{}"), ["e"]);
    }

    #[test]
    fn registers_in_file_then_declaration_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.demo", "example B1 { }  example B2 { }");
        write(dir.path(), "a.demo", "example A { }");
        write(dir.path(), "welcome.demo", "example Welcome { }");
        write(dir.path(), "features/shapes.demo", "feature Shapes { }");

        let (registry, report, diagnostics) = load(&dir);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(report, LoadReport { loaded: 4, registered: 5, failed: 0 });

        let examples: Vec<_> = registry.list_examples().into_iter().map(|d| d.type_name()).collect();
        assert_eq!(examples, ["A", "B1", "B2", "Welcome"]);
        let features: Vec<_> = registry.list_features().into_iter().map(|d| d.type_name()).collect();
        assert_eq!(features, ["Shapes"]);
        assert_eq!(registry.initial_example().unwrap().type_name(), "Welcome");
    }

    #[test]
    fn same_name_in_two_files_stays_separate() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cptn.demo", "let SPEED = 1  example Player { var s = SPEED }");
        write(dir.path(), "tutorial.demo", "let SPEED = 2  example Player { var s = SPEED }");

        let (registry, report, _) = load(&dir);
        assert_eq!(report.registered, 2);
        let players = registry.list_examples();
        assert_eq!(players.len(), 2);
        assert_ne!(players[0].id(), players[1].id());
        assert_ne!(players[0].origin(), players[1].origin());
        assert_eq!(players[0].file_name(), "cptn.demo");
        assert_eq!(players[1].file_name(), "tutorial.demo");
    }

    #[test]
    fn a_broken_file_is_reported_and_skipped() {
        let dir = TempDir::new().unwrap();
        for (name, ty) in [("a", "A"), ("b", "B"), ("d", "D"), ("e", "E")] {
            write(dir.path(), &format!("{name}.demo"), &format!("example {ty} {{ }}"));
        }
        write(dir.path(), "c.demo", "example C { var x = ");

        let (registry, report, diagnostics) = load(&dir);
        assert_eq!(registry.len(), 4);
        assert_eq!(report.failed, 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("cannot load "), "{}", diagnostics[0]);
        assert!(diagnostics[0].contains("c.demo"), "{}", diagnostics[0]);
        assert!(registry.iter().all(|d| d.file_name() != "c.demo"));
    }

    #[test]
    fn evaluation_errors_are_contained() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.demo", "let X = 1 / nothing()  example A { }");
        write(dir.path(), "b.demo", "example B { }");

        let (registry, report, diagnostics) = load(&dir);
        assert_eq!(report, LoadReport { loaded: 1, registered: 1, failed: 1 });
        assert!(diagnostics[0].contains("a.demo"));
        assert_eq!(registry.list_examples()[0].type_name(), "B");
    }

    #[test]
    fn runaway_constants_and_deep_nesting_fail_one_file_each() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.demo", "example A { }");
        write(dir.path(), "b.demo", "let X = range(9007199254740992, 9007199254740994)  example B { }");
        write(dir.path(), "c.demo", "let Y = range(1e9)  example C { }");
        let deep = format!("let Z = {}1{}  example D {{ }}", "(".repeat(100_000), ")".repeat(100_000));
        write(dir.path(), "d.demo", &deep);
        write(dir.path(), "e.demo", "example E { }");

        let (registry, report, diagnostics) = load(&dir);
        assert_eq!(report, LoadReport { loaded: 2, registered: 2, failed: 3 });
        let names: Vec<_> = registry.iter().map(|d| d.type_name().to_string()).collect();
        assert_eq!(names, ["A", "E"]);
        for (line, file) in diagnostics.iter().zip(["b.demo", "c.demo", "d.demo"]) {
            assert!(line.contains(file), "{line}");
        }
        assert!(diagnostics[2].contains("nested too deeply"), "{}", diagnostics[2]);
    }

    #[test]
    fn log_sink_reports_without_a_logger() {
        LogSink.report("cannot load x.demo: test");
    }

    #[test]
    fn overlapping_alternatives_load_once() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.demo", "example A { }");

        let mut registry = Registry::new();
        let mut loader = Loader::with_sink(&mut registry, Vec::new());
        let report = loader.discover_and_load(&format!("{0}/{{*.demo,a.demo}}", dir.path().display()));
        assert_eq!(report, LoadReport { loaded: 1, registered: 1, failed: 0 });
        assert!(loader.sink().is_empty());
    }

    #[test]
    fn origins_are_canonical() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.demo", "example A { }");
        let (registry, _, _) = load(&dir);
        let expected = dir.path().join("a.demo").canonicalize().unwrap();
        assert_eq!(registry.list_examples()[0].origin(), expected);
        assert!(registry.find_by_source(&expected).is_some());
    }

    #[test]
    fn bad_pattern_is_a_diagnostic() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.demo", "example A { }");

        let mut registry = Registry::new();
        let mut loader = Loader::with_sink(&mut registry, Vec::new());
        let report = loader.discover_and_load(&format!("{0}/{{[.demo,*.demo}}", dir.path().display()));
        assert_eq!(report.loaded, 1);
        assert_eq!(report.failed, 1);
        assert!(loader.sink()[0].contains("invalid pattern"));
    }

    #[test]
    fn load_file_directly() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pair.demo", "example A { }  feature F { }");
        write(dir.path(), "broken.demo", "example {");

        let mut registry = Registry::new();
        let mut loader = Loader::new(&mut registry);
        assert_eq!(loader.load_file(&dir.path().join("pair.demo")).unwrap(), 2);

        let failure = loader.load_file(&dir.path().join("broken.demo")).unwrap_err();
        assert!(matches!(failure.source, LoadError::Script(_)));

        let missing = loader.load_file(&dir.path().join("missing.demo")).unwrap_err();
        assert!(matches!(missing.source, LoadError::Io(_)));

        // loading the same file again collides with its own registrations
        let again = loader.load_file(&dir.path().join("pair.demo")).unwrap_err();
        assert!(matches!(again.source, LoadError::Registry(RegistryError::DuplicateRegistration { .. })));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn bundled_demos_load_and_run() {
        use crate::example::ExampleOptions;
        use crate::facade::HostFacade;
        use crate::painter::Painter;
        use showbox_engine::coords::Rect;
        use showbox_engine::scene::DrawList;
        use showbox_engine::text::FontSystem;

        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let mut registry = Registry::new();
        let mut loader = Loader::with_sink(&mut registry, Vec::new());
        let report = loader.discover_and_load(&format!("{}/{{*.demo,features/*.demo}}", root.display()));
        assert!(loader.sink().is_empty(), "{:?}", loader.sink());
        assert_eq!(report.failed, 0);
        assert!(registry.initial_example().is_ok());
        assert!(!registry.list_features().is_empty());

        let fonts = Rc::new(FontSystem::new());
        for descriptor in registry.iter() {
            let mut facade = HostFacade::new(Rc::clone(&fonts), None);
            let mut example = descriptor
                .factory()
                .instantiate(600.0, 600.0, &ExampleOptions::default(), &mut facade)
                .unwrap();
            example.update(&mut facade).unwrap();
            let mut list = DrawList::new();
            let mut painter = Painter::new(&mut list, &fonts, None, Rect::new(300.0, 0.0, 600.0, 600.0));
            example.draw(&mut facade, &mut painter).unwrap();
            assert!(!list.is_empty(), "{} drew nothing", descriptor.type_name());
        }
    }

    #[test]
    fn context_is_cleared_after_each_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.demo", "example A { }");
        let mut registry = Registry::new();
        let mut loader = Loader::new(&mut registry);
        loader.load_file(&dir.path().join("a.demo")).unwrap();
        assert!(loader.context.current().is_none());
    }
}
