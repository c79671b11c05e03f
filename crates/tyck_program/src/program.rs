use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span, info, info_span};
use tyck_ast::SyntaxTree;
use tyck_checker::{import_specifiers, Session, SourceInput};
use tyck_core::intern::StringInterner;
use tyck_core::text::LineAndColumn;
use tyck_diagnostics::{Diagnostic, DiagnosticCollection};
use tyck_options::{parse_project_config_file, CheckerOptions};

use crate::discover::{discover_source_files, is_source_file};
use crate::error::ProgramError;
use crate::resolve::{normalize, ModuleResolver};

/// Patterns used when a project file names neither `files` nor `include`.
const DEFAULT_INCLUDE: &str = "**/*";

#[derive(Debug, Clone)]
struct SourceFile {
    name: String,
    text: String,
}

/// A set of source files and the options to check them with.
#[derive(Debug, Clone, Default)]
pub struct Program {
    options: CheckerOptions,
    sources: Vec<SourceFile>,
}

impl Program {
    pub fn new(options: CheckerOptions) -> Self {
        Self {
            options,
            sources: Vec::new(),
        }
    }

    /// Add a file from memory. Adding the same name again replaces its text.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = normalize(&name.into());
        let text = text.into();
        match self.sources.iter_mut().find(|source| source.name == name) {
            Some(existing) => existing.text = text,
            None => self.sources.push(SourceFile { name, text }),
        }
    }

    /// Read files from disk in the given order.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), ProgramError> {
        for path in paths {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path).map_err(|source| ProgramError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            self.add_source(path.to_string_lossy(), text);
        }
        Ok(())
    }

    /// Open a project file. `files` entries and `include` patterns are
    /// relative to the directory holding the project file.
    pub fn from_config(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let path = path.as_ref();
        let config = parse_project_config_file(path)?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let files: Vec<PathBuf> = match (&config.files, &config.include) {
            (Some(files), _) => {
                if let Some(bad) = files.iter().find(|file| !is_source_file(Path::new(file))) {
                    return Err(ProgramError::Config(format!("'{bad}' is not a .ts file")));
                }
                files.iter().map(|file| root.join(file)).collect()
            }
            (None, include) => {
                let include = include.clone().unwrap_or_else(|| vec![DEFAULT_INCLUDE.to_string()]);
                let exclude = config.exclude.clone().unwrap_or_default();
                discover_source_files(&root, &include, &exclude)?
            }
        };
        if files.is_empty() {
            return Err(ProgramError::Config(format!(
                "no inputs were found in project file '{}'",
                path.display()
            )));
        }
        debug!(config = %path.display(), files = files.len(), "project loaded");
        let mut program = Program::new(config.options());
        program.load_files(&files)?;
        Ok(program)
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// Replace the options, for command-line overrides.
    pub fn set_options(&mut self, options: CheckerOptions) {
        self.options = options;
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|source| source.name.as_str())
    }

    /// Parse every file, resolve imports between them and check the whole
    /// program.
    pub fn check(&self) -> Result<CheckReport, ProgramError> {
        let _span = info_span!("check_program", files = self.sources.len()).entered();
        let interner = StringInterner::new();
        let trees: Vec<Arc<SyntaxTree>> = self
            .sources
            .par_iter()
            .map(|source| {
                let _span = debug_span!("parse_file", file = %source.name).entered();
                tyck_parser::parse_source(&source.name, &source.text, &interner)
            })
            .collect();

        let resolver = ModuleResolver::new(self.file_names());
        let inputs: Vec<SourceInput> = trees
            .iter()
            .map(|tree| {
                let imports = import_specifiers(tree)
                    .into_iter()
                    .map(|(node, specifier)| (node, resolver.resolve(tree.file_name(), &specifier)))
                    .collect();
                SourceInput::new(Arc::clone(tree)).with_imports(imports)
            })
            .collect();

        let session = Session::new(inputs, self.options.clone());
        let mut diagnostics = DiagnosticCollection::new();
        diagnostics.extend(session.check_all()?);
        diagnostics.sort_and_dedup();
        info!(errors = diagnostics.error_count(), "check finished");

        let trees = trees
            .into_iter()
            .map(|tree| (tree.file_name().to_string(), tree))
            .collect();
        Ok(CheckReport { diagnostics, trees })
    }
}

/// The outcome of [`Program::check`].
#[derive(Debug)]
pub struct CheckReport {
    diagnostics: DiagnosticCollection,
    trees: FxHashMap<String, Arc<SyntaxTree>>,
}

impl CheckReport {
    /// Every diagnostic, sorted by file then position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// The parsed file with this name.
    pub fn tree(&self, file_name: &str) -> Option<&Arc<SyntaxTree>> {
        self.trees.get(file_name)
    }

    /// Zero-based line and column where a diagnostic starts.
    pub fn line_and_column(&self, diagnostic: &Diagnostic) -> Option<LineAndColumn> {
        let tree = self.trees.get(diagnostic.file.as_deref()?)?;
        let range = diagnostic.range?;
        Some(tree.line_map().line_and_column_of(range.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(report: &CheckReport) -> Vec<u32> {
        report.diagnostics().iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_add_source_replaces_same_name() {
        let mut program = Program::new(CheckerOptions::default());
        program.add_source("./a.ts", "let a: number = 'x';");
        program.add_source("a.ts", "let a: number = 1;");
        assert_eq!(program.file_names().collect::<Vec<_>>(), vec!["a.ts"]);
        assert!(!program.check().unwrap().has_errors());
    }

    #[test]
    fn test_imports_resolve_across_directories() {
        let mut program = Program::new(CheckerOptions::strict());
        program.add_source("src/lib/math.ts", "export function half(n: number): number { return n / 2; }");
        program.add_source("src/app/main.ts", "import { half } from '../lib/math';\nlet s: string = half(4);");
        let report = program.check().unwrap();
        assert_eq!(codes(&report), vec![2322]);
        assert_eq!(report.diagnostics()[0].file.as_deref(), Some("src/app/main.ts"));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let mut program = Program::new(CheckerOptions::default());
        program.add_source("a.ts", "let = ;");
        let report = program.check().unwrap();
        assert!(report.has_errors());
        assert!(report.diagnostics().iter().all(|d| d.file.as_deref() == Some("a.ts")));
    }

    #[test]
    fn test_line_and_column() {
        let mut program = Program::new(CheckerOptions::strict());
        program.add_source("a.ts", "let ok = 1;\nlet bad: number = 'x';");
        let report = program.check().unwrap();
        let location = report.line_and_column(&report.diagnostics()[0]).unwrap();
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut program = Program::new(CheckerOptions::default());
        let result = program.load_files(&["/definitely/not/here.ts"]);
        assert!(matches!(result, Err(ProgramError::Io { .. })));
    }
}
