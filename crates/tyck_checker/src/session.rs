//! A checking session: the bound and linked files of one program, the
//! shared type arena, and the caches every [`Checker`] publishes into.
//!
//! Sessions are `Sync`. Any number of checkers may run against one session
//! on different threads; each cache entry is computed by whichever checker
//! gets there first and is never overwritten.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use tracing::{debug, debug_span, info_span, warn};
use tyck_ast::types::{FileId, NodeId, SymbolFlags, SymbolId};
use tyck_ast::SyntaxTree;
use tyck_binder::{bind_file, link_files, BoundFile, Declaration, FlowId, LinkedSymbols, Symbol, SymbolLookup};
use tyck_core::intern::{InternedString, StringInterner};
use tyck_core::CancellationToken;
use tyck_diagnostics::{sort_diagnostics, Diagnostic};
use tyck_options::CheckerOptions;

use crate::builtins;
use crate::checker::Checker;
use crate::error::CheckerError;
use crate::flow::ReferenceKey;
use crate::interner::TypeInterner;
use crate::types::{NodeRef, RelationKind, Signature, SignatureId, StructuredMembers, TypeId, TypeMapper, Variance};

/// One file handed to a session.
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub file_name: String,
    pub tree: Arc<SyntaxTree>,
    /// The file each import or re-export specifier node resolved to, or
    /// `None` when resolution failed.
    pub imports: Vec<(NodeId, Option<FileId>)>,
}

impl SourceInput {
    pub fn new(tree: Arc<SyntaxTree>) -> Self {
        Self {
            file_name: tree.file_name().to_string(),
            tree,
            imports: Vec::new(),
        }
    }

    pub fn with_imports(mut self, imports: Vec<(NodeId, Option<FileId>)>) -> Self {
        self.imports = imports;
        self
    }
}

/// Where an import specifier leads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ModuleTarget {
    File(FileId),
    /// A `declare module "x"` block.
    Ambient(SymbolId),
    Missing,
}

/// Interned names the checker looks up by text.
#[derive(Debug)]
pub(crate) struct Names {
    pub length: InternedString,
    pub undefined: InternedString,
    pub arguments: InternedString,
    pub this: InternedString,
    pub constructor: InternedString,
    pub default_export: InternedString,
    pub export_equals: InternedString,
    pub call: InternedString,
    pub new: InternedString,
    pub index: InternedString,
    pub ctor: InternedString,
    pub array: InternedString,
    pub readonly_array: InternedString,
    pub object: InternedString,
    pub function: InternedString,
    pub string: InternedString,
    pub number: InternedString,
    pub boolean: InternedString,
    pub symbol: InternedString,
    pub bigint: InternedString,
    pub regexp: InternedString,
    pub iarguments: InternedString,
}

impl Names {
    fn new(interner: &StringInterner) -> Self {
        use tyck_binder::names;
        Self {
            length: interner.intern_static("length"),
            undefined: interner.intern_static("undefined"),
            arguments: interner.intern_static("arguments"),
            this: interner.intern_static("this"),
            constructor: interner.intern_static("constructor"),
            default_export: interner.intern_static(names::DEFAULT_EXPORT),
            export_equals: interner.intern_static(names::EXPORT_EQUALS),
            call: interner.intern_static(names::CALL),
            new: interner.intern_static(names::NEW),
            index: interner.intern_static(names::INDEX),
            ctor: interner.intern_static(names::CONSTRUCTOR),
            array: interner.intern_static("Array"),
            readonly_array: interner.intern_static("ReadonlyArray"),
            object: interner.intern_static("Object"),
            function: interner.intern_static("Function"),
            string: interner.intern_static("String"),
            number: interner.intern_static("Number"),
            boolean: interner.intern_static("Boolean"),
            symbol: interner.intern_static("Symbol"),
            bigint: interner.intern_static("BigInt"),
            regexp: interner.intern_static("RegExp"),
            iarguments: interner.intern_static("IArguments"),
        }
    }
}

type Map<K, V> = DashMap<K, V, FxBuildHasher>;

fn map<K: Eq + std::hash::Hash, V>() -> Map<K, V> {
    DashMap::with_hasher(FxBuildHasher)
}

/// The value of an enum member.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum EnumValue {
    Number(f64),
    String(InternedString),
    Computed,
}

/// Cross-checker caches. Every entry is written once.
#[derive(Debug)]
pub(crate) struct Caches {
    pub declared_types: Map<SymbolId, TypeId>,
    pub symbol_types: Map<SymbolId, TypeId>,
    /// Outer and own type parameters of classes, interfaces and aliases.
    pub type_parameters: Map<SymbolId, Arc<[TypeId]>>,
    pub local_type_parameters: Map<SymbolId, Arc<[TypeId]>>,
    pub outer_type_parameters: Map<NodeRef, Arc<[TypeId]>>,
    pub base_types: Map<SymbolId, Arc<[TypeId]>>,
    pub constraints: Map<TypeId, Option<TypeId>>,
    pub defaults: Map<TypeId, Option<TypeId>>,
    pub members: Map<TypeId, Arc<StructuredMembers>>,
    pub relations: Map<(TypeId, TypeId, RelationKind), bool>,
    pub variances: Map<TypeId, Arc<[Variance]>>,
    pub declaration_signatures: Map<Declaration, SignatureId>,
    /// Function expressions, keyed by their parameter types.
    pub expression_signatures: Map<(Declaration, Box<[TypeId]>), SignatureId>,
    pub signature_instantiations: Map<(SignatureId, TypeMapper), SignatureId>,
    pub return_types: Map<SignatureId, TypeId>,
    pub instantiations: Map<(TypeId, TypeMapper), TypeId>,
    pub type_nodes: Map<NodeRef, TypeId>,
    pub node_types: Map<NodeRef, TypeId>,
    pub flow_types: Map<(FileId, FlowId, ReferenceKey, TypeId), TypeId>,
    pub enum_values: Map<SymbolId, EnumValue>,
    /// Unions that are the declared type of an enum.
    pub enum_unions: Map<TypeId, SymbolId>,
    pub assigned_symbols: Map<NodeRef, Arc<FxHashSet<SymbolId>>>,
    pub alias_targets: Map<SymbolId, Option<SymbolId>>,
    pub published: Map<FileId, Vec<Diagnostic>>,
    pub statement_diagnostics: Map<FileId, Arc<Vec<Diagnostic>>>,
}

impl Caches {
    fn new() -> Self {
        Self {
            declared_types: map(),
            symbol_types: map(),
            type_parameters: map(),
            local_type_parameters: map(),
            outer_type_parameters: map(),
            base_types: map(),
            constraints: map(),
            defaults: map(),
            members: map(),
            relations: map(),
            variances: map(),
            declaration_signatures: map(),
            expression_signatures: map(),
            signature_instantiations: map(),
            return_types: map(),
            instantiations: map(),
            type_nodes: map(),
            node_types: map(),
            flow_types: map(),
            enum_values: map(),
            enum_unions: map(),
            assigned_symbols: map(),
            alias_targets: map(),
            published: map(),
            statement_diagnostics: map(),
        }
    }
}

/// The semantic state of one program.
#[derive(Debug)]
pub struct Session {
    pub(crate) options: CheckerOptions,
    pub(crate) interner: StringInterner,
    pub(crate) types: TypeInterner,
    /// User files in input order, then the built-in declarations.
    pub(crate) files: Vec<BoundFile>,
    pub(crate) user_file_count: usize,
    pub(crate) lib_file: FileId,
    pub(crate) linked: LinkedSymbols,
    module_targets: Vec<FxHashMap<NodeId, Option<FileId>>>,
    file_ids: FxHashMap<String, FileId>,
    pub(crate) names: Names,
    pub(crate) caches: Caches,
    signatures: RwLock<Vec<Arc<Signature>>>,
    cancel: CancellationToken,
    poison: OnceLock<CheckerError>,
    checked_files: AtomicUsize,
}

impl Session {
    pub fn new(inputs: Vec<SourceInput>, options: CheckerOptions) -> Self {
        Self::with_type_limit(inputs, options, u32::MAX - 1)
    }

    /// A session whose type arena refuses to grow past `limit` types.
    pub fn with_type_limit(inputs: Vec<SourceInput>, options: CheckerOptions, limit: u32) -> Self {
        let _span = info_span!("session", files = inputs.len()).entered();
        let interner = inputs
            .first()
            .map(|input| input.tree.interner().clone())
            .unwrap_or_else(StringInterner::new);
        for input in &inputs {
            if !input.tree.interner().ptr_eq(&interner) {
                warn!(file = %input.file_name, "file was parsed with a different string interner");
            }
        }

        let user_file_count = inputs.len();
        let lib_file = FileId(user_file_count as u32);
        let mut trees: Vec<Arc<SyntaxTree>> = inputs.iter().map(|input| Arc::clone(&input.tree)).collect();
        trees.push(builtins::parse_lib(&interner));
        let mut files: Vec<BoundFile> = trees
            .into_par_iter()
            .enumerate()
            .map(|(index, tree)| bind_file(FileId(index as u32), tree))
            .collect();
        let linked = link_files(&mut files);

        let mut module_targets: Vec<FxHashMap<NodeId, Option<FileId>>> = Vec::with_capacity(files.len());
        let mut file_ids = FxHashMap::default();
        for (index, input) in inputs.iter().enumerate() {
            module_targets.push(input.imports.iter().copied().collect());
            file_ids.insert(input.file_name.clone(), FileId(index as u32));
        }
        module_targets.push(FxHashMap::default());
        file_ids.insert(builtins::LIB_FILE_NAME.to_string(), lib_file);

        let names = Names::new(&interner);
        let types = TypeInterner::with_limit(limit);
        let array = global_interface(&linked, names.array);
        let readonly_array = global_interface(&linked, names.readonly_array);
        if let (Some(array), Some(readonly_array)) = (array, readonly_array) {
            types.set_array_targets(types.declared_object(array, false), types.declared_object(readonly_array, false));
        }
        debug!(symbols = linked.len(), "session linked");

        Self {
            options,
            interner,
            types,
            files,
            user_file_count,
            lib_file,
            linked,
            module_targets,
            file_ids,
            names,
            caches: Caches::new(),
            signatures: RwLock::new(Vec::new()),
            cancel: CancellationToken::new(),
            poison: OnceLock::new(),
            checked_files: AtomicUsize::new(0),
        }
    }

    /// Parse `(file name, text)` pairs and open a session over them.
    /// Relative import specifiers resolve against the other file names:
    /// `./m` finds `m.ts`, `m.d.ts` or `m/index.ts`.
    pub fn from_sources(sources: &[(&str, &str)], options: CheckerOptions) -> Self {
        let interner = StringInterner::new();
        let trees: Vec<Arc<SyntaxTree>> = sources
            .iter()
            .map(|(name, text)| tyck_parser::parse_source(name, text, &interner))
            .collect();
        let names: Vec<&str> = sources.iter().map(|(name, _)| *name).collect();
        let inputs = trees
            .into_iter()
            .map(|tree| {
                let imports = import_specifiers(&tree)
                    .into_iter()
                    .map(|(node, text)| (node, resolve_by_name(&text, &names)))
                    .collect();
                SourceInput::new(tree).with_imports(imports)
            })
            .collect();
        Self::new(inputs, options)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The shared type arena.
    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Number of user files; the built-in declarations are not counted.
    pub fn file_count(&self) -> usize {
        self.user_file_count
    }

    pub fn file_id(&self, file_name: &str) -> Option<FileId> {
        self.file_ids.get(file_name).copied()
    }

    pub fn tree(&self, file: FileId) -> Option<&Arc<SyntaxTree>> {
        self.files.get(file.index()).map(|bound| &bound.tree)
    }

    pub fn bound_file(&self, file: FileId) -> Option<&BoundFile> {
        self.files.get(file.index())
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.linked.symbol(id)
    }

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.interner.resolve(self.linked.symbol(id).name)
    }

    /// A checker for point queries.
    pub fn checker(&self) -> Checker<'_> {
        Checker::new(self)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ========================================================================
    // Modules
    // ========================================================================

    pub(crate) fn module_target(&self, file: FileId, specifier: NodeId) -> ModuleTarget {
        if let Some(Some(target)) = self.module_targets.get(file.index()).and_then(|m| m.get(&specifier)) {
            return ModuleTarget::File(*target);
        }
        let tree = &self.files[file.index()].tree;
        let Some(text) = tree.name_of(specifier) else {
            return ModuleTarget::Missing;
        };
        let quoted = format!("\"{}\"", self.interner.resolve(text));
        let ambient = self
            .interner
            .get(&quoted)
            .and_then(|name| self.linked.globals.get(name))
            .map(|symbol| self.linked.resolve(symbol))
            .filter(|&symbol| self.linked.symbol(symbol).flags.intersects(SymbolFlags::MODULE));
        match ambient {
            Some(symbol) => ModuleTarget::Ambient(symbol),
            None => ModuleTarget::Missing,
        }
    }

    // ========================================================================
    // Signatures
    // ========================================================================

    pub(crate) fn add_signature(&self, signature: Signature) -> SignatureId {
        let mut signatures = self.signatures.write().unwrap_or_else(PoisonError::into_inner);
        let id = SignatureId(signatures.len() as u32);
        signatures.push(Arc::new(signature));
        id
    }

    pub(crate) fn signature(&self, id: SignatureId) -> Arc<Signature> {
        let signatures = self.signatures.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&signatures[id.index()])
    }

    pub(crate) fn try_signature(&self, id: SignatureId) -> Option<Arc<Signature>> {
        let signatures = self.signatures.read().unwrap_or_else(PoisonError::into_inner);
        signatures.get(id.index()).cloned()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Attach diagnostics produced while computing a cached value to the
    /// files they point into.
    pub(crate) fn publish(&self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            let file = diagnostic.file.as_deref().and_then(|name| self.file_id(name));
            if let Some(file) = file {
                self.caches.published.entry(file).or_default().push(diagnostic);
            }
        }
    }

    fn ensure_healthy(&self) -> Result<(), CheckerError> {
        if let Some(error) = self.poison.get() {
            return Err(error.clone());
        }
        if self.is_cancelled() {
            return Err(CheckerError::Cancelled);
        }
        Ok(())
    }

    fn fail(&self, error: CheckerError) -> CheckerError {
        let _ = self.poison.set(error.clone());
        self.poison.get().cloned().unwrap_or(error)
    }

    fn statement_diagnostics(&self, file: FileId) -> Result<Arc<Vec<Diagnostic>>, CheckerError> {
        if let Some(done) = self.caches.statement_diagnostics.get(&file) {
            return Ok(Arc::clone(&done));
        }
        let _span = debug_span!("check", file = self.files[file.index()].tree.file_name()).entered();
        let mut checker = Checker::new(self);
        let diagnostics = checker.check_source_file(file);
        if let Some(error) = checker.fatal.take() {
            return Err(self.fail(error));
        }
        if self.types.overflowed() {
            return Err(self.fail(CheckerError::InternerOverflow));
        }
        if self.is_cancelled() {
            return Err(CheckerError::Cancelled);
        }
        self.checked_files.fetch_add(1, Ordering::Relaxed);
        let entry = self
            .caches
            .statement_diagnostics
            .entry(file)
            .or_insert_with(|| Arc::new(diagnostics));
        Ok(Arc::clone(&entry))
    }

    fn collect_diagnostics(&self, file: FileId, statements: &[Diagnostic]) -> Vec<Diagnostic> {
        let bound = &self.files[file.index()];
        let mut diagnostics: Vec<Diagnostic> = bound.tree.parse_diagnostics().to_vec();
        diagnostics.extend(bound.diagnostics.iter().cloned());
        diagnostics.extend(statements.iter().cloned());
        if let Some(published) = self.caches.published.get(&file) {
            diagnostics.extend(published.iter().cloned());
        }
        sort_diagnostics(&mut diagnostics);
        diagnostics
    }

    /// All diagnostics of one user file, sorted.
    pub fn check_file(&self, file: FileId) -> Result<Vec<Diagnostic>, CheckerError> {
        self.ensure_healthy()?;
        if file.index() >= self.user_file_count {
            return Err(CheckerError::UnboundFile(file));
        }
        let statements = self.statement_diagnostics(file)?;
        self.ensure_healthy()?;
        Ok(self.collect_diagnostics(file, &statements))
    }

    /// Check every user file in `FileId` order. Files are checked one after
    /// another so type ids, and with them every diagnostic, come out the same
    /// on every run.
    pub fn check_all(&self) -> Result<Vec<Diagnostic>, CheckerError> {
        let _span = info_span!("check_program", files = self.user_file_count).entered();
        self.ensure_healthy()?;
        let mut all = Vec::new();
        for index in 0..self.user_file_count {
            self.ensure_healthy()?;
            let file = FileId(index as u32);
            let statements = self.statement_diagnostics(file)?;
            all.extend(self.collect_diagnostics(file, &statements));
        }
        self.ensure_healthy()?;
        debug!(
            diagnostics = all.len(),
            types = self.types.len(),
            checked = self.checked_files.load(Ordering::Relaxed),
            "program checked"
        );
        Ok(all)
    }
}

pub(crate) fn global_interface(linked: &LinkedSymbols, name: InternedString) -> Option<SymbolId> {
    let symbol = linked.resolve(linked.globals.get(name)?);
    linked.symbol(symbol).flags.contains(SymbolFlags::INTERFACE).then_some(symbol)
}

/// Import and re-export specifier nodes of a file with their text.
pub fn import_specifiers(tree: &SyntaxTree) -> Vec<(NodeId, String)> {
    use tyck_ast::{NodeData, SyntaxKind};
    let mut specifiers = Vec::new();
    let mut stack: Vec<NodeId> = tree.statements().to_vec();
    while let Some(node) = stack.pop() {
        match &tree.node(node).data {
            NodeData::Import { module_specifier, .. } => {
                specifiers.push((*module_specifier, tree.identifier_text(*module_specifier).to_string()));
            }
            NodeData::Export {
                module_specifier: Some(specifier),
                ..
            } => {
                specifiers.push((*specifier, tree.identifier_text(*specifier).to_string()));
            }
            NodeData::Module { body: Some(body), .. } => {
                if tree.kind(*body) == SyntaxKind::ModuleBlock {
                    stack.extend(tree.list(*body).iter().copied());
                } else {
                    stack.push(*body);
                }
            }
            _ => {}
        }
    }
    specifiers.sort_by_key(|(node, _)| node.0);
    specifiers
}

fn resolve_by_name(specifier: &str, names: &[&str]) -> Option<FileId> {
    let base = specifier.strip_prefix("./")?;
    let candidates = [format!("{}.ts", base), format!("{}.d.ts", base), format!("{}/index.ts", base)];
    candidates.iter().find_map(|candidate| {
        names
            .iter()
            .position(|name| name.trim_start_matches("./") == candidate)
            .map(|index| FileId(index as u32))
    })
}
