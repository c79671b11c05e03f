//! Linking: moving every file's symbols into one arena and merging the
//! top-level declarations of script files into the global table.

use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};
use tyck_ast::types::{FileId, SymbolFlags, SymbolId};
use tyck_diagnostics::{messages, Diagnostic};

use crate::binder::{BoundFile, SymbolLookup};
use crate::symbol::{Symbol, SymbolTable};

/// The session-wide symbol arena.
#[derive(Debug, Default)]
pub struct LinkedSymbols {
    pub symbols: Vec<Symbol>,
    /// Top-level declarations of every script file.
    pub globals: SymbolTable,
    /// Symbols merged away into another one.
    redirects: FxHashMap<SymbolId, SymbolId>,
}

impl LinkedSymbols {
    /// The symbol `id` was merged into, or `id` itself.
    pub fn resolve(&self, mut id: SymbolId) -> SymbolId {
        while let Some(&target) = self.redirects.get(&id) {
            id = target;
        }
        id
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `id` was merged into another symbol.
    pub fn is_merged_away(&self, id: SymbolId) -> bool {
        self.redirects.contains_key(&id)
    }
}

impl SymbolLookup for LinkedSymbols {
    fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[self.resolve(id).index()]
    }
}

/// Move the symbols of `files` (in order) into one arena and merge script
/// globals. Conflicting global declarations are reported into the file that
/// declares them.
pub fn link_files(files: &mut [BoundFile]) -> LinkedSymbols {
    let _span = debug_span!("link", files = files.len()).entered();
    let mut linker = Linker {
        linked: LinkedSymbols::default(),
        file_index: files.iter().enumerate().map(|(i, f)| (f.file_id, i)).collect(),
    };

    for file in files.iter_mut() {
        let offset = linker.linked.symbols.len() as u32;
        file.rebase(offset);
        linker.linked.symbols.extend(file.take_symbols());
    }

    for index in 0..files.len() {
        if files[index].is_module {
            continue;
        }
        let root = files[index].root_scope;
        let locals: Vec<_> = files[index].scope(root).locals.iter().collect();
        for (name, symbol) in locals {
            match linker.linked.globals.get(name) {
                Some(existing) => {
                    linker.merge_symbol(files, existing, symbol);
                }
                None => linker.linked.globals.insert(name, symbol),
            }
        }
    }
    debug!(
        symbols = linker.linked.symbols.len(),
        globals = linker.linked.globals.len(),
        merged = linker.linked.redirects.len(),
        "linked"
    );
    linker.linked
}

struct Linker {
    linked: LinkedSymbols,
    file_index: FxHashMap<FileId, usize>,
}

impl Linker {
    /// Merge `source` into `target`. Returns false on a conflict, in which
    /// case both stay separate.
    fn merge_symbol(&mut self, files: &mut [BoundFile], target: SymbolId, source: SymbolId) -> bool {
        let target = self.linked.resolve(target);
        if target == source {
            return true;
        }
        let source_flags = self.linked.symbols[source.index()].flags;
        let target_flags = self.linked.symbols[target.index()].flags;
        if target_flags.intersects(source_flags.excludes()) {
            self.report_conflict(files, target, source);
            return false;
        }

        let name = self.linked.symbols[source.index()].name;
        let source_symbol = std::mem::replace(&mut self.linked.symbols[source.index()], Symbol::new(name, SymbolFlags::NONE));
        {
            let target_symbol = &mut self.linked.symbols[target.index()];
            for &declaration in &source_symbol.declarations {
                target_symbol.add_declaration(declaration, SymbolFlags::NONE);
            }
            target_symbol.flags |= source_symbol.flags;
            if target_symbol.value_declaration.is_none() {
                target_symbol.value_declaration = source_symbol.value_declaration;
            }
        }
        self.linked.redirects.insert(source, target);

        if let Some(members) = &source_symbol.members {
            self.merge_table(files, target, members, false);
        }
        if let Some(exports) = &source_symbol.exports {
            self.merge_table(files, target, exports, true);
        }
        true
    }

    fn merge_table(&mut self, files: &mut [BoundFile], target: SymbolId, source: &SymbolTable, exports: bool) {
        for (name, child) in source.iter() {
            let existing = {
                let symbol = &self.linked.symbols[target.index()];
                let table = if exports { &symbol.exports } else { &symbol.members };
                table.as_ref().and_then(|t| t.get(name))
            };
            match existing {
                Some(existing) => {
                    self.merge_symbol(files, existing, child);
                }
                None => {
                    let symbol = &mut self.linked.symbols[target.index()];
                    let table = if exports { symbol.exports_mut() } else { symbol.members_mut() };
                    table.insert(name, child);
                    self.linked.symbols[child.index()].parent = Some(target);
                }
            }
        }
    }

    fn report_conflict(&mut self, files: &mut [BoundFile], target: SymbolId, source: SymbolId) {
        let target_symbol = &self.linked.symbols[target.index()];
        let source_symbol = &self.linked.symbols[source.index()];
        let block_scoped = (target_symbol.flags | source_symbol.flags).contains(SymbolFlags::BLOCK_SCOPED_VARIABLE);
        let message = if block_scoped {
            &messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0
        } else {
            &messages::DUPLICATE_IDENTIFIER_0
        };
        let declarations: Vec<_> = target_symbol
            .declarations
            .iter()
            .chain(source_symbol.declarations.iter())
            .copied()
            .collect();
        let name = target_symbol.name;
        for declaration in declarations {
            let Some(&index) = self.file_index.get(&declaration.file) else {
                continue;
            };
            let file = &mut files[index];
            let tree = &file.tree;
            let text = tree.interner().resolve(name).to_string();
            let anchor = tree.declaration_name(declaration.node).unwrap_or(declaration.node);
            let diagnostic = Diagnostic::with_location(tree.file_name(), tree.range(anchor), message, &[&text]);
            file.diagnostics.push(diagnostic);
        }
    }
}
