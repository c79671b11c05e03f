//! Symbols and symbol tables.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use tyck_ast::types::{FileId, NodeId, SymbolFlags, SymbolId};
use tyck_core::intern::InternedString;

/// A declaration site: the file and the node that declares a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub file: FileId,
    pub node: NodeId,
}

/// A named (or anonymous) entity that one or more declarations contribute
/// to.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: InternedString,
    pub flags: SymbolFlags,
    /// Contributing declarations in source order.
    pub declarations: SmallVec<[Declaration; 1]>,
    /// The first declaration with a value meaning.
    pub value_declaration: Option<Declaration>,
    /// Instance members of classes, members of interfaces and type literals,
    /// properties of object literals.
    pub members: Option<SymbolTable>,
    /// Exported namespace members, static class members, enum members.
    pub exports: Option<SymbolTable>,
    /// The symbol whose `members` or `exports` table holds this one.
    pub parent: Option<SymbolId>,
}

impl Symbol {
    pub fn new(name: InternedString, flags: SymbolFlags) -> Self {
        Self {
            name,
            flags,
            declarations: SmallVec::new(),
            value_declaration: None,
            members: None,
            exports: None,
            parent: None,
        }
    }

    pub fn add_declaration(&mut self, declaration: Declaration, flags: SymbolFlags) {
        self.flags |= flags;
        self.declarations.push(declaration);
        if flags.intersects(SymbolFlags::VALUE) && self.value_declaration.is_none() {
            self.value_declaration = Some(declaration);
        }
    }

    #[inline]
    pub fn first_declaration(&self) -> Option<Declaration> {
        self.declarations.first().copied()
    }

    pub fn members_mut(&mut self) -> &mut SymbolTable {
        self.members.get_or_insert_with(SymbolTable::new)
    }

    pub fn exports_mut(&mut self) -> &mut SymbolTable {
        self.exports.get_or_insert_with(SymbolTable::new)
    }

    /// Add `offset` to every symbol id this symbol refers to.
    pub(crate) fn rebase(&mut self, offset: u32) {
        if let Some(members) = &mut self.members {
            members.rebase(offset);
        }
        if let Some(exports) = &mut self.exports {
            exports.rebase(offset);
        }
        if let Some(parent) = &mut self.parent {
            parent.0 += offset;
        }
    }
}

/// Name to symbol map that iterates in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    map: IndexMap<InternedString, SymbolId, FxBuildHasher>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: InternedString) -> Option<SymbolId> {
        self.map.get(&name).copied()
    }

    pub fn insert(&mut self, name: InternedString, symbol: SymbolId) {
        self.map.insert(name, symbol);
    }

    pub fn contains(&self, name: InternedString) -> bool {
        self.map.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InternedString, SymbolId)> + '_ {
        self.map.iter().map(|(&name, &id)| (name, id))
    }

    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.map.values().copied()
    }

    pub(crate) fn rebase(&mut self, offset: u32) {
        for id in self.map.values_mut() {
            id.0 += offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyck_core::intern::StringInterner;

    #[test]
    fn test_table_keeps_insertion_order() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        for (i, name) in ["zeta", "alpha", "mid"].iter().enumerate() {
            table.insert(interner.intern(name), SymbolId(i as u32));
        }
        let names: Vec<&str> = table.iter().map(|(n, _)| interner.resolve(n)).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.get(interner.intern("alpha")), Some(SymbolId(1)));
    }

    #[test]
    fn test_value_declaration_is_first_value() {
        let interner = StringInterner::new();
        let mut symbol = Symbol::new(interner.intern("A"), SymbolFlags::NONE);
        let decl = |n| Declaration { file: FileId(0), node: NodeId(n) };
        symbol.add_declaration(decl(1), SymbolFlags::INTERFACE);
        symbol.add_declaration(decl(2), SymbolFlags::CLASS);
        symbol.add_declaration(decl(3), SymbolFlags::VALUE_MODULE);
        assert_eq!(symbol.value_declaration, Some(decl(2)));
        assert!(symbol.flags.contains(SymbolFlags::INTERFACE | SymbolFlags::CLASS));
        assert_eq!(symbol.declarations.len(), 3);
    }

    #[test]
    fn test_rebase_shifts_children() {
        let interner = StringInterner::new();
        let mut symbol = Symbol::new(interner.intern("ns"), SymbolFlags::VALUE_MODULE);
        symbol.exports_mut().insert(interner.intern("x"), SymbolId(4));
        symbol.parent = Some(SymbolId(1));
        symbol.rebase(10);
        assert_eq!(symbol.exports.as_ref().and_then(|e| e.get(interner.intern("x"))), Some(SymbolId(14)));
        assert_eq!(symbol.parent, Some(SymbolId(11)));
    }
}
