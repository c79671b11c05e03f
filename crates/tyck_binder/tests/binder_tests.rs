//! Binder integration tests.
//!
//! Tests the parse -> bind -> link pipeline: symbol creation, declaration
//! merging, scopes and the control flow graph.

use tyck_ast::{FileId, NodeId, SymbolFlags, SyntaxKind};
use tyck_binder::{bind_file, link_files, BoundFile, FlowGraph, FlowKind, Symbol, SymbolLookup};
use tyck_core::intern::StringInterner;
use tyck_parser::parse_source;

/// Helper: parse and bind one file.
fn bind(source: &str) -> BoundFile {
    let interner = StringInterner::new();
    bind_file(FileId(0), parse_source("test.ts", source, &interner))
}

/// Helper: bind several files sharing one interner.
fn bind_all(sources: &[&str]) -> Vec<BoundFile> {
    let interner = StringInterner::new();
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let tree = parse_source(&format!("file{}.ts", i), source, &interner);
            bind_file(FileId(i as u32), tree)
        })
        .collect()
}

fn codes(bound: &BoundFile) -> Vec<u32> {
    bound.diagnostics.iter().map(|d| d.code).collect()
}

/// Helper: the file-scope symbol called `name`.
fn root_symbol<'a>(bound: &'a BoundFile, name: &str) -> &'a Symbol {
    let name = bound.tree.interner().get(name).expect("name was never interned");
    let id = bound
        .scope(bound.root_scope)
        .locals
        .get(name)
        .expect("no such file-scope symbol");
    bound.symbol(id)
}

fn member_names(bound: &BoundFile, table: Option<&tyck_binder::SymbolTable>) -> Vec<String> {
    let interner = bound.tree.interner();
    table
        .map(|t| t.iter().map(|(name, _)| interner.resolve(name).to_string()).collect())
        .unwrap_or_default()
}

/// Helper: the innermost node at the `occurrence`-th match of `needle`.
fn node_at(bound: &BoundFile, needle: &str, occurrence: usize) -> NodeId {
    let text = bound.tree.text();
    let offset = text
        .match_indices(needle)
        .nth(occurrence)
        .map(|(i, _)| i)
        .expect("needle not found");
    bound.tree.node_at_offset(offset as u32).expect("no node at offset")
}

/// Helper: the innermost statement at the first match of `needle`.
fn statement_at(bound: &BoundFile, needle: &str) -> NodeId {
    let node = node_at(bound, needle, 0);
    std::iter::once(node)
        .chain(bound.tree.ancestors(node))
        .find(|&n| bound.tree.kind(n).is_statement())
        .expect("no enclosing statement")
}

// ============================================================================
// Symbol Creation
// ============================================================================

#[test]
fn test_bind_empty_file() {
    let bound = bind("");
    assert_eq!(bound.symbol_count, 0);
    assert!(!bound.is_module);
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_bind_variable_kinds() {
    let bound = bind("const a = 1; let b = 2; var c = 3;");
    assert!(root_symbol(&bound, "a").flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE));
    assert!(root_symbol(&bound, "b").flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE));
    assert!(root_symbol(&bound, "c").flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE));
}

#[test]
fn test_bind_class_members_and_statics() {
    let bound = bind(
        r#"
        class Point {
            x = 1;
            static origin = 0;
            constructor(public z: number, w: number) {}
            move(): void {}
            get len(): number { return 0; }
        }
    "#,
    );
    let class = root_symbol(&bound, "Point");
    assert!(class.flags.contains(SymbolFlags::CLASS));
    assert_eq!(
        member_names(&bound, class.members.as_ref()),
        vec!["x", "__constructor", "z", "move", "len"]
    );
    assert_eq!(member_names(&bound, class.exports.as_ref()), vec!["origin"]);
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_bind_interface_members_and_signatures() {
    let bound = bind("interface F { (x: number): string; new (): F; [key: string]: any; name?: string; }");
    let symbol = root_symbol(&bound, "F");
    assert_eq!(
        member_names(&bound, symbol.members.as_ref()),
        vec!["__call", "__new", "__index", "name"]
    );
    let interner = bound.tree.interner();
    let name = symbol.members.as_ref().and_then(|m| m.get(interner.intern("name"))).unwrap();
    assert!(bound.symbol(name).flags.contains(SymbolFlags::PROPERTY | SymbolFlags::OPTIONAL));
}

#[test]
fn test_bind_enum_members() {
    let bound = bind("enum Color { Red, Green = 4, Blue } const enum E { A }");
    let color = root_symbol(&bound, "Color");
    assert!(color.flags.contains(SymbolFlags::REGULAR_ENUM));
    assert_eq!(member_names(&bound, color.exports.as_ref()), vec!["Red", "Green", "Blue"]);
    assert!(root_symbol(&bound, "E").flags.contains(SymbolFlags::CONST_ENUM));
}

#[test]
fn test_bind_anonymous_symbols() {
    let bound = bind("let o = { a: 1, b() { return 2; } }; let t: { k: string }; let f = () => 1;");
    let object = node_at(&bound, "{ a", 0);
    let symbol = bound.symbol(bound.symbol_of(object).expect("object literal symbol"));
    assert!(symbol.flags.contains(SymbolFlags::OBJECT_LITERAL));
    assert_eq!(member_names(&bound, symbol.members.as_ref()), vec!["a", "b"]);

    let literal = node_at(&bound, "{ k", 0);
    let symbol = bound.symbol(bound.symbol_of(literal).expect("type literal symbol"));
    assert!(symbol.flags.contains(SymbolFlags::TYPE_LITERAL));

    let arrow = node_at(&bound, "() =>", 0);
    let arrow = bound.tree.ancestors(arrow).find(|&n| bound.tree.kind(n) == SyntaxKind::ArrowFunction).unwrap_or(arrow);
    let symbol = bound.symbol(bound.symbol_of(arrow).expect("arrow symbol"));
    assert!(symbol.flags.contains(SymbolFlags::FUNCTION_EXPRESSION));
}

// ============================================================================
// Declaration Merging
// ============================================================================

#[test]
fn test_interfaces_merge() {
    let bound = bind("interface A { x: number } interface A { y: string }");
    let symbol = root_symbol(&bound, "A");
    assert_eq!(symbol.declarations.len(), 2);
    assert_eq!(member_names(&bound, symbol.members.as_ref()), vec!["x", "y"]);
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_function_overloads_merge() {
    let bound = bind("function f(a: string): void; function f(a: number): void; function f(a: any) {}");
    let symbol = root_symbol(&bound, "f");
    assert_eq!(symbol.declarations.len(), 3);
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_var_redeclaration_merges() {
    let bound = bind("var x = 1; var x = 2;");
    assert_eq!(root_symbol(&bound, "x").declarations.len(), 2);
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_namespace_merges_with_class() {
    let bound = bind("class C {} namespace C { export const extra = 1; }");
    let symbol = root_symbol(&bound, "C");
    assert!(symbol.flags.contains(SymbolFlags::CLASS | SymbolFlags::VALUE_MODULE));
    assert_eq!(member_names(&bound, symbol.exports.as_ref()), vec!["extra"]);
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_let_redeclaration_reports_both_sites() {
    let bound = bind("let x = 1; let x = 2;");
    assert_eq!(codes(&bound), vec![2451, 2451]);
}

#[test]
fn test_let_and_var_conflict() {
    let bound = bind("let x = 1; var x;");
    assert_eq!(codes(&bound), vec![2451, 2451]);
}

#[test]
fn test_interface_and_alias_conflict() {
    let bound = bind("interface I {} type I = number;");
    assert_eq!(codes(&bound), vec![2300, 2300]);
}

#[test]
fn test_duplicate_parameter() {
    let bound = bind("function f(a: number, a: string) {}");
    assert_eq!(codes(&bound), vec![2300, 2300]);
}

#[test]
fn test_reserved_type_names() {
    assert_eq!(codes(&bind("class number {}")), vec![2414]);
    assert_eq!(codes(&bind("interface string {}")), vec![2427]);
    assert_eq!(codes(&bind("enum symbol { A }")), vec![2431]);
    assert_eq!(codes(&bind("type bigint = 1;")), vec![2457]);
}

// ============================================================================
// Scope and Hoisting
// ============================================================================

#[test]
fn test_var_hoists_to_function_scope() {
    let bound = bind("function f() { if (true) { var v = 1; let w = 2; } }");
    let function = bound.tree.statements()[0];
    let scope = bound.node_scopes[&function];
    let interner = bound.tree.interner();
    assert!(bound.scope(scope).locals.contains(interner.intern("v")));
    assert!(!bound.scope(scope).locals.contains(interner.intern("w")));
}

#[test]
fn test_resolve_through_nested_blocks() {
    let bound = bind("function f(a: number) { { let b = a; } }");
    let reference = node_at(&bound, "a;", 0);
    let name = bound.tree.interner().intern("a");
    let symbol = bound.resolve_name(&bound, reference, name, SymbolFlags::VALUE).expect("a resolves");
    let parameter = bound.symbol(symbol).first_declaration().unwrap().node;
    assert_eq!(bound.tree.kind(parameter), SyntaxKind::Parameter);
}

#[test]
fn test_resolve_type_parameters() {
    let bound = bind("function g<T>(x: T): T { return x; }");
    let reference = node_at(&bound, "T {", 0);
    let name = bound.tree.interner().intern("T");
    let symbol = bound.resolve_name(&bound, reference, name, SymbolFlags::TYPE).expect("T resolves");
    assert!(bound.symbol(symbol).flags.contains(SymbolFlags::TYPE_PARAMETER));
    assert!(bound.resolve_name(&bound, reference, name, SymbolFlags::VALUE).is_none());
}

#[test]
fn test_infer_declares_in_conditional_type() {
    let bound = bind("type U<X> = X extends Array<infer E> ? E : never;");
    let reference = node_at(&bound, "E :", 0);
    let name = bound.tree.interner().intern("E");
    let symbol = bound.resolve_name(&bound, reference, name, SymbolFlags::TYPE).expect("E resolves");
    assert!(bound.symbol(symbol).flags.contains(SymbolFlags::TYPE_PARAMETER));
    let outside = node_at(&bound, "never", 0);
    assert!(bound.resolve_name(&bound, outside, name, SymbolFlags::TYPE).is_none());
}

#[test]
fn test_namespace_exports() {
    let bound = bind("namespace N { export const a = 1; const b = 2; }");
    let symbol = root_symbol(&bound, "N");
    assert!(symbol.flags.contains(SymbolFlags::VALUE_MODULE));
    assert_eq!(member_names(&bound, symbol.exports.as_ref()), vec!["a"]);
}

#[test]
fn test_type_only_namespace_is_not_instantiated() {
    let bound = bind("namespace T { export interface I {} }");
    let symbol = root_symbol(&bound, "T");
    assert!(symbol.flags.contains(SymbolFlags::NAMESPACE_MODULE));
    assert!(!symbol.flags.contains(SymbolFlags::VALUE_MODULE));
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_script_is_not_module() {
    assert!(!bind("const x = 1;").is_module);
}

#[test]
fn test_imports_and_exports() {
    let bound = bind("import d, { a, b as c } from './a'; import * as ns from './b'; export const e = a;");
    assert!(bound.is_module);
    assert_eq!(bound.imports.len(), 2);
    for name in ["d", "a", "c", "ns"] {
        assert!(root_symbol(&bound, name).flags.contains(SymbolFlags::ALIAS), "{} is an alias", name);
    }
    let interner = bound.tree.interner();
    assert!(bound.exports.contains(interner.intern("e")));
    assert!(!bound.exports.contains(interner.intern("a")));
}

#[test]
fn test_reexports() {
    let bound = bind("export * from './x'; export { y as z } from './y'; export default 42;");
    assert_eq!(bound.export_stars.len(), 1);
    assert_eq!(bound.imports.len(), 2);
    let interner = bound.tree.interner();
    assert!(bound.exports.contains(interner.intern("z")));
    assert!(bound.exports.contains(interner.intern("default")));
}

// ============================================================================
// Control Flow
// ============================================================================

#[test]
fn test_code_after_return_is_unreachable() {
    let bound = bind("function f() { return 1; let x = 2; }");
    let statement = statement_at(&bound, "let x");
    assert_eq!(bound.flow_of(statement), Some(FlowGraph::UNREACHABLE));
}

#[test]
fn test_while_true_without_break_never_exits() {
    let bound = bind("while (true) {} let after = 1;");
    let statement = bound.tree.statements()[1];
    assert_eq!(bound.flow_of(statement), Some(FlowGraph::UNREACHABLE));

    let bound = bind("while (true) { break; } let after = 1;");
    let statement = bound.tree.statements()[1];
    let flow = bound.flow_of(statement).unwrap();
    assert!(bound.flow.is_reachable(flow));
}

#[test]
fn test_typeof_guard_creates_condition() {
    let bound = bind("let x: string | number = 1; if (typeof x === 'string') { x; }");
    let statement = statement_at(&bound, "x; }");
    let flow = bound.flow_of(statement).unwrap();
    assert_eq!(bound.flow.kind(flow), FlowKind::TrueCondition);
}

#[test]
fn test_switch_clauses_over_narrowable_expression() {
    let bound = bind("let k: 'a' | 'b' = 'a'; switch (k) { case 'a': break; case 'b': break; } k;");
    let clause = node_at(&bound, "case 'a'", 0);
    let flow = bound.flow_of(clause).unwrap();
    assert_eq!(
        bound.flow.kind(flow),
        FlowKind::SwitchClause {
            clause_start: 0,
            clause_end: 1
        }
    );
    let after = bound.tree.statements()[2];
    let flow = bound.flow_of(after).unwrap();
    assert_eq!(bound.flow.kind(flow), FlowKind::BranchLabel);
    // Both breaks plus the implicit no-match path.
    assert_eq!(bound.flow.node(flow).antecedents.len(), 3);
}

#[test]
fn test_try_finally_after_throwing_paths() {
    let bound = bind("function f() { try { throw 1; } finally { } let x = 1; }");
    let statement = statement_at(&bound, "let x");
    assert_eq!(bound.flow_of(statement), Some(FlowGraph::UNREACHABLE));
}

#[test]
fn test_jump_errors() {
    assert_eq!(codes(&bind("break;")), vec![1105]);
    assert_eq!(codes(&bind("continue;")), vec![1104]);
    assert_eq!(codes(&bind("a: while (true) { continue b; }")), vec![1115]);
    assert_eq!(codes(&bind("a: { continue a; }")), vec![1115]);
    assert_eq!(codes(&bind("a: while (true) { break b; }")), vec![1116]);
    assert_eq!(codes(&bind("a: a: ;")), vec![1114]);
    assert!(codes(&bind("a: while (true) { continue a; }")).is_empty());
}

#[test]
fn test_function_end_flow_recorded() {
    let bound = bind("function f(x: boolean) { if (x) { return 1; } }");
    let function = bound.tree.statements()[0];
    let end = bound.function_end_flow[&function];
    assert!(bound.flow.is_reachable(end));

    let bound = bind("function g() { return 1; }");
    let function = bound.tree.statements()[0];
    assert_eq!(bound.function_end_flow[&function], FlowGraph::UNREACHABLE);
}

// ============================================================================
// Linking
// ============================================================================

#[test]
fn test_link_merges_script_globals() {
    let mut files = bind_all(&["interface A { x: number }", "interface A { y: number }"]);
    let linked = link_files(&mut files);
    let name = files[0].tree.interner().intern("A");
    let id = linked.globals.get(name).expect("global A");
    let symbol = linked.symbol(id);
    assert_eq!(symbol.declarations.len(), 2);
    assert_eq!(symbol.declarations[1].file, FileId(1));
    assert_eq!(symbol.members.as_ref().map(|m| m.len()), Some(2));

    // The second file's own id redirects to the merged symbol.
    let local = files[1].scope(files[1].root_scope).locals.get(name).unwrap();
    assert!(linked.is_merged_away(local));
    assert_eq!(linked.resolve(local), id);
}

#[test]
fn test_link_reports_global_conflicts_per_file() {
    let mut files = bind_all(&["let x = 1;", "let x = 2;"]);
    link_files(&mut files);
    assert_eq!(codes(&files[0]), vec![2451]);
    assert_eq!(codes(&files[1]), vec![2451]);
}

#[test]
fn test_link_keeps_module_locals_private() {
    let mut files = bind_all(&["export const x = 1;", "let x = 2;"]);
    let linked = link_files(&mut files);
    assert!(files.iter().all(|f| f.diagnostics.is_empty()));
    let name = files[0].tree.interner().intern("x");
    let id = linked.globals.get(name).unwrap();
    assert_eq!(linked.symbol(id).declarations[0].file, FileId(1));
}

#[test]
fn test_link_rebases_symbol_ids() {
    let mut files = bind_all(&["const a = 1; const b = 2;", "const c = 3;"]);
    let first_count = files[0].symbol_count;
    let linked = link_files(&mut files);
    assert_eq!(files[1].symbol_base, first_count);
    assert_eq!(linked.len() as u32, first_count + files[1].symbol_count);
    let name = files[1].tree.interner().intern("c");
    let id = files[1].scope(files[1].root_scope).locals.get(name).unwrap();
    assert!(id.0 >= first_count);
}
