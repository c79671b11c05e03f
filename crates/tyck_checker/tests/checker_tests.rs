//! Checker integration tests.
//!
//! Drives the public session API end to end: parse, bind, link, then point
//! queries and bulk diagnostics.

use tyck_ast::types::{FileId, NodeId};
use tyck_checker::{RelationKind, Session, SignatureKind, TypeId};
use tyck_options::CheckerOptions;

/// Helper: a strict session over one file called `a.ts`.
fn session(source: &str) -> Session {
    Session::from_sources(&[("a.ts", source)], CheckerOptions::strict())
}

/// Helper: the node starting at the last occurrence of `needle`.
fn node_at_last(session: &Session, file: FileId, needle: &str) -> NodeId {
    let tree = session.tree(file).unwrap();
    let offset = tree.text().rfind(needle).unwrap() as u32;
    tree.node_at_offset(offset).unwrap()
}

/// Helper: the displayed type at the last occurrence of `needle`.
fn type_at_last(source: &str, needle: &str) -> String {
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    let node = node_at_last(&session, file, needle);
    let mut checker = session.checker();
    let ty = checker.get_type_at_location(file, node);
    checker.type_to_string(ty)
}

/// Helper: diagnostic codes of `a.ts`.
fn codes(source: &str) -> Vec<u32> {
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    session.check_file(file).unwrap().iter().map(|d| d.code).collect()
}

// ============================================================================
// Point queries
// ============================================================================

#[test]
fn test_property_access_resolves_to_member_symbol() {
    let source = "interface Foo { bar: string }\ndeclare const foo: Foo;\nfoo.bar;";
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    let node = node_at_last(&session, file, "bar;");
    let mut checker = session.checker();
    let symbol = checker.get_symbol_at_location(file, node).unwrap();
    assert_eq!(session.symbol_name(symbol), "bar");
    let parent = session.symbol(symbol).parent.unwrap();
    assert_eq!(session.symbol_name(parent), "Foo");
}

#[test]
fn test_typeof_guard_narrows_to_string() {
    let source = "let x: string | number;\nif (typeof x === \"string\") { x; }";
    assert_eq!(type_at_last(source, "x;"), "string");
}

#[test]
fn test_identity_call_infers_widened_argument() {
    let source = "function identity<T>(x: T): T { return x; }\nlet r = identity(5);\nr;";
    assert_eq!(type_at_last(source, "r;"), "number");
}

#[test]
fn test_flow_type_query_matches_narrowed_type() {
    let source = "declare const v: string | null;\nif (v !== null) { v; }";
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    let node = node_at_last(&session, file, "v;");
    let mut checker = session.checker();
    let symbol = checker.get_symbol_at_location(file, node).unwrap();
    let flow = checker.get_flow_type(file, node, symbol);
    assert_eq!(checker.type_to_string(flow), "string");
}

#[test]
fn test_narrowing_twice_is_the_same_as_once() {
    let once = "declare const v: 'a' | 'b' | 'c';\nif (v === 'a') { v; }";
    let twice = "declare const v: 'a' | 'b' | 'c';\nif (v === 'a') { if (v === 'a') { v; } }";
    assert_eq!(type_at_last(once, "v;"), type_at_last(twice, "v;"));
}

#[test]
fn test_infer_type_arguments_from_argument_types() {
    let source = "declare function pair<A, B>(a: A, b: B): [A, B];\npair;";
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    let node = node_at_last(&session, file, "pair;");
    let mut checker = session.checker();
    let ty = checker.get_type_at_location(file, node);
    let signatures = checker.signatures_of_type(ty, SignatureKind::Call);
    assert_eq!(signatures.len(), 1);
    let inferred = checker.infer_type_arguments(signatures[0], &[TypeId::NUMBER, TypeId::STRING], None);
    let shown: Vec<String> = inferred.into_iter().map(|t| checker.type_to_string(t)).collect();
    assert_eq!(shown, vec!["number", "string"]);
}

// ============================================================================
// Relations
// ============================================================================

#[test]
fn test_excess_property_only_on_fresh_literals() {
    assert_eq!(codes("let t: { a: number } = { a: 1, b: 2 };"), vec![2353]);
    assert!(codes("let s = { a: 1, b: 2 };\nlet t: { a: number } = s;").is_empty());
}

#[test]
fn test_union_source_needs_every_member() {
    let session = session("");
    let mut checker = session.checker();
    let union = session.types().union(&[TypeId::STRING, TypeId::NUMBER]);
    let both = checker.relate(TypeId::STRING, TypeId::STRING, RelationKind::Assignable)
        && checker.relate(TypeId::NUMBER, TypeId::STRING, RelationKind::Assignable);
    assert_eq!(checker.relate(union, TypeId::STRING, RelationKind::Assignable), both);
    assert!(checker.relate(union, union, RelationKind::Assignable));
}

#[test]
fn test_recursive_alias_is_identical_to_itself() {
    let source = "type List = { value: number; next: List | null };\ndeclare const l: List;\nl;";
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    let node = node_at_last(&session, file, "l;");
    let mut checker = session.checker();
    let list = checker.get_type_at_location(file, node);
    assert!(checker.relate(list, list, RelationKind::Identity));
}

// ============================================================================
// Bulk diagnostics
// ============================================================================

#[test]
fn test_diagnostics_are_deterministic() {
    let source = "let a: number = 'x';\nlet b = missing;\nconst c = 1;\nc = 2;\nfunction f(x) { return x.y; }";
    let first = codes(source);
    assert!(!first.is_empty());
    for _ in 0..3 {
        assert_eq!(codes(source), first);
    }
    let session = session(source);
    let file = session.file_id("a.ts").unwrap();
    let once = session.check_file(file).unwrap();
    let again = session.check_file(file).unwrap();
    assert_eq!(once, again);
}

#[test]
fn test_diagnostics_sorted_by_position() {
    let session = session("let b = missing2;\nlet a: number = 'x';\nundefinedName;");
    let file = session.file_id("a.ts").unwrap();
    let diagnostics = session.check_file(file).unwrap();
    let starts: Vec<u32> = diagnostics.iter().filter_map(|d| d.range.map(|r| r.pos)).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn test_check_all_covers_every_file() {
    let session = Session::from_sources(
        &[("a.ts", "let a: string = 1;"), ("b.ts", "let b: number = 'b';")],
        CheckerOptions::strict(),
    );
    let all = session.check_all().unwrap();
    let files: Vec<&str> = all.iter().filter_map(|d| d.file.as_deref()).collect();
    assert_eq!(files, vec!["a.ts", "b.ts"]);
}

#[test]
fn test_import_from_sibling_file() {
    let session = Session::from_sources(
        &[
            ("m.ts", "export function twice(n: number) { return n * 2; }"),
            ("a.ts", "import { twice } from './m';\nlet s: string = twice(2);"),
        ],
        CheckerOptions::strict(),
    );
    let file = session.file_id("a.ts").unwrap();
    let codes: Vec<u32> = session.check_file(file).unwrap().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![2322]);
}

#[test]
fn test_unresolved_import_is_error_typed() {
    let source = "import { a } from './nowhere';\nlet n: number = a;";
    assert_eq!(codes(source), vec![2307]);
}

#[test]
fn test_class_and_interface_conformance() {
    let source = "interface Named { name: string }\nclass Person implements Named { name = 'p'; }\nclass Robot implements Named { id = 1; }";
    assert_eq!(codes(source), vec![2420]);
}

#[test]
fn test_interface_inherits_base_members() {
    let source = "interface A { x: number }\ninterface B extends A { y: string }\ndeclare const b: B;\nb.x;";
    assert!(codes(source).is_empty());
    assert_eq!(type_at_last(source, "x;"), "number");
    assert_eq!(type_at_last("interface A { x: number }\ninterface B extends A {}", "A {}"), "A");
}

#[test]
fn test_generic_interface_base_is_instantiated() {
    let source = "interface Base<T> { value: T }\ninterface Box extends Base<string[]> {}\ndeclare const b: Box;\nb.value;";
    assert_eq!(type_at_last(source, "value;"), "string[]");
}

#[test]
fn test_heritage_conformance_errors() {
    assert_eq!(codes("interface A { x: number }\ninterface B extends A { x: string }"), vec![2430]);
    assert_eq!(codes("interface I { x: number }\nclass C implements I {}"), vec![2420]);
    assert!(codes("interface I<T> extends I<T> {}").contains(&2310));
}

#[test]
fn test_callback_parameter_typed_by_generic_call() {
    let map = "declare function map<T, U>(xs: T[], f: (x: T) => U): U[];\n";
    assert_eq!(codes(&format!("{map}map(['a'], x => x.foo);")), vec![2339]);
    assert_eq!(type_at_last(&format!("{map}const r = map(['a'], x => x.length);"), "r ="), "number[]");
    assert_eq!(codes(&format!("{map}const r: string[] = map(['a'], x => x.length);")), vec![2322]);
    let ap = "declare function ap<T>(f: (x: number) => T): T;\nconst r = ap(x => x + 1);";
    assert_eq!(type_at_last(ap, "r ="), "number");
}

#[test]
fn test_callback_parameter_point_query() {
    let source = "declare function h(f: (x: number) => void): void;\nh(x => x);";
    assert_eq!(type_at_last(source, "x);"), "number");
    let generic = "declare function map<T, U>(xs: T[], f: (x: T) => U): U[];\nmap(['a'], x => x.length);";
    assert_eq!(type_at_last(generic, "x.length"), "string");
}

#[test]
fn test_cancelled_session_reports_cancellation() {
    let session = session("let a = 1;");
    let file = session.file_id("a.ts").unwrap();
    let token = session.cancellation_token();
    assert!(!token.is_cancelled());
    session.cancel();
    assert!(token.is_cancelled());
    assert!(session.check_file(file).is_err());
}

#[test]
fn test_builtin_files_are_not_user_files() {
    let session = session("let a = 1;");
    assert_eq!(session.file_count(), 1);
    let file = session.file_id("a.ts").unwrap();
    assert!(session.bound_file(file).is_some());
    assert!(session.check_file(tyck_ast::types::FileId(1)).is_err());
}
