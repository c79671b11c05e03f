//! Parser integration tests.
//!
//! Verifies the tree shapes the binder and checker rely on.

use std::sync::Arc;

use tyck_ast::{NodeData, NodeFlags, ModifierFlags, NodeId, SyntaxKind, SyntaxTree};
use tyck_core::intern::StringInterner;
use tyck_parser::parse_source;

/// Helper: parse source text into a tree.
fn parse(source: &str) -> Arc<SyntaxTree> {
    parse_source("test.ts", source, &StringInterner::new())
}

/// Helper: parse source text that must not produce syntax errors.
fn parse_clean(source: &str) -> Arc<SyntaxTree> {
    let tree = parse(source);
    assert!(
        tree.parse_diagnostics().is_empty(),
        "unexpected diagnostics for {:?}: {:?}",
        source,
        tree.parse_diagnostics()
    );
    tree
}

/// Helper: assert that parsing produces the expected number of top-level statements.
fn assert_statement_count(source: &str, expected: usize) {
    assert_eq!(parse_clean(source).statements().len(), expected, "source: {}", source);
}

fn first_statement(tree: &SyntaxTree) -> NodeId {
    tree.statements()[0]
}

/// The expression of an expression statement.
fn expression_of(tree: &SyntaxTree, statement: NodeId) -> NodeId {
    match tree.node(statement).data {
        NodeData::Expr { expression } => expression,
        ref other => panic!("expected expression statement, got {:?}", other),
    }
}

fn error_codes(tree: &SyntaxTree) -> Vec<u32> {
    tree.parse_diagnostics().iter().map(|d| d.code).collect()
}

// ============================================================================
// Variable Declarations
// ============================================================================

#[test]
fn test_parse_variable_statements() {
    assert_statement_count("const a = 1; let b = 2; var c = 3;", 3);
}

#[test]
fn test_parse_const_flags_on_declaration_list() {
    let tree = parse_clean("const x: number = 42;");
    let stmt = first_statement(&tree);
    assert_eq!(tree.kind(stmt), SyntaxKind::VariableStatement);
    let list = tree.list(stmt)[0];
    assert_eq!(tree.kind(list), SyntaxKind::VariableDeclarationList);
    assert!(tree.node(list).flags.contains(NodeFlags::CONST));
    let decl = tree.list(list)[0];
    match &tree.node(decl).data {
        NodeData::Variable {
            name,
            type_annotation,
            initializer,
        } => {
            assert_eq!(tree.identifier_text(*name), "x");
            assert_eq!(tree.kind(type_annotation.unwrap()), SyntaxKind::NumberKeyword);
            assert_eq!(tree.kind(initializer.unwrap()), SyntaxKind::NumericLiteral);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_multiple_declarators() {
    let tree = parse_clean("let a = 1, b, c = 'x';");
    let list = tree.list(first_statement(&tree))[0];
    assert_eq!(tree.list(list).len(), 3);
    assert!(tree.node(list).flags.contains(NodeFlags::LET));
}

#[test]
fn test_contextual_keywords_are_identifiers() {
    let tree = parse_clean("let type = 1; type;\nlet x = undefined;");
    assert_eq!(tree.statements().len(), 3);
    let expr = expression_of(&tree, tree.statements()[1]);
    assert_eq!(tree.kind(expr), SyntaxKind::Identifier);
    assert_eq!(tree.identifier_text(expr), "type");
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_parse_generic_function() {
    let tree = parse_clean("function identity<T>(x: T): T { return x; }");
    let func = first_statement(&tree);
    assert_eq!(tree.kind(func), SyntaxKind::FunctionDeclaration);
    let sig = tree.signature(func).unwrap();
    assert_eq!(tree.identifier_text(sig.name.unwrap()), "identity");
    assert_eq!(sig.type_parameters.len(), 1);
    assert_eq!(sig.parameters.len(), 1);
    assert_eq!(tree.kind(sig.return_type.unwrap()), SyntaxKind::TypeReference);
    assert_eq!(tree.kind(sig.body.unwrap()), SyntaxKind::Block);
}

#[test]
fn test_parse_optional_and_rest_parameters() {
    let tree = parse_clean("function f(a?: string, ...rest: number[]) {}");
    let sig = tree.signature(first_statement(&tree)).unwrap();
    assert!(tree.node(sig.parameters[0]).flags.contains(NodeFlags::OPTIONAL));
    assert!(tree.node(sig.parameters[1]).flags.contains(NodeFlags::REST));
}

#[test]
fn test_rest_parameter_must_be_last() {
    let tree = parse("function f(...a: number[], b: string) {}");
    assert_eq!(error_codes(&tree), vec![1014]);
}

#[test]
fn test_parse_overload_signatures() {
    assert_statement_count(
        "function f(x: string): string;\nfunction f(x: number): number;\nfunction f(x: any) { return x; }",
        3,
    );
}

#[test]
fn test_parse_type_predicates() {
    let tree = parse_clean(
        "function isString(x: unknown): x is string { return true; }\n\
         function assert(x: unknown): asserts x {}\n\
         function check(x: unknown): asserts x is number {}",
    );
    let returns: Vec<_> = tree
        .statements()
        .iter()
        .map(|&s| tree.signature(s).unwrap().return_type.unwrap())
        .collect();
    assert!(returns.iter().all(|&r| tree.kind(r) == SyntaxKind::TypePredicate));
    assert!(!tree.node(returns[0]).flags.contains(NodeFlags::ASSERTS));
    assert!(tree.node(returns[1]).flags.contains(NodeFlags::ASSERTS));
    match tree.node(returns[2]).data {
        NodeData::TypePredicate { type_node, .. } => assert!(type_node.is_some()),
        ref other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_arrow_functions() {
    let tree = parse_clean("const a = x => x;\nconst b = (x: number, y = 2): number => x + y;\nconst c = <T>(x: T) => x;");
    for &stmt in tree.statements() {
        let list = tree.list(stmt)[0];
        let decl = tree.list(list)[0];
        let NodeData::Variable { initializer, .. } = tree.node(decl).data else {
            panic!("expected variable");
        };
        assert_eq!(tree.kind(initializer.unwrap()), SyntaxKind::ArrowFunction);
    }
}

#[test]
fn test_parse_async_arrow() {
    let tree = parse_clean("const f = async (x: number) => x;");
    let list = tree.list(first_statement(&tree))[0];
    let NodeData::Variable { initializer, .. } = tree.node(tree.list(list)[0]).data else {
        panic!("expected variable");
    };
    let arrow = initializer.unwrap();
    assert_eq!(tree.kind(arrow), SyntaxKind::ArrowFunction);
    assert!(tree.node(arrow).modifiers.contains(ModifierFlags::ASYNC));
}

// ============================================================================
// Classes, Interfaces, Type Aliases
// ============================================================================

#[test]
fn test_parse_class_members() {
    let tree = parse_clean(
        "class Point<T> extends Base<T> implements Shape {\n\
             static origin: Point<number>;\n\
             private x!: number;\n\
             readonly y?: number = 0;\n\
             constructor(public name: string) { super(); }\n\
             get length(): number { return 0; }\n\
             set length(v: number) {}\n\
             move(dx: number): void {}\n\
             [key: string]: any;\n\
         }",
    );
    let class = first_statement(&tree);
    let NodeData::ClassLike {
        ref heritage_clauses,
        ref members,
        ..
    } = tree.node(class).data
    else {
        panic!("expected class");
    };
    assert_eq!(heritage_clauses.len(), 2);
    let kinds: Vec<_> = members.iter().map(|&m| tree.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::Constructor,
            SyntaxKind::GetAccessor,
            SyntaxKind::SetAccessor,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::IndexSignature,
        ]
    );
    assert!(tree.node(members[0]).modifiers.contains(ModifierFlags::STATIC));
    assert!(tree.node(members[1]).flags.contains(NodeFlags::DEFINITE));
    assert!(tree.node(members[2]).flags.contains(NodeFlags::OPTIONAL));
    let ctor = tree.signature(members[3]).unwrap();
    assert!(tree.node(ctor.parameters[0]).modifiers.contains(ModifierFlags::PUBLIC));
}

#[test]
fn test_parse_interface_members() {
    let tree = parse_clean(
        "interface Callable {\n\
             (x: number): string;\n\
             new (x: number): Callable;\n\
             readonly [index: number]: string;\n\
             name?: string;\n\
             method<T>(arg: T): void,\n\
         }",
    );
    let NodeData::ClassLike { ref members, .. } = tree.node(first_statement(&tree)).data else {
        panic!("expected interface");
    };
    let kinds: Vec<_> = members.iter().map(|&m| tree.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::CallSignature,
            SyntaxKind::ConstructSignature,
            SyntaxKind::IndexSignature,
            SyntaxKind::PropertySignature,
            SyntaxKind::MethodSignature,
        ]
    );
    assert!(tree.node(members[2]).modifiers.contains(ModifierFlags::READONLY));
}

#[test]
fn test_parse_self_referential_alias() {
    let tree = parse_clean("type List<T> = { value: T; next: List<T> | null };");
    let alias = first_statement(&tree);
    let NodeData::TypeAlias { type_node, .. } = tree.node(alias).data else {
        panic!("expected alias");
    };
    assert_eq!(tree.kind(type_node), SyntaxKind::TypeLiteral);
}

// ============================================================================
// Types
// ============================================================================

fn alias_type(source: &str) -> (Arc<SyntaxTree>, NodeId) {
    let tree = parse_clean(source);
    let NodeData::TypeAlias { type_node, .. } = tree.node(first_statement(&tree)).data else {
        panic!("expected alias in {:?}", source);
    };
    (tree, type_node)
}

#[test]
fn test_parse_type_forms() {
    let cases = [
        ("type A = string | number;", SyntaxKind::UnionType),
        ("type A = | 'a' | 'b';", SyntaxKind::UnionType),
        ("type A = B & C;", SyntaxKind::IntersectionType),
        ("type A = string[];", SyntaxKind::ArrayType),
        ("type A = T['key'];", SyntaxKind::IndexedAccessType),
        ("type A = [string, number?, ...boolean[]];", SyntaxKind::TupleType),
        ("type A = (x: number) => string;", SyntaxKind::FunctionType),
        ("type A = new () => object;", SyntaxKind::ConstructorType),
        ("type A = keyof T;", SyntaxKind::TypeOperator),
        ("type A = typeof x;", SyntaxKind::TypeQuery),
        ("type A = -1;", SyntaxKind::LiteralType),
        ("type A = (string);", SyntaxKind::ParenthesizedType),
        ("type A = T extends string ? 'yes' : 'no';", SyntaxKind::ConditionalType),
        ("type A = { readonly [K in keyof T]?: T[K] };", SyntaxKind::MappedType),
        ("type A = null;", SyntaxKind::NullKeyword),
        ("type A = ns.Inner<string>;", SyntaxKind::TypeReference),
    ];
    for (source, expected) in cases {
        let (tree, ty) = alias_type(source);
        assert_eq!(tree.kind(ty), expected, "source: {}", source);
    }
}

#[test]
fn test_parse_nested_generic_closing_brackets() {
    let (tree, ty) = alias_type("type A = Map<string, Array<Set<number>>>;");
    let NodeData::Call { ref type_arguments, .. } = tree.node(ty).data else {
        panic!("expected reference");
    };
    assert_eq!(type_arguments.len(), 2);
}

#[test]
fn test_parse_infer_type() {
    let (tree, ty) = alias_type("type E<T> = T extends Array<infer U> ? U : never;");
    let NodeData::ConditionalType { extends_type, .. } = tree.node(ty).data else {
        panic!("expected conditional");
    };
    let NodeData::Call { ref type_arguments, .. } = tree.node(extends_type).data else {
        panic!("expected reference");
    };
    assert_eq!(tree.kind(type_arguments[0]), SyntaxKind::InferType);
}

#[test]
fn test_parse_mapped_type_modifiers() {
    let (tree, ty) = alias_type(r#"type M = { -readonly [K in Keys as Exclude<K, "x">]-?: number };"#);
    let NodeData::MappedType {
        readonly_token,
        question_token,
        name_type,
        ..
    } = tree.node(ty).data
    else {
        panic!("expected mapped type");
    };
    assert_eq!(readonly_token, Some(SyntaxKind::MinusToken));
    assert_eq!(question_token, Some(SyntaxKind::MinusToken));
    assert!(name_type.is_some());
}

#[test]
fn test_parse_named_tuple_members() {
    let (tree, ty) = alias_type("type P = [first: string, second?: number, ...rest: boolean[]];");
    let elements = tree.list(ty);
    assert!(elements.iter().all(|&e| tree.kind(e) == SyntaxKind::NamedTupleMember));
    assert!(tree.node(elements[1]).flags.contains(NodeFlags::OPTIONAL));
    assert!(tree.node(elements[2]).flags.contains(NodeFlags::REST));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_parse_property_access_chain() {
    let tree = parse_clean("foo.bar.baz;");
    let expr = expression_of(&tree, first_statement(&tree));
    assert_eq!(tree.kind(expr), SyntaxKind::PropertyAccessExpression);
    let NodeData::Access { expression, name } = tree.node(expr).data else {
        panic!("expected access");
    };
    assert_eq!(tree.identifier_text(name), "baz");
    assert_eq!(tree.source_text(expression), "foo.bar");
}

#[test]
fn test_parse_optional_chain_and_non_null() {
    let tree = parse_clean("a?.b; c!.d;");
    let first = expression_of(&tree, tree.statements()[0]);
    assert!(tree.node(first).flags.contains(NodeFlags::OPTIONAL_CHAIN));
    let second = expression_of(&tree, tree.statements()[1]);
    let NodeData::Access { expression, .. } = tree.node(second).data else {
        panic!("expected access");
    };
    assert_eq!(tree.kind(expression), SyntaxKind::NonNullExpression);
}

#[test]
fn test_binary_precedence() {
    let tree = parse_clean("a + b * c;");
    let expr = expression_of(&tree, first_statement(&tree));
    let NodeData::Binary { operator, right, .. } = tree.node(expr).data else {
        panic!("expected binary");
    };
    assert_eq!(operator, SyntaxKind::PlusToken);
    assert_eq!(tree.source_text(right), "b * c");
}

#[test]
fn test_exponent_is_right_associative() {
    let tree = parse_clean("a ** b ** c;");
    let expr = expression_of(&tree, first_statement(&tree));
    let NodeData::Binary { right, .. } = tree.node(expr).data else {
        panic!("expected binary");
    };
    assert_eq!(tree.source_text(right), "b ** c");
}

#[test]
fn test_assignment_is_right_associative() {
    let tree = parse_clean("a = b = c;");
    let expr = expression_of(&tree, first_statement(&tree));
    let NodeData::Binary { right, operator, .. } = tree.node(expr).data else {
        panic!("expected binary");
    };
    assert_eq!(operator, SyntaxKind::EqualsToken);
    assert_eq!(tree.kind(right), SyntaxKind::BinaryExpression);
}

#[test]
fn test_parse_shift_operators_via_rescan() {
    let tree = parse_clean("a >> b; c >>>= d; e >= f;");
    let operators: Vec<_> = tree
        .statements()
        .iter()
        .map(|&s| match tree.node(expression_of(&tree, s)).data {
            NodeData::Binary { operator, .. } => operator,
            ref other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(
        operators,
        vec![
            SyntaxKind::GreaterThanGreaterThanToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::GreaterThanEqualsToken,
        ]
    );
}

#[test]
fn test_parse_typeof_guard_expression() {
    let tree = parse_clean("if (typeof x === 'string') { x.length; } else { x; }");
    let stmt = first_statement(&tree);
    let NodeData::If { condition, else_statement, .. } = tree.node(stmt).data else {
        panic!("expected if");
    };
    let NodeData::Binary { left, operator, .. } = tree.node(condition).data else {
        panic!("expected binary");
    };
    assert_eq!(operator, SyntaxKind::EqualsEqualsEqualsToken);
    assert_eq!(tree.kind(left), SyntaxKind::TypeOfExpression);
    assert!(else_statement.is_some());
}

#[test]
fn test_parse_as_const_and_satisfies() {
    let tree = parse_clean("const a = [1, 2] as const; const b = {} satisfies object;");
    let decl = |i: usize| {
        let list = tree.list(tree.statements()[i])[0];
        match tree.node(tree.list(list)[0]).data {
            NodeData::Variable { initializer, .. } => initializer.unwrap(),
            ref other => panic!("unexpected {:?}", other),
        }
    };
    let a = decl(0);
    assert_eq!(tree.kind(a), SyntaxKind::AsExpression);
    assert!(tree.node(a).flags.contains(NodeFlags::CONST_ASSERTION));
    assert_eq!(tree.kind(decl(1)), SyntaxKind::SatisfiesExpression);
}

#[test]
fn test_parse_object_literal_members() {
    let tree = parse_clean("x = { a: 1, b, ...rest, m() { return 1; }, get g() { return 2; }, 'q': 3, [k]: 4 };");
    let NodeData::Binary { right, .. } = tree.node(expression_of(&tree, first_statement(&tree))).data else {
        panic!("expected assignment");
    };
    let kinds: Vec<_> = tree.list(right).iter().map(|&m| tree.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PropertyAssignment,
            SyntaxKind::ShorthandPropertyAssignment,
            SyntaxKind::SpreadAssignment,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::GetAccessor,
            SyntaxKind::PropertyAssignment,
            SyntaxKind::PropertyAssignment,
        ]
    );
}

#[test]
fn test_parse_template_expression() {
    let tree = parse_clean("`a${b}c${d}e`;");
    let expr = expression_of(&tree, first_statement(&tree));
    let NodeData::Template { ref spans, .. } = tree.node(expr).data else {
        panic!("expected template");
    };
    assert_eq!(spans.len(), 2);
}

#[test]
fn test_parse_new_and_generic_calls() {
    let tree = parse_clean("new Map<string, number>(); f<number>(1); a < b;");
    assert_eq!(tree.kind(expression_of(&tree, tree.statements()[0])), SyntaxKind::NewExpression);
    assert_eq!(tree.kind(expression_of(&tree, tree.statements()[1])), SyntaxKind::CallExpression);
    assert_eq!(tree.kind(expression_of(&tree, tree.statements()[2])), SyntaxKind::BinaryExpression);
}

#[test]
fn test_parse_numeric_literal_values() {
    let tree = parse_clean("0x1F; 1_000; 0b11; 2e3;");
    let values: Vec<f64> = tree
        .statements()
        .iter()
        .map(|&s| match tree.node(expression_of(&tree, s)).data {
            NodeData::NumericLiteral { value } => value,
            ref other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(values, vec![31.0, 1000.0, 3.0, 2000.0]);
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_parse_control_flow_statements() {
    assert_statement_count(
        "for (let i = 0; i < 10; i++) {}\n\
         for (const k in obj) {}\n\
         for (const v of list) {}\n\
         while (x) { break; }\n\
         do { continue; } while (y)\n\
         outer: for (;;) { break outer; }\n\
         switch (k) { case 1: case 2: f(); break; default: g(); }\n\
         try { f(); } catch (e) { g(); } finally { h(); }\n\
         throw new Error('x');\n\
         debugger;",
        10,
    );
}

#[test]
fn test_parse_for_in_does_not_consume_in() {
    let tree = parse_clean("for (const k in obj) {}");
    let stmt = first_statement(&tree);
    assert_eq!(tree.kind(stmt), SyntaxKind::ForInStatement);
    let NodeData::Loop { condition, .. } = tree.node(stmt).data else {
        panic!("expected loop");
    };
    assert_eq!(tree.source_text(condition.unwrap()), "obj");
}

#[test]
fn test_automatic_semicolon_insertion() {
    assert_statement_count("let a = 1\nlet b = 2\na + b", 3);
}

#[test]
fn test_missing_semicolon_reports_error() {
    let tree = parse("let a = 1 let b = 2;");
    assert_eq!(error_codes(&tree), vec![1005]);
    assert_eq!(tree.statements().len(), 2);
}

#[test]
fn test_duplicate_default_clause() {
    let tree = parse("switch (x) { default: break; default: break; }");
    assert_eq!(error_codes(&tree), vec![1113]);
}

// ============================================================================
// Modules and Namespaces
// ============================================================================

#[test]
fn test_parse_imports() {
    let tree = parse_clean(
        "import def from './a';\n\
         import * as ns from './b';\n\
         import { x, y as z } from './c';\n\
         import type { T } from './d';\n\
         import './side-effect';",
    );
    assert_eq!(tree.statements().len(), 5);
    assert!(tree
        .statements()
        .iter()
        .all(|&s| tree.kind(s) == SyntaxKind::ImportDeclaration));
    let NodeData::Import { import_clause, .. } = tree.node(tree.statements()[3]).data else {
        panic!("expected import");
    };
    assert!(tree.node(import_clause.unwrap()).flags.contains(NodeFlags::TYPE_ONLY));
}

#[test]
fn test_parse_exports() {
    let tree = parse_clean(
        "export const a = 1;\n\
         export function f() {}\n\
         export { a as b };\n\
         export * from './x';\n\
         export default f;\n\
         export type { T } from './t';",
    );
    let kinds: Vec<_> = tree.statements().iter().map(|&s| tree.kind(s)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::VariableStatement,
            SyntaxKind::FunctionDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportAssignment,
            SyntaxKind::ExportDeclaration,
        ]
    );
    assert!(tree.node(tree.statements()[0]).modifiers.contains(ModifierFlags::EXPORT));
}

#[test]
fn test_parse_dotted_namespace() {
    let tree = parse_clean("namespace A.B { export const x = 1; }");
    let outer = first_statement(&tree);
    assert!(tree.node(outer).flags.contains(NodeFlags::NAMESPACE));
    let NodeData::Module { body, .. } = tree.node(outer).data else {
        panic!("expected module");
    };
    assert_eq!(tree.kind(body.unwrap()), SyntaxKind::ModuleDeclaration);
}

#[test]
fn test_declare_marks_ambient() {
    let tree = parse_clean("declare function f(x: number): void;\ndeclare const c: string;");
    for &stmt in tree.statements() {
        assert!(tree.node(stmt).modifiers.contains(ModifierFlags::AMBIENT));
        assert!(tree.node(stmt).flags.contains(NodeFlags::AMBIENT));
    }
}

#[test]
fn test_declaration_file_is_ambient() {
    let tree = parse_source("lib.d.ts", "interface Array<T> { length: number; }", &StringInterner::new());
    assert!(tree.is_declaration_file());
    assert!(tree.node(first_statement(&tree)).flags.contains(NodeFlags::AMBIENT));
}

#[test]
fn test_parse_enum_declarations() {
    let tree = parse_clean("enum Color { Red, Green = 'g', Blue }\nconst enum E { A = 1 }");
    let NodeData::Enum { ref members, .. } = tree.node(tree.statements()[0]).data else {
        panic!("expected enum");
    };
    assert_eq!(members.len(), 3);
    assert!(tree.node(tree.statements()[1]).modifiers.contains(ModifierFlags::CONST));
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_recovers_after_garbage() {
    let tree = parse("let a = ; let b = 2;");
    assert!(!tree.parse_diagnostics().is_empty());
    assert!(tree.statements().len() >= 2);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let source = format!("{}1{};", "(".repeat(500), ")".repeat(500));
    let tree = parse(&source);
    assert!(!tree.parse_diagnostics().is_empty());
}

#[test]
fn test_node_at_offset_finds_innermost() {
    let source = "foo.bar;";
    let tree = parse_clean(source);
    let node = tree.node_at_offset(5).unwrap();
    assert_eq!(tree.kind(node), SyntaxKind::Identifier);
    assert_eq!(tree.identifier_text(node), "bar");
}
