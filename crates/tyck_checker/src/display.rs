//! Source-like rendering of types for diagnostics and point queries.

use tyck_ast::types::{SymbolFlags, SymbolId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::names::number_to_string;
use tyck_binder::Declaration;

use crate::checker::Checker;
use crate::types::{
    DeclRef, ElementFlags, IntrinsicKind, ObjectKey, PredicateTarget, PropertyFlags, SignatureId, SignatureKind,
    TypeFlags, TypeId, TypeKey, TypeParamKey,
};

/// Nesting beyond which a type prints as `...`.
const MAX_DISPLAY_DEPTH: u32 = 8;

/// Where a type is printed, which decides whether it needs parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    UnionMember,
    IntersectionMember,
    /// Array element or `keyof`/indexed-access operand.
    Operand,
}

impl<'s> Checker<'s> {
    /// Render a type the way it would be written in source.
    pub fn type_to_string(&mut self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty, Position::Top);
        out
    }

    pub(crate) fn signature_to_string(&mut self, signature: SignatureId) -> String {
        let mut out = String::new();
        self.write_signature(&mut out, signature, true);
        out
    }

    fn write_type(&mut self, out: &mut String, ty: TypeId, position: Position) {
        if self.display_depth >= MAX_DISPLAY_DEPTH {
            out.push_str("...");
            return;
        }
        self.display_depth += 1;
        self.write_type_worker(out, ty, position);
        self.display_depth -= 1;
    }

    fn write_type_worker(&mut self, out: &mut String, ty: TypeId, position: Position) {
        let data = self.types().get(ty);
        match &data.key {
            TypeKey::Intrinsic(IntrinsicKind::Error) => out.push_str("any"),
            TypeKey::Intrinsic(kind) => out.push_str(kind.name()),
            TypeKey::StringLiteral(value) => out.push_str(&quote_string(self.text(*value))),
            TypeKey::NumberLiteral(value) => out.push_str(&number_to_string(value.0)),
            TypeKey::BigIntLiteral(text) => {
                let text = self.text(*text);
                out.push_str(text);
                if !text.ends_with('n') {
                    out.push('n');
                }
            }
            TypeKey::BooleanLiteral(value) => out.push_str(if *value { "true" } else { "false" }),
            TypeKey::EnumLiteral { enum_symbol, member, .. } => {
                let enum_name = self.symbol_name(*enum_symbol);
                let member_name = self.symbol_name(*member);
                out.push_str(&enum_name);
                out.push('.');
                out.push_str(&member_name);
            }
            TypeKey::TypeParameter(TypeParamKey::Declared(declaration)) => {
                let tree = self.tree(declaration.file);
                let name = tree
                    .declaration_name(declaration.node)
                    .map(|n| tree.identifier_text(n))
                    .unwrap_or("T");
                out.push_str(name);
            }
            TypeKey::TypeParameter(TypeParamKey::Marker(_)) => out.push('T'),
            TypeKey::Union(_) => self.write_union(out, ty, position),
            TypeKey::Intersection(types) => {
                let types = types.clone();
                let wrap = position == Position::Operand;
                if wrap {
                    out.push('(');
                }
                for (i, &member) in types.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    self.write_type(out, member, Position::IntersectionMember);
                }
                if wrap {
                    out.push(')');
                }
            }
            TypeKey::Index(target) => {
                let wrap = position == Position::Operand;
                if wrap {
                    out.push('(');
                }
                out.push_str("keyof ");
                self.write_type(out, *target, Position::Operand);
                if wrap {
                    out.push(')');
                }
            }
            TypeKey::IndexedAccess { object, index } => {
                self.write_type(out, *object, Position::Operand);
                out.push('[');
                self.write_type(out, *index, Position::Top);
                out.push(']');
            }
            TypeKey::Conditional { decl, args } => {
                let Some((check, extends, when_true, when_false)) = self.conditional_parts(*decl, args) else {
                    out.push_str(self.tree(decl.file).source_text(decl.node));
                    return;
                };
                let wrap = position != Position::Top;
                if wrap {
                    out.push('(');
                }
                self.write_type(out, check, Position::Operand);
                out.push_str(" extends ");
                self.write_type(out, extends, Position::Operand);
                out.push_str(" ? ");
                self.write_type(out, when_true, Position::Top);
                out.push_str(" : ");
                self.write_type(out, when_false, Position::Top);
                if wrap {
                    out.push(')');
                }
            }
            TypeKey::Substitution { base, .. } => self.write_type(out, *base, position),
            TypeKey::Object(key) => self.write_object(out, ty, key, position),
        }
    }

    fn write_union(&mut self, out: &mut String, ty: TypeId, position: Position) {
        if let Some(symbol) = self.session.caches.enum_unions.get(&ty).map(|s| *s) {
            out.push_str(&self.symbol_name(symbol));
            return;
        }
        if ty == TypeId::BOOLEAN {
            out.push_str("boolean");
            return;
        }
        let types = self.types().get(ty).display_constituents().to_vec();
        let has_boolean = types.contains(&TypeId::TRUE) && types.contains(&TypeId::FALSE);
        let mut items: Vec<TypeId> = Vec::with_capacity(types.len());
        let mut nullables: Vec<TypeId> = Vec::new();
        for member in types {
            if has_boolean && (member == TypeId::TRUE || member == TypeId::FALSE) {
                if !items.contains(&TypeId::BOOLEAN) {
                    items.push(TypeId::BOOLEAN);
                }
                continue;
            }
            if self.types().is(member, TypeFlags::NULLABLE) {
                nullables.push(member);
            } else {
                items.push(member);
            }
        }
        nullables.sort_by_key(|&t| if t == TypeId::NULL { 0 } else { 1 });
        items.extend(nullables);
        let wrap = matches!(position, Position::IntersectionMember | Position::Operand);
        if wrap {
            out.push('(');
        }
        for (i, &member) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(" | ");
            }
            self.write_type(out, member, Position::UnionMember);
        }
        if wrap {
            out.push(')');
        }
    }

    fn write_object(&mut self, out: &mut String, ty: TypeId, key: &ObjectKey, position: Position) {
        match key {
            ObjectKey::Declared(symbol) => {
                out.push_str(&self.symbol_name(*symbol));
                let parameters = self.local_type_parameters(*symbol);
                self.write_type_arguments(out, &parameters);
            }
            ObjectKey::Reference { target, args } => {
                if self.types().is_array_target(*target) {
                    if Some(*target) == self.types().readonly_array_target() {
                        out.push_str("readonly ");
                    }
                    if let Some(&element) = args.first() {
                        self.write_type(out, element, Position::Operand);
                    }
                    out.push_str("[]");
                    return;
                }
                let Some(symbol) = self.types().get(*target).symbol else {
                    out.push_str("{}");
                    return;
                };
                out.push_str(&self.symbol_name(symbol));
                let local = self.local_type_parameters(symbol).len();
                let shown = args[args.len().saturating_sub(local)..].to_vec();
                self.write_type_arguments(out, &shown);
            }
            ObjectKey::Tuple {
                elements,
                flags,
                readonly,
            } => {
                if *readonly {
                    out.push_str("readonly ");
                }
                out.push('[');
                for (i, (&element, &flag)) in elements.iter().zip(flags.iter()).enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if flag.contains(ElementFlags::REST) {
                        out.push_str("...");
                        self.write_type(out, element, Position::Operand);
                        out.push_str("[]");
                    } else {
                        self.write_type(out, element, Position::Top);
                        if flag.contains(ElementFlags::OPTIONAL) {
                            out.push('?');
                        }
                    }
                }
                out.push(']');
            }
            ObjectKey::Anonymous {
                decl: DeclRef::Symbol(symbol),
                ..
            } if self
                .symbol(*symbol)
                .flags
                .intersects(SymbolFlags::CLASS | SymbolFlags::ENUM | SymbolFlags::VALUE_MODULE | SymbolFlags::ALIAS) =>
            {
                out.push_str("typeof ");
                out.push_str(&self.symbol_name(*symbol));
            }
            ObjectKey::Mapped { decl, args } => {
                let members = self.resolve_members(ty);
                if !members.is_empty() {
                    self.write_structured(out, ty, position);
                    return;
                }
                match self.mapped_parts(*decl, args) {
                    Some((parameter, constraint, template)) => {
                        out.push_str("{ [");
                        self.write_type(out, parameter, Position::Top);
                        out.push_str(" in ");
                        self.write_type(out, constraint, Position::Top);
                        out.push_str("]: ");
                        self.write_type(out, template, Position::Top);
                        out.push_str("; }");
                    }
                    None => out.push_str("{}"),
                }
            }
            ObjectKey::Anonymous {
                decl: DeclRef::Node(declaration),
                args,
            } => match self.type_literal_alias(*declaration) {
                Some(alias) => {
                    out.push_str(&self.symbol_name(alias));
                    let local = self.local_type_parameters(alias).len();
                    let shown = args[args.len().saturating_sub(local)..].to_vec();
                    self.write_type_arguments(out, &shown);
                }
                None => self.write_structured(out, ty, position),
            },
            _ => self.write_structured(out, ty, position),
        }
    }

    /// The alias a type literal is the whole right-hand side of.
    fn type_literal_alias(&self, declaration: Declaration) -> Option<SymbolId> {
        let (file, node) = (declaration.file, declaration.node);
        if self.kind(file, node) != SyntaxKind::TypeLiteral {
            return None;
        }
        let parent = self.parent(file, node)?;
        match self.data(file, parent) {
            NodeData::TypeAlias { type_node, .. } if *type_node == node => self.node_symbol(file, parent),
            _ => None,
        }
    }

    fn write_type_arguments(&mut self, out: &mut String, args: &[TypeId]) {
        if args.is_empty() {
            return;
        }
        out.push('<');
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, arg, Position::Top);
        }
        out.push('>');
    }

    /// `{ a: T; m(): U; }`, or arrow syntax for a lone signature.
    fn write_structured(&mut self, out: &mut String, ty: TypeId, position: Position) {
        let members = self.resolve_members(ty);
        if members.properties.is_empty() && members.index_infos.is_empty() {
            let lone = match (members.call_signatures.len(), members.construct_signatures.len()) {
                (1, 0) => Some(members.call_signatures[0]),
                (0, 1) => Some(members.construct_signatures[0]),
                _ => None,
            };
            if let Some(signature) = lone {
                let wrap = position != Position::Top;
                if wrap {
                    out.push('(');
                }
                if self.session.signature(signature).kind == SignatureKind::Construct {
                    out.push_str("new ");
                }
                self.write_signature(out, signature, true);
                if wrap {
                    out.push(')');
                }
                return;
            }
            if members.call_signatures.is_empty() && members.construct_signatures.is_empty() {
                out.push_str("{}");
                return;
            }
        }
        out.push_str("{ ");
        for info in &members.index_infos {
            if info.readonly {
                out.push_str("readonly ");
            }
            out.push_str("[x: ");
            self.write_type(out, info.key_type, Position::Top);
            out.push_str("]: ");
            self.write_type(out, info.value_type, Position::Top);
            out.push_str("; ");
        }
        for &signature in &members.call_signatures {
            self.write_signature(out, signature, false);
            out.push_str("; ");
        }
        for &signature in &members.construct_signatures {
            out.push_str("new ");
            self.write_signature(out, signature, false);
            out.push_str("; ");
        }
        for property in members.properties.values() {
            let name = property_key_text(self.text(property.name));
            let declared = self.declared_type_of_property(property);
            if property.flags.contains(PropertyFlags::METHOD) {
                let signatures = self.signatures_of_type(declared, SignatureKind::Call);
                if !signatures.is_empty() {
                    for signature in signatures {
                        out.push_str(&name);
                        if property.is_optional() {
                            out.push('?');
                        }
                        self.write_signature(out, signature, false);
                        out.push_str("; ");
                    }
                    continue;
                }
            }
            if property.is_readonly() {
                out.push_str("readonly ");
            }
            out.push_str(&name);
            if property.is_optional() {
                out.push('?');
            }
            out.push_str(": ");
            self.write_type(out, declared, Position::Top);
            out.push_str("; ");
        }
        out.push('}');
    }

    /// `<T>(a: A, b?: B) => R` in arrow form, `(a: A): R` otherwise.
    fn write_signature(&mut self, out: &mut String, signature: SignatureId, arrow: bool) {
        let data = self.session.signature(signature);
        if !data.type_parameters.is_empty() {
            out.push('<');
            for (i, &parameter) in data.type_parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write_type(out, parameter, Position::Top);
            }
            out.push('>');
        }
        out.push('(');
        let mut first = true;
        if let Some(this_type) = data.this_type {
            out.push_str("this: ");
            self.write_type(out, this_type, Position::Top);
            first = false;
        }
        for parameter in data.parameters.iter() {
            if !first {
                out.push_str(", ");
            }
            first = false;
            if parameter.rest {
                out.push_str("...");
            }
            out.push_str(self.text(parameter.name));
            let mut ty = parameter.ty;
            if parameter.optional && !parameter.rest {
                out.push('?');
                ty = self.remove_undefined(ty);
            }
            out.push_str(": ");
            self.write_type(out, ty, Position::Top);
        }
        out.push(')');
        out.push_str(if arrow { " => " } else { ": " });
        match data.type_predicate {
            Some(predicate) => {
                if predicate.asserts {
                    out.push_str("asserts ");
                }
                match predicate.target {
                    PredicateTarget::This => out.push_str("this"),
                    PredicateTarget::Parameter(index) => {
                        let name = data.parameters.get(index as usize).map(|p| self.text(p.name)).unwrap_or("x");
                        out.push_str(name);
                    }
                }
                if let Some(ty) = predicate.ty {
                    out.push_str(" is ");
                    self.write_type(out, ty, Position::Top);
                }
            }
            None => {
                let ret = self.return_type_of_signature(signature);
                self.write_type(out, ret, Position::Top);
            }
        }
    }

    pub(crate) fn remove_undefined(&mut self, ty: TypeId) -> TypeId {
        if !self.types().is(ty, TypeFlags::UNION) {
            return ty;
        }
        self.filter_type(ty, |_, t| t != TypeId::UNDEFINED)
    }
}

fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A property name as written in a type literal.
fn property_key_text(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c == '_' || c == '$' || unicode_xid::UnicodeXID::is_xid_start(c))
        && chars.all(|c| c == '$' || unicode_xid::UnicodeXID::is_xid_continue(c));
    let is_numeric = !name.is_empty() && name.parse::<f64>().is_ok_and(|v| number_to_string(v) == name);
    if is_identifier || is_numeric {
        name.to_string()
    } else {
        quote_string(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use tyck_options::CheckerOptions;

    #[test]
    fn test_property_keys_quote_when_needed() {
        assert_eq!(property_key_text("a"), "a");
        assert_eq!(property_key_text("0"), "0");
        assert_eq!(property_key_text("a-b"), "\"a-b\"");
    }

    #[test]
    fn test_union_display_collapses_boolean_and_orders_nullables() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::strict());
        let mut checker = session.checker();
        let types = session.types();
        let ty = types.union(&[TypeId::UNDEFINED, TypeId::TRUE, TypeId::STRING, TypeId::FALSE, TypeId::NULL]);
        assert_eq!(checker.type_to_string(ty), "boolean | string | null | undefined");
        assert_eq!(checker.type_to_string(TypeId::BOOLEAN), "boolean");
    }

    #[test]
    fn test_boolean_in_messages_and_signatures() {
        let source = "declare const b: boolean;\nlet s: string = b;\ndeclare function f(b: boolean): void;\nlet n: number = f;";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let messages: Vec<String> = session
            .check_file(file)
            .unwrap()
            .iter()
            .map(|d| d.message_text.clone())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Type 'boolean' is not assignable to type 'string'.".to_string(),
                "Type '(b: boolean) => void' is not assignable to type 'number'.".to_string(),
            ]
        );
    }

    #[test]
    fn test_union_keeps_written_order() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::strict());
        let mut checker = session.checker();
        let types = session.types();
        let first = types.union(&[TypeId::NUMBER, TypeId::STRING]);
        assert_eq!(checker.type_to_string(first), "number | string");
        // The same union built again keeps the order it was first written in.
        let again = types.union(&[TypeId::STRING, TypeId::NUMBER]);
        assert_eq!(again, first);
        assert_eq!(checker.type_to_string(again), "number | string");
    }

    #[test]
    fn test_alias_of_type_literal_prints_by_name() {
        let source = "type List = { value: number; next: List | null };\ndeclare const l: List;\nl.next;";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let offset = source.rfind("next;").unwrap() as u32;
        let node = checker.tree(file).node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        assert_eq!(checker.type_to_string(ty), "List | null");
    }

    #[test]
    fn test_inline_type_literal_is_expanded() {
        let source = "declare const o: { a: number };\no;";
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let offset = source.rfind("o;").unwrap() as u32;
        let node = checker.tree(file).node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        assert_eq!(checker.type_to_string(ty), "{ a: number; }");
    }

    #[test]
    fn test_array_of_union_is_parenthesised() {
        let session = Session::from_sources(&[("a.ts", "")], CheckerOptions::strict());
        let mut checker = session.checker();
        let types = session.types();
        let union = types.union(&[TypeId::STRING, TypeId::NUMBER]);
        let array = types.array(union);
        assert_eq!(checker.type_to_string(array), "(string | number)[]");
        let a = types.literal_string(session.interner().intern("a"));
        let tuple = types.tuple(vec![a, TypeId::NUMBER], vec![ElementFlags::REQUIRED, ElementFlags::OPTIONAL], true);
        assert_eq!(checker.type_to_string(tuple), "readonly [\"a\", number?]");
    }
}
