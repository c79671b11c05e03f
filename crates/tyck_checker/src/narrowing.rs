//! Narrowing a reference's type by a condition it was tested with.

use tyck_ast::types::{FileId, NodeId};
use tyck_ast::{NodeData, SyntaxKind};
use tyck_binder::skip_parentheses;
use tyck_core::intern::InternedString;

use crate::checker::Checker;
use crate::flow::ReferenceKey;
use crate::types::{PredicateTarget, SignatureKind, TypeFlags, TypeId, TypeKey};

/// What `typeof` yields for a type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TypeOfTag {
    String,
    Number,
    BigInt,
    Boolean,
    Symbol,
    Undefined,
    Object,
    Function,
}

impl TypeOfTag {
    fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "string" => TypeOfTag::String,
            "number" => TypeOfTag::Number,
            "bigint" => TypeOfTag::BigInt,
            "boolean" => TypeOfTag::Boolean,
            "symbol" => TypeOfTag::Symbol,
            "undefined" => TypeOfTag::Undefined,
            "object" => TypeOfTag::Object,
            "function" => TypeOfTag::Function,
            _ => return None,
        })
    }

    /// The type an `unknown` value has once the tag is known.
    fn implied_type(self) -> TypeId {
        match self {
            TypeOfTag::String => TypeId::STRING,
            TypeOfTag::Number => TypeId::NUMBER,
            TypeOfTag::BigInt => TypeId::BIGINT,
            TypeOfTag::Boolean => TypeId::BOOLEAN,
            TypeOfTag::Symbol => TypeId::SYMBOL,
            TypeOfTag::Undefined => TypeId::UNDEFINED,
            TypeOfTag::Object | TypeOfTag::Function => TypeId::OBJECT,
        }
    }

    fn is_primitive(self) -> bool {
        !matches!(self, TypeOfTag::Object | TypeOfTag::Function)
    }
}

impl<'s> Checker<'s> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// The constituents of `ty` (itself when not a union) satisfying `keep`.
    pub(crate) fn filter_type(&mut self, ty: TypeId, mut keep: impl FnMut(&mut Self, TypeId) -> bool) -> TypeId {
        if !self.types().is(ty, TypeFlags::UNION) {
            return if keep(self, ty) { ty } else { TypeId::NEVER };
        }
        let constituents: Vec<TypeId> = self.types().get(ty).display_constituents().to_vec();
        let kept: Vec<TypeId> = constituents.iter().copied().filter(|&c| keep(self, c)).collect();
        if kept.len() == constituents.len() {
            return ty;
        }
        self.types().union(&kept)
    }

    /// `f` applied to every constituent of `ty`, unioned.
    pub(crate) fn map_type(&mut self, ty: TypeId, mut f: impl FnMut(&mut Self, TypeId) -> TypeId) -> TypeId {
        if !self.types().is(ty, TypeFlags::UNION) {
            return f(self, ty);
        }
        let constituents: Vec<TypeId> = self.types().get(ty).display_constituents().to_vec();
        let mapped: Vec<TypeId> = constituents.into_iter().map(|c| f(self, c)).collect();
        self.types().union(&mapped)
    }

    fn is_same_reference(&mut self, file: FileId, node: NodeId, key: &ReferenceKey) -> bool {
        self.reference_key(file, node).is_some_and(|k| k == *key)
    }

    /// The property of `key` that `node` accesses, when `node` is `key.p`.
    fn discriminant_of(&mut self, file: FileId, node: NodeId, key: &ReferenceKey) -> Option<InternedString> {
        let candidate = self.reference_key(file, node)?;
        if candidate.path.len() == key.path.len() + 1 && key.is_prefix_of(&candidate) {
            candidate.path.last().copied()
        } else {
            None
        }
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    /// The type of the reference `key` after `condition` evaluated to
    /// `assume_true`.
    pub(crate) fn narrow_type(
        &mut self,
        file: FileId,
        key: &ReferenceKey,
        ty: TypeId,
        condition: NodeId,
        assume_true: bool,
    ) -> TypeId {
        let tree = self.tree(file);
        let condition = skip_parentheses(tree, condition);
        match (tree.kind(condition), self.data(file, condition)) {
            (
                SyntaxKind::Identifier
                | SyntaxKind::ThisKeyword
                | SyntaxKind::PropertyAccessExpression
                | SyntaxKind::ElementAccessExpression
                | SyntaxKind::NonNullExpression,
                _,
            ) => {
                if self.is_same_reference(file, condition, key) {
                    return self.narrow_by_truthiness(ty, assume_true);
                }
                if let Some(property) = self.discriminant_of(file, condition, key) {
                    return self.narrow_by_discriminant(ty, property, |c, t| c.narrow_by_truthiness(t, assume_true));
                }
                ty
            }
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::Unary {
                    operator: SyntaxKind::ExclamationToken,
                    operand,
                },
            ) => self.narrow_type(file, key, ty, *operand, !assume_true),
            (SyntaxKind::BinaryExpression, NodeData::Binary { left, operator, right }) => {
                self.narrow_by_binary(file, key, ty, *left, *operator, *right, assume_true)
            }
            (SyntaxKind::CallExpression, _) => self.narrow_by_call(file, key, ty, condition, assume_true),
            _ => ty,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn narrow_by_binary(
        &mut self,
        file: FileId,
        key: &ReferenceKey,
        ty: TypeId,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
        assume_true: bool,
    ) -> TypeId {
        match operator {
            SyntaxKind::AmpersandAmpersandToken => {
                if assume_true {
                    let narrowed = self.narrow_type(file, key, ty, left, true);
                    self.narrow_type(file, key, narrowed, right, true)
                } else {
                    let left_false = self.narrow_type(file, key, ty, left, false);
                    let left_true = self.narrow_type(file, key, ty, left, true);
                    let right_false = self.narrow_type(file, key, left_true, right, false);
                    self.types().union(&[left_false, right_false])
                }
            }
            SyntaxKind::BarBarToken => {
                if assume_true {
                    let left_true = self.narrow_type(file, key, ty, left, true);
                    let left_false = self.narrow_type(file, key, ty, left, false);
                    let right_true = self.narrow_type(file, key, left_false, right, true);
                    self.types().union(&[left_true, right_true])
                } else {
                    let narrowed = self.narrow_type(file, key, ty, left, false);
                    self.narrow_type(file, key, narrowed, right, false)
                }
            }
            SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken
            | SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken => {
                self.narrow_by_equality(file, key, ty, left, operator, right, assume_true)
            }
            SyntaxKind::InstanceOfKeyword => {
                if !self.is_same_reference(file, left, key) {
                    return ty;
                }
                let constructor = self.check_expression(file, right);
                self.narrow_by_instanceof(ty, constructor, assume_true)
            }
            SyntaxKind::InKeyword => {
                if !self.is_same_reference(file, right, key) {
                    return ty;
                }
                match self.data(file, skip_parentheses(self.tree(file), left)) {
                    NodeData::StringLiteral { value } => self.narrow_by_in(ty, *value, assume_true),
                    _ => ty,
                }
            }
            SyntaxKind::EqualsToken => {
                if self.is_same_reference(file, left, key) {
                    self.narrow_by_truthiness(ty, assume_true)
                } else {
                    ty
                }
            }
            SyntaxKind::CommaToken => self.narrow_type(file, key, ty, right, assume_true),
            _ => ty,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn narrow_by_equality(
        &mut self,
        file: FileId,
        key: &ReferenceKey,
        ty: TypeId,
        left: NodeId,
        operator: SyntaxKind,
        right: NodeId,
        assume_true: bool,
    ) -> TypeId {
        let equal = matches!(
            operator,
            SyntaxKind::EqualsEqualsEqualsToken | SyntaxKind::EqualsEqualsToken
        );
        let assume_equal = equal == assume_true;
        let strict = matches!(
            operator,
            SyntaxKind::EqualsEqualsEqualsToken | SyntaxKind::ExclamationEqualsEqualsToken
        );
        let tree = self.tree(file);
        let (left, right) = (skip_parentheses(tree, left), skip_parentheses(tree, right));

        for (typeof_side, literal_side) in [(left, right), (right, left)] {
            if let (NodeData::Expr { expression }, NodeData::StringLiteral { value }) =
                (self.data(file, typeof_side), self.data(file, literal_side))
            {
                if tree.kind(typeof_side) == SyntaxKind::TypeOfExpression && self.is_same_reference(file, *expression, key)
                {
                    return match TypeOfTag::parse(self.text(*value)) {
                        Some(tag) => self.narrow_by_typeof(ty, tag, assume_equal),
                        None if assume_equal => TypeId::NEVER,
                        None => ty,
                    };
                }
            }
        }

        for (reference, value) in [(left, right), (right, left)] {
            if self.is_same_reference(file, reference, key) {
                let value_type = self.check_expression(file, value);
                return self.narrow_by_value(ty, value_type, assume_equal, strict);
            }
            if let Some(property) = self.discriminant_of(file, reference, key) {
                let value_type = self.check_expression(file, value);
                return self.narrow_by_discriminant(ty, property, |c, t| {
                    c.narrow_by_value(t, value_type, assume_equal, strict)
                });
            }
        }
        ty
    }

    fn narrow_by_call(&mut self, file: FileId, key: &ReferenceKey, ty: TypeId, call: NodeId, assume_true: bool) -> TypeId {
        let Some(signature) = self.resolved_signature(file, call) else {
            return ty;
        };
        let Some(predicate) = self.session.signature(signature).type_predicate else {
            return ty;
        };
        let (false, Some(predicate_type)) = (predicate.asserts, predicate.ty) else {
            return ty;
        };
        let NodeData::Call {
            expression, arguments, ..
        } = self.data(file, call)
        else {
            return ty;
        };
        let subject = match predicate.target {
            PredicateTarget::Parameter(index) => arguments.get(index as usize).copied(),
            PredicateTarget::This => match self.data(file, skip_parentheses(self.tree(file), *expression)) {
                NodeData::Access { expression, .. } => Some(*expression),
                _ => None,
            },
        };
        match subject {
            Some(subject) if self.is_same_reference(file, subject, key) => {
                self.narrow_to_predicate_type(ty, predicate_type, assume_true)
            }
            _ => ty,
        }
    }

    // ========================================================================
    // Narrowing rules
    // ========================================================================

    pub(crate) fn narrow_by_truthiness(&mut self, ty: TypeId, assume_true: bool) -> TypeId {
        if assume_true {
            let narrowed = self.filter_type(ty, |c, t| c.can_be_truthy(t));
            if narrowed == TypeId::UNKNOWN {
                return TypeId::UNKNOWN;
            }
            narrowed
        } else {
            self.map_type(ty, |c, t| c.falsy_part(t))
        }
    }

    fn can_be_truthy(&self, ty: TypeId) -> bool {
        let types = self.types();
        let flags = types.flags(ty);
        if flags.intersects(TypeFlags::NULLABLE | TypeFlags::VOID | TypeFlags::NEVER) {
            return false;
        }
        if ty == TypeId::FALSE {
            return false;
        }
        match &types.get(ty).key {
            TypeKey::StringLiteral(value) => !self.text(*value).is_empty(),
            TypeKey::NumberLiteral(value) => value.0 != 0.0 && !value.0.is_nan(),
            TypeKey::BigIntLiteral(text) => !matches!(self.text(*text), "0n" | "0"),
            TypeKey::EnumLiteral { literal, .. } => self.can_be_truthy(*literal),
            _ => true,
        }
    }

    /// The falsy values of a type, or the type itself when its falsy values
    /// have no literal form.
    fn falsy_part(&mut self, ty: TypeId) -> TypeId {
        let flags = self.types().flags(ty);
        if flags.intersects(TypeFlags::ANY_OR_UNKNOWN | TypeFlags::TYPE_PARAMETER | TypeFlags::INSTANTIABLE) {
            return ty;
        }
        if flags.intersects(TypeFlags::NULLABLE | TypeFlags::VOID) || ty == TypeId::FALSE {
            return ty;
        }
        if flags.contains(TypeFlags::STRING) {
            return self.types().literal_string(self.intern(""));
        }
        if flags.contains(TypeFlags::NUMBER) {
            return self.types().literal_number(0.0);
        }
        if flags.contains(TypeFlags::BIGINT) {
            return self.types().literal_bigint(self.intern("0n"));
        }
        if flags.intersects(TypeFlags::LITERAL | TypeFlags::ENUM_LITERAL) {
            return if self.can_be_truthy(ty) { TypeId::NEVER } else { ty };
        }
        TypeId::NEVER
    }

    /// Narrowing of `ty` by `ty === value` (or `==` when not `strict`).
    fn narrow_by_value(&mut self, ty: TypeId, value: TypeId, assume_equal: bool, strict: bool) -> TypeId {
        let value_flags = self.types().flags(value);
        if value_flags.contains(TypeFlags::ANY) {
            return ty;
        }
        let loose_nullable = !strict && value_flags.intersects(TypeFlags::NULLABLE);
        if assume_equal {
            if loose_nullable {
                if self.types().is(ty, TypeFlags::ANY_OR_UNKNOWN) {
                    return self.types().union(&[TypeId::NULL, TypeId::UNDEFINED]);
                }
                return self.filter_type(ty, |c, t| c.types().is(t, TypeFlags::NULLABLE));
            }
            if self.types().is(ty, TypeFlags::UNKNOWN) && value_flags.intersects(TypeFlags::UNIT) {
                return value;
            }
            if self.types().is(ty, TypeFlags::ANY) {
                return ty;
            }
            let is_unit = value_flags.intersects(TypeFlags::UNIT) && !value_flags.contains(TypeFlags::UNION);
            self.map_type(ty, |c, t| {
                if is_unit {
                    if t == value {
                        return t;
                    }
                    if c.types().is(t, TypeFlags::UNIT) {
                        return TypeId::NEVER;
                    }
                    if c.is_type_assignable_to(value, t) {
                        return value;
                    }
                    return TypeId::NEVER;
                }
                if c.is_type_comparable_to(t, value) || c.is_type_comparable_to(value, t) {
                    t
                } else {
                    TypeId::NEVER
                }
            })
        } else {
            if loose_nullable {
                return self.filter_type(ty, |c, t| !c.types().is(t, TypeFlags::NULLABLE));
            }
            let is_unit = value_flags.intersects(TypeFlags::UNIT) && !value_flags.contains(TypeFlags::UNION);
            if !is_unit {
                return ty;
            }
            self.filter_type(ty, |_, t| t != value)
        }
    }

    fn narrow_by_typeof(&mut self, ty: TypeId, tag: TypeOfTag, assume_true: bool) -> TypeId {
        let flags = self.types().flags(ty);
        if assume_true {
            if flags.contains(TypeFlags::UNKNOWN) {
                return match tag {
                    TypeOfTag::Object => self.types().union(&[TypeId::OBJECT, TypeId::NULL]),
                    TypeOfTag::Function => self.global_function_type(),
                    _ => tag.implied_type(),
                };
            }
            if flags.contains(TypeFlags::ANY) {
                return if tag.is_primitive() { tag.implied_type() } else { ty };
            }
            self.map_type(ty, |c, t| {
                if c.typeof_matches(t, tag) {
                    return t;
                }
                if tag.is_primitive() && c.types().is(t, TypeFlags::INSTANTIABLE) {
                    return c.types().intersection(&[t, tag.implied_type()]).unwrap_or(TypeId::NEVER);
                }
                TypeId::NEVER
            })
        } else {
            if flags.intersects(TypeFlags::ANY_OR_UNKNOWN) {
                return ty;
            }
            self.filter_type(ty, |c, t| !c.typeof_matches(t, tag))
        }
    }

    fn typeof_matches(&mut self, ty: TypeId, tag: TypeOfTag) -> bool {
        let flags = self.types().flags(ty);
        match tag {
            TypeOfTag::String => flags.intersects(TypeFlags::STRING_LIKE),
            TypeOfTag::Number => flags.intersects(TypeFlags::NUMBER_LIKE) && !flags.intersects(TypeFlags::STRING_LIKE),
            TypeOfTag::BigInt => flags.intersects(TypeFlags::BIGINT_LIKE),
            TypeOfTag::Boolean => flags.intersects(TypeFlags::BOOLEAN_LIKE),
            TypeOfTag::Symbol => flags.intersects(TypeFlags::ES_SYMBOL),
            TypeOfTag::Undefined => flags.intersects(TypeFlags::UNDEFINED | TypeFlags::VOID),
            TypeOfTag::Object => {
                flags.intersects(TypeFlags::NULL | TypeFlags::NON_PRIMITIVE)
                    || (flags.intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION)
                        && self.signatures_of_type(ty, SignatureKind::Call).is_empty())
            }
            TypeOfTag::Function => {
                flags.intersects(TypeFlags::OBJECT | TypeFlags::INTERSECTION)
                    && !self.signatures_of_type(ty, SignatureKind::Call).is_empty()
            }
        }
    }

    /// Keep the constituents of `ty` whose `property` survives `narrow`.
    fn narrow_by_discriminant(
        &mut self,
        ty: TypeId,
        property: InternedString,
        mut narrow: impl FnMut(&mut Self, TypeId) -> TypeId,
    ) -> TypeId {
        if !self.types().is(ty, TypeFlags::UNION) {
            return ty;
        }
        self.filter_type(ty, |c, t| match c.property_of_type(t, property) {
            Some(info) => {
                let property_type = c.type_of_property(&info);
                narrow(c, property_type) != TypeId::NEVER
            }
            None => true,
        })
    }

    fn narrow_by_instanceof(&mut self, ty: TypeId, constructor: TypeId, assume_true: bool) -> TypeId {
        let signatures = self.signatures_of_type(constructor, SignatureKind::Construct);
        let candidate = match signatures.first() {
            Some(&signature) => self.return_type_of_signature(signature),
            None => {
                let prototype = self.intern("prototype");
                match self.property_of_type(constructor, prototype) {
                    Some(info) => self.type_of_property(&info),
                    None => return ty,
                }
            }
        };
        if self.types().is(candidate, TypeFlags::ANY) {
            return ty;
        }
        self.narrow_to_predicate_type(ty, candidate, assume_true)
    }

    /// Narrowing by a user type guard, `instanceof` or an assertion.
    pub(crate) fn narrow_to_predicate_type(&mut self, ty: TypeId, candidate: TypeId, assume_true: bool) -> TypeId {
        if !assume_true {
            if self.types().is(ty, TypeFlags::ANY_OR_UNKNOWN) {
                return ty;
            }
            return self.filter_type(ty, |c, t| !c.is_type_assignable_to(t, candidate));
        }
        if self.types().is(ty, TypeFlags::ANY_OR_UNKNOWN) {
            return candidate;
        }
        let narrowed = self.map_type(ty, |c, t| {
            if c.is_type_assignable_to(t, candidate) {
                t
            } else if c.is_type_assignable_to(candidate, t) {
                candidate
            } else {
                TypeId::NEVER
            }
        });
        if narrowed != TypeId::NEVER {
            return narrowed;
        }
        if self.types().is(ty, TypeFlags::OBJECT | TypeFlags::INSTANTIABLE) {
            return self.types().intersection(&[ty, candidate]).unwrap_or(candidate);
        }
        TypeId::NEVER
    }

    fn narrow_by_in(&mut self, ty: TypeId, name: InternedString, assume_true: bool) -> TypeId {
        if !self.types().is(ty, TypeFlags::UNION) {
            return ty;
        }
        self.filter_type(ty, |c, t| {
            if !c.types().is(t, TypeFlags::OBJECT | TypeFlags::INTERSECTION) {
                return true;
            }
            match c.property_of_type(t, name) {
                Some(info) => assume_true || info.is_optional(),
                None => !assume_true || c.applicable_index_info(t, name).is_some(),
            }
        })
    }

    // ========================================================================
    // Switch statements
    // ========================================================================

    /// The type of `key` inside clauses `[start, end)` of `switch`, or in the
    /// implicit default when the range is empty at 0.
    pub(crate) fn narrow_by_switch(
        &mut self,
        file: FileId,
        key: &ReferenceKey,
        ty: TypeId,
        switch: NodeId,
        start: usize,
        end: usize,
    ) -> TypeId {
        let NodeData::Switch { expression, case_block } = self.data(file, switch) else {
            return ty;
        };
        let tree = self.tree(file);
        let expression = skip_parentheses(tree, *expression);
        let clauses: Vec<NodeId> = tree.list(*case_block).to_vec();
        let implicit_default = start == 0 && end == 0;
        let in_range = if implicit_default { &[][..] } else { &clauses[start.min(clauses.len())..end.min(clauses.len())] };
        let has_default = implicit_default || in_range.iter().any(|&c| tree.kind(c) == SyntaxKind::DefaultClause);

        let case_values = |checker: &mut Self, range: &[NodeId]| -> Vec<NodeId> {
            range
                .iter()
                .filter_map(|&clause| match checker.data(file, clause) {
                    NodeData::CaseClause {
                        expression: Some(value),
                        ..
                    } => Some(*value),
                    _ => None,
                })
                .collect()
        };
        let in_range_values = case_values(self, in_range);
        let all_values = case_values(self, &clauses);

        // switch (typeof x)
        if let (SyntaxKind::TypeOfExpression, NodeData::Expr { expression: operand }) =
            (tree.kind(expression), self.data(file, expression))
        {
            if !self.is_same_reference(file, *operand, key) {
                return ty;
            }
            let tags = |checker: &Self, values: &[NodeId]| -> Vec<Option<TypeOfTag>> {
                values
                    .iter()
                    .map(|&v| match checker.data(file, v) {
                        NodeData::StringLiteral { value } => TypeOfTag::parse(checker.text(*value)),
                        _ => None,
                    })
                    .collect()
            };
            let mut parts: Vec<TypeId> = tags(self, &in_range_values)
                .into_iter()
                .flatten()
                .map(|tag| self.narrow_by_typeof(ty, tag, true))
                .collect();
            if has_default {
                let mut rest = ty;
                for tag in tags(self, &all_values).into_iter().flatten() {
                    rest = self.narrow_by_typeof(rest, tag, false);
                }
                parts.push(rest);
            }
            return self.types().union(&parts);
        }

        let direct = self.is_same_reference(file, expression, key);
        let property = if direct { None } else { self.discriminant_of(file, expression, key) };
        if !direct && property.is_none() {
            return ty;
        }
        let narrow_values = |checker: &mut Self, t: TypeId| -> TypeId {
            let mut parts: Vec<TypeId> = Vec::new();
            for &value in &in_range_values {
                let value_type = checker.check_expression(file, value);
                parts.push(checker.narrow_by_value(t, value_type, true, true));
            }
            if has_default {
                let mut rest = t;
                for &value in &all_values {
                    let value_type = checker.check_expression(file, value);
                    rest = checker.narrow_by_value(rest, value_type, false, true);
                }
                parts.push(rest);
            }
            checker.types().union(&parts)
        };
        match property {
            None => narrow_values(self, ty),
            Some(property) => self.narrow_by_discriminant(ty, property, narrow_values),
        }
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;

    /// Helper: the displayed type of the last occurrence of `name` in `source`.
    fn type_of_last(source: &str, name: &str) -> String {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let offset = source.rfind(name).unwrap() as u32;
        let node = checker.tree(file).node_at_offset(offset).unwrap();
        let ty = checker.get_type_at_location(file, node);
        checker.type_to_string(ty)
    }

    #[test]
    fn test_typeof_narrows_union() {
        let source = "declare const v: string | number;\nif (typeof v === 'string') { v; }";
        assert_eq!(type_of_last(source, "v;"), "string");
    }

    #[test]
    fn test_typeof_else_branch() {
        let source = "declare const v: string | number;\nif (typeof v === 'string') { } else { v; }";
        assert_eq!(type_of_last(source, "v;"), "number");
    }

    #[test]
    fn test_truthiness_removes_nullish() {
        let source = "declare const v: string | null | undefined;\nif (v) { v; }";
        assert_eq!(type_of_last(source, "v;"), "string");
    }

    #[test]
    fn test_discriminant_narrowing() {
        let source = "type A = { kind: 'a'; a: number };\ntype B = { kind: 'b'; b: string };\ndeclare const u: A | B;\nif (u.kind === 'a') { u; }";
        assert_eq!(type_of_last(source, "u;"), "A");
    }

    #[test]
    fn test_switch_default_removes_handled_cases() {
        let source = "declare const v: 'a' | 'b' | 'c';\nswitch (v) { case 'a': break; default: v; }";
        assert_eq!(type_of_last(source, "v;"), "\"b\" | \"c\"");
    }

    #[test]
    fn test_loose_null_check_removes_both() {
        let source = "declare const v: number | null | undefined;\nif (v != null) { v; }";
        assert_eq!(type_of_last(source, "v;"), "number");
    }
}
