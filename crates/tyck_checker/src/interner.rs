//! The type factory: every type is created here and interned by its
//! [`TypeKey`], so structurally identical types share one id.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;
use tracing::warn;
use tyck_ast::types::SymbolId;
use tyck_core::intern::InternedString;

use crate::error::CheckerError;
use crate::types::{
    ElementFlags, IntrinsicKind, LiteralProperty, Number, ObjectFlags, ObjectKey, Type, TypeFlags, TypeId, TypeKey,
    TypeParamKey,
};

/// Upper bound on the members produced by distributing an intersection
/// over unions.
pub const MAX_INTERSECTION_SIZE: usize = 100_000;

/// Distributing an intersection over its unions would exceed
/// [`MAX_INTERSECTION_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionTooComplex;

type Scratch = SmallVec<[TypeId; 8]>;

/// Concurrent, append-only type arena.
#[derive(Debug)]
pub struct TypeInterner {
    types: RwLock<Vec<Arc<Type>>>,
    index: DashMap<TypeKey, TypeId, FxBuildHasher>,
    limit: u32,
    overflowed: AtomicBool,
    array_target: OnceLock<TypeId>,
    readonly_array_target: OnceLock<TypeId>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        Self::with_limit(u32::MAX - 1)
    }

    /// An interner that refuses to hold more than `limit` types.
    pub fn with_limit(limit: u32) -> Self {
        let interner = Self {
            types: RwLock::new(Vec::with_capacity(1024)),
            index: DashMap::with_hasher(FxBuildHasher),
            limit: limit.max(TypeId::FIRST_DYNAMIC),
            overflowed: AtomicBool::new(false),
            array_target: OnceLock::new(),
            readonly_array_target: OnceLock::new(),
        };
        interner.preallocate();
        interner
    }

    fn preallocate(&self) {
        use IntrinsicKind::*;
        for kind in [Any, Unknown, Error, Never, Void, Undefined, Null, String, Number, BigInt, Symbol, Object] {
            self.insert(TypeKey::Intrinsic(kind), kind.flags(), ObjectFlags::empty(), None, None);
        }
        self.insert(
            TypeKey::BooleanLiteral(false),
            TypeFlags::BOOLEAN_LITERAL,
            ObjectFlags::empty(),
            None,
            None,
        );
        self.insert(TypeKey::BooleanLiteral(true), TypeFlags::BOOLEAN_LITERAL, ObjectFlags::empty(), None, None);
        self.insert(
            TypeKey::Union(Box::new([TypeId::FALSE, TypeId::TRUE])),
            TypeFlags::UNION | TypeFlags::BOOLEAN,
            ObjectFlags::empty(),
            None,
            None,
        );
        self.insert(
            TypeKey::Object(ObjectKey::Literal {
                properties: Box::new([]),
                fresh: false,
            }),
            TypeFlags::OBJECT,
            ObjectFlags::ANONYMOUS | ObjectFlags::OBJECT_LITERAL,
            None,
            None,
        );
        for marker in 0..3 {
            self.insert(
                TypeKey::TypeParameter(TypeParamKey::Marker(marker)),
                TypeFlags::TYPE_PARAMETER,
                ObjectFlags::empty(),
                None,
                None,
            );
        }
        debug_assert_eq!(self.len() as u32, TypeId::FIRST_DYNAMIC);
    }

    /// Number of types created so far.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an allocation was refused because the id space ran out.
    pub fn overflowed(&self) -> bool {
        self.overflowed.load(Ordering::Relaxed)
    }

    /// The type with id `id`, or the error type for an id this interner
    /// never produced.
    pub fn get(&self, id: TypeId) -> Arc<Type> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        match types.get(id.index()) {
            Some(ty) => Arc::clone(ty),
            None => Arc::clone(&types[TypeId::ERROR.index()]),
        }
    }

    pub fn try_get(&self, id: TypeId) -> Result<Arc<Type>, CheckerError> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).cloned().ok_or(CheckerError::UnknownType(id))
    }

    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).map_or(TypeFlags::ANY | TypeFlags::ERROR, |t| t.flags)
    }

    #[inline]
    pub fn object_flags(&self, id: TypeId) -> ObjectFlags {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).map_or(ObjectFlags::empty(), |t| t.object_flags)
    }

    #[inline]
    pub fn is(&self, id: TypeId, flags: TypeFlags) -> bool {
        self.flags(id).intersects(flags)
    }

    /// Look a key up without creating it.
    pub fn lookup(&self, key: &TypeKey) -> Option<TypeId> {
        self.index.get(key).map(|id| *id)
    }

    fn insert(
        &self,
        key: TypeKey,
        flags: TypeFlags,
        object_flags: ObjectFlags,
        symbol: Option<SymbolId>,
        origin: Option<Box<[TypeId]>>,
    ) -> TypeId {
        if let Some(id) = self.lookup(&key) {
            return id;
        }
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won while we waited for the lock.
        if let Some(id) = self.lookup(&key) {
            return id;
        }
        if types.len() as u64 >= self.limit as u64 {
            if !self.overflowed.swap(true, Ordering::Relaxed) {
                warn!(limit = self.limit, "type interner is full");
            }
            return TypeId::ERROR;
        }
        let id = TypeId(types.len() as u32);
        types.push(Arc::new(Type {
            id,
            flags,
            object_flags,
            key: key.clone(),
            origin,
            symbol,
        }));
        self.index.insert(key, id);
        id
    }

    // ========================================================================
    // GetOrCreate
    // ========================================================================

    /// The canonical type for `key`. Union and intersection keys are
    /// normalised first, so differently ordered shapes meet.
    pub fn get_or_create(&self, key: TypeKey) -> TypeId {
        self.get_or_create_with_symbol(key, None)
    }

    /// As [`get_or_create`](Self::get_or_create), recording `symbol` on a
    /// newly created type.
    pub fn get_or_create_with_symbol(&self, key: TypeKey, symbol: Option<SymbolId>) -> TypeId {
        match key {
            TypeKey::Union(types) => self.union(&types),
            TypeKey::Intersection(types) => self.intersection(&types).unwrap_or(TypeId::ERROR),
            TypeKey::Intrinsic(kind) => self.intrinsic(kind),
            TypeKey::BooleanLiteral(value) => self.boolean_literal(value),
            key => {
                let (flags, object_flags) = self.flags_of_key(&key);
                let symbol = symbol.or_else(|| self.symbol_of_key(&key));
                self.insert(key, flags, object_flags, symbol, None)
            }
        }
    }

    fn flags_of_key(&self, key: &TypeKey) -> (TypeFlags, ObjectFlags) {
        let none = ObjectFlags::empty();
        match key {
            TypeKey::Intrinsic(kind) => (kind.flags(), none),
            TypeKey::StringLiteral(_) => (TypeFlags::STRING_LITERAL, none),
            TypeKey::NumberLiteral(_) => (TypeFlags::NUMBER_LITERAL, none),
            TypeKey::BigIntLiteral(_) => (TypeFlags::BIGINT_LITERAL, none),
            TypeKey::BooleanLiteral(_) => (TypeFlags::BOOLEAN_LITERAL, none),
            TypeKey::EnumLiteral { literal, .. } => (TypeFlags::ENUM_LITERAL | self.flags(*literal), none),
            TypeKey::TypeParameter(_) => (TypeFlags::TYPE_PARAMETER, none),
            TypeKey::Union(_) => (TypeFlags::UNION, none),
            TypeKey::Intersection(_) => (TypeFlags::INTERSECTION, none),
            TypeKey::Index(_) => (TypeFlags::INDEX, none),
            TypeKey::IndexedAccess { .. } => (TypeFlags::INDEXED_ACCESS, none),
            TypeKey::Conditional { .. } => (TypeFlags::CONDITIONAL, none),
            TypeKey::Substitution { .. } => (TypeFlags::SUBSTITUTION, none),
            TypeKey::Object(object) => {
                let object_flags = match object {
                    ObjectKey::Declared(_) => ObjectFlags::INTERFACE,
                    ObjectKey::Reference { target, .. } => {
                        let mut flags = ObjectFlags::REFERENCE | ObjectFlags::INSTANTIATED;
                        if self.is_array_target(*target) {
                            flags |= ObjectFlags::ARRAY;
                        }
                        flags
                    }
                    ObjectKey::Tuple { .. } => ObjectFlags::TUPLE | ObjectFlags::REFERENCE,
                    ObjectKey::Anonymous { args, .. } => {
                        if args.is_empty() {
                            ObjectFlags::ANONYMOUS
                        } else {
                            ObjectFlags::ANONYMOUS | ObjectFlags::INSTANTIATED
                        }
                    }
                    ObjectKey::Mapped { .. } => ObjectFlags::MAPPED,
                    ObjectKey::Function { .. } => ObjectFlags::ANONYMOUS,
                    ObjectKey::Literal { properties, fresh } => {
                        let mut flags = ObjectFlags::ANONYMOUS | ObjectFlags::OBJECT_LITERAL;
                        if *fresh {
                            flags |= ObjectFlags::FRESH_LITERAL;
                        }
                        if properties
                            .iter()
                            .any(|p| self.flags(p.ty).intersects(TypeFlags::NULLABLE)
                                || self.object_flags(p.ty).contains(ObjectFlags::CONTAINS_WIDENING))
                        {
                            flags |= ObjectFlags::CONTAINS_WIDENING;
                        }
                        flags
                    }
                };
                (TypeFlags::OBJECT, object_flags)
            }
        }
    }

    fn symbol_of_key(&self, key: &TypeKey) -> Option<SymbolId> {
        match key {
            TypeKey::Object(ObjectKey::Declared(symbol)) => Some(*symbol),
            TypeKey::Object(ObjectKey::Anonymous {
                decl: crate::types::DeclRef::Symbol(symbol),
                ..
            }) => Some(*symbol),
            TypeKey::Object(ObjectKey::Reference { target, .. }) => self.get(*target).symbol,
            TypeKey::EnumLiteral { member, .. } => Some(*member),
            _ => None,
        }
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        match kind {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Unknown => TypeId::UNKNOWN,
            IntrinsicKind::Error => TypeId::ERROR,
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::Void => TypeId::VOID,
            IntrinsicKind::Undefined => TypeId::UNDEFINED,
            IntrinsicKind::Null => TypeId::NULL,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Number => TypeId::NUMBER,
            IntrinsicKind::BigInt => TypeId::BIGINT,
            IntrinsicKind::Symbol => TypeId::SYMBOL,
            IntrinsicKind::Object => TypeId::OBJECT,
        }
    }

    pub fn literal_string(&self, value: InternedString) -> TypeId {
        self.insert(
            TypeKey::StringLiteral(value),
            TypeFlags::STRING_LITERAL,
            ObjectFlags::empty(),
            None,
            None,
        )
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.insert(
            TypeKey::NumberLiteral(Number(value)),
            TypeFlags::NUMBER_LITERAL,
            ObjectFlags::empty(),
            None,
            None,
        )
    }

    pub fn literal_bigint(&self, text: InternedString) -> TypeId {
        self.insert(
            TypeKey::BigIntLiteral(text),
            TypeFlags::BIGINT_LITERAL,
            ObjectFlags::empty(),
            None,
            None,
        )
    }

    #[inline]
    pub fn boolean_literal(&self, value: bool) -> TypeId {
        if value {
            TypeId::TRUE
        } else {
            TypeId::FALSE
        }
    }

    pub fn enum_literal(&self, enum_symbol: SymbolId, member: SymbolId, literal: TypeId) -> TypeId {
        self.get_or_create(TypeKey::EnumLiteral {
            enum_symbol,
            member,
            literal,
        })
    }

    pub fn type_parameter(&self, key: TypeParamKey, symbol: Option<SymbolId>) -> TypeId {
        self.get_or_create_with_symbol(TypeKey::TypeParameter(key), symbol)
    }

    /// The type of a generic or plain interface or class.
    pub fn declared_object(&self, symbol: SymbolId, is_class: bool) -> TypeId {
        let key = TypeKey::Object(ObjectKey::Declared(symbol));
        let flags = if is_class { ObjectFlags::CLASS } else { ObjectFlags::INTERFACE };
        self.insert(key, TypeFlags::OBJECT, flags, Some(symbol), None)
    }

    /// An instantiation of a generic interface or class.
    pub fn reference(&self, target: TypeId, args: impl Into<Box<[TypeId]>>) -> TypeId {
        self.get_or_create(TypeKey::Object(ObjectKey::Reference {
            target,
            args: args.into(),
        }))
    }

    pub fn tuple(&self, elements: Vec<TypeId>, flags: Vec<ElementFlags>, readonly: bool) -> TypeId {
        debug_assert_eq!(elements.len(), flags.len());
        self.get_or_create(TypeKey::Object(ObjectKey::Tuple {
            elements: elements.into(),
            flags: flags.into(),
            readonly,
        }))
    }

    /// Register the generic targets of `Array<T>` and `ReadonlyArray<T>`.
    pub fn set_array_targets(&self, array: TypeId, readonly_array: TypeId) {
        let _ = self.array_target.set(array);
        let _ = self.readonly_array_target.set(readonly_array);
    }

    pub fn array_target(&self) -> Option<TypeId> {
        self.array_target.get().copied()
    }

    pub fn readonly_array_target(&self) -> Option<TypeId> {
        self.readonly_array_target.get().copied()
    }

    pub fn is_array_target(&self, target: TypeId) -> bool {
        self.array_target() == Some(target) || self.readonly_array_target() == Some(target)
    }

    /// `T[]`, or the error type before the array target is known.
    pub fn array(&self, element: TypeId) -> TypeId {
        match self.array_target() {
            Some(target) => self.reference(target, vec![element]),
            None => TypeId::ERROR,
        }
    }

    pub fn readonly_array(&self, element: TypeId) -> TypeId {
        match self.readonly_array_target() {
            Some(target) => self.reference(target, vec![element]),
            None => TypeId::ERROR,
        }
    }

    /// The element type of `T[]` or `readonly T[]`.
    pub fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        let ty = self.get(ty);
        match &ty.key {
            TypeKey::Object(ObjectKey::Reference { target, args }) if self.is_array_target(*target) => {
                args.first().copied()
            }
            _ => None,
        }
    }

    pub fn object_literal(&self, properties: Vec<LiteralProperty>, fresh: bool) -> TypeId {
        self.get_or_create(TypeKey::Object(ObjectKey::Literal {
            properties: properties.into(),
            fresh,
        }))
    }

    /// The non-fresh twin of a fresh object literal type, with nested
    /// literals made regular as well.
    pub fn regular_type_of(&self, id: TypeId) -> TypeId {
        let ty = self.get(id);
        match &ty.key {
            TypeKey::Object(ObjectKey::Literal { properties, fresh }) => {
                let mut changed = *fresh;
                let properties: Vec<LiteralProperty> = properties
                    .iter()
                    .map(|p| {
                        let regular = self.regular_type_of(p.ty);
                        changed |= regular != p.ty;
                        LiteralProperty { ty: regular, ..*p }
                    })
                    .collect();
                if changed {
                    self.object_literal(properties, false)
                } else {
                    id
                }
            }
            TypeKey::Union(types) if ty.object_flags.is_empty() => {
                let regular: Scratch = types.iter().map(|&t| self.regular_type_of(t)).collect();
                if regular.iter().eq(types.iter()) {
                    id
                } else {
                    self.union(&regular)
                }
            }
            _ => id,
        }
    }

    pub fn is_fresh_literal(&self, id: TypeId) -> bool {
        self.object_flags(id).contains(ObjectFlags::FRESH_LITERAL)
    }

    // ========================================================================
    // Unions
    // ========================================================================

    /// The union of `types`: flattened, `never` removed, duplicates and
    /// literals subsumed by their primitive dropped. Unions are keyed by
    /// their sorted members; the first call that builds a given union fixes
    /// the order it displays in.
    pub fn union(&self, types: &[TypeId]) -> TypeId {
        let mut flat: Scratch = SmallVec::new();
        let mut seen = FxHashSet::default();
        let mut includes = TypeFlags::empty();
        self.flatten_union(types, &mut flat, &mut seen, &mut includes);

        if includes.contains(TypeFlags::ANY) {
            return if flat.contains(&TypeId::ANY) { TypeId::ANY } else { TypeId::ERROR };
        }
        if includes.contains(TypeFlags::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|&mut t| {
            let flags = self.flags(t);
            let redundant = (flags.contains(TypeFlags::STRING_LITERAL) && includes.contains(TypeFlags::STRING))
                || (flags.contains(TypeFlags::NUMBER_LITERAL)
                    && !flags.contains(TypeFlags::ENUM_LITERAL)
                    && includes.contains(TypeFlags::NUMBER))
                || (flags.contains(TypeFlags::BIGINT_LITERAL) && includes.contains(TypeFlags::BIGINT))
                || (flags.contains(TypeFlags::UNDEFINED) && includes.contains(TypeFlags::VOID));
            !redundant
        });
        match flat.len() {
            0 => return TypeId::NEVER,
            1 => return flat[0],
            _ => {}
        }
        let mut sorted: Vec<TypeId> = flat.to_vec();
        sorted.sort_unstable();
        let origin = if sorted[..] != flat[..] { Some(flat.to_vec().into_boxed_slice()) } else { None };
        let key = TypeKey::Union(sorted.into_boxed_slice());
        self.insert(key, TypeFlags::UNION, ObjectFlags::empty(), None, origin)
    }

    fn flatten_union(&self, types: &[TypeId], out: &mut Scratch, seen: &mut FxHashSet<TypeId>, includes: &mut TypeFlags) {
        for &t in types {
            let ty = self.get(t);
            if ty.flags.contains(TypeFlags::UNION) {
                self.flatten_union(ty.display_constituents(), out, seen, includes);
                continue;
            }
            if ty.flags.contains(TypeFlags::NEVER) {
                continue;
            }
            *includes |= ty.flags;
            if seen.insert(t) {
                out.push(t);
            }
        }
    }

    // ========================================================================
    // Intersections
    // ========================================================================

    /// The intersection of `types`, distributed over unions.
    pub fn intersection(&self, types: &[TypeId]) -> Result<TypeId, IntersectionTooComplex> {
        let mut flat: Scratch = SmallVec::new();
        let mut seen = FxHashSet::default();
        self.flatten_intersection(types, &mut flat, &mut seen);

        if flat.iter().any(|&t| t == TypeId::ANY) {
            return Ok(TypeId::ANY);
        }
        if flat.iter().any(|&t| self.flags(t).contains(TypeFlags::ANY)) {
            return Ok(TypeId::ERROR);
        }
        if flat.contains(&TypeId::NEVER) {
            return Ok(TypeId::NEVER);
        }
        flat.retain(|&mut t| t != TypeId::UNKNOWN);

        let unions: Vec<usize> = flat
            .iter()
            .enumerate()
            .filter(|(_, &t)| self.flags(t).contains(TypeFlags::UNION))
            .map(|(i, _)| i)
            .collect();
        if !unions.is_empty() {
            let mut size: usize = 1;
            for &i in &unions {
                size = size.saturating_mul(self.get(flat[i]).constituents().len());
                if size > MAX_INTERSECTION_SIZE {
                    return Err(IntersectionTooComplex);
                }
            }
            return self.distribute_intersection(&flat, &unions);
        }
        Ok(self.intersection_of_non_unions(flat))
    }

    fn flatten_intersection(&self, types: &[TypeId], out: &mut Scratch, seen: &mut FxHashSet<TypeId>) {
        for &t in types {
            let ty = self.get(t);
            if ty.flags.contains(TypeFlags::INTERSECTION) {
                self.flatten_intersection(ty.constituents(), out, seen);
            } else if seen.insert(t) {
                out.push(t);
            }
        }
    }

    fn distribute_intersection(&self, flat: &[TypeId], unions: &[usize]) -> Result<TypeId, IntersectionTooComplex> {
        let mut results: Vec<TypeId> = Vec::new();
        let mut choice = vec![0usize; unions.len()];
        loop {
            let members: Scratch = flat
                .iter()
                .enumerate()
                .map(|(i, &t)| match unions.iter().position(|&u| u == i) {
                    Some(k) => self.get(t).display_constituents()[choice[k]],
                    None => t,
                })
                .collect();
            results.push(self.intersection(&members)?);

            // Advance the mixed-radix counter over the union constituents.
            let mut k = 0;
            loop {
                if k == unions.len() {
                    return Ok(self.union(&results));
                }
                choice[k] += 1;
                if choice[k] < self.get(flat[unions[k]]).display_constituents().len() {
                    break;
                }
                choice[k] = 0;
                k += 1;
            }
        }
    }

    fn intersection_of_non_unions(&self, mut flat: Scratch) -> TypeId {
        let mut includes = TypeFlags::empty();
        for &t in &flat {
            includes |= self.flags(t);
        }

        // Distinct unit types, or a unit and an unrelated primitive, are disjoint.
        let units: Scratch = flat
            .iter()
            .copied()
            .filter(|&t| self.flags(t).intersects(TypeFlags::UNIT))
            .collect();
        if units.len() > 1 {
            return TypeId::NEVER;
        }
        let primitive_kinds = [
            TypeFlags::STRING_LIKE,
            TypeFlags::NUMBER_LIKE | TypeFlags::ENUM_LITERAL,
            TypeFlags::BIGINT_LIKE,
            TypeFlags::BOOLEAN_LIKE,
            TypeFlags::ES_SYMBOL,
            TypeFlags::NULLABLE | TypeFlags::VOID,
        ];
        let distinct_kinds = primitive_kinds.iter().filter(|&&kind| includes.intersects(kind)).count();
        if distinct_kinds > 1 {
            return TypeId::NEVER;
        }
        if includes.intersects(TypeFlags::NULLABLE)
            && includes.intersects(TypeFlags::OBJECT | TypeFlags::NON_PRIMITIVE)
        {
            return TypeId::NEVER;
        }
        if includes.intersects(TypeFlags::PRIMITIVE) && includes.contains(TypeFlags::NON_PRIMITIVE) {
            return TypeId::NEVER;
        }

        // A literal absorbs its primitive: `string & "a"` is `"a"`.
        if let Some(&unit) = units.first() {
            let unit_flags = self.flags(unit);
            flat.retain(|&mut t| {
                t == unit
                    || !(self.flags(t).intersects(TypeFlags::STRING | TypeFlags::NUMBER | TypeFlags::BIGINT | TypeFlags::BOOLEAN)
                        && primitive_kinds
                            .iter()
                            .any(|&kind| unit_flags.intersects(kind) && self.flags(t).intersects(kind)))
            });
        }
        if flat.len() > 1 && flat.iter().any(|&t| t != TypeId::EMPTY_OBJECT && self.flags(t).intersects(TypeFlags::OBJECT)) {
            flat.retain(|&mut t| t != TypeId::EMPTY_OBJECT);
        }
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => {
                let mut sorted: Vec<TypeId> = flat.to_vec();
                sorted.sort_unstable();
                self.insert(
                    TypeKey::Intersection(sorted.into_boxed_slice()),
                    TypeFlags::INTERSECTION,
                    ObjectFlags::empty(),
                    None,
                    None,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyck_core::intern::StringInterner;

    fn literals(interner: &TypeInterner, strings: &StringInterner, values: &[&str]) -> Vec<TypeId> {
        values.iter().map(|v| interner.literal_string(strings.intern(v))).collect()
    }

    #[test]
    fn test_intrinsics_are_preallocated() {
        let types = TypeInterner::new();
        assert_eq!(types.len() as u32, TypeId::FIRST_DYNAMIC);
        assert!(types.flags(TypeId::ERROR).contains(TypeFlags::ANY | TypeFlags::ERROR));
        assert_eq!(types.union(&[TypeId::FALSE, TypeId::TRUE]), TypeId::BOOLEAN);
        assert!(types.flags(TypeId::BOOLEAN).contains(TypeFlags::BOOLEAN | TypeFlags::UNION));
    }

    #[test]
    fn test_union_is_order_independent() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let abc = literals(&types, &strings, &["a", "b", "c"]);
        let first = types.union(&[abc[0], abc[1], abc[2]]);
        let second = types.union(&[abc[2], abc[0], abc[1], abc[0]]);
        assert_eq!(first, second);
        // The first written order is kept for display.
        assert_eq!(types.get(first).display_constituents(), &abc[..]);
    }

    #[test]
    fn test_union_flattens_and_reduces() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let a = types.literal_string(strings.intern("a"));
        let one = types.literal_number(1.0);
        let inner = types.union(&[a, one]);
        let outer = types.union(&[inner, TypeId::STRING, TypeId::NEVER]);
        let ty = types.get(outer);
        assert_eq!(ty.constituents(), &[TypeId::STRING, one]);
        assert_eq!(types.union(&[TypeId::STRING, TypeId::ANY]), TypeId::ANY);
        assert_eq!(types.union(&[TypeId::STRING, TypeId::UNKNOWN]), TypeId::UNKNOWN);
        assert_eq!(types.union(&[]), TypeId::NEVER);
        assert_eq!(types.union(&[TypeId::VOID, TypeId::UNDEFINED]), TypeId::VOID);
    }

    #[test]
    fn test_number_literal_canonical_zero() {
        let types = TypeInterner::new();
        assert_eq!(types.literal_number(0.0), types.literal_number(-0.0));
        assert_ne!(types.literal_number(1.0), types.literal_number(2.0));
    }

    #[test]
    fn test_get_or_create_normalises_union_keys() {
        let types = TypeInterner::new();
        let via_key = types.get_or_create(TypeKey::Union(Box::new([TypeId::NUMBER, TypeId::STRING])));
        assert_eq!(via_key, types.union(&[TypeId::STRING, TypeId::NUMBER]));
    }

    #[test]
    fn test_disjoint_intersections_are_never() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let ab = literals(&types, &strings, &["a", "b"]);
        assert_eq!(types.intersection(&[TypeId::STRING, TypeId::NUMBER]), Ok(TypeId::NEVER));
        assert_eq!(types.intersection(&[ab[0], ab[1]]), Ok(TypeId::NEVER));
        assert_eq!(types.intersection(&[TypeId::STRING, ab[0]]), Ok(ab[0]));
        assert_eq!(types.intersection(&[TypeId::NULL, TypeId::OBJECT]), Ok(TypeId::NEVER));
        assert_eq!(types.intersection(&[TypeId::STRING, TypeId::UNKNOWN]), Ok(TypeId::STRING));
    }

    #[test]
    fn test_intersection_distributes_over_unions() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let ab = literals(&types, &strings, &["a", "b"]);
        let union = types.union(&[ab[0], ab[1], TypeId::NUMBER]);
        assert_eq!(types.intersection(&[union, TypeId::STRING]), Ok(types.union(&ab)));
    }

    #[test]
    fn test_intersection_distribution_is_capped() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let unions: Vec<TypeId> = (0..5)
            .map(|u| {
                let names: Vec<String> = (0..11).map(|i| format!("k{}_{}", u, i)).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                types.union(&literals(&types, &strings, &refs))
            })
            .collect();
        assert_eq!(types.intersection(&unions), Err(IntersectionTooComplex));
    }

    #[test]
    fn test_fresh_literal_has_regular_twin() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let prop = LiteralProperty {
            name: strings.intern("a"),
            ty: TypeId::NUMBER,
            flags: Default::default(),
        };
        let fresh = types.object_literal(vec![prop], true);
        let regular = types.regular_type_of(fresh);
        assert_ne!(fresh, regular);
        assert!(types.is_fresh_literal(fresh));
        assert!(!types.is_fresh_literal(regular));
        assert_eq!(types.regular_type_of(regular), regular);
        assert_eq!(types.object_literal(vec![prop], false), regular);
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let types = TypeInterner::new();
        assert_eq!(types.try_get(TypeId(9_999)).err(), Some(CheckerError::UnknownType(TypeId(9_999))));
        assert_eq!(types.get(TypeId(9_999)).id, TypeId::ERROR);
    }

    #[test]
    fn test_overflow_returns_error_type() {
        let types = TypeInterner::with_limit(TypeId::FIRST_DYNAMIC + 1);
        let first = types.literal_number(1.0);
        assert_ne!(first, TypeId::ERROR);
        assert_eq!(types.literal_number(2.0), TypeId::ERROR);
        assert!(types.overflowed());
    }

    #[test]
    fn test_concurrent_interning_agrees() {
        use rayon::prelude::*;
        let types = TypeInterner::new();
        let ids: Vec<TypeId> = (0..64).into_par_iter().map(|i| types.literal_number((i % 8) as f64)).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, types.literal_number((i % 8) as f64));
        }
    }
}
