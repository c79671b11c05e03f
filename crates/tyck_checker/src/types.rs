//! The type model: ids, flags, interning keys and the structured pieces
//! (signatures, members, mappers) the checker builds around them.

use std::sync::Arc;

use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tyck_ast::types::{FileId, NodeId, SymbolId};
use tyck_binder::Declaration;
use tyck_core::intern::InternedString;

/// Index of an interned type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    /// Any-like sentinel produced after an error was reported.
    pub const ERROR: TypeId = TypeId(2);
    pub const NEVER: TypeId = TypeId(3);
    pub const VOID: TypeId = TypeId(4);
    pub const UNDEFINED: TypeId = TypeId(5);
    pub const NULL: TypeId = TypeId(6);
    pub const STRING: TypeId = TypeId(7);
    pub const NUMBER: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    /// The non-primitive `object` type.
    pub const OBJECT: TypeId = TypeId(11);
    pub const FALSE: TypeId = TypeId(12);
    pub const TRUE: TypeId = TypeId(13);
    pub const BOOLEAN: TypeId = TypeId(14);
    /// `{}`
    pub const EMPTY_OBJECT: TypeId = TypeId(15);
    /// Marker type parameters used to measure variance.
    pub const MARKER_SUPER: TypeId = TypeId(16);
    pub const MARKER_SUB: TypeId = TypeId(17);
    pub const MARKER_OTHER: TypeId = TypeId(18);

    /// Number of preallocated types.
    pub const FIRST_DYNAMIC: u32 = 19;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u32 {
        const ANY              = 1 << 0;
        const UNKNOWN          = 1 << 1;
        const ERROR            = 1 << 2;
        const NEVER            = 1 << 3;
        const VOID             = 1 << 4;
        const UNDEFINED        = 1 << 5;
        const NULL             = 1 << 6;
        const STRING           = 1 << 7;
        const NUMBER           = 1 << 8;
        const BIGINT           = 1 << 9;
        const BOOLEAN          = 1 << 10;
        const ES_SYMBOL        = 1 << 11;
        const STRING_LITERAL   = 1 << 12;
        const NUMBER_LITERAL   = 1 << 13;
        const BIGINT_LITERAL   = 1 << 14;
        const BOOLEAN_LITERAL  = 1 << 15;
        const ENUM             = 1 << 16;
        const ENUM_LITERAL     = 1 << 17;
        const NON_PRIMITIVE    = 1 << 18;
        const OBJECT           = 1 << 19;
        const UNION            = 1 << 20;
        const INTERSECTION     = 1 << 21;
        const TYPE_PARAMETER   = 1 << 22;
        const INDEX            = 1 << 23;
        const INDEXED_ACCESS   = 1 << 24;
        const CONDITIONAL      = 1 << 25;
        const SUBSTITUTION     = 1 << 26;

        const ANY_OR_UNKNOWN = Self::ANY.bits() | Self::UNKNOWN.bits();
        const NULLABLE = Self::UNDEFINED.bits() | Self::NULL.bits();
        const LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::BIGINT_LITERAL.bits()
            | Self::BOOLEAN_LITERAL.bits();
        const UNIT = Self::LITERAL.bits() | Self::ENUM_LITERAL.bits() | Self::NULLABLE.bits() | Self::VOID.bits();
        const STRING_LIKE = Self::STRING.bits() | Self::STRING_LITERAL.bits();
        const NUMBER_LIKE = Self::NUMBER.bits() | Self::NUMBER_LITERAL.bits() | Self::ENUM.bits();
        const BIGINT_LIKE = Self::BIGINT.bits() | Self::BIGINT_LITERAL.bits();
        const BOOLEAN_LIKE = Self::BOOLEAN.bits() | Self::BOOLEAN_LITERAL.bits();
        const ENUM_LIKE = Self::ENUM.bits() | Self::ENUM_LITERAL.bits();
        const PRIMITIVE = Self::STRING.bits()
            | Self::NUMBER.bits()
            | Self::BIGINT.bits()
            | Self::BOOLEAN.bits()
            | Self::ENUM.bits()
            | Self::ENUM_LITERAL.bits()
            | Self::ES_SYMBOL.bits()
            | Self::VOID.bits()
            | Self::UNDEFINED.bits()
            | Self::NULL.bits()
            | Self::LITERAL.bits();
        const STRUCTURED = Self::OBJECT.bits() | Self::UNION.bits() | Self::INTERSECTION.bits();
        const UNION_OR_INTERSECTION = Self::UNION.bits() | Self::INTERSECTION.bits();
        const TYPE_VARIABLE = Self::TYPE_PARAMETER.bits() | Self::INDEXED_ACCESS.bits();
        const INSTANTIABLE_NON_PRIMITIVE = Self::TYPE_VARIABLE.bits()
            | Self::CONDITIONAL.bits()
            | Self::SUBSTITUTION.bits();
        const INSTANTIABLE = Self::INSTANTIABLE_NON_PRIMITIVE.bits() | Self::INDEX.bits();
        /// Types whose members come from their apparent type.
        const STRUCTURED_OR_INSTANTIABLE = Self::STRUCTURED.bits() | Self::INSTANTIABLE.bits();
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        const INTERFACE         = 1 << 0;
        const CLASS             = 1 << 1;
        const REFERENCE         = 1 << 2;
        const ANONYMOUS         = 1 << 3;
        const MAPPED            = 1 << 4;
        const TUPLE             = 1 << 5;
        const ARRAY             = 1 << 6;
        const FRESH_LITERAL     = 1 << 7;
        const OBJECT_LITERAL    = 1 << 8;
        const INSTANTIATED      = 1 << 9;
        const CONTAINS_WIDENING = 1 << 10;
        const CLASS_OR_INTERFACE = Self::INTERFACE.bits() | Self::CLASS.bits();
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Error,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    BigInt,
    Symbol,
    Object,
}

impl IntrinsicKind {
    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any | IntrinsicKind::Error => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
        }
    }

    pub fn flags(self) -> TypeFlags {
        match self {
            IntrinsicKind::Any => TypeFlags::ANY,
            IntrinsicKind::Unknown => TypeFlags::UNKNOWN,
            IntrinsicKind::Error => TypeFlags::ANY | TypeFlags::ERROR,
            IntrinsicKind::Never => TypeFlags::NEVER,
            IntrinsicKind::Void => TypeFlags::VOID,
            IntrinsicKind::Undefined => TypeFlags::UNDEFINED,
            IntrinsicKind::Null => TypeFlags::NULL,
            IntrinsicKind::String => TypeFlags::STRING,
            IntrinsicKind::Number => TypeFlags::NUMBER,
            IntrinsicKind::BigInt => TypeFlags::BIGINT,
            IntrinsicKind::Symbol => TypeFlags::ES_SYMBOL,
            IntrinsicKind::Object => TypeFlags::NON_PRIMITIVE,
        }
    }
}

/// A number literal value, hashed by bits with `-0` and NaN canonicalised.
#[derive(Debug, Copy, Clone)]
pub struct Number(pub f64);

impl Number {
    fn bits(self) -> u64 {
        if self.0 == 0.0 {
            0
        } else if self.0.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Number {}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

/// Identity of a type parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeParamKey {
    /// A `TypeParameter` node.
    Declared(Declaration),
    /// Variance markers.
    Marker(u8),
}

/// What an anonymous object type was declared by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeclRef {
    /// Functions, classes (static side), namespaces and enums.
    Symbol(SymbolId),
    /// Type literals, function and constructor types.
    Node(Declaration),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LiteralProperty {
    pub name: InternedString,
    pub ty: TypeId,
    pub flags: PropertyFlags,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        const REQUIRED = 1 << 0;
        const OPTIONAL = 1 << 1;
        const REST     = 1 << 2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    /// The generic target (or sole instance) of an interface or class.
    Declared(SymbolId),
    /// An instantiation of a generic interface or class.
    Reference { target: TypeId, args: Box<[TypeId]> },
    Tuple {
        elements: Box<[TypeId]>,
        flags: Box<[ElementFlags]>,
        readonly: bool,
    },
    /// Declaration-backed type; `args` are the values of the type
    /// parameters in scope at the declaration.
    Anonymous { decl: DeclRef, args: Box<[TypeId]> },
    Mapped { decl: Declaration, args: Box<[TypeId]> },
    /// The type of a function or arrow expression.
    Function { decl: Declaration, signature: SignatureId },
    /// An object literal expression.
    Literal { properties: Box<[LiteralProperty]>, fresh: bool },
}

/// The interning fingerprint of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Intrinsic(IntrinsicKind),
    StringLiteral(InternedString),
    NumberLiteral(Number),
    BigIntLiteral(InternedString),
    BooleanLiteral(bool),
    EnumLiteral {
        enum_symbol: SymbolId,
        member: SymbolId,
        literal: TypeId,
    },
    TypeParameter(TypeParamKey),
    Object(ObjectKey),
    /// Constituents sorted by id.
    Union(Box<[TypeId]>),
    /// Constituents sorted by id.
    Intersection(Box<[TypeId]>),
    Index(TypeId),
    IndexedAccess { object: TypeId, index: TypeId },
    /// A deferred conditional type; `args` are the values of the type
    /// parameters in scope at the declaration.
    Conditional { decl: Declaration, args: Box<[TypeId]> },
    /// A type variable known to also satisfy `constraint`.
    Substitution { base: TypeId, constraint: TypeId },
}

/// An interned type. Immutable once created.
#[derive(Debug, Clone)]
pub struct Type {
    pub id: TypeId,
    pub flags: TypeFlags,
    pub object_flags: ObjectFlags,
    pub key: TypeKey,
    /// Union constituents in the order they were first written.
    pub origin: Option<Box<[TypeId]>>,
    pub symbol: Option<SymbolId>,
}

impl Type {
    /// Constituents of a union or intersection.
    pub fn constituents(&self) -> &[TypeId] {
        match &self.key {
            TypeKey::Union(types) | TypeKey::Intersection(types) => types,
            _ => &[],
        }
    }

    /// Constituents in written order.
    pub fn display_constituents(&self) -> &[TypeId] {
        self.origin.as_deref().unwrap_or_else(|| self.constituents())
    }

    pub fn object_key(&self) -> Option<&ObjectKey> {
        match &self.key {
            TypeKey::Object(key) => Some(key),
            _ => None,
        }
    }

    /// Type arguments of a reference.
    pub fn type_arguments(&self) -> &[TypeId] {
        match &self.key {
            TypeKey::Object(ObjectKey::Reference { args, .. }) => args,
            _ => &[],
        }
    }

    #[inline]
    pub fn is(&self, flags: TypeFlags) -> bool {
        self.flags.intersects(flags)
    }
}

// ============================================================================
// Signatures
// ============================================================================

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SignatureId(pub u32);

impl SignatureId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SignatureFlags: u8 {
        /// Declared as a method; parameters compare bivariantly.
        const METHOD = 1 << 0;
        const ABSTRACT = 1 << 1;
        /// Has a body but no return annotation.
        const INFERRED_RETURN = 1 << 2;
        /// Synthesised for a union of callees.
        const UNION = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: InternedString,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PredicateTarget {
    This,
    Parameter(u32),
}

/// `x is T`, `asserts x is T` or `asserts x`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TypePredicate {
    pub target: PredicateTarget,
    pub asserts: bool,
    pub ty: Option<TypeId>,
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub declaration: Option<Declaration>,
    pub type_parameters: Box<[TypeId]>,
    pub parameters: Box<[Parameter]>,
    pub this_type: Option<TypeId>,
    /// `None` while the return type still has to be inferred from a body.
    pub return_type: Option<TypeId>,
    pub type_predicate: Option<TypePredicate>,
    pub min_argument_count: usize,
    pub has_rest: bool,
    pub kind: SignatureKind,
    pub flags: SignatureFlags,
    /// The uninstantiated signature and the mapper applied to it.
    pub target: Option<(SignatureId, Arc<TypeMapper>)>,
}

impl Signature {
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Type of the rest parameter's array, when there is one.
    pub fn rest_parameter(&self) -> Option<&Parameter> {
        if self.has_rest {
            self.parameters.last()
        } else {
            None
        }
    }

    /// Parameters excluding the rest parameter.
    pub fn fixed_parameters(&self) -> &[Parameter] {
        if self.has_rest {
            &self.parameters[..self.parameters.len() - 1]
        } else {
            &self.parameters
        }
    }
}

// ============================================================================
// Mappers
// ============================================================================

/// Maps type parameters to types, pairwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeMapper {
    pub sources: Box<[TypeId]>,
    pub targets: Box<[TypeId]>,
}

impl TypeMapper {
    pub fn new(sources: impl Into<Box<[TypeId]>>, targets: impl Into<Box<[TypeId]>>) -> Self {
        Self {
            sources: sources.into(),
            targets: targets.into(),
        }
    }

    pub fn single(source: TypeId, target: TypeId) -> Self {
        Self::new(vec![source], vec![target])
    }

    #[inline]
    pub fn map(&self, ty: TypeId) -> Option<TypeId> {
        self.sources.iter().position(|&s| s == ty).map(|i| self.targets[i])
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether every source maps to itself.
    pub fn is_identity(&self) -> bool {
        self.sources == self.targets
    }
}

// ============================================================================
// Members
// ============================================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u8 {
        const OPTIONAL  = 1 << 0;
        const READONLY  = 1 << 1;
        const METHOD    = 1 << 2;
        const PRIVATE   = 1 << 3;
        const PROTECTED = 1 << 4;
        /// Synthesised from the constituents of a union.
        const SYNTHETIC = 1 << 5;
        /// Present in only some constituents of a union.
        const PARTIAL   = 1 << 6;
    }
}

/// How to get a property's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Resolved(TypeId),
    /// The type of `symbol`, instantiated by `mapper`.
    Lazy {
        symbol: SymbolId,
        mapper: Option<Arc<TypeMapper>>,
    },
}

#[derive(Debug, Clone)]
pub struct PropertyInfo {
    pub name: InternedString,
    pub flags: PropertyFlags,
    pub symbol: Option<SymbolId>,
    pub declared: PropertyType,
}

impl PropertyInfo {
    pub fn resolved(name: InternedString, ty: TypeId, flags: PropertyFlags) -> Self {
        Self {
            name,
            flags,
            symbol: None,
            declared: PropertyType::Resolved(ty),
        }
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.flags.contains(PropertyFlags::OPTIONAL)
    }

    #[inline]
    pub fn is_readonly(&self) -> bool {
        self.flags.contains(PropertyFlags::READONLY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexInfo {
    /// `string` or `number`.
    pub key_type: TypeId,
    pub value_type: TypeId,
    pub readonly: bool,
    pub declaration: Option<Declaration>,
}

/// Resolved members of an object type.
#[derive(Debug, Clone, Default)]
pub struct StructuredMembers {
    pub properties: IndexMap<InternedString, PropertyInfo, FxBuildHasher>,
    pub call_signatures: Vec<SignatureId>,
    pub construct_signatures: Vec<SignatureId>,
    pub index_infos: Vec<IndexInfo>,
}

impl StructuredMembers {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.index_infos.is_empty()
    }

    pub fn signatures(&self, kind: SignatureKind) -> &[SignatureId] {
        match kind {
            SignatureKind::Call => &self.call_signatures,
            SignatureKind::Construct => &self.construct_signatures,
        }
    }

    pub fn index_info(&self, key_type: TypeId) -> Option<&IndexInfo> {
        self.index_infos.iter().find(|info| info.key_type == key_type)
    }
}

// ============================================================================
// Relations and inference
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Identity,
    Subtype,
    Assignable,
    Comparable,
}

/// Result of a relation check. Ordered from weakest to strongest; `and`
/// keeps the weaker of two results.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ternary {
    False,
    /// Depends on an unmeasured variance; not cached.
    Unknown,
    /// Assumed true while a recursive comparison is in progress.
    Maybe,
    True,
}

impl Ternary {
    #[inline]
    pub fn and(self, other: Ternary) -> Ternary {
        self.min(other)
    }

    #[inline]
    pub fn is_true(self) -> bool {
        self != Ternary::False
    }

    pub fn from_bool(value: bool) -> Ternary {
        if value {
            Ternary::True
        } else {
            Ternary::False
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
    Bivariant,
    /// The parameter does not affect the type.
    Independent,
}

impl Variance {
    /// Whether a failed comparison by this variance is conclusive.
    pub fn is_reliable(self) -> bool {
        matches!(self, Variance::Invariant | Variance::Covariant | Variance::Contravariant)
    }
}

bitflags! {
    /// Priority of an inference candidate. Lower values win.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct InferencePriority: u8 {
        const NONE = 0;
        const NAKED_TYPE_VARIABLE = 1 << 0;
        const HOMOMORPHIC_MAPPED_TYPE = 1 << 1;
        const RETURN_TYPE = 1 << 2;
    }
}

/// Identity of a syntax node across files.
pub type NodeRef = (FileId, NodeId);
