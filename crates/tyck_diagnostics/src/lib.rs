//! tyck_diagnostics: Diagnostic records and the message catalogue.
//!
//! A [`Diagnostic`] is immutable once created. It carries the file, the byte
//! range, the message code, the formatting arguments and, for relation
//! failures, an elaboration chain describing the first incompatibility found.

use std::cmp::Ordering;
use std::fmt;
use tyck_core::text::TextRange;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Suggestion => write!(f, "suggestion"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A message template with its numeric code.
///
/// Templates use `{0}`, `{1}`, ... placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

impl DiagnosticMessage {
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }
}

/// One line of an elaboration chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainEntry {
    pub code: u32,
    pub text: String,
}

impl ChainEntry {
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            code: message.code,
            text: message.format(args),
        }
    }
}

/// A realized diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// File name, `None` for global diagnostics.
    pub file: Option<String>,
    pub range: Option<TextRange>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The arguments `message_text` was formatted with.
    pub args: Vec<String>,
    /// Elaboration, outermost first. Each entry explains the one before it.
    pub chain: Vec<ChainEntry>,
}

impl Diagnostic {
    /// A diagnostic without location.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            range: None,
            message_text: message.format(args),
            code: message.code,
            category: message.category,
            args: args.iter().map(|a| a.to_string()).collect(),
            chain: Vec::new(),
        }
    }

    pub fn with_location(
        file: impl Into<String>,
        range: TextRange,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        let mut diagnostic = Self::new(message, args);
        diagnostic.file = Some(file.into());
        diagnostic.range = Some(range);
        diagnostic
    }

    pub fn with_chain(mut self, chain: Vec<ChainEntry>) -> Self {
        self.chain = chain;
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.range.map_or(0, |r| r.pos)
    }

    /// The message with its chain, one indented line per entry.
    pub fn full_text(&self) -> String {
        let mut text = self.message_text.clone();
        for (depth, entry) in self.chain.iter().enumerate() {
            text.push('\n');
            for _ in 0..=depth {
                text.push_str("  ");
            }
            text.push_str(&entry.text);
        }
        text
    }

    /// Ordering used for deterministic output: file, position, code, text.
    pub fn compare(&self, other: &Diagnostic) -> Ordering {
        self.file
            .cmp(&other.file)
            .then_with(|| self.pos().cmp(&other.pos()))
            .then_with(|| self.range.map(|r| r.end).cmp(&other.range.map(|r| r.end)))
            .then_with(|| self.code.cmp(&other.code))
            .then_with(|| self.message_text.cmp(&other.message_text))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(range) = self.range {
                write!(f, "({})", range.pos)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} TS{}: {}", self.category, self.code, self.full_text())
    }
}

/// Replace `{0}`, `{1}`, ... in `template` with `args`.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}');
        let index = close.and_then(|c| after[..c].parse::<usize>().ok());
        match (close, index) {
            (Some(c), Some(i)) if i < args.len() => {
                result.push_str(args[i]);
                rest = &after[c + 1..];
            }
            _ => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Diagnostics accumulated by one pass.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(other);
    }

    /// Sort by file and position and drop exact duplicates.
    pub fn sort_and_dedup(&mut self) {
        sort_diagnostics(&mut self.diagnostics);
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

/// Sort diagnostics deterministically and remove exact duplicates.
pub fn sort_diagnostics(diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.sort_by(Diagnostic::compare);
    diagnostics.dedup();
}

// ============================================================================
// Message catalogue
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Syntax (1000-1999)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, "'{0}' expected.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const A_REST_PARAMETER_MUST_BE_LAST: DiagnosticMessage = diag!(1014, Error, "A rest parameter must be last in a parameter list.");
    pub const A_CONTINUE_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_STATEMENT: DiagnosticMessage = diag!(1104, Error, "A 'continue' statement can only be used within an enclosing iteration statement.");
    pub const A_BREAK_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_OR_SWITCH_STATEMENT: DiagnosticMessage = diag!(1105, Error, "A 'break' statement can only be used within an enclosing iteration or switch statement.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Error, "Type expected.");
    pub const A_DEFAULT_CLAUSE_CANNOT_APPEAR_MORE_THAN_ONCE_IN_A_SWITCH_STATEMENT: DiagnosticMessage = diag!(1113, Error, "A 'default' clause cannot appear more than once in a 'switch' statement.");
    pub const DUPLICATE_LABEL_0: DiagnosticMessage = diag!(1114, Error, "Duplicate label '{0}'.");
    pub const A_CONTINUE_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_ITERATION_STATEMENT: DiagnosticMessage = diag!(1115, Error, "A 'continue' statement can only jump to a label of an enclosing iteration statement.");
    pub const A_BREAK_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_STATEMENT: DiagnosticMessage = diag!(1116, Error, "A 'break' statement can only jump to a label of an enclosing statement.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, "Invalid character.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, "Declaration or statement expected.");
    pub const PROPERTY_ASSIGNMENT_EXPECTED: DiagnosticMessage = diag!(1136, Error, "Property assignment expected.");
    pub const TYPE_PARAMETER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1139, Error, "Type parameter declaration expected.");
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = diag!(1160, Error, "Unterminated template literal.");
    pub const AN_EXPRESSION_OF_TYPE_VOID_CANNOT_BE_TESTED_FOR_TRUTHINESS: DiagnosticMessage = diag!(1345, Error, "An expression of type 'void' cannot be tested for truthiness.");

    // ========================================================================
    // Binding (2300-2499)
    // ========================================================================
    pub const DUPLICATE_IDENTIFIER_0: DiagnosticMessage = diag!(2300, Error, "Duplicate identifier '{0}'.");
    pub const CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0: DiagnosticMessage = diag!(2451, Error, "Cannot redeclare block-scoped variable '{0}'.");
    pub const CLASS_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2414, Error, "Class name cannot be '{0}'.");
    pub const INTERFACE_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2427, Error, "Interface name cannot be '{0}'.");
    pub const ENUM_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2431, Error, "Enum name cannot be '{0}'.");
    pub const TYPE_ALIAS_NAME_CANNOT_BE_0: DiagnosticMessage = diag!(2457, Error, "Type alias name cannot be '{0}'.");

    // ========================================================================
    // Names and modules
    // ========================================================================
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage = diag!(2304, Error, "Cannot find name '{0}'.");
    pub const MODULE_0_HAS_NO_EXPORTED_MEMBER_1: DiagnosticMessage = diag!(2305, Error, "Module '{0}' has no exported member '{1}'.");
    pub const CANNOT_FIND_MODULE_0_OR_ITS_CORRESPONDING_TYPE_DECLARATIONS: DiagnosticMessage = diag!(2307, Error, "Cannot find module '{0}' or its corresponding type declarations.");
    pub const _0_ONLY_REFERS_TO_A_TYPE_BUT_IS_BEING_USED_AS_A_VALUE_HERE: DiagnosticMessage = diag!(2693, Error, "'{0}' only refers to a type, but is being used as a value here.");
    pub const _0_REFERS_TO_A_VALUE_BUT_IS_BEING_USED_AS_A_TYPE_HERE: DiagnosticMessage = diag!(2749, Error, "'{0}' refers to a value, but is being used as a type here. Did you mean 'typeof {0}'?");
    pub const NAMESPACE_0_HAS_NO_EXPORTED_MEMBER_1: DiagnosticMessage = diag!(2694, Error, "Namespace '{0}' has no exported member '{1}'.");

    // ========================================================================
    // Type references and generics
    // ========================================================================
    pub const GENERIC_TYPE_0_REQUIRES_1_TYPE_ARGUMENTS: DiagnosticMessage = diag!(2314, Error, "Generic type '{0}' requires {1} type argument(s).");
    pub const TYPE_0_IS_NOT_GENERIC: DiagnosticMessage = diag!(2315, Error, "Type '{0}' is not generic.");
    pub const TYPE_0_RECURSIVELY_REFERENCES_ITSELF_AS_A_BASE_TYPE: DiagnosticMessage = diag!(2310, Error, "Type '{0}' recursively references itself as a base type.");
    pub const AN_INTERFACE_CAN_ONLY_EXTEND_AN_OBJECT_TYPE: DiagnosticMessage = diag!(2312, Error, "An interface can only extend an object type or intersection of object types with statically known members.");
    pub const TYPE_0_DOES_NOT_SATISFY_THE_CONSTRAINT_1: DiagnosticMessage = diag!(2344, Error, "Type '{0}' does not satisfy the constraint '{1}'.");
    pub const TYPE_ALIAS_0_CIRCULARLY_REFERENCES_ITSELF: DiagnosticMessage = diag!(2456, Error, "Type alias '{0}' circularly references itself.");
    pub const _0_IS_REFERENCED_DIRECTLY_OR_INDIRECTLY_IN_ITS_OWN_TYPE_ANNOTATION: DiagnosticMessage = diag!(2502, Error, "'{0}' is referenced directly or indirectly in its own type annotation.");
    pub const TYPE_0_IS_NOT_A_CONSTRUCTOR_FUNCTION_TYPE: DiagnosticMessage = diag!(2507, Error, "Type '{0}' is not a constructor function type.");
    pub const TYPE_0_CANNOT_BE_USED_AS_AN_INDEX_TYPE: DiagnosticMessage = diag!(2538, Error, "Type '{0}' cannot be used as an index type.");
    pub const TYPE_0_CANNOT_BE_USED_TO_INDEX_TYPE_1: DiagnosticMessage = diag!(2536, Error, "Type '{0}' cannot be used to index type '{1}'.");
    pub const EXPECTED_0_TYPE_ARGUMENTS_BUT_GOT_1: DiagnosticMessage = diag!(2558, Error, "Expected {0} type arguments, but got {1}.");
    pub const TYPE_INSTANTIATION_IS_EXCESSIVELY_DEEP_AND_POSSIBLY_INFINITE: DiagnosticMessage = diag!(2589, Error, "Type instantiation is excessively deep and possibly infinite.");
    pub const EXPRESSION_PRODUCES_A_UNION_TYPE_THAT_IS_TOO_COMPLEX_TO_REPRESENT: DiagnosticMessage = diag!(2590, Error, "Expression produces a union type that is too complex to represent.");

    // ========================================================================
    // Relations
    // ========================================================================
    pub const EXCESSIVE_STACK_DEPTH_COMPARING_TYPES_0_AND_1: DiagnosticMessage = diag!(2321, Error, "Excessive stack depth comparing types '{0}' and '{1}'.");
    pub const TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1: DiagnosticMessage = diag!(2322, Error, "Type '{0}' is not assignable to type '{1}'.");
    pub const TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2326, Error, "Types of property '{0}' are incompatible.");
    pub const PROPERTY_0_IS_OPTIONAL_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2: DiagnosticMessage = diag!(2327, Error, "Property '{0}' is optional in type '{1}' but required in type '{2}'.");
    pub const TYPES_OF_PARAMETERS_0_AND_1_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2328, Error, "Types of parameters '{0}' and '{1}' are incompatible.");
    pub const INDEX_SIGNATURE_FOR_TYPE_0_IS_MISSING_IN_TYPE_1: DiagnosticMessage = diag!(2329, Error, "Index signature for type '{0}' is missing in type '{1}'.");
    pub const _0_INDEX_SIGNATURES_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2330, Error, "'{0}' index signatures are incompatible.");
    pub const ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1: DiagnosticMessage = diag!(2345, Error, "Argument of type '{0}' is not assignable to parameter of type '{1}'.");
    pub const CONVERSION_OF_TYPE_0_TO_TYPE_1_MAY_BE_A_MISTAKE: DiagnosticMessage = diag!(2352, Error, "Conversion of type '{0}' to type '{1}' may be a mistake because neither type sufficiently overlaps with the other. If this was intentional, convert the expression to 'unknown' first.");
    pub const OBJECT_LITERAL_MAY_ONLY_SPECIFY_KNOWN_PROPERTIES_AND_0_DOES_NOT_EXIST_IN_TYPE_1: DiagnosticMessage = diag!(2353, Error, "Object literal may only specify known properties, and '{0}' does not exist in type '{1}'.");
    pub const THIS_COMPARISON_APPEARS_TO_BE_UNINTENTIONAL_BECAUSE_THE_TYPES_0_AND_1_HAVE_NO_OVERLAP: DiagnosticMessage = diag!(2367, Error, "This comparison appears to be unintentional because the types '{0}' and '{1}' have no overlap.");
    pub const PROPERTY_0_IS_MISSING_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2: DiagnosticMessage = diag!(2741, Error, "Property '{0}' is missing in type '{1}' but required in type '{2}'.");
    pub const TYPE_0_IS_MISSING_THE_FOLLOWING_PROPERTIES_FROM_TYPE_1_COLON_2: DiagnosticMessage = diag!(2739, Error, "Type '{0}' is missing the following properties from type '{1}': {2}");
    pub const TYPE_0_HAS_NO_PROPERTIES_IN_COMMON_WITH_TYPE_1: DiagnosticMessage = diag!(2559, Error, "Type '{0}' has no properties in common with type '{1}'.");
    pub const TYPE_0_IS_NOT_COMPARABLE_TO_TYPE_1: DiagnosticMessage = diag!(2678, Error, "Type '{0}' is not comparable to type '{1}'.");
    pub const TYPE_0_PROVIDES_NO_MATCH_FOR_THE_SIGNATURE_1: DiagnosticMessage = diag!(2658, Error, "Type '{0}' provides no match for the signature '{1}'.");
    pub const CALL_SIGNATURE_RETURN_TYPES_0_AND_1_ARE_INCOMPATIBLE: DiagnosticMessage = diag!(2202, Error, "Call signature return types '{0}' and '{1}' are incompatible.");
    pub const TARGET_SIGNATURE_PROVIDES_TOO_FEW_ARGUMENTS_EXPECTED_0_OR_MORE_BUT_GOT_1: DiagnosticMessage = diag!(2849, Error, "Target signature provides too few arguments. Expected {0} or more, but got {1}.");
    pub const TYPE_0_HAS_NO_CALL_SIGNATURES: DiagnosticMessage = diag!(2757, Error, "Type '{0}' has no call signatures.");
    pub const TARGET_ALLOWS_ONLY_0_ELEMENTS_BUT_SOURCE_MAY_HAVE_MORE: DiagnosticMessage = diag!(2619, Error, "Target allows only {0} element(s) but source may have more.");
    pub const SOURCE_HAS_0_ELEMENTS_BUT_TARGET_REQUIRES_1: DiagnosticMessage = diag!(2618, Error, "Source has {0} element(s) but target requires {1}.");
    pub const THE_TYPE_0_IS_READONLY_AND_CANNOT_BE_ASSIGNED_TO_THE_MUTABLE_TYPE_1: DiagnosticMessage = diag!(4104, Error, "The type '{0}' is 'readonly' and cannot be assigned to the mutable type '{1}'.");

    // ========================================================================
    // Declarations
    // ========================================================================
    pub const FUNCTION_LACKS_ENDING_RETURN_STATEMENT: DiagnosticMessage = diag!(2366, Error, "Function lacks ending return statement and return type does not include 'undefined'.");
    pub const A_FUNCTION_WHOSE_DECLARED_TYPE_IS_NEITHER_UNDEFINED_VOID_NOR_ANY_MUST_RETURN_A_VALUE: DiagnosticMessage = diag!(2355, Error, "A function whose declared type is neither 'undefined', 'void', nor 'any' must return a value.");
    pub const FUNCTION_IMPLEMENTATION_IS_MISSING_OR_NOT_IMMEDIATELY_FOLLOWING_THE_DECLARATION: DiagnosticMessage = diag!(2391, Error, "Function implementation is missing or not immediately following the declaration.");
    pub const THIS_OVERLOAD_SIGNATURE_IS_NOT_COMPATIBLE_WITH_ITS_IMPLEMENTATION_SIGNATURE: DiagnosticMessage = diag!(2394, Error, "This overload signature is not compatible with its implementation signature.");
    pub const SUBSEQUENT_VARIABLE_DECLARATIONS_MUST_HAVE_THE_SAME_TYPE: DiagnosticMessage = diag!(2403, Error, "Subsequent variable declarations must have the same type.  Variable '{0}' must be of type '{1}', but here has type '{2}'.");
    pub const SUBSEQUENT_PROPERTY_DECLARATIONS_MUST_HAVE_THE_SAME_TYPE: DiagnosticMessage = diag!(2717, Error, "Subsequent property declarations must have the same type.  Property '{0}' must be of type '{1}', but here has type '{2}'.");
    pub const CLASS_0_INCORRECTLY_EXTENDS_BASE_CLASS_1: DiagnosticMessage = diag!(2415, Error, "Class '{0}' incorrectly extends base class '{1}'.");
    pub const CLASS_0_INCORRECTLY_IMPLEMENTS_INTERFACE_1: DiagnosticMessage = diag!(2420, Error, "Class '{0}' incorrectly implements interface '{1}'.");
    pub const INTERFACE_0_INCORRECTLY_EXTENDS_INTERFACE_1: DiagnosticMessage = diag!(2430, Error, "Interface '{0}' incorrectly extends interface '{1}'.");
    pub const _0_IMPLICITLY_HAS_TYPE_ANY_BECAUSE_IT_IS_REFERENCED_IN_ITS_OWN_INITIALIZER: DiagnosticMessage = diag!(7022, Error, "'{0}' implicitly has type 'any' because it does not have a type annotation and is referenced directly or indirectly in its own initializer.");
    pub const PARAMETER_0_IMPLICITLY_HAS_AN_1_TYPE: DiagnosticMessage = diag!(7006, Error, "Parameter '{0}' implicitly has an '{1}' type.");
    pub const VARIABLE_0_IMPLICITLY_HAS_AN_1_TYPE: DiagnosticMessage = diag!(7005, Error, "Variable '{0}' implicitly has an '{1}' type.");
    pub const UNREACHABLE_CODE_DETECTED: DiagnosticMessage = diag!(7027, Error, "Unreachable code detected.");
    pub const NOT_ALL_CODE_PATHS_RETURN_A_VALUE: DiagnosticMessage = diag!(7030, Error, "Not all code paths return a value.");

    // ========================================================================
    // Expressions
    // ========================================================================
    pub const PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1: DiagnosticMessage = diag!(2339, Error, "Property '{0}' does not exist on type '{1}'.");
    pub const THIS_EXPRESSION_IS_NOT_CALLABLE: DiagnosticMessage = diag!(2349, Error, "This expression is not callable.");
    pub const THIS_EXPRESSION_IS_NOT_CONSTRUCTABLE: DiagnosticMessage = diag!(2351, Error, "This expression is not constructable.");
    pub const VALUE_OF_TYPE_0_IS_NOT_CALLABLE_DID_YOU_MEAN_TO_INCLUDE_NEW: DiagnosticMessage = diag!(2348, Error, "Value of type '{0}' is not callable. Did you mean to include 'new'?");
    pub const THE_LEFT_HAND_SIDE_OF_AN_INSTANCEOF_EXPRESSION_MUST_BE_OF_TYPE_ANY_AN_OBJECT_TYPE_OR_A_TYPE_PARAMETER: DiagnosticMessage = diag!(2358, Error, "The left-hand side of an 'instanceof' expression must be of type 'any', an object type or a type parameter.");
    pub const THE_RIGHT_HAND_SIDE_OF_AN_INSTANCEOF_EXPRESSION_MUST_BE_CALLABLE: DiagnosticMessage = diag!(2359, Error, "The right-hand side of an 'instanceof' expression must be either of type 'any', a class, function, or other type assignable to the 'Function' interface type.");
    pub const THE_RIGHT_HAND_SIDE_OF_AN_IN_EXPRESSION_MUST_NOT_BE_A_PRIMITIVE: DiagnosticMessage = diag!(2361, Error, "The right-hand side of an 'in' expression must not be a primitive.");
    pub const THE_LEFT_HAND_SIDE_OF_AN_ARITHMETIC_OPERATION_MUST_BE_OF_TYPE_ANY_NUMBER_BIGINT_OR_AN_ENUM_TYPE: DiagnosticMessage = diag!(2362, Error, "The left-hand side of an arithmetic operation must be of type 'any', 'number', 'bigint' or an enum type.");
    pub const THE_RIGHT_HAND_SIDE_OF_AN_ARITHMETIC_OPERATION_MUST_BE_OF_TYPE_ANY_NUMBER_BIGINT_OR_AN_ENUM_TYPE: DiagnosticMessage = diag!(2363, Error, "The right-hand side of an arithmetic operation must be of type 'any', 'number', 'bigint' or an enum type.");
    pub const OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2: DiagnosticMessage = diag!(2365, Error, "Operator '{0}' cannot be applied to types '{1}' and '{2}'.");
    pub const THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS: DiagnosticMessage = diag!(2357, Error, "The operand of an increment or decrement operator must be a variable or a property access.");
    pub const THE_LEFT_HAND_SIDE_OF_AN_ASSIGNMENT_EXPRESSION_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS: DiagnosticMessage = diag!(2364, Error, "The left-hand side of an assignment expression must be a variable or a property access.");
    pub const THE_RIGHT_HAND_SIDE_OF_A_FOR_IN_STATEMENT_MUST_BE_OF_TYPE_ANY_AN_OBJECT_TYPE_OR_A_TYPE_PARAMETER: DiagnosticMessage = diag!(2407, Error, "The right-hand side of a 'for...in' statement must be of type 'any', an object type or a type parameter, but here has type '{0}'.");
    pub const TYPE_0_MUST_HAVE_A_SYMBOL_ITERATOR_METHOD: DiagnosticMessage = diag!(2488, Error, "Type '{0}' must have a '[Symbol.iterator]()' method that returns an iterator.");
    pub const OBJECT_IS_POSSIBLY_NULL: DiagnosticMessage = diag!(2531, Error, "Object is possibly 'null'.");
    pub const OBJECT_IS_POSSIBLY_UNDEFINED: DiagnosticMessage = diag!(2532, Error, "Object is possibly 'undefined'.");
    pub const OBJECT_IS_POSSIBLY_NULL_OR_UNDEFINED: DiagnosticMessage = diag!(2533, Error, "Object is possibly 'null' or 'undefined'.");
    pub const OBJECT_IS_OF_TYPE_UNKNOWN: DiagnosticMessage = diag!(2571, Error, "Object is of type 'unknown'.");
    pub const _0_IS_POSSIBLY_NULL: DiagnosticMessage = diag!(18047, Error, "'{0}' is possibly 'null'.");
    pub const _0_IS_POSSIBLY_UNDEFINED: DiagnosticMessage = diag!(18048, Error, "'{0}' is possibly 'undefined'.");
    pub const _0_IS_POSSIBLY_NULL_OR_UNDEFINED: DiagnosticMessage = diag!(18049, Error, "'{0}' is possibly 'null' or 'undefined'.");
    pub const _0_IS_OF_TYPE_UNKNOWN: DiagnosticMessage = diag!(18046, Error, "'{0}' is of type 'unknown'.");
    pub const CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_CONSTANT: DiagnosticMessage = diag!(2588, Error, "Cannot assign to '{0}' because it is a constant.");
    pub const CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_READ_ONLY_PROPERTY: DiagnosticMessage = diag!(2540, Error, "Cannot assign to '{0}' because it is a read-only property.");
    pub const INDEX_SIGNATURE_IN_TYPE_0_ONLY_PERMITS_READING: DiagnosticMessage = diag!(2542, Error, "Index signature in type '{0}' only permits reading.");
    pub const ELEMENT_IMPLICITLY_HAS_AN_ANY_TYPE_BECAUSE_EXPRESSION_OF_TYPE_0_CANT_BE_USED_TO_INDEX_TYPE_1: DiagnosticMessage = diag!(7053, Error, "Element implicitly has an 'any' type because expression of type '{0}' can't be used to index type '{1}'.");
    pub const EXPECTED_0_ARGUMENTS_BUT_GOT_1: DiagnosticMessage = diag!(2554, Error, "Expected {0} arguments, but got {1}.");
    pub const EXPECTED_AT_LEAST_0_ARGUMENTS_BUT_GOT_1: DiagnosticMessage = diag!(2555, Error, "Expected at least {0} arguments, but got {1}.");
    pub const NO_OVERLOAD_MATCHES_THIS_CALL: DiagnosticMessage = diag!(2769, Error, "No overload matches this call.");
    pub const THE_LAST_OVERLOAD_GAVE_THE_FOLLOWING_ERROR: DiagnosticMessage = diag!(2770, Error, "The last overload gave the following error.");
    pub const A_CONST_ASSERTION_CAN_ONLY_BE_APPLIED_TO_LITERALS: DiagnosticMessage = diag!(1355, Error, "A 'const' assertion can only be applied to references to enum members, or string, number, boolean, array, or object literals.");
    pub const THIS_IMPLICITLY_HAS_TYPE_ANY: DiagnosticMessage = diag!(2683, Error, "'this' implicitly has type 'any' because it does not have a type annotation.");
    pub const GENERIC_TYPE_0_REQUIRES_BETWEEN_1_AND_2_TYPE_ARGUMENTS: DiagnosticMessage = diag!(2707, Error, "Generic type '{0}' requires between {1} and {2} type arguments.");
    pub const CANNOT_CREATE_AN_INSTANCE_OF_AN_ABSTRACT_CLASS: DiagnosticMessage = diag!(2511, Error, "Cannot create an instance of an abstract class.");
    pub const AN_ARITHMETIC_OPERAND_MUST_BE_OF_TYPE_ANY_NUMBER_BIGINT_OR_AN_ENUM_TYPE: DiagnosticMessage = diag!(2356, Error, "An arithmetic operand must be of type 'any', 'number', 'bigint' or an enum type.");
    pub const TYPE_0_DOES_NOT_SATISFY_THE_EXPECTED_TYPE_1: DiagnosticMessage = diag!(1360, Error, "Type '{0}' does not satisfy the expected type '{1}'.");
    pub const _0_IS_REFERENCED_DIRECTLY_OR_INDIRECTLY_IN_ITS_OWN_BASE_EXPRESSION: DiagnosticMessage = diag!(2506, Error, "'{0}' is referenced directly or indirectly in its own base expression.");
    pub const _0_IMPLICITLY_HAS_RETURN_TYPE_ANY: DiagnosticMessage = diag!(7023, Error, "'{0}' implicitly has return type 'any' because it does not have a return type annotation and is referenced directly or indirectly in one of its return expressions.");
    pub const THE_LEFT_HAND_SIDE_OF_AN_IN_EXPRESSION_MUST_BE_OF_TYPE_ANY_STRING_NUMBER_OR_SYMBOL: DiagnosticMessage = diag!(2360, Error, "The left-hand side of an 'in' expression must be a private identifier or of type 'any', 'string', 'number', or 'symbol'.");
    pub const CANNOT_INVOKE_AN_OBJECT_WHICH_IS_POSSIBLY_NULL: DiagnosticMessage = diag!(2721, Error, "Cannot invoke an object which is possibly 'null'.");
    pub const CANNOT_INVOKE_AN_OBJECT_WHICH_IS_POSSIBLY_UNDEFINED: DiagnosticMessage = diag!(2722, Error, "Cannot invoke an object which is possibly 'undefined'.");
    pub const CANNOT_INVOKE_AN_OBJECT_WHICH_IS_POSSIBLY_NULL_OR_UNDEFINED: DiagnosticMessage = diag!(2723, Error, "Cannot invoke an object which is possibly 'null' or 'undefined'.");
    pub const PROPERTY_0_IS_PRIVATE_AND_ONLY_ACCESSIBLE_WITHIN_CLASS_1: DiagnosticMessage = diag!(2341, Error, "Property '{0}' is private and only accessible within class '{1}'.");
    pub const PROPERTY_0_IS_PROTECTED_AND_ONLY_ACCESSIBLE_WITHIN_CLASS_1_AND_ITS_SUBCLASSES: DiagnosticMessage = diag!(2445, Error, "Property '{0}' is protected and only accessible within class '{1}' and its subclasses.");
    pub const CANNOT_FIND_NAMESPACE_0: DiagnosticMessage = diag!(2503, Error, "Cannot find namespace '{0}'.");
    pub const A_SPREAD_ARGUMENT_MUST_EITHER_HAVE_A_TUPLE_TYPE_OR_BE_PASSED_TO_A_REST_PARAMETER: DiagnosticMessage = diag!(2556, Error, "A spread argument must either have a tuple type or be passed to a rest parameter.");
    pub const SUPER_CAN_ONLY_BE_REFERENCED_IN_A_DERIVED_CLASS: DiagnosticMessage = diag!(2335, Error, "'super' can only be referenced in a derived class.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message("Type '{0}' is not assignable to type '{1}'.", &["string", "number"]),
            "Type 'string' is not assignable to type 'number'."
        );
        assert_eq!(format_message("'{0}' and '{0}'", &["x"]), "'x' and 'x'");
        assert_eq!(format_message("missing '{1}'", &["x"]), "missing '{1}'");
        assert_eq!(format_message("{ not a placeholder }", &["x"]), "{ not a placeholder }");
    }

    #[test]
    fn test_display_with_chain() {
        let diag = Diagnostic::with_location(
            "a.ts",
            TextRange::new(4, 5),
            &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
            &["{ a: string; }", "{ a: number; }"],
        )
        .with_chain(vec![
            ChainEntry::new(&messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE, &["a"]),
            ChainEntry::new(&messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1, &["string", "number"]),
        ]);
        assert_eq!(
            diag.to_string(),
            "a.ts(4): error TS2322: Type '{ a: string; }' is not assignable to type '{ a: number; }'.\n  \
             Types of property 'a' are incompatible.\n    \
             Type 'string' is not assignable to type 'number'."
        );
        assert_eq!(diag.args, vec!["{ a: string; }".to_string(), "{ a: number; }".to_string()]);
    }

    #[test]
    fn test_sort_is_deterministic_and_dedups() {
        let a = Diagnostic::with_location("b.ts", TextRange::new(10, 12), &messages::CANNOT_FIND_NAME_0, &["x"]);
        let b = Diagnostic::with_location("a.ts", TextRange::new(30, 31), &messages::CANNOT_FIND_NAME_0, &["y"]);
        let c = Diagnostic::with_location("a.ts", TextRange::new(2, 3), &messages::DUPLICATE_IDENTIFIER_0, &["z"]);
        let mut list = vec![a.clone(), b.clone(), c.clone(), a.clone()];
        sort_diagnostics(&mut list);
        assert_eq!(list, vec![c, b, a]);
    }

    #[test]
    fn test_collection_counts() {
        let mut collection = DiagnosticCollection::new();
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::CANNOT_FIND_NAME_0, &["x"]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.len(), 1);
    }
}
