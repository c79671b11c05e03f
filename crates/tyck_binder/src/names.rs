//! Member names and the reserved names used for anonymous members.

use tyck_ast::{NodeData, NodeId, SyntaxKind, SyntaxTree};
use tyck_core::intern::{InternedString, StringInterner};

pub const CONSTRUCTOR: &str = "__constructor";
pub const CALL: &str = "__call";
pub const NEW: &str = "__new";
pub const INDEX: &str = "__index";
pub const TYPE_LITERAL: &str = "__type";
pub const OBJECT_LITERAL: &str = "__object";
pub const FUNCTION: &str = "__function";
pub const DEFAULT_EXPORT: &str = "default";
pub const EXPORT_EQUALS: &str = "export=";

/// Names that cannot be used for classes, interfaces, enums or type aliases.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "any", "unknown", "never", "number", "bigint", "boolean", "string", "symbol", "void", "object", "undefined",
];

/// Format a number the way it prints as a property key: `1`, `1.5`, `1e+21`.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{}", value as i128);
    }
    let plain = format!("{}", value);
    if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let exp = format!("{:e}", value);
        // Rust prints `1e21`; the language prints `1e+21`.
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    plain
}

/// The statically known name of a property name node: identifiers, string
/// and numeric literals, and computed names wrapping a literal.
pub fn property_name(tree: &SyntaxTree, name: NodeId, interner: &StringInterner) -> Option<InternedString> {
    match &tree.node(name).data {
        NodeData::Identifier { name } | NodeData::StringLiteral { value: name } => Some(*name),
        NodeData::NumericLiteral { value } => Some(interner.intern(&number_to_string(*value))),
        NodeData::Expr { expression } if tree.kind(name) == SyntaxKind::ComputedPropertyName => {
            match tree.kind(*expression) {
                SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::NumericLiteral => {
                    property_name(tree, *expression, interner)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-3.0), "-3");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(-0.0), "0");
    }
}
