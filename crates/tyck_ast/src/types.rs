//! Flag sets and index handles shared by the parser, binder and checker.

use std::fmt;

bitflags::bitflags! {
    /// Syntactic facts about a node that do not fit its payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const NONE              = 0;
        const LET               = 1 << 0;
        const CONST             = 1 << 1;
        /// `?` on a parameter, property or tuple element.
        const OPTIONAL          = 1 << 2;
        /// `...` on a parameter or tuple element.
        const REST              = 1 << 3;
        /// Inside a `declare` context or a declaration file.
        const AMBIENT           = 1 << 4;
        /// `namespace` rather than `module`.
        const NAMESPACE         = 1 << 5;
        /// `as const`.
        const CONST_ASSERTION   = 1 << 6;
        /// `asserts x is T`.
        const ASSERTS           = 1 << 7;
        /// Node was synthesized by error recovery.
        const MISSING           = 1 << 8;
        /// `import type` / `export type`.
        const TYPE_ONLY         = 1 << 9;
        /// `?.` on an access or call.
        const OPTIONAL_CHAIN    = 1 << 10;
        /// `!` definite assignment on a declaration.
        const DEFINITE          = 1 << 11;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}

bitflags::bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const NONE      = 0;
        const EXPORT    = 1 << 0;
        const AMBIENT   = 1 << 1;
        const DEFAULT   = 1 << 2;
        const CONST     = 1 << 3;
        const PUBLIC    = 1 << 4;
        const PRIVATE   = 1 << 5;
        const PROTECTED = 1 << 6;
        const STATIC    = 1 << 7;
        const READONLY  = 1 << 8;
        const ABSTRACT  = 1 << 9;
        const IN        = 1 << 10;
        const OUT       = 1 << 11;
        const ASYNC     = 1 << 12;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const PARAMETER_PROPERTY = Self::ACCESSIBILITY.bits() | Self::READONLY.bits();
    }
}

bitflags::bitflags! {
    /// The meanings a symbol carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u32 {
        const NONE                      = 0;
        const FUNCTION_SCOPED_VARIABLE  = 1 << 0;
        const BLOCK_SCOPED_VARIABLE     = 1 << 1;
        const PROPERTY                  = 1 << 2;
        const ENUM_MEMBER               = 1 << 3;
        const FUNCTION                  = 1 << 4;
        const CLASS                     = 1 << 5;
        const INTERFACE                 = 1 << 6;
        const CONST_ENUM                = 1 << 7;
        const REGULAR_ENUM              = 1 << 8;
        const VALUE_MODULE              = 1 << 9;
        const NAMESPACE_MODULE          = 1 << 10;
        const TYPE_LITERAL              = 1 << 11;
        const OBJECT_LITERAL            = 1 << 12;
        const METHOD                    = 1 << 13;
        const CONSTRUCTOR               = 1 << 14;
        const SIGNATURE                 = 1 << 15;
        const TYPE_PARAMETER            = 1 << 16;
        const TYPE_ALIAS                = 1 << 17;
        const ALIAS                     = 1 << 18;
        const OPTIONAL                  = 1 << 19;
        /// Created by the checker rather than the binder.
        const TRANSIENT                 = 1 << 20;
        const READONLY                  = 1 << 21;
        const STATIC                    = 1 << 22;
        const PRIVATE                   = 1 << 23;
        const PROTECTED                 = 1 << 24;
        const FUNCTION_EXPRESSION       = 1 << 25;

        const ENUM = Self::REGULAR_ENUM.bits() | Self::CONST_ENUM.bits();
        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::PROPERTY.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::OBJECT_LITERAL.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::VALUE_MODULE.bits()
            | Self::METHOD.bits()
            | Self::FUNCTION_EXPRESSION.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::TYPE_LITERAL.bits()
            | Self::TYPE_PARAMETER.bits()
            | Self::TYPE_ALIAS.bits();
        const NAMESPACE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits() | Self::ENUM.bits();
        const MODULE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits();
        const CLASS_MEMBER = Self::METHOD.bits() | Self::PROPERTY.bits();

        // What a new declaration of each kind may not merge with.
        const FUNCTION_SCOPED_VARIABLE_EXCLUDES = Self::VALUE.bits() & !Self::FUNCTION_SCOPED_VARIABLE.bits();
        const BLOCK_SCOPED_VARIABLE_EXCLUDES = Self::VALUE.bits();
        const PARAMETER_EXCLUDES = Self::VALUE.bits();
        const PROPERTY_EXCLUDES = Self::NONE.bits();
        const ENUM_MEMBER_EXCLUDES = Self::VALUE.bits() | Self::TYPE.bits();
        const FUNCTION_EXCLUDES = Self::VALUE.bits() & !(Self::FUNCTION.bits() | Self::VALUE_MODULE.bits() | Self::CLASS.bits());
        const CLASS_EXCLUDES = (Self::VALUE.bits() | Self::TYPE.bits()) & !(Self::VALUE_MODULE.bits() | Self::INTERFACE.bits() | Self::FUNCTION.bits());
        const INTERFACE_EXCLUDES = Self::TYPE.bits() & !(Self::INTERFACE.bits() | Self::CLASS.bits());
        const REGULAR_ENUM_EXCLUDES = (Self::VALUE.bits() | Self::TYPE.bits()) & !(Self::REGULAR_ENUM.bits() | Self::VALUE_MODULE.bits());
        const CONST_ENUM_EXCLUDES = (Self::VALUE.bits() | Self::TYPE.bits()) & !Self::CONST_ENUM.bits();
        const VALUE_MODULE_EXCLUDES = Self::VALUE.bits() & !(Self::FUNCTION.bits() | Self::CLASS.bits() | Self::REGULAR_ENUM.bits() | Self::VALUE_MODULE.bits());
        const NAMESPACE_MODULE_EXCLUDES = Self::NONE.bits();
        const METHOD_EXCLUDES = Self::VALUE.bits() & !Self::METHOD.bits();
        const TYPE_PARAMETER_EXCLUDES = Self::TYPE.bits() & !Self::TYPE_PARAMETER.bits();
        const TYPE_ALIAS_EXCLUDES = Self::TYPE.bits();
        const ALIAS_EXCLUDES = Self::ALIAS.bits();
    }
}

impl SymbolFlags {
    /// The flags a declaration with these flags may not merge with.
    pub fn excludes(self) -> SymbolFlags {
        let mut excludes = SymbolFlags::NONE;
        let table = [
            (SymbolFlags::FUNCTION_SCOPED_VARIABLE, SymbolFlags::FUNCTION_SCOPED_VARIABLE_EXCLUDES),
            (SymbolFlags::BLOCK_SCOPED_VARIABLE, SymbolFlags::BLOCK_SCOPED_VARIABLE_EXCLUDES),
            (SymbolFlags::PROPERTY, SymbolFlags::PROPERTY_EXCLUDES),
            (SymbolFlags::ENUM_MEMBER, SymbolFlags::ENUM_MEMBER_EXCLUDES),
            (SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES),
            (SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES),
            (SymbolFlags::INTERFACE, SymbolFlags::INTERFACE_EXCLUDES),
            (SymbolFlags::REGULAR_ENUM, SymbolFlags::REGULAR_ENUM_EXCLUDES),
            (SymbolFlags::CONST_ENUM, SymbolFlags::CONST_ENUM_EXCLUDES),
            (SymbolFlags::VALUE_MODULE, SymbolFlags::VALUE_MODULE_EXCLUDES),
            (SymbolFlags::NAMESPACE_MODULE, SymbolFlags::NAMESPACE_MODULE_EXCLUDES),
            (SymbolFlags::METHOD, SymbolFlags::METHOD_EXCLUDES),
            (SymbolFlags::TYPE_PARAMETER, SymbolFlags::TYPE_PARAMETER_EXCLUDES),
            (SymbolFlags::TYPE_ALIAS, SymbolFlags::TYPE_ALIAS_EXCLUDES),
            (SymbolFlags::ALIAS, SymbolFlags::ALIAS_EXCLUDES),
        ];
        for (flag, excluded) in table {
            if self.intersects(flag) {
                excludes |= excluded;
            }
        }
        excludes
    }
}

bitflags::bitflags! {
    /// Scanner facts about the current token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                  = 0;
        const PRECEDING_LINE_BREAK  = 1 << 0;
        const UNTERMINATED          = 1 << 1;
        const SCIENTIFIC            = 1 << 2;
        const HEX_SPECIFIER         = 1 << 3;
        const BINARY_SPECIFIER      = 1 << 4;
        const OCTAL_SPECIFIER       = 1 << 5;
        const CONTAINS_SEPARATOR    = 1 << 6;
    }
}

macro_rules! index_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(pub u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }
    };
}

index_handle!(
    /// Index of a node within its file's [`SyntaxTree`](crate::node::SyntaxTree).
    NodeId
);
index_handle!(
    /// Index of a symbol in the session-wide symbol arena.
    SymbolId
);
index_handle!(
    /// A file within a checking session.
    FileId
);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_merges_with_interface_and_class() {
        let excludes = SymbolFlags::INTERFACE.excludes();
        assert!(!excludes.intersects(SymbolFlags::INTERFACE));
        assert!(!excludes.intersects(SymbolFlags::CLASS));
        assert!(excludes.intersects(SymbolFlags::TYPE_ALIAS));
    }

    #[test]
    fn test_block_scoped_variable_conflicts_with_any_value() {
        let excludes = SymbolFlags::BLOCK_SCOPED_VARIABLE.excludes();
        assert!(excludes.intersects(SymbolFlags::FUNCTION_SCOPED_VARIABLE));
        assert!(excludes.intersects(SymbolFlags::FUNCTION));
        assert!(!excludes.intersects(SymbolFlags::INTERFACE));
    }

    #[test]
    fn test_namespace_merges_with_class_function_enum() {
        let excludes = SymbolFlags::VALUE_MODULE.excludes();
        assert!(!excludes.intersects(SymbolFlags::CLASS));
        assert!(!excludes.intersects(SymbolFlags::FUNCTION));
        assert!(!excludes.intersects(SymbolFlags::REGULAR_ENUM));
        assert!(excludes.intersects(SymbolFlags::BLOCK_SCOPED_VARIABLE));
    }

    #[test]
    fn test_var_redeclaration_is_allowed() {
        let excludes = SymbolFlags::FUNCTION_SCOPED_VARIABLE.excludes();
        assert!(!excludes.intersects(SymbolFlags::FUNCTION_SCOPED_VARIABLE));
        assert!(excludes.intersects(SymbolFlags::BLOCK_SCOPED_VARIABLE));
    }
}
