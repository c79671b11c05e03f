//! Token and node kinds.
//!
//! Keyword kinds double as the kinds of keyword type nodes (`string`,
//! `number`, ...) and of keyword expressions (`this`, `null`, `true`).

macro_rules! keywords {
    ($($kind:ident => $text:literal,)*) => {
        impl SyntaxKind {
            /// The source text of a keyword kind.
            pub fn keyword_text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$kind => Some($text),)*
                    _ => None,
                }
            }

            /// Look up the keyword kind spelled by `text`.
            pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
                match text {
                    $($text => Some(SyntaxKind::$kind),)*
                    _ => None,
                }
            }
        }
    };
}

macro_rules! punctuation {
    ($($kind:ident => $text:literal,)*) => {
        impl SyntaxKind {
            /// The source text of a punctuation or operator kind.
            pub fn punctuation_text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$kind => Some($text),)*
                    _ => None,
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    AtToken,
    QuestionQuestionToken,

    // Assignment operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    BarBarEqualsToken,
    AmpersandAmpersandEqualsToken,
    QuestionQuestionEqualsToken,

    Identifier,

    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,

    // Strict mode reserved words
    ImplementsKeyword,
    InterfaceKeyword,
    LetKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    StaticKeyword,
    YieldKeyword,

    // Contextual keywords
    AbstractKeyword,
    AsKeyword,
    AssertsKeyword,
    AnyKeyword,
    AsyncKeyword,
    AwaitKeyword,
    BooleanKeyword,
    ConstructorKeyword,
    DeclareKeyword,
    GetKeyword,
    InferKeyword,
    IsKeyword,
    KeyOfKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    OutKeyword,
    ReadonlyKeyword,
    NumberKeyword,
    ObjectKeyword,
    SatisfiesKeyword,
    SetKeyword,
    StringKeyword,
    SymbolKeyword,
    TypeKeyword,
    UndefinedKeyword,
    UniqueKeyword,
    UnknownKeyword,
    FromKeyword,
    GlobalKeyword,
    BigIntKeyword,
    OfKeyword,

    // ========================================================================
    // Names and signature members
    // ========================================================================
    QualifiedName,
    ComputedPropertyName,
    TypeParameter,
    Parameter,
    PropertySignature,
    PropertyDeclaration,
    MethodSignature,
    MethodDeclaration,
    Constructor,
    GetAccessor,
    SetAccessor,
    CallSignature,
    ConstructSignature,
    IndexSignature,

    // ========================================================================
    // Type nodes
    // ========================================================================
    TypePredicate,
    TypeReference,
    FunctionType,
    ConstructorType,
    TypeQuery,
    TypeLiteral,
    ArrayType,
    TupleType,
    OptionalType,
    RestType,
    UnionType,
    IntersectionType,
    ConditionalType,
    InferType,
    ParenthesizedType,
    ThisType,
    TypeOperator,
    IndexedAccessType,
    MappedType,
    LiteralType,
    NamedTupleMember,

    // ========================================================================
    // Expressions
    // ========================================================================
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    CallExpression,
    NewExpression,
    ParenthesizedExpression,
    FunctionExpression,
    ArrowFunction,
    DeleteExpression,
    TypeOfExpression,
    VoidExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    ConditionalExpression,
    TemplateExpression,
    SpreadElement,
    OmittedExpression,
    ExpressionWithTypeArguments,
    AsExpression,
    SatisfiesExpression,
    NonNullExpression,
    TemplateSpan,
    PropertyAssignment,
    ShorthandPropertyAssignment,
    SpreadAssignment,

    // ========================================================================
    // Statements and declarations
    // ========================================================================
    Block,
    EmptyStatement,
    VariableStatement,
    ExpressionStatement,
    IfStatement,
    DoStatement,
    WhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    ContinueStatement,
    BreakStatement,
    ReturnStatement,
    SwitchStatement,
    LabeledStatement,
    ThrowStatement,
    TryStatement,
    DebuggerStatement,
    VariableDeclaration,
    VariableDeclarationList,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    ModuleDeclaration,
    ModuleBlock,
    CaseBlock,
    ImportDeclaration,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ExportDeclaration,
    NamedExports,
    ExportSpecifier,
    ExportAssignment,

    // Clauses
    CaseClause,
    DefaultClause,
    HeritageClause,
    CatchClause,
    EnumMember,

    SourceFile,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::OfKeyword;
    pub const LAST_RESERVED_WORD: SyntaxKind = SyntaxKind::WithKeyword;
    pub const FIRST_TYPE_NODE: SyntaxKind = SyntaxKind::TypePredicate;
    pub const LAST_TYPE_NODE: SyntaxKind = SyntaxKind::NamedTupleMember;

    #[inline]
    fn in_range(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    /// Reserved words can never be identifiers.
    #[inline]
    pub fn is_reserved_word(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_RESERVED_WORD)
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self.in_range(SyntaxKind::EqualsToken, SyntaxKind::QuestionQuestionEqualsToken)
    }

    #[inline]
    pub fn is_compound_assignment(self) -> bool {
        self.in_range(SyntaxKind::PlusEqualsToken, SyntaxKind::QuestionQuestionEqualsToken)
    }

    /// The binary operator a compound assignment applies (`+=` gives `+`).
    pub fn compound_operator(self) -> Option<SyntaxKind> {
        Some(match self {
            SyntaxKind::PlusEqualsToken => SyntaxKind::PlusToken,
            SyntaxKind::MinusEqualsToken => SyntaxKind::MinusToken,
            SyntaxKind::AsteriskEqualsToken => SyntaxKind::AsteriskToken,
            SyntaxKind::AsteriskAsteriskEqualsToken => SyntaxKind::AsteriskAsteriskToken,
            SyntaxKind::SlashEqualsToken => SyntaxKind::SlashToken,
            SyntaxKind::PercentEqualsToken => SyntaxKind::PercentToken,
            SyntaxKind::LessThanLessThanEqualsToken => SyntaxKind::LessThanLessThanToken,
            SyntaxKind::GreaterThanGreaterThanEqualsToken => SyntaxKind::GreaterThanGreaterThanToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => {
                SyntaxKind::GreaterThanGreaterThanGreaterThanToken
            }
            SyntaxKind::AmpersandEqualsToken => SyntaxKind::AmpersandToken,
            SyntaxKind::BarEqualsToken => SyntaxKind::BarToken,
            SyntaxKind::CaretEqualsToken => SyntaxKind::CaretToken,
            SyntaxKind::BarBarEqualsToken => SyntaxKind::BarBarToken,
            SyntaxKind::AmpersandAmpersandEqualsToken => SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::QuestionQuestionEqualsToken => SyntaxKind::QuestionQuestionToken,
            _ => return None,
        })
    }

    /// Keywords that name a built-in type when used in a type position.
    #[inline]
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::ObjectKeyword
        )
    }

    #[inline]
    pub fn is_type_node(self) -> bool {
        self.in_range(Self::FIRST_TYPE_NODE, Self::LAST_TYPE_NODE) || self.is_type_keyword()
    }

    /// Function-like declarations and expressions that own a body and a
    /// parameter list.
    #[inline]
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
                | SyntaxKind::IndexSignature
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
        )
    }

    /// Function-like kinds that may carry an executable body.
    #[inline]
    pub fn is_function_like_with_body(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
        )
    }

    #[inline]
    pub fn is_statement(self) -> bool {
        self.in_range(SyntaxKind::Block, SyntaxKind::DebuggerStatement)
            || matches!(
                self,
                SyntaxKind::FunctionDeclaration
                    | SyntaxKind::ClassDeclaration
                    | SyntaxKind::InterfaceDeclaration
                    | SyntaxKind::TypeAliasDeclaration
                    | SyntaxKind::EnumDeclaration
                    | SyntaxKind::ModuleDeclaration
                    | SyntaxKind::ImportDeclaration
                    | SyntaxKind::ExportDeclaration
                    | SyntaxKind::ExportAssignment
            )
    }

    #[inline]
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::VariableDeclaration
                | SyntaxKind::Parameter
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertySignature
                | SyntaxKind::PropertyAssignment
                | SyntaxKind::ShorthandPropertyAssignment
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::ClassDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::TypeAliasDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::EnumMember
                | SyntaxKind::ModuleDeclaration
                | SyntaxKind::ImportClause
                | SyntaxKind::NamespaceImport
                | SyntaxKind::ImportSpecifier
                | SyntaxKind::ExportSpecifier
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::TypeParameter
                | SyntaxKind::IndexSignature
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
        )
    }

    /// Text used when a kind appears in a diagnostic.
    pub fn text(self) -> &'static str {
        self.keyword_text()
            .or_else(|| self.punctuation_text())
            .unwrap_or("")
    }
}

keywords! {
    BreakKeyword => "break",
    CaseKeyword => "case",
    CatchKeyword => "catch",
    ClassKeyword => "class",
    ConstKeyword => "const",
    ContinueKeyword => "continue",
    DebuggerKeyword => "debugger",
    DefaultKeyword => "default",
    DeleteKeyword => "delete",
    DoKeyword => "do",
    ElseKeyword => "else",
    EnumKeyword => "enum",
    ExportKeyword => "export",
    ExtendsKeyword => "extends",
    FalseKeyword => "false",
    FinallyKeyword => "finally",
    ForKeyword => "for",
    FunctionKeyword => "function",
    IfKeyword => "if",
    ImportKeyword => "import",
    InKeyword => "in",
    InstanceOfKeyword => "instanceof",
    NewKeyword => "new",
    NullKeyword => "null",
    ReturnKeyword => "return",
    SuperKeyword => "super",
    SwitchKeyword => "switch",
    ThisKeyword => "this",
    ThrowKeyword => "throw",
    TrueKeyword => "true",
    TryKeyword => "try",
    TypeOfKeyword => "typeof",
    VarKeyword => "var",
    VoidKeyword => "void",
    WhileKeyword => "while",
    WithKeyword => "with",
    ImplementsKeyword => "implements",
    InterfaceKeyword => "interface",
    LetKeyword => "let",
    PackageKeyword => "package",
    PrivateKeyword => "private",
    ProtectedKeyword => "protected",
    PublicKeyword => "public",
    StaticKeyword => "static",
    YieldKeyword => "yield",
    AbstractKeyword => "abstract",
    AsKeyword => "as",
    AssertsKeyword => "asserts",
    AnyKeyword => "any",
    AsyncKeyword => "async",
    AwaitKeyword => "await",
    BooleanKeyword => "boolean",
    ConstructorKeyword => "constructor",
    DeclareKeyword => "declare",
    GetKeyword => "get",
    InferKeyword => "infer",
    IsKeyword => "is",
    KeyOfKeyword => "keyof",
    ModuleKeyword => "module",
    NamespaceKeyword => "namespace",
    NeverKeyword => "never",
    OutKeyword => "out",
    ReadonlyKeyword => "readonly",
    NumberKeyword => "number",
    ObjectKeyword => "object",
    SatisfiesKeyword => "satisfies",
    SetKeyword => "set",
    StringKeyword => "string",
    SymbolKeyword => "symbol",
    TypeKeyword => "type",
    UndefinedKeyword => "undefined",
    UniqueKeyword => "unique",
    UnknownKeyword => "unknown",
    FromKeyword => "from",
    GlobalKeyword => "global",
    BigIntKeyword => "bigint",
    OfKeyword => "of",
}

punctuation! {
    OpenBraceToken => "{",
    CloseBraceToken => "}",
    OpenParenToken => "(",
    CloseParenToken => ")",
    OpenBracketToken => "[",
    CloseBracketToken => "]",
    DotToken => ".",
    DotDotDotToken => "...",
    SemicolonToken => ";",
    CommaToken => ",",
    QuestionDotToken => "?.",
    LessThanToken => "<",
    GreaterThanToken => ">",
    LessThanEqualsToken => "<=",
    GreaterThanEqualsToken => ">=",
    EqualsEqualsToken => "==",
    ExclamationEqualsToken => "!=",
    EqualsEqualsEqualsToken => "===",
    ExclamationEqualsEqualsToken => "!==",
    EqualsGreaterThanToken => "=>",
    PlusToken => "+",
    MinusToken => "-",
    AsteriskToken => "*",
    AsteriskAsteriskToken => "**",
    SlashToken => "/",
    PercentToken => "%",
    PlusPlusToken => "++",
    MinusMinusToken => "--",
    LessThanLessThanToken => "<<",
    GreaterThanGreaterThanToken => ">>",
    GreaterThanGreaterThanGreaterThanToken => ">>>",
    AmpersandToken => "&",
    BarToken => "|",
    CaretToken => "^",
    ExclamationToken => "!",
    TildeToken => "~",
    AmpersandAmpersandToken => "&&",
    BarBarToken => "||",
    QuestionToken => "?",
    ColonToken => ":",
    AtToken => "@",
    QuestionQuestionToken => "??",
    EqualsToken => "=",
    PlusEqualsToken => "+=",
    MinusEqualsToken => "-=",
    AsteriskEqualsToken => "*=",
    AsteriskAsteriskEqualsToken => "**=",
    SlashEqualsToken => "/=",
    PercentEqualsToken => "%=",
    LessThanLessThanEqualsToken => "<<=",
    GreaterThanGreaterThanEqualsToken => ">>=",
    GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
    AmpersandEqualsToken => "&=",
    BarEqualsToken => "|=",
    CaretEqualsToken => "^=",
    BarBarEqualsToken => "||=",
    AmpersandAmpersandEqualsToken => "&&=",
    QuestionQuestionEqualsToken => "??=",
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_round_trips_text() {
        assert_eq!(SyntaxKind::from_keyword("instanceof"), Some(SyntaxKind::InstanceOfKeyword));
        assert_eq!(SyntaxKind::KeyOfKeyword.keyword_text(), Some("keyof"));
        assert_eq!(SyntaxKind::from_keyword("foo"), None);
    }

    #[test]
    fn test_reserved_words_are_a_prefix_of_keywords() {
        assert!(SyntaxKind::VarKeyword.is_reserved_word());
        assert!(SyntaxKind::TypeKeyword.is_keyword());
        assert!(!SyntaxKind::TypeKeyword.is_reserved_word());
    }

    #[test]
    fn test_compound_assignment_operator() {
        assert!(SyntaxKind::PlusEqualsToken.is_compound_assignment());
        assert!(!SyntaxKind::EqualsToken.is_compound_assignment());
        assert_eq!(SyntaxKind::QuestionQuestionEqualsToken.compound_operator(), Some(SyntaxKind::QuestionQuestionToken));
    }
}
