//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Only the declaration-level subset of TypeScript gets structured nodes;
//! other statements are kept as `OTHER_STMT` token runs.

/// All syntax kinds (tokens and nodes) of the TypeScript declaration subset
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, type expressions, members).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,    // identifier
    NUMBER,   // 42, 0x2a, 1_000n
    STRING,   // "hello" or 'hello'
    TEMPLATE, // `hello ${name}`
    REGEX,    // /[a-z]+/gi

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COLON,       // :
    COMMA,       // ,
    DOT,         // .
    DOT_DOT_DOT, // ...
    QUESTION,    // ?
    EQ,          // =
    FAT_ARROW,   // =>
    LT,          // <
    GT,          // >
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    SLASH,       // /
    PERCENT,     // %
    AMP,         // &
    PIPE,        // |
    CARET,       // ^
    BANG,        // !
    TILDE,       // ~
    AT,          // @
    HASH,        // #
    BACKSLASH,   // \

    // =========================================================================
    // KEYWORDS (reserved and contextual)
    // =========================================================================
    ABSTRACT_KW,
    AS_KW,
    ASSERTS_KW,
    ASYNC_KW,
    CLASS_KW,
    CONST_KW,
    DECLARE_KW,
    DEFAULT_KW,
    ENUM_KW,
    EXPORT_KW,
    EXTENDS_KW,
    FALSE_KW,
    FROM_KW,
    FUNCTION_KW,
    GET_KW,
    GLOBAL_KW,
    IMPLEMENTS_KW,
    IMPORT_KW,
    IN_KW,
    INFER_KW,
    INTERFACE_KW,
    IS_KW,
    KEYOF_KW,
    LET_KW,
    MODULE_KW,
    NAMESPACE_KW,
    NEW_KW,
    NULL_KW,
    OUT_KW,
    READONLY_KW,
    SET_KW,
    THIS_KW,
    TRUE_KW,
    TYPE_KW,
    TYPEOF_KW,
    UNIQUE_KW,
    VAR_KW,
    VOID_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Unrecognized character
    ERROR,
    /// End of input (never stored in the tree)
    EOF,

    // =========================================================================
    // NODES - statements
    // =========================================================================
    SOURCE_FILE,
    /// `{ ... }` statement list (also used for namespace bodies)
    BLOCK,
    /// Any statement without a structured representation
    OTHER_STMT,
    IMPORT_DECL,
    IMPORT_DEFAULT,
    IMPORT_NAMESPACE,
    NAMED_IMPORTS,
    IMPORT_SPECIFIER,
    MODULE_SOURCE,
    EXPORT_DECL,
    EXPORT_DEFAULT_DECL,
    EXPORT_NAMED,
    EXPORT_ALL,
    EXPORT_SPECIFIER,
    EXPORT_NAMESPACE_SPECIFIER,
    EXPORT_DEFAULT_SPECIFIER,
    MODULE_DECL,
    INTERFACE_DECL,
    TYPE_ALIAS_DECL,
    ENUM_DECL,
    ENUM_MEMBER,
    INITIALIZER,

    // =========================================================================
    // NODES - names and type parameters
    // =========================================================================
    NAME,
    ENTITY_NAME,
    TYPE_PARAMS,
    TYPE_PARAM,
    TYPE_ARGS,
    HERITAGE_CLAUSE,
    HERITAGE_TYPE,
    TYPE_ANNOTATION,

    // =========================================================================
    // NODES - type members
    // =========================================================================
    PROPERTY_SIG,
    METHOD_SIG,
    CALL_SIG,
    CONSTRUCT_SIG,
    INDEX_SIG,
    PROPERTY_KEY,
    PARAM_LIST,
    PARAM,

    // =========================================================================
    // NODES - type expressions
    // =========================================================================
    UNION_TYPE,
    INTERSECTION_TYPE,
    CONDITIONAL_TYPE,
    TYPE_OPERATOR,
    INFER_TYPE,
    INDEXED_ACCESS_TYPE,
    ARRAY_TYPE,
    TUPLE_TYPE,
    TUPLE_ELEMENT,
    FUNCTION_TYPE,
    CONSTRUCTOR_TYPE,
    TYPE_PREDICATE,
    PAREN_TYPE,
    TYPE_REF,
    TYPE_QUERY,
    IMPORT_TYPE,
    LITERAL_TYPE,
    KEYWORD_TYPE,
    OBJECT_TYPE,
    MAPPED_TYPE,
    MAPPED_TYPE_PARAM,

    // Must be last
    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a comment token
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ABSTRACT_KW as u16) && (self as u16) <= (Self::VOID_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::BACKSLASH as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::NUMBER | Self::STRING | Self::TEMPLATE | Self::REGEX)
    }

    /// Identifiers and keywords can both be used where a name is expected
    /// (property keys, specifiers, qualified name segments).
    pub fn is_name(self) -> bool {
        self == Self::IDENT || self.is_keyword()
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeScriptLanguage {}

impl rowan::Language for TypeScriptLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<TypeScriptLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TypeScriptLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TypeScriptLanguage>;
