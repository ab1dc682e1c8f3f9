//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Accessors return `Option` because the tree may be incomplete after errors.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};
use smol_str::SmolStr;
use std::borrow::Cow;

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper utilities
// ============================================================================

#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

#[inline]
fn first_token(node: &SyntaxNode, pred: impl Fn(SyntaxKind) -> bool) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| pred(t.kind()))
}

/// Strip the quotes of a string literal and resolve its escapes.
pub fn unquote(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'' || first == b'`') && first == last {
            return unescape(&text[1..text.len() - 1]);
        }
    }
    Cow::Borrowed(text)
}

fn unescape(body: &str) -> Cow<'_, str> {
    if !body.contains('\\') {
        return Cow::Borrowed(body);
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            // line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
                push_code_point(&mut out, &hex, 'u');
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                push_code_point(&mut out, &hex, 'u');
            }
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Push the character of a hex escape, or the escape as written when it is
/// malformed.
fn push_code_point(out: &mut String, hex: &str, marker: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(hex);
        }
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Generate an enum over several node kinds with `AstNode` dispatch.
macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($type:ident) = $kind:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($type)),+
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => Some(Self::$variant($type(node))),)+
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(it) => &it.0,)+
                }
            }
        }
    };
}

// ============================================================================
// Root and names
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Wrap the root of a parse. The parser always produces `SOURCE_FILE`.
    pub fn cast_root(node: SyntaxNode) -> Self {
        Self(node)
    }

    children_method!(imports, ImportDecl);
    children_method!(export_alls, ExportAll);
    children_method!(export_lists, ExportNamed);

    /// Every interface, type alias and enum in the file, at any depth.
    pub fn declarations(&self) -> impl Iterator<Item = Decl> + '_ {
        self.0.descendants().filter_map(Decl::cast)
    }
}

ast_node!(Name, NAME);

impl Name {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, |kind| kind.is_name() || kind == SyntaxKind::STRING)
    }

    /// The name text; string-literal names are unquoted.
    pub fn text(&self) -> Option<SmolStr> {
        self.token().map(|t| SmolStr::new(unquote(t.text())))
    }
}

ast_node!(EntityName, ENTITY_NAME);

impl EntityName {
    /// The dotted segments of a qualified name (`A.B.C` -> `[A, B, C]`).
    pub fn segments(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind().is_name())
    }

    pub fn first_segment(&self) -> Option<SmolStr> {
        self.segments().next().map(|t| SmolStr::new(t.text()))
    }

    pub fn is_qualified(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOT)
    }
}

// ============================================================================
// Imports
// ============================================================================

ast_node!(ImportDecl, IMPORT_DECL);
ast_node!(ImportDefault, IMPORT_DEFAULT);
ast_node!(ImportNamespace, IMPORT_NAMESPACE);
ast_node!(NamedImports, NAMED_IMPORTS);
ast_node!(ImportSpecifier, IMPORT_SPECIFIER);
ast_node!(ModuleSource, MODULE_SOURCE);

impl ImportDecl {
    first_child_method!(default_import, ImportDefault);
    first_child_method!(namespace_import, ImportNamespace);
    first_child_method!(named_imports, NamedImports);
    first_child_method!(source, ModuleSource);
}

impl ImportDefault {
    first_child_method!(name, Name);
}

impl ImportNamespace {
    first_child_method!(name, Name);
}

impl NamedImports {
    children_method!(specifiers, ImportSpecifier);
}

impl ImportSpecifier {
    /// The name exported by the source module.
    pub fn imported(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// The local binding (`b` in `a as b`, else the imported name).
    pub fn local(&self) -> Option<Name> {
        self.0.children().filter_map(Name::cast).last()
    }
}

impl ModuleSource {
    pub fn value(&self) -> Option<String> {
        first_token(&self.0, |kind| kind == SyntaxKind::STRING).map(|t| unquote(t.text()).to_string())
    }
}

// ============================================================================
// Exports
// ============================================================================

ast_node!(ExportDecl, EXPORT_DECL);
ast_node!(ExportDefaultDecl, EXPORT_DEFAULT_DECL);
ast_node!(ExportAll, EXPORT_ALL);
ast_node!(ExportNamed, EXPORT_NAMED);
ast_node!(ExportSpecifier, EXPORT_SPECIFIER);
ast_node!(ExportNamespaceSpecifier, EXPORT_NAMESPACE_SPECIFIER);
ast_node!(ExportDefaultSpecifier, EXPORT_DEFAULT_SPECIFIER);

impl ExportAll {
    first_child_method!(source, ModuleSource);
}

impl ExportNamed {
    first_child_method!(source, ModuleSource);
    first_child_method!(namespace_specifier, ExportNamespaceSpecifier);
    first_child_method!(default_specifier, ExportDefaultSpecifier);
    children_method!(specifiers, ExportSpecifier);
}

impl ExportSpecifier {
    /// The name in the source module.
    pub fn local(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// The externally visible name.
    pub fn exported(&self) -> Option<Name> {
        self.0.children().filter_map(Name::cast).last()
    }
}

impl ExportNamespaceSpecifier {
    first_child_method!(name, Name);
}

// ============================================================================
// Declarations
// ============================================================================

ast_enum! {
    /// A declaration that can become a schema
    Decl {
        Interface(InterfaceDecl) = INTERFACE_DECL,
        TypeAlias(TypeAliasDecl) = TYPE_ALIAS_DECL,
        Enum(EnumDecl) = ENUM_DECL,
    }
}

impl Decl {
    pub fn name(&self) -> Option<Name> {
        self.syntax().children().find_map(Name::cast)
    }

    /// The `export` / `export default` wrapper around this declaration, if any.
    pub fn export_wrapper(&self) -> Option<SyntaxNode> {
        self.syntax()
            .parent()
            .filter(|p| matches!(p.kind(), SyntaxKind::EXPORT_DECL | SyntaxKind::EXPORT_DEFAULT_DECL))
    }

    /// Declared directly in the file, not inside a namespace or a block.
    pub fn is_top_level(&self) -> bool {
        let node = self.export_wrapper().unwrap_or_else(|| self.syntax().clone());
        node.parent()
            .is_some_and(|p| p.kind() == SyntaxKind::SOURCE_FILE)
    }

    pub fn is_exported(&self) -> bool {
        self.export_wrapper().is_some()
    }

    pub fn is_exported_as_default(&self) -> bool {
        self.export_wrapper()
            .is_some_and(|w| w.kind() == SyntaxKind::EXPORT_DEFAULT_DECL)
    }

    /// The comment closest before the declaration, or before its export wrapper.
    pub fn leading_comment(&self) -> Option<SyntaxToken> {
        leading_comment(self.syntax())
            .or_else(|| self.export_wrapper().and_then(|w| leading_comment(&w)))
    }
}

/// Last comment in the trivia run directly preceding `node`.
pub fn leading_comment(node: &SyntaxNode) -> Option<SyntaxToken> {
    let mut current = node.prev_sibling_or_token();
    while let Some(element) = current {
        let token = element.into_token()?;
        match token.kind() {
            SyntaxKind::WHITESPACE => current = token.prev_sibling_or_token(),
            kind if kind.is_comment() => return Some(token),
            _ => return None,
        }
    }
    None
}

/// Block tags (`@name`) found at the start of a line in a comment.
///
/// The comment is unwrapped first: delimiters and leading `*` are removed
/// from every line.
pub fn doc_tags(comment: &str) -> Vec<&str> {
    let body = if let Some(rest) = comment.strip_prefix("//") {
        rest
    } else {
        comment
            .strip_prefix("/*")
            .map(|s| s.strip_suffix("*/").unwrap_or(s))
            .unwrap_or(comment)
    };

    body.lines()
        .filter_map(|line| {
            let line = line.trim_start().trim_start_matches('*').trim_start();
            let title = line.strip_prefix('@')?;
            let end = title
                .find(|c: char| c.is_whitespace() || "><(){}[],:*|?!=".contains(c))
                .unwrap_or(title.len());
            (end > 0).then(|| &title[..end])
        })
        .collect()
}

ast_node!(InterfaceDecl, INTERFACE_DECL);
ast_node!(HeritageClause, HERITAGE_CLAUSE);
ast_node!(HeritageType, HERITAGE_TYPE);
ast_node!(TypeAliasDecl, TYPE_ALIAS_DECL);
ast_node!(EnumDecl, ENUM_DECL);
ast_node!(EnumMember, ENUM_MEMBER);
ast_node!(Initializer, INITIALIZER);
ast_node!(TypeParams, TYPE_PARAMS);
ast_node!(TypeParam, TYPE_PARAM);
ast_node!(TypeArgs, TYPE_ARGS);

impl InterfaceDecl {
    first_child_method!(name, Name);
    first_child_method!(type_params, TypeParams);
    first_child_method!(heritage, HeritageClause);
    first_child_method!(body, ObjectType);

    pub fn extends(&self) -> impl Iterator<Item = HeritageType> {
        self.heritage()
            .into_iter()
            .flat_map(|h| h.0.children().filter_map(HeritageType::cast).collect::<Vec<_>>())
    }
}

impl HeritageType {
    first_child_method!(entity_name, EntityName);
    first_child_method!(type_args, TypeArgs);
}

impl TypeAliasDecl {
    first_child_method!(name, Name);
    first_child_method!(type_params, TypeParams);
    first_child_method!(ty, Type);
}

impl EnumDecl {
    first_child_method!(name, Name);
    children_method!(members, EnumMember);
    has_token_method!(is_const, CONST_KW);
    has_token_method!(is_declare, DECLARE_KW);
}

impl EnumMember {
    first_child_method!(key, PropertyKey);
    first_child_method!(initializer, Initializer);
}

impl Initializer {
    pub fn text(&self) -> String {
        self.0.text().to_string().trim().to_string()
    }
}

impl TypeParams {
    children_method!(params, TypeParam);
}

impl TypeParam {
    first_child_method!(name, Name);
}

impl TypeArgs {
    children_method!(types, Type);
}

// ============================================================================
// Type members
// ============================================================================

ast_node!(ObjectType, OBJECT_TYPE);
ast_node!(PropertySig, PROPERTY_SIG);
ast_node!(MethodSig, METHOD_SIG);
ast_node!(CallSig, CALL_SIG);
ast_node!(ConstructSig, CONSTRUCT_SIG);
ast_node!(IndexSig, INDEX_SIG);
ast_node!(PropertyKey, PROPERTY_KEY);
ast_node!(Param, PARAM);
ast_node!(TypeAnnotation, TYPE_ANNOTATION);

ast_enum! {
    /// A member of an interface body or object type literal
    TypeMember {
        Property(PropertySig) = PROPERTY_SIG,
        Method(MethodSig) = METHOD_SIG,
        Call(CallSig) = CALL_SIG,
        Construct(ConstructSig) = CONSTRUCT_SIG,
        Index(IndexSig) = INDEX_SIG,
    }
}

impl ObjectType {
    children_method!(members, TypeMember);
}

impl PropertySig {
    first_child_method!(key, PropertyKey);
    first_child_method!(annotation, TypeAnnotation);
    has_token_method!(is_optional, QUESTION);
    has_token_method!(is_readonly, READONLY_KW);

    pub fn ty(&self) -> Option<Type> {
        self.annotation().and_then(|a| a.ty())
    }
}

impl MethodSig {
    first_child_method!(key, PropertyKey);
}

impl IndexSig {
    first_child_method!(param, Param);
    first_child_method!(annotation, TypeAnnotation);

    /// The key type (`string` in `[k: string]: T`).
    pub fn key_ty(&self) -> Option<Type> {
        self.param().and_then(|p| p.annotation()).and_then(|a| a.ty())
    }

    pub fn value_ty(&self) -> Option<Type> {
        self.annotation().and_then(|a| a.ty())
    }
}

impl Param {
    first_child_method!(annotation, TypeAnnotation);
}

impl TypeAnnotation {
    first_child_method!(ty, Type);
}

impl PropertyKey {
    /// The key as written, unquoted. `None` for computed keys.
    pub fn text(&self) -> Option<SmolStr> {
        if self.is_computed() {
            return None;
        }
        let token = first_token(&self.0, |kind| {
            kind.is_name() || matches!(kind, SyntaxKind::STRING | SyntaxKind::NUMBER)
        })?;
        Some(SmolStr::new(unquote(token.text())))
    }

    pub fn is_computed(&self) -> bool {
        has_token(&self.0, SyntaxKind::L_BRACKET)
    }
}

// ============================================================================
// Type expressions
// ============================================================================

ast_node!(UnionType, UNION_TYPE);
ast_node!(IntersectionType, INTERSECTION_TYPE);
ast_node!(ConditionalType, CONDITIONAL_TYPE);
ast_node!(TypeOperator, TYPE_OPERATOR);
ast_node!(InferType, INFER_TYPE);
ast_node!(IndexedAccessType, INDEXED_ACCESS_TYPE);
ast_node!(ArrayType, ARRAY_TYPE);
ast_node!(TupleType, TUPLE_TYPE);
ast_node!(TupleElement, TUPLE_ELEMENT);
ast_node!(FunctionType, FUNCTION_TYPE);
ast_node!(ConstructorType, CONSTRUCTOR_TYPE);
ast_node!(TypePredicate, TYPE_PREDICATE);
ast_node!(ParenType, PAREN_TYPE);
ast_node!(TypeRef, TYPE_REF);
ast_node!(TypeQuery, TYPE_QUERY);
ast_node!(ImportType, IMPORT_TYPE);
ast_node!(LiteralType, LITERAL_TYPE);
ast_node!(KeywordType, KEYWORD_TYPE);
ast_node!(MappedType, MAPPED_TYPE);

ast_enum! {
    /// Any type expression
    Type {
        Union(UnionType) = UNION_TYPE,
        Intersection(IntersectionType) = INTERSECTION_TYPE,
        Conditional(ConditionalType) = CONDITIONAL_TYPE,
        Operator(TypeOperator) = TYPE_OPERATOR,
        Infer(InferType) = INFER_TYPE,
        IndexedAccess(IndexedAccessType) = INDEXED_ACCESS_TYPE,
        Array(ArrayType) = ARRAY_TYPE,
        Tuple(TupleType) = TUPLE_TYPE,
        Function(FunctionType) = FUNCTION_TYPE,
        Constructor(ConstructorType) = CONSTRUCTOR_TYPE,
        Predicate(TypePredicate) = TYPE_PREDICATE,
        Paren(ParenType) = PAREN_TYPE,
        Ref(TypeRef) = TYPE_REF,
        Query(TypeQuery) = TYPE_QUERY,
        Import(ImportType) = IMPORT_TYPE,
        Literal(LiteralType) = LITERAL_TYPE,
        Keyword(KeywordType) = KEYWORD_TYPE,
        Object(ObjectType) = OBJECT_TYPE,
        Mapped(MappedType) = MAPPED_TYPE,
    }
}

impl UnionType {
    children_method!(types, Type);
}

impl IntersectionType {
    children_method!(types, Type);
}

impl TypeOperator {
    first_child_method!(ty, Type);

    pub fn operator(&self) -> Option<SyntaxKind> {
        first_token(&self.0, |kind| {
            matches!(
                kind,
                SyntaxKind::KEYOF_KW | SyntaxKind::READONLY_KW | SyntaxKind::UNIQUE_KW
            )
        })
        .map(|t| t.kind())
    }
}

impl ArrayType {
    first_child_method!(element, Type);
}

impl TupleType {
    children_method!(elements, TupleElement);
}

impl TupleElement {
    first_child_method!(ty, Type);
    first_child_method!(label, Name);
    has_token_method!(is_optional, QUESTION);
    has_token_method!(is_rest, DOT_DOT_DOT);
}

impl ParenType {
    first_child_method!(ty, Type);
}

impl TypeRef {
    first_child_method!(entity_name, EntityName);
    first_child_method!(type_args, TypeArgs);

    /// Type arguments, empty when there are none.
    pub fn args(&self) -> Vec<Type> {
        self.type_args()
            .map(|args| args.types().collect())
            .unwrap_or_default()
    }
}

impl LiteralType {
    /// The literal as written (`"a"`, `-1`, `true`, `` `x` ``).
    pub fn text(&self) -> String {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string())
            .collect()
    }

    pub fn token_kind(&self) -> Option<SyntaxKind> {
        first_token(&self.0, |kind| kind != SyntaxKind::MINUS && !kind.is_trivia()).map(|t| t.kind())
    }
}

impl KeywordType {
    pub fn keyword(&self) -> Option<SmolStr> {
        first_token(&self.0, |kind| !kind.is_trivia()).map(|t| SmolStr::new(t.text()))
    }
}

/// First identifiers of every reference in a type position under `node`,
/// in document order.
///
/// Only type references and `extends` heritage count. Names inside `typeof`
/// queries and `import(...)` types denote values or modules and are skipped.
pub fn type_references(node: &SyntaxNode) -> Vec<SmolStr> {
    node.descendants()
        .filter(|n| matches!(n.kind(), SyntaxKind::TYPE_REF | SyntaxKind::HERITAGE_TYPE))
        .filter_map(|n| n.children().find_map(EntityName::cast))
        .filter_map(|entity| entity.first_segment())
        .collect()
}
