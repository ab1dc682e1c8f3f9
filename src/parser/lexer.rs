//! Logos-based lexer for TypeScript sources
//!
//! Fast tokenization using the logos crate. The lexer is lossless: every byte
//! of the input ends up in exactly one token, trivia included.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
///
/// A `/` is either division or the start of a regular expression literal;
/// logos only sees the former, so the wrapper decides from the preceding
/// tokens and extends the token over the whole literal.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
    slash: SlashContext,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
            slash: SlashContext::default(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let mut kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        if kind == SyntaxKind::SLASH && self.slash.regex_allowed {
            if let Some(len) = regex_literal_len(self.inner.remainder()) {
                self.inner.bump(len);
                kind = SyntaxKind::REGEX;
            }
        }

        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;
        self.slash.advance(kind, text);

        Some(Token { kind, text, offset })
    }
}

/// Words after which an expression operand is expected.
const OPERAND_KEYWORDS: &[&str] = &[
    "return", "case", "do", "else", "instanceof", "delete", "throw", "yield", "await", "of",
];

/// Statement heads whose parenthesized part is followed by a statement.
const CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "with"];

/// Tracks whether a `/` at the current point begins an operand.
#[derive(Debug)]
struct SlashContext {
    regex_allowed: bool,
    after_control_keyword: bool,
    /// One entry per open `(`: whether it opened a control statement head.
    parens: Vec<bool>,
}

impl Default for SlashContext {
    fn default() -> Self {
        Self {
            regex_allowed: true,
            after_control_keyword: false,
            parens: Vec::new(),
        }
    }
}

impl SlashContext {
    fn advance(&mut self, kind: SyntaxKind, text: &str) {
        if kind.is_trivia() {
            return;
        }
        self.regex_allowed = match kind {
            SyntaxKind::L_PAREN => {
                self.parens.push(self.after_control_keyword);
                true
            }
            // `if (x) /re/.test(y)` vs `(a + b) / 2`
            SyntaxKind::R_PAREN => self.parens.pop().unwrap_or(false),
            SyntaxKind::IDENT => OPERAND_KEYWORDS.contains(&text),
            SyntaxKind::IN_KW
            | SyntaxKind::TYPEOF_KW
            | SyntaxKind::VOID_KW
            | SyntaxKind::NEW_KW
            | SyntaxKind::DEFAULT_KW => true,
            SyntaxKind::NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::TEMPLATE
            | SyntaxKind::REGEX
            | SyntaxKind::R_BRACKET
            | SyntaxKind::ERROR => false,
            kind if kind.is_keyword() => false,
            _ => true,
        };
        self.after_control_keyword =
            kind == SyntaxKind::IDENT && CONTROL_KEYWORDS.contains(&text);
    }
}

/// Length of the rest of a regular expression literal (body, closing `/`
/// and flags) given the input after its opening `/`. `None` when the
/// literal does not close on the same line.
fn regex_literal_len(rest: &str) -> Option<usize> {
    let mut in_class = false;
    let mut chars = rest.char_indices();
    let body_end = loop {
        let (idx, c) = chars.next()?;
        match c {
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => return None,
            '\\' => match chars.next() {
                None | Some((_, '\n' | '\r' | '\u{2028}' | '\u{2029}')) => return None,
                Some(_) => {}
            },
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => break idx + 1,
            _ => {}
        }
    };
    let flags: usize = rest[body_end..]
        .chars()
        .take_while(|&c| unicode_ident::is_xid_continue(c) || c == '$')
        .map(char::len_utf8)
        .sum();
    Some(body_end + flags)
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\x0C\x{FEFF}\x{A0}]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*")]
    Ident,

    #[regex(r"(0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?)n?")]
    Number,

    #[regex(r#""([^"\\\n]|\\(.|\n))*""#)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*'"#)]
    String,

    #[regex(r"`([^`\\]|\\(.|\n))*`")]
    Template,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    DotDotDot,

    #[token("=>")]
    FatArrow,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("@")]
    At,
    #[token("#")]
    Hash,
    #[token("\\")]
    Backslash,

    // =========================================================================
    // KEYWORDS (alphabetical, longest match wins in logos)
    // =========================================================================
    #[token("abstract")]
    AbstractKw,
    #[token("as")]
    AsKw,
    #[token("asserts")]
    AssertsKw,
    #[token("async")]
    AsyncKw,
    #[token("class")]
    ClassKw,
    #[token("const")]
    ConstKw,
    #[token("declare")]
    DeclareKw,
    #[token("default")]
    DefaultKw,
    #[token("enum")]
    EnumKw,
    #[token("export")]
    ExportKw,
    #[token("extends")]
    ExtendsKw,
    #[token("false")]
    FalseKw,
    #[token("from")]
    FromKw,
    #[token("function")]
    FunctionKw,
    #[token("get")]
    GetKw,
    #[token("global")]
    GlobalKw,
    #[token("implements")]
    ImplementsKw,
    #[token("import")]
    ImportKw,
    #[token("in")]
    InKw,
    #[token("infer")]
    InferKw,
    #[token("interface")]
    InterfaceKw,
    #[token("is")]
    IsKw,
    #[token("keyof")]
    KeyofKw,
    #[token("let")]
    LetKw,
    #[token("module")]
    ModuleKw,
    #[token("namespace")]
    NamespaceKw,
    #[token("new")]
    NewKw,
    #[token("null")]
    NullKw,
    #[token("out")]
    OutKw,
    #[token("readonly")]
    ReadonlyKw,
    #[token("set")]
    SetKw,
    #[token("this")]
    ThisKw,
    #[token("true")]
    TrueKw,
    #[token("type")]
    TypeKw,
    #[token("typeof")]
    TypeofKw,
    #[token("unique")]
    UniqueKw,
    #[token("var")]
    VarKw,
    #[token("void")]
    VoidKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            Ident => SyntaxKind::IDENT,
            Number => SyntaxKind::NUMBER,
            String => SyntaxKind::STRING,
            Template => SyntaxKind::TEMPLATE,
            DotDotDot => SyntaxKind::DOT_DOT_DOT,
            FatArrow => SyntaxKind::FAT_ARROW,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Question => SyntaxKind::QUESTION,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Bang => SyntaxKind::BANG,
            Tilde => SyntaxKind::TILDE,
            At => SyntaxKind::AT,
            Hash => SyntaxKind::HASH,
            Backslash => SyntaxKind::BACKSLASH,
            AbstractKw => SyntaxKind::ABSTRACT_KW,
            AsKw => SyntaxKind::AS_KW,
            AssertsKw => SyntaxKind::ASSERTS_KW,
            AsyncKw => SyntaxKind::ASYNC_KW,
            ClassKw => SyntaxKind::CLASS_KW,
            ConstKw => SyntaxKind::CONST_KW,
            DeclareKw => SyntaxKind::DECLARE_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            EnumKw => SyntaxKind::ENUM_KW,
            ExportKw => SyntaxKind::EXPORT_KW,
            ExtendsKw => SyntaxKind::EXTENDS_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            FromKw => SyntaxKind::FROM_KW,
            FunctionKw => SyntaxKind::FUNCTION_KW,
            GetKw => SyntaxKind::GET_KW,
            GlobalKw => SyntaxKind::GLOBAL_KW,
            ImplementsKw => SyntaxKind::IMPLEMENTS_KW,
            ImportKw => SyntaxKind::IMPORT_KW,
            InKw => SyntaxKind::IN_KW,
            InferKw => SyntaxKind::INFER_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            IsKw => SyntaxKind::IS_KW,
            KeyofKw => SyntaxKind::KEYOF_KW,
            LetKw => SyntaxKind::LET_KW,
            ModuleKw => SyntaxKind::MODULE_KW,
            NamespaceKw => SyntaxKind::NAMESPACE_KW,
            NewKw => SyntaxKind::NEW_KW,
            NullKw => SyntaxKind::NULL_KW,
            OutKw => SyntaxKind::OUT_KW,
            ReadonlyKw => SyntaxKind::READONLY_KW,
            SetKw => SyntaxKind::SET_KW,
            ThisKw => SyntaxKind::THIS_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            TypeKw => SyntaxKind::TYPE_KW,
            TypeofKw => SyntaxKind::TYPEOF_KW,
            UniqueKw => SyntaxKind::UNIQUE_KW,
            VarKw => SyntaxKind::VAR_KW,
            VoidKw => SyntaxKind::VOID_KW,
        }
    }
}
