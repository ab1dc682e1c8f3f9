//! Recursive descent parser for the TypeScript declaration subset
//!
//! Builds a rowan GreenNode tree from tokens. Imports, exports, interfaces,
//! type aliases, enums and namespaces get structured nodes; every other
//! statement is scanned with bracket balancing into an `OTHER_STMT` node.
//! Braced blocks inside skipped statements are parsed as statement lists so
//! that nested declarations stay visible in the tree.

use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Identifiers that name a built-in type rather than a reference.
const KEYWORD_TYPE_NAMES: &[&str] = &[
    "any",
    "bigint",
    "boolean",
    "never",
    "number",
    "object",
    "string",
    "symbol",
    "undefined",
    "unknown",
    "intrinsic",
];

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Get the typed root
    pub fn source_file(&self) -> super::ast::SourceFile {
        super::ast::SourceFile::cast_root(self.syntax())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse TypeScript source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens = tokenize(input);
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    end: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], end: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (trivia is invisible to every lookahead)
    // =========================================================================

    /// Index of the n-th significant token at or after the cursor.
    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
            idx += 1;
        }
        None
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.nth_index(n).map(|idx| self.tokens[idx].text).unwrap_or("")
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    fn at_eof(&self) -> bool {
        self.nth_index(0).is_none()
    }

    fn at_name(&self) -> bool {
        self.current().is_name()
    }

    /// True when a line break separates the previous significant token from
    /// the current one.
    fn has_newline_before(&self) -> bool {
        let Some(target) = self.nth_index(0) else {
            return false;
        };
        self.tokens[self.pos..target]
            .iter()
            .any(|t| t.text.contains('\n'))
    }

    /// Index of the `)` matching the `(` at significant position `n`.
    fn matching_paren_after(&self, n: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = n;
        loop {
            match self.nth(i) {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                SyntaxKind::EOF => return None,
                _ => {}
            }
            i += 1;
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == SyntaxKind::ERROR {
                let range = TextRange::at(token.offset, TextSize::of(token.text));
                self.errors
                    .push(SyntaxError::new(format!("unexpected character `{}`", token.text), range));
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .nth_index(0)
            .map(|idx| {
                let token = &self.tokens[idx];
                TextRange::at(token.offset, TextSize::of(token.text))
            })
            .unwrap_or_else(|| TextRange::empty(self.end));
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and consume the offending token unless it can close
    /// or separate an enclosing construct.
    fn error_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        if !self.at_eof()
            && !self.at_any(&[
                SyntaxKind::SEMICOLON,
                SyntaxKind::COMMA,
                SyntaxKind::R_PAREN,
                SyntaxKind::R_BRACKET,
                SyntaxKind::R_BRACE,
                SyntaxKind::GT,
                SyntaxKind::EQ,
            ])
        {
            self.bump();
        }
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    /// Start a node. Pending trivia stays in the parent so that leading
    /// comments are siblings of the node they document.
    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
        while !self.at_eof() {
            if self.at(SyntaxKind::R_BRACE) {
                self.error("unexpected `}`");
                self.bump();
                continue;
            }
            self.statement();
        }
        self.flush_trivia();
        self.builder.finish_node();
    }

    fn statement_list(&mut self) {
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            self.statement();
        }
    }

    fn statement(&mut self) {
        match self.current() {
            SyntaxKind::SEMICOLON => self.bump(),
            SyntaxKind::L_BRACE => self.block(),
            SyntaxKind::IMPORT_KW if self.at_import_declaration() => self.import_decl(),
            SyntaxKind::EXPORT_KW => self.export_stmt(),
            _ if self.at_type_declaration(0) => self.type_declaration(),
            _ if self.at_module_declaration(0) => self.module_decl(),
            _ => self.other_stmt(),
        }
    }

    fn at_import_declaration(&self) -> bool {
        if matches!(
            self.nth(1),
            SyntaxKind::L_PAREN | SyntaxKind::DOT | SyntaxKind::COLON
        ) {
            return false;
        }
        // `import x = require("...")` and `import type x = ...` are not module imports
        let alias_at = if self.nth(1) == SyntaxKind::TYPE_KW && self.nth(2).is_name() {
            3
        } else {
            2
        };
        !(self.nth(alias_at - 1).is_name() && self.nth(alias_at) == SyntaxKind::EQ)
    }

    /// Whether an interface, type alias or enum starts at significant position `n`.
    fn at_type_declaration(&self, n: usize) -> bool {
        let n = if self.nth(n) == SyntaxKind::DECLARE_KW {
            n + 1
        } else {
            n
        };
        match self.nth(n) {
            SyntaxKind::INTERFACE_KW => self.nth(n + 1).is_name(),
            SyntaxKind::TYPE_KW => {
                self.nth(n + 1).is_name()
                    && matches!(self.nth(n + 2), SyntaxKind::EQ | SyntaxKind::LT)
            }
            SyntaxKind::ENUM_KW => self.nth(n + 1).is_name(),
            SyntaxKind::CONST_KW => {
                self.nth(n + 1) == SyntaxKind::ENUM_KW && self.nth(n + 2).is_name()
            }
            _ => false,
        }
    }

    fn type_declaration(&mut self) {
        let offset = if self.at(SyntaxKind::DECLARE_KW) { 1 } else { 0 };
        match self.nth(offset) {
            SyntaxKind::INTERFACE_KW => self.interface_decl(),
            SyntaxKind::TYPE_KW => self.type_alias_decl(),
            _ => self.enum_decl(),
        }
    }

    /// `namespace X {}`, `module X {}`, `declare module "x" {}`, `declare global {}`
    fn at_module_declaration(&self, n: usize) -> bool {
        let declared = self.nth(n) == SyntaxKind::DECLARE_KW;
        let n = if declared { n + 1 } else { n };
        match self.nth(n) {
            SyntaxKind::NAMESPACE_KW => self.nth(n + 1).is_name(),
            SyntaxKind::MODULE_KW => {
                (self.nth(n + 1).is_name() || self.nth(n + 1) == SyntaxKind::STRING)
                    && matches!(
                        self.nth(n + 2),
                        SyntaxKind::L_BRACE | SyntaxKind::DOT | SyntaxKind::SEMICOLON
                    )
            }
            SyntaxKind::GLOBAL_KW => declared && self.nth(n + 1) == SyntaxKind::L_BRACE,
            _ => false,
        }
    }

    /// Whether the current token starts a statement that ends any skipped
    /// statement preceding it on an earlier line.
    fn at_statement_boundary(&self) -> bool {
        match self.current() {
            SyntaxKind::IMPORT_KW => self.at_import_declaration(),
            SyntaxKind::EXPORT_KW => true,
            _ => self.at_type_declaration(0) || self.at_module_declaration(0),
        }
    }

    fn block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        self.statement_list();
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn other_stmt(&mut self) {
        self.start_node(SyntaxKind::OTHER_STMT);
        self.skip_statement();
        self.finish_node();
    }

    /// Consume one statement without interpreting it.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        let mut first = true;
        while !self.at_eof() {
            if !first && depth == 0 && self.has_newline_before() && self.at_statement_boundary() {
                break;
            }
            first = false;
            match self.current() {
                SyntaxKind::SEMICOLON if depth == 0 => {
                    self.bump();
                    break;
                }
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => {
                    if depth == 0 {
                        self.error(format!("unbalanced `{}`", self.nth_text(0)));
                        self.bump();
                        break;
                    }
                    depth -= 1;
                    self.bump();
                }
                SyntaxKind::L_BRACE => self.block(),
                SyntaxKind::R_BRACE => {
                    if depth > 0 {
                        self.error("unbalanced `}`");
                    }
                    break;
                }
                _ => self.bump(),
            }
        }
    }

    /// Skip an expression up to (not including) one of `stop` at depth zero.
    fn skip_expression(&mut self, stop: &[SyntaxKind]) {
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current();
            if depth == 0 && stop.contains(&kind) {
                break;
            }
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    fn import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump(); // import

        if self.at(SyntaxKind::STRING) {
            self.module_source();
            self.eat(SyntaxKind::SEMICOLON);
            self.finish_node();
            return;
        }

        if self.at(SyntaxKind::TYPE_KW)
            && !matches!(self.nth(1), SyntaxKind::FROM_KW | SyntaxKind::COMMA)
        {
            self.bump();
        }

        if self.at_name() && !self.at(SyntaxKind::FROM_KW) {
            self.start_node(SyntaxKind::IMPORT_DEFAULT);
            self.name();
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                self.import_tail();
                self.finish_node();
                return;
            }
        }

        if self.at(SyntaxKind::STAR) {
            self.start_node(SyntaxKind::IMPORT_NAMESPACE);
            self.bump();
            self.expect(SyntaxKind::AS_KW);
            self.name();
            self.finish_node();
        } else if self.at(SyntaxKind::L_BRACE) {
            self.named_imports();
        } else {
            self.error("expected import clause");
        }

        self.import_tail();
        self.finish_node();
    }

    fn import_tail(&mut self) {
        self.expect(SyntaxKind::FROM_KW);
        self.module_source();
        self.import_attributes();
        self.eat(SyntaxKind::SEMICOLON);
    }

    fn named_imports(&mut self) {
        self.start_node(SyntaxKind::NAMED_IMPORTS);
        self.bump(); // {
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            self.start_node(SyntaxKind::IMPORT_SPECIFIER);
            self.type_modifier();
            self.specifier_name();
            if self.eat(SyntaxKind::AS_KW) {
                self.name();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// `type` in `import { type A }` / `export { type A }`
    fn type_modifier(&mut self) {
        if self.at(SyntaxKind::TYPE_KW)
            && (self.nth(1).is_name() || self.nth(1) == SyntaxKind::STRING)
            && !(self.nth(1) == SyntaxKind::AS_KW && !self.nth(2).is_name())
        {
            self.bump();
        }
    }

    /// Specifier names may be string literals (`import { "a-b" as c }`).
    fn specifier_name(&mut self) {
        self.start_node(SyntaxKind::NAME);
        if self.at_name() || self.at(SyntaxKind::STRING) {
            self.bump();
        } else {
            self.error_bump("expected name");
        }
        self.finish_node();
    }

    fn module_source(&mut self) {
        self.start_node(SyntaxKind::MODULE_SOURCE);
        if !self.eat(SyntaxKind::STRING) {
            self.error("expected module specifier");
        }
        self.finish_node();
    }

    /// `with { type: "json" }` / `assert { ... }`
    fn import_attributes(&mut self) {
        let keyword = self.nth_text(0);
        if (keyword == "with" || keyword == "assert")
            && !self.has_newline_before()
            && self.nth(1) == SyntaxKind::L_BRACE
        {
            self.bump();
            self.bump();
            self.skip_expression(&[SyntaxKind::R_BRACE]);
            self.expect(SyntaxKind::R_BRACE);
        }
    }

    fn export_stmt(&mut self) {
        match self.nth(1) {
            SyntaxKind::DEFAULT_KW if self.nth(2) == SyntaxKind::INTERFACE_KW => {
                self.start_node(SyntaxKind::EXPORT_DEFAULT_DECL);
                self.bump(); // export
                self.bump(); // default
                self.interface_decl();
                self.finish_node();
            }
            SyntaxKind::STAR => self.export_from_star(),
            SyntaxKind::TYPE_KW if self.nth(2) == SyntaxKind::STAR => self.export_from_star(),
            SyntaxKind::L_BRACE => self.export_named(),
            SyntaxKind::TYPE_KW if self.nth(2) == SyntaxKind::L_BRACE => self.export_named(),
            SyntaxKind::IDENT if matches!(self.nth(2), SyntaxKind::FROM_KW | SyntaxKind::COMMA) => {
                self.export_named()
            }
            _ if self.at_type_declaration(1) => {
                self.start_node(SyntaxKind::EXPORT_DECL);
                self.bump();
                self.type_declaration();
                self.finish_node();
            }
            _ if self.at_module_declaration(1) => {
                self.start_node(SyntaxKind::EXPORT_DECL);
                self.bump();
                self.module_decl();
                self.finish_node();
            }
            _ => self.other_stmt(),
        }
    }

    /// `export * from "x"` / `export * as ns from "x"`
    fn export_from_star(&mut self) {
        let kind = if self.star_is_namespace_export() {
            SyntaxKind::EXPORT_NAMED
        } else {
            SyntaxKind::EXPORT_ALL
        };
        self.start_node(kind);
        self.bump(); // export
        self.eat(SyntaxKind::TYPE_KW);
        if kind == SyntaxKind::EXPORT_NAMED {
            self.start_node(SyntaxKind::EXPORT_NAMESPACE_SPECIFIER);
            self.bump(); // *
            self.bump(); // as
            self.specifier_name();
            self.finish_node();
        } else {
            self.bump(); // *
        }
        self.import_tail();
        self.finish_node();
    }

    fn star_is_namespace_export(&self) -> bool {
        let star = if self.nth(1) == SyntaxKind::TYPE_KW { 2 } else { 1 };
        self.nth(star + 1) == SyntaxKind::AS_KW
    }

    fn export_named(&mut self) {
        self.start_node(SyntaxKind::EXPORT_NAMED);
        self.bump(); // export
        self.eat(SyntaxKind::TYPE_KW);

        if self.at(SyntaxKind::IDENT) {
            // `export v from "x"`: not interpretable, kept so the loader can reject it
            self.start_node(SyntaxKind::EXPORT_DEFAULT_SPECIFIER);
            self.name();
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                self.import_tail();
                self.finish_node();
                return;
            }
        }

        if self.at(SyntaxKind::STAR) {
            self.start_node(SyntaxKind::EXPORT_NAMESPACE_SPECIFIER);
            self.bump();
            self.expect(SyntaxKind::AS_KW);
            self.specifier_name();
            self.finish_node();
        } else if self.at(SyntaxKind::L_BRACE) {
            self.bump();
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.start_node(SyntaxKind::EXPORT_SPECIFIER);
                self.type_modifier();
                self.specifier_name();
                if self.eat(SyntaxKind::AS_KW) {
                    self.specifier_name();
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        } else {
            self.error("expected export clause");
        }

        if self.at(SyntaxKind::FROM_KW) {
            self.bump();
            self.module_source();
            self.import_attributes();
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn name(&mut self) {
        self.start_node(SyntaxKind::NAME);
        if self.at_name() {
            self.bump();
        } else {
            self.error_bump("expected name");
        }
        self.finish_node();
    }

    fn entity_name(&mut self) {
        self.start_node(SyntaxKind::ENTITY_NAME);
        if self.at_name() {
            self.bump();
        } else {
            self.error_bump("expected name");
        }
        while self.at(SyntaxKind::DOT) && self.nth(1).is_name() {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn interface_decl(&mut self) {
        self.start_node(SyntaxKind::INTERFACE_DECL);
        self.eat(SyntaxKind::DECLARE_KW);
        self.expect(SyntaxKind::INTERFACE_KW);
        self.name();
        if self.at(SyntaxKind::LT) {
            self.type_params();
        }
        if self.at(SyntaxKind::EXTENDS_KW) {
            self.start_node(SyntaxKind::HERITAGE_CLAUSE);
            self.bump();
            loop {
                self.start_node(SyntaxKind::HERITAGE_TYPE);
                self.entity_name();
                if self.at(SyntaxKind::LT) {
                    self.type_args();
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.finish_node();
        }
        self.object_type();
        self.finish_node();
    }

    fn type_alias_decl(&mut self) {
        self.start_node(SyntaxKind::TYPE_ALIAS_DECL);
        self.eat(SyntaxKind::DECLARE_KW);
        self.expect(SyntaxKind::TYPE_KW);
        self.name();
        if self.at(SyntaxKind::LT) {
            self.type_params();
        }
        self.expect(SyntaxKind::EQ);
        self.type_();
        self.statement_end();
        self.finish_node();
    }

    /// An optional `;`; anything else on the same line is an error.
    fn statement_end(&mut self) {
        if self.eat(SyntaxKind::SEMICOLON)
            || self.at_eof()
            || self.at(SyntaxKind::R_BRACE)
            || self.has_newline_before()
        {
            return;
        }
        self.error("expected `;`");
    }

    fn enum_decl(&mut self) {
        self.start_node(SyntaxKind::ENUM_DECL);
        self.eat(SyntaxKind::DECLARE_KW);
        self.eat(SyntaxKind::CONST_KW);
        self.expect(SyntaxKind::ENUM_KW);
        self.name();
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.start_node(SyntaxKind::ENUM_MEMBER);
                self.property_key();
                if self.at(SyntaxKind::EQ) {
                    self.bump();
                    self.start_node(SyntaxKind::INITIALIZER);
                    self.skip_expression(&[SyntaxKind::COMMA, SyntaxKind::R_BRACE]);
                    self.finish_node();
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    fn module_decl(&mut self) {
        self.start_node(SyntaxKind::MODULE_DECL);
        self.eat(SyntaxKind::DECLARE_KW);
        if !self.eat(SyntaxKind::GLOBAL_KW) {
            self.bump(); // namespace / module
            if self.at(SyntaxKind::STRING) {
                self.bump();
            } else {
                self.entity_name();
            }
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.block();
        } else {
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    fn type_params(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMS);
        self.bump(); // <
        while !self.at_eof() && !self.at(SyntaxKind::GT) {
            self.start_node(SyntaxKind::TYPE_PARAM);
            while self.at_any(&[SyntaxKind::CONST_KW, SyntaxKind::IN_KW, SyntaxKind::OUT_KW])
                && self.nth(1).is_name()
            {
                self.bump();
            }
            self.name();
            if self.eat(SyntaxKind::EXTENDS_KW) {
                self.type_();
            }
            if self.eat(SyntaxKind::EQ) {
                self.type_();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    fn type_args(&mut self) {
        self.start_node(SyntaxKind::TYPE_ARGS);
        self.bump(); // <
        while !self.at_eof() && !self.at(SyntaxKind::GT) {
            self.type_();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    // =========================================================================
    // Type members
    // =========================================================================

    fn object_type(&mut self) {
        self.start_node(SyntaxKind::OBJECT_TYPE);
        if !self.expect(SyntaxKind::L_BRACE) {
            self.finish_node();
            return;
        }
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.pos;
            self.type_member();
            if !self.eat(SyntaxKind::SEMICOLON)
                && !self.eat(SyntaxKind::COMMA)
                && !self.at(SyntaxKind::R_BRACE)
                && !self.has_newline_before()
            {
                self.error("expected `;`");
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn at_property_key(&self, n: usize) -> bool {
        let kind = self.nth(n);
        kind.is_name()
            || matches!(
                kind,
                SyntaxKind::STRING | SyntaxKind::NUMBER | SyntaxKind::L_BRACKET | SyntaxKind::HASH
            )
    }

    fn type_member(&mut self) {
        match self.current() {
            SyntaxKind::L_PAREN | SyntaxKind::LT => {
                self.start_node(SyntaxKind::CALL_SIG);
                self.signature_tail();
                self.finish_node();
            }
            SyntaxKind::NEW_KW if matches!(self.nth(1), SyntaxKind::L_PAREN | SyntaxKind::LT) => {
                self.start_node(SyntaxKind::CONSTRUCT_SIG);
                self.bump();
                self.signature_tail();
                self.finish_node();
            }
            _ if self.at_index_signature() => self.index_sig(),
            SyntaxKind::GET_KW | SyntaxKind::SET_KW
                if self.at_property_key(1)
                    && !matches!(self.nth(1), SyntaxKind::L_PAREN | SyntaxKind::LT) =>
            {
                self.start_node(SyntaxKind::METHOD_SIG);
                self.bump();
                self.property_key();
                self.signature_tail();
                self.finish_node();
            }
            _ => {
                let checkpoint = self.checkpoint();
                if self.at(SyntaxKind::READONLY_KW) && self.at_property_key(1) {
                    self.bump();
                }
                self.property_key();
                self.eat(SyntaxKind::QUESTION);
                if self.at_any(&[SyntaxKind::L_PAREN, SyntaxKind::LT]) {
                    self.start_node_at(checkpoint, SyntaxKind::METHOD_SIG);
                    self.signature_tail();
                } else {
                    self.start_node_at(checkpoint, SyntaxKind::PROPERTY_SIG);
                    if self.at(SyntaxKind::COLON) {
                        self.type_annotation();
                    }
                }
                self.finish_node();
            }
        }
    }

    fn at_index_signature(&self) -> bool {
        let n = if self.at(SyntaxKind::READONLY_KW) { 1 } else { 0 };
        self.nth(n) == SyntaxKind::L_BRACKET
            && self.nth(n + 1).is_name()
            && self.nth(n + 2) == SyntaxKind::COLON
    }

    fn index_sig(&mut self) {
        self.start_node(SyntaxKind::INDEX_SIG);
        self.eat(SyntaxKind::READONLY_KW);
        self.bump(); // [
        self.start_node(SyntaxKind::PARAM);
        self.name();
        self.type_annotation();
        self.finish_node();
        self.expect(SyntaxKind::R_BRACKET);
        if self.at(SyntaxKind::COLON) {
            self.type_annotation();
        } else {
            self.error("expected index signature type");
        }
        self.finish_node();
    }

    fn property_key(&mut self) {
        self.start_node(SyntaxKind::PROPERTY_KEY);
        if self.at(SyntaxKind::L_BRACKET) {
            self.bump();
            self.skip_expression(&[SyntaxKind::R_BRACKET]);
            self.expect(SyntaxKind::R_BRACKET);
        } else if self.at(SyntaxKind::HASH) && self.nth(1).is_name() {
            self.bump();
            self.bump();
        } else if self.at_name() || self.at_any(&[SyntaxKind::STRING, SyntaxKind::NUMBER]) {
            self.bump();
        } else {
            self.error_bump("expected property name");
        }
        self.finish_node();
    }

    /// `<T>(params): Ret` shared by call, construct and method signatures.
    fn signature_tail(&mut self) {
        if self.at(SyntaxKind::LT) {
            self.type_params();
        }
        self.param_list();
        if self.at(SyntaxKind::COLON) {
            self.start_node(SyntaxKind::TYPE_ANNOTATION);
            self.bump();
            self.return_type();
            self.finish_node();
        }
    }

    fn param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        if self.expect(SyntaxKind::L_PAREN) {
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                self.param();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    fn param(&mut self) {
        self.start_node(SyntaxKind::PARAM);
        while self.at(SyntaxKind::READONLY_KW) || self.at_accessibility_modifier() {
            self.bump();
        }
        self.eat(SyntaxKind::DOT_DOT_DOT);
        if self.at_any(&[SyntaxKind::L_BRACE, SyntaxKind::L_BRACKET]) {
            // binding pattern
            self.bump();
            self.skip_expression(&[SyntaxKind::R_BRACE, SyntaxKind::R_BRACKET]);
            if !self.eat(SyntaxKind::R_BRACE) {
                self.expect(SyntaxKind::R_BRACKET);
            }
        } else {
            self.name();
        }
        self.eat(SyntaxKind::QUESTION);
        if self.at(SyntaxKind::COLON) {
            self.type_annotation();
        }
        if self.eat(SyntaxKind::EQ) {
            self.skip_expression(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
        }
        self.finish_node();
    }

    fn at_accessibility_modifier(&self) -> bool {
        matches!(self.nth_text(0), "public" | "private" | "protected")
            && self.current() == SyntaxKind::IDENT
            && self.nth(1).is_name()
    }

    fn type_annotation(&mut self) {
        self.start_node(SyntaxKind::TYPE_ANNOTATION);
        self.expect(SyntaxKind::COLON);
        self.type_();
        self.finish_node();
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    fn type_(&mut self) {
        self.type_with(true);
    }

    fn type_with(&mut self, allow_conditional: bool) {
        if self.at_function_type() {
            self.function_type();
            return;
        }
        if self.at(SyntaxKind::NEW_KW)
            || (self.at(SyntaxKind::ABSTRACT_KW) && self.nth(1) == SyntaxKind::NEW_KW)
        {
            self.constructor_type();
            return;
        }

        let checkpoint = self.checkpoint();
        self.union_type();
        if allow_conditional && self.at(SyntaxKind::EXTENDS_KW) {
            self.start_node_at(checkpoint, SyntaxKind::CONDITIONAL_TYPE);
            self.bump();
            self.type_with(false);
            self.expect(SyntaxKind::QUESTION);
            self.type_();
            self.expect(SyntaxKind::COLON);
            self.type_();
            self.finish_node();
        }
    }

    fn at_function_type(&self) -> bool {
        match self.current() {
            SyntaxKind::LT => true,
            SyntaxKind::L_PAREN => self
                .matching_paren_after(0)
                .is_some_and(|close| self.nth(close + 1) == SyntaxKind::FAT_ARROW),
            _ => false,
        }
    }

    fn function_type(&mut self) {
        self.start_node(SyntaxKind::FUNCTION_TYPE);
        if self.at(SyntaxKind::LT) {
            self.type_params();
        }
        self.param_list();
        self.expect(SyntaxKind::FAT_ARROW);
        self.return_type();
        self.finish_node();
    }

    fn constructor_type(&mut self) {
        self.start_node(SyntaxKind::CONSTRUCTOR_TYPE);
        self.eat(SyntaxKind::ABSTRACT_KW);
        self.bump(); // new
        if self.at(SyntaxKind::LT) {
            self.type_params();
        }
        self.param_list();
        self.expect(SyntaxKind::FAT_ARROW);
        self.type_();
        self.finish_node();
    }

    /// Return positions also accept `x is T`, `asserts x` and `asserts x is T`.
    fn return_type(&mut self) {
        let asserts = self.at(SyntaxKind::ASSERTS_KW)
            && self.nth(1).is_name()
            && self.nth(1) != SyntaxKind::IS_KW;
        let predicate = (self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::THIS_KW))
            && self.nth(1) == SyntaxKind::IS_KW
            && !self.has_newline_before_nth(1);
        if !asserts && !predicate {
            self.type_();
            return;
        }

        self.start_node(SyntaxKind::TYPE_PREDICATE);
        if asserts {
            self.bump();
        }
        self.bump(); // parameter name or `this`
        if self.eat(SyntaxKind::IS_KW) {
            self.type_();
        }
        self.finish_node();
    }

    fn has_newline_before_nth(&self, n: usize) -> bool {
        let (Some(prev), Some(target)) = (self.nth_index(n - 1), self.nth_index(n)) else {
            return false;
        };
        self.tokens[prev + 1..target]
            .iter()
            .any(|t| t.text.contains('\n'))
    }

    fn union_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.eat(SyntaxKind::PIPE);
        self.intersection_type();
        if self.at(SyntaxKind::PIPE) {
            self.start_node_at(checkpoint, SyntaxKind::UNION_TYPE);
            while self.eat(SyntaxKind::PIPE) {
                self.intersection_type();
            }
            self.finish_node();
        }
    }

    fn intersection_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.eat(SyntaxKind::AMP);
        self.type_operator();
        if self.at(SyntaxKind::AMP) {
            self.start_node_at(checkpoint, SyntaxKind::INTERSECTION_TYPE);
            while self.eat(SyntaxKind::AMP) {
                self.type_operator();
            }
            self.finish_node();
        }
    }

    fn type_operator(&mut self) {
        match self.current() {
            SyntaxKind::KEYOF_KW | SyntaxKind::UNIQUE_KW | SyntaxKind::READONLY_KW => {
                self.start_node(SyntaxKind::TYPE_OPERATOR);
                self.bump();
                self.type_operator();
                self.finish_node();
            }
            SyntaxKind::INFER_KW => {
                self.start_node(SyntaxKind::INFER_TYPE);
                self.bump();
                self.start_node(SyntaxKind::TYPE_PARAM);
                self.name();
                if self.at(SyntaxKind::EXTENDS_KW) && !self.infer_extends_is_conditional() {
                    self.bump();
                    self.type_with(false);
                }
                self.finish_node();
                self.finish_node();
            }
            _ => self.postfix_type(),
        }
    }

    /// In `infer U extends X ? A : B` the `extends` belongs to the enclosing
    /// conditional unless the constraint is followed by a closing token.
    fn infer_extends_is_conditional(&self) -> bool {
        let mut depth = 0usize;
        let mut i = 1;
        loop {
            match self.nth(i) {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE | SyntaxKind::LT => {
                    depth += 1
                }
                SyntaxKind::R_PAREN
                | SyntaxKind::R_BRACKET
                | SyntaxKind::R_BRACE
                | SyntaxKind::GT => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                SyntaxKind::QUESTION if depth == 0 => return true,
                SyntaxKind::COMMA | SyntaxKind::SEMICOLON if depth == 0 => return false,
                SyntaxKind::EOF => return false,
                _ => {}
            }
            i += 1;
        }
    }

    fn postfix_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.primary_type();
        while self.at(SyntaxKind::L_BRACKET) && !self.has_newline_before() {
            if self.nth(1) == SyntaxKind::R_BRACKET {
                self.start_node_at(checkpoint, SyntaxKind::ARRAY_TYPE);
                self.bump();
                self.bump();
            } else {
                self.start_node_at(checkpoint, SyntaxKind::INDEXED_ACCESS_TYPE);
                self.bump();
                self.type_();
                self.expect(SyntaxKind::R_BRACKET);
            }
            self.finish_node();
        }
    }

    fn primary_type(&mut self) {
        match self.current() {
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_TYPE);
                self.bump();
                self.type_();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::L_BRACKET => self.tuple_type(),
            SyntaxKind::L_BRACE => {
                if self.at_mapped_type() {
                    self.mapped_type();
                } else {
                    self.object_type();
                }
            }
            SyntaxKind::STRING
            | SyntaxKind::NUMBER
            | SyntaxKind::TEMPLATE
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW => {
                self.start_node(SyntaxKind::LITERAL_TYPE);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::MINUS if self.nth(1) == SyntaxKind::NUMBER => {
                self.start_node(SyntaxKind::LITERAL_TYPE);
                self.bump();
                self.bump();
                self.finish_node();
            }
            SyntaxKind::NULL_KW | SyntaxKind::VOID_KW | SyntaxKind::THIS_KW => {
                self.start_node(SyntaxKind::KEYWORD_TYPE);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::TYPEOF_KW => {
                self.start_node(SyntaxKind::TYPE_QUERY);
                self.bump();
                if self.at(SyntaxKind::IMPORT_KW) {
                    self.import_type();
                } else {
                    self.entity_name();
                }
                if self.at(SyntaxKind::LT) && !self.has_newline_before() {
                    self.type_args();
                }
                self.finish_node();
            }
            SyntaxKind::IMPORT_KW => self.import_type(),
            SyntaxKind::IDENT
                if KEYWORD_TYPE_NAMES.contains(&self.nth_text(0))
                    && self.nth(1) != SyntaxKind::DOT =>
            {
                self.start_node(SyntaxKind::KEYWORD_TYPE);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::TYPE_REF);
                self.entity_name();
                if self.at(SyntaxKind::LT) && !self.has_newline_before() {
                    self.type_args();
                }
                self.finish_node();
            }
            _ => self.error_bump("expected type"),
        }
    }

    fn import_type(&mut self) {
        self.start_node(SyntaxKind::IMPORT_TYPE);
        self.bump(); // import
        self.expect(SyntaxKind::L_PAREN);
        self.expect(SyntaxKind::STRING);
        self.expect(SyntaxKind::R_PAREN);
        if self.eat(SyntaxKind::DOT) {
            self.entity_name();
        }
        if self.at(SyntaxKind::LT) && !self.has_newline_before() {
            self.type_args();
        }
        self.finish_node();
    }

    fn tuple_type(&mut self) {
        self.start_node(SyntaxKind::TUPLE_TYPE);
        self.bump(); // [
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACKET) {
            self.start_node(SyntaxKind::TUPLE_ELEMENT);
            self.eat(SyntaxKind::DOT_DOT_DOT);
            let labeled = self.at_name()
                && (self.nth(1) == SyntaxKind::COLON
                    || (self.nth(1) == SyntaxKind::QUESTION && self.nth(2) == SyntaxKind::COLON));
            if labeled {
                self.name();
                self.eat(SyntaxKind::QUESTION);
                self.bump(); // :
                self.type_();
            } else {
                self.type_();
                self.eat(SyntaxKind::QUESTION);
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    fn at_mapped_type(&self) -> bool {
        let mut n = 1;
        if matches!(self.nth(n), SyntaxKind::PLUS | SyntaxKind::MINUS) {
            n += 1;
        }
        if self.nth(n) == SyntaxKind::READONLY_KW {
            n += 1;
        }
        self.nth(n) == SyntaxKind::L_BRACKET
            && self.nth(n + 1).is_name()
            && self.nth(n + 2) == SyntaxKind::IN_KW
    }

    fn mapped_type(&mut self) {
        self.start_node(SyntaxKind::MAPPED_TYPE);
        self.bump(); // {
        if !self.eat(SyntaxKind::PLUS) {
            self.eat(SyntaxKind::MINUS);
        }
        self.eat(SyntaxKind::READONLY_KW);
        self.bump(); // [
        self.start_node(SyntaxKind::MAPPED_TYPE_PARAM);
        self.name();
        self.bump(); // in
        self.type_();
        if self.eat(SyntaxKind::AS_KW) {
            self.type_();
        }
        self.finish_node();
        self.expect(SyntaxKind::R_BRACKET);
        if !self.eat(SyntaxKind::PLUS) {
            self.eat(SyntaxKind::MINUS);
        }
        self.eat(SyntaxKind::QUESTION);
        if self.at(SyntaxKind::COLON) {
            self.type_annotation();
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }
}
