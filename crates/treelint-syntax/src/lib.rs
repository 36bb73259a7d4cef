//! Syntax tree model and parser for Kotlin source files.
//!
//! The parser understands the declaration structure of Kotlin code (files,
//! packages, classes, objects, interfaces, functions, parameters and
//! properties together with their annotations and modifiers). Function and
//! initializer bodies are scanned only for nested named declarations; the
//! statements themselves are not modelled.
//!
//! # Quick Start
//!
//! ```
//! use treelint_syntax::{parse_string, NodeKind};
//!
//! let tree = parse_string(r#"
//! @Suppress("LongParameterList")
//! fun configure(a: Int, b: Int) = Unit
//! "#).unwrap();
//!
//! let function = tree.nodes_of_kind(NodeKind::Function).next().unwrap();
//! let node = tree.get(function);
//! assert_eq!(node.annotations[0].args, vec!["LongParameterList"]);
//! assert_eq!(tree.children(function).len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`ast`]: Tree types ([`SyntaxTree`], [`Node`], [`NodeId`], [`Annotation`], [`Span`])
//! - [`lexer`]: Tokenizer ([`Lexer`](lexer::Lexer), [`Token`](lexer::Token))
//! - [`error`]: Error types ([`ParseError`], [`LexerError`])

pub mod ast;
pub mod error;
pub mod lexer;

pub use ast::{
    Ancestors, Annotation, Node, NodeId, NodeKind, Position, Preorder, Span, SyntaxTree,
    TreeBuilder,
};
pub use error::{LexerError, ParseError, ParseResult};

use lexer::{Lexer, Token, TokenKind};
use std::path::Path;

/// File name used for trees parsed from in-memory source.
pub const DEFAULT_FILE_NAME: &str = "Test.kt";

/// Parse a source file from disk.
///
/// The tree's file name is the path as given.
pub fn parse_file(path: &Path) -> ParseResult<SyntaxTree> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ParseError::IoError(e.to_string()))?;
    parse_named(&path.to_string_lossy(), &content)
}

/// Parse source text held in memory, naming the file [`DEFAULT_FILE_NAME`].
pub fn parse_string(source: &str) -> ParseResult<SyntaxTree> {
    parse_named(DEFAULT_FILE_NAME, source)
}

/// Parse source text held in memory under a given file name.
pub fn parse_named(file_name: &str, source: &str) -> ParseResult<SyntaxTree> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens, file_name);
    parser.parse_file()?;
    Ok(parser.builder.build())
}

/// Declaration modifiers accepted before a declaration keyword.
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "override",
    "open",
    "abstract",
    "final",
    "data",
    "enum",
    "sealed",
    "inner",
    "annotation",
    "companion",
    "suspend",
    "inline",
    "operator",
    "infix",
    "tailrec",
    "external",
    "lateinit",
    "const",
    "expect",
    "actual",
    "value",
];

/// Modifiers accepted before a parameter name.
const PARAMETER_MODIFIERS: &[&str] = &[
    "vararg",
    "val",
    "var",
    "noinline",
    "crossinline",
    "private",
    "public",
    "protected",
    "internal",
    "override",
    "open",
    "final",
];

/// Annotation use-site targets (`@file:`, `@get:`, ...).
const USE_SITES: &[&str] = &[
    "file", "field", "property", "get", "set", "receiver", "param", "setparam", "delegate",
];

/// Keywords that begin a new statement or member when found on a fresh line.
const STATEMENT_STARTS: &[&str] = &[
    "fun",
    "class",
    "interface",
    "object",
    "val",
    "var",
    "init",
    "constructor",
    "typealias",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    Class,
    Object,
    Interface,
    Function,
    Property,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    builder: TreeBuilder,
}

impl Parser {
    fn new(tokens: Vec<Token>, file_name: &str) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: TreeBuilder::new(file_name),
        }
    }

    fn token_at(&self, index: usize) -> &Token {
        // The token stream always ends with Eof.
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        self.token_at(self.pos)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.token_at(self.pos + n)
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// End position of the last consumed token.
    fn prev_end(&self) -> Position {
        if self.pos == 0 {
            Position::new(1, 1, 0)
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn is_modifier_at(&self, index: usize) -> bool {
        self.token_at(index)
            .ident()
            .is_some_and(|word| MODIFIERS.contains(&word))
    }

    fn is_arrow_at(&self, index: usize) -> bool {
        let dash = self.token_at(index);
        let next = self.token_at(index + 1);
        dash.is_punct('-') && next.is_punct('>') && dash.span.end.offset == next.span.start.offset
    }

    /// True if the token at `index` begins a statement or member declaration.
    fn is_statement_start_at(&self, index: usize) -> bool {
        let token = self.token_at(index);
        token.is_punct('@')
            || token.is_punct('}')
            || self.is_modifier_at(index)
            || token
                .ident()
                .is_some_and(|word| STATEMENT_STARTS.contains(&word))
    }

    /// Index after the balanced group opening at `index`, or `None` at end of file.
    fn skip_balanced_at(&self, index: usize, open: char, close: char) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            let token = self.token_at(i);
            if token.kind == TokenKind::Eof {
                return None;
            }
            if token.is_punct(open) {
                depth += 1;
            } else if token.is_punct(close) {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            i += 1;
        }
    }

    /// Index after the annotation starting at `index`, if one starts there.
    fn skip_annotation_at(&self, index: usize) -> Option<usize> {
        if !self.token_at(index).is_punct('@') {
            return None;
        }
        let mut i = index + 1;
        if self
            .token_at(i)
            .ident()
            .is_some_and(|word| USE_SITES.contains(&word))
            && self.token_at(i + 1).is_punct(':')
        {
            i += 2;
        }
        if self.token_at(i).is_punct('[') {
            return self.skip_balanced_at(i, '[', ']');
        }
        self.token_at(i).ident()?;
        i += 1;
        while self.token_at(i).is_punct('.') && self.token_at(i + 1).ident().is_some() {
            i += 2;
        }
        if self.token_at(i).is_punct('(')
            && self.token_at(i).span.start.line == self.token_at(i - 1).span.end.line
        {
            i = self.skip_balanced_at(i, '(', ')')?;
        }
        Some(i)
    }

    /// Decide whether a declaration starts at `index` without consuming anything.
    fn declaration_at(&self, index: usize, in_function: bool) -> Option<DeclarationKind> {
        let mut i = index;
        loop {
            if self.token_at(i).is_punct('@') {
                i = self.skip_annotation_at(i)?;
            } else if self.is_modifier_at(i) {
                i += 1;
            } else {
                break;
            }
        }

        match self.token_at(i).ident()? {
            "fun" if self.token_at(i + 1).is_ident("interface") => Some(DeclarationKind::Interface),
            "fun" if self.token_at(i + 1).is_punct('(') => None,
            "fun" => Some(DeclarationKind::Function),
            "class" => Some(DeclarationKind::Class),
            "interface" => Some(DeclarationKind::Interface),
            "object" => Some(DeclarationKind::Object),
            "val" | "var" if !in_function => Some(DeclarationKind::Property),
            _ => None,
        }
    }

    fn parse_file(&mut self) -> ParseResult<()> {
        let root = self.builder.root();

        while self.peek().is_punct('@')
            && self.peek_at(1).is_ident("file")
            && self.peek_at(2).is_punct(':')
        {
            let annotations = self.parse_annotations()?;
            self.builder.node_mut(root).annotations.extend(annotations);
        }

        if self.peek().is_ident("package") {
            self.parse_package(root);
        }

        while self.peek().is_ident("import") {
            let line = self.bump().span.start.line;
            while !self.at_eof() && self.peek().span.start.line == line {
                if self.bump().is_punct(';') {
                    break;
                }
            }
        }

        self.parse_block_contents(root, None, false)?;

        let end = self.peek().span.end;
        self.builder.node_mut(root).span = Span::new(Position::new(1, 1, 0), end);
        Ok(())
    }

    fn parse_package(&mut self, root: NodeId) {
        let keyword = self.bump();
        let mut segments = Vec::new();
        let mut name_span: Option<Span> = None;

        while let Some(segment) = self.peek().ident().map(str::to_string) {
            let token = self.bump();
            segments.push(segment);
            name_span = Some(match name_span {
                Some(span) => Span::new(span.start, token.span.end),
                None => token.span,
            });
            if self.peek().is_punct('.') && self.peek_at(1).ident().is_some() {
                self.bump();
            } else {
                break;
            }
        }

        let mut node = Node::new(NodeKind::Package)
            .with_name(segments.join("."))
            .with_span(Span::new(keyword.span.start, self.prev_end()));
        node.name_span = name_span;
        self.builder.add(root, node);
    }

    /// Scan items up to the `}` matching an already consumed `{` (or to end of
    /// file for the top level), parsing every declaration found on the way.
    fn parse_block_contents(
        &mut self,
        parent: NodeId,
        open: Option<Position>,
        in_function: bool,
    ) -> ParseResult<()> {
        let mut depth = 0usize;

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    return match open {
                        Some(position) => Err(ParseError::UnclosedDelimiter {
                            delimiter: '{',
                            position,
                        }),
                        None => Ok(()),
                    };
                }
                TokenKind::Punct('}') => {
                    if depth == 0 {
                        if open.is_some() {
                            self.bump();
                            return Ok(());
                        }
                        return Err(ParseError::UnmatchedCloseBrace {
                            position: token.span.start,
                        });
                    }
                    depth -= 1;
                    self.bump();
                }
                TokenKind::Punct('{') => {
                    depth += 1;
                    self.bump();
                }
                _ => {
                    let nested = in_function || depth > 0;
                    if let Some(kind) = self.declaration_at(self.pos, nested) {
                        self.parse_declaration(parent, kind, nested)?;
                    } else {
                        self.bump();
                    }
                }
            }
        }
    }

    /// Parse `@Name(...)`, `@site:Name(...)` or the grouped `@[A B(...)]` form.
    fn parse_annotations(&mut self) -> ParseResult<Vec<Annotation>> {
        let at = self.bump();
        let start = at.span.start;

        let mut use_site = None;
        if self
            .peek()
            .ident()
            .is_some_and(|word| USE_SITES.contains(&word))
            && self.peek_at(1).is_punct(':')
        {
            use_site = self.bump().ident().map(str::to_string);
            self.bump();
        }

        if !self.peek().is_punct('[') {
            return Ok(self.parse_annotation_entry(start, &use_site)?.into_iter().collect());
        }

        let open = self.bump().span.start;
        let mut annotations = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => {
                    return Err(ParseError::UnclosedDelimiter {
                        delimiter: '[',
                        position: open,
                    });
                }
                TokenKind::Punct(']') => {
                    self.bump();
                    return Ok(annotations);
                }
                TokenKind::Ident(_) => {
                    let entry_start = token.span.start;
                    if let Some(annotation) = self.parse_annotation_entry(entry_start, &use_site)? {
                        annotations.push(annotation);
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn parse_annotation_entry(
        &mut self,
        start: Position,
        use_site: &Option<String>,
    ) -> ParseResult<Option<Annotation>> {
        let Some(first) = self.peek().ident().map(str::to_string) else {
            return Ok(None);
        };
        self.bump();
        let mut name = first;
        while self.peek().is_punct('.') && self.peek_at(1).ident().is_some() {
            self.bump();
            name.push('.');
            name.push_str(self.bump().ident().unwrap_or_default());
        }

        let mut args = Vec::new();
        if self.peek().is_punct('(') && self.peek().span.start.line == self.prev_end().line {
            let open = self.bump().span.start;
            let mut depth = 1usize;
            while depth > 0 {
                let token = self.bump();
                match token.kind {
                    TokenKind::Eof => {
                        return Err(ParseError::UnclosedDelimiter {
                            delimiter: '(',
                            position: open,
                        });
                    }
                    TokenKind::Punct('(') => depth += 1,
                    TokenKind::Punct(')') => depth -= 1,
                    TokenKind::Str(value) => args.push(value),
                    _ => {}
                }
            }
        }

        Ok(Some(Annotation {
            name,
            use_site: use_site.clone(),
            args,
            span: Span::new(start, self.prev_end()),
        }))
    }

    fn parse_declaration(
        &mut self,
        parent: NodeId,
        kind: DeclarationKind,
        in_function: bool,
    ) -> ParseResult<()> {
        let start = self.peek().span.start;
        let mut annotations = Vec::new();
        let mut modifiers = Vec::new();

        loop {
            if self.peek().is_punct('@') {
                annotations.extend(self.parse_annotations()?);
            } else if self.is_modifier_at(self.pos) {
                modifiers.push(self.bump().raw);
            } else {
                break;
            }
        }

        // Declaration keyword; `fun interface` spends two tokens.
        self.bump();
        if kind == DeclarationKind::Interface && self.peek().is_ident("interface") {
            self.bump();
        }

        let node_kind = match kind {
            DeclarationKind::Class => NodeKind::Class,
            DeclarationKind::Object => NodeKind::Object,
            DeclarationKind::Interface => NodeKind::Interface,
            DeclarationKind::Function => NodeKind::Function,
            DeclarationKind::Property => NodeKind::Property,
        };
        let mut node = Node::new(node_kind).with_span(Span::new(start, start));
        node.annotations = annotations;
        node.modifiers = modifiers;

        let id = match kind {
            DeclarationKind::Function => self.parse_function(parent, node)?,
            DeclarationKind::Property => self.parse_property(parent, node)?,
            _ => self.parse_class_like(parent, node, in_function)?,
        };

        let end = self.prev_end();
        self.builder.node_mut(id).span.end = end;
        Ok(())
    }

    fn parse_class_like(
        &mut self,
        parent: NodeId,
        mut node: Node,
        in_function: bool,
    ) -> ParseResult<NodeId> {
        if let Some(name) = self.peek().ident().map(str::to_string)
            && name != "constructor"
        {
            let token = self.bump();
            node = node.with_name(name).with_name_span(token.span);
        }
        let id = self.builder.add(parent, node);

        if self.peek().is_punct('<') {
            self.skip_angle_brackets();
        }

        // Primary constructor, possibly with annotations or a visibility modifier.
        let mut i = self.pos;
        loop {
            if self.token_at(i).is_punct('@') {
                match self.skip_annotation_at(i) {
                    Some(next) => i = next,
                    None => break,
                }
            } else if self.is_modifier_at(i) {
                i += 1;
            } else {
                break;
            }
        }
        if self.token_at(i).is_ident("constructor") {
            self.pos = i + 1;
        }
        if self.peek().is_punct('(') {
            self.parse_parameters(id)?;
        }

        if self.peek().is_punct(':') || self.peek().is_ident("where") {
            self.bump();
            self.skip_header();
        }

        if self.peek().is_punct('{') {
            let open = self.bump().span.start;
            self.parse_block_contents(id, Some(open), in_function)?;
        }

        Ok(id)
    }

    fn parse_function(&mut self, parent: NodeId, mut node: Node) -> ParseResult<NodeId> {
        if self.peek().is_punct('<') {
            self.skip_angle_brackets();
        }

        // Receiver and name: the name is the last identifier before `(`.
        let mut name_token: Option<Token> = None;
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Punct('(') | TokenKind::Punct('{') | TokenKind::Punct('}')
                | TokenKind::Punct('=') | TokenKind::Eof => break,
                TokenKind::Punct('<') => self.skip_angle_brackets(),
                TokenKind::Ident(_) => name_token = Some(self.bump()),
                _ => {
                    self.bump();
                }
            }
        }
        if let Some(token) = name_token
            && let TokenKind::Ident(name) = token.kind
        {
            node = node.with_name(name).with_name_span(token.span);
        }
        let id = self.builder.add(parent, node);

        if self.peek().is_punct('(') {
            self.parse_parameters(id)?;
        }

        if self.peek().is_punct(':') {
            self.bump();
            let return_type = self.collect_type();
            if !return_type.is_empty() {
                self.builder.node_mut(id).return_type = Some(return_type);
            }
        }

        if self.peek().is_ident("where") {
            self.bump();
            self.skip_header();
        }

        if self.peek().is_punct('{') {
            let open = self.bump().span.start;
            self.parse_block_contents(id, Some(open), true)?;
        } else if self.peek().is_punct('=') {
            self.bump();
            self.skip_expression()?;
        }

        Ok(id)
    }

    fn parse_property(&mut self, parent: NodeId, mut node: Node) -> ParseResult<NodeId> {
        if self.peek().is_punct('<') {
            self.skip_angle_brackets();
        }

        if self.peek().ident().is_some() {
            let mut token = self.bump();
            // Extension property: `val String.size`.
            while self.peek().is_punct('.') && self.peek_at(1).ident().is_some() {
                self.bump();
                token = self.bump();
            }
            if let TokenKind::Ident(name) = token.kind {
                node = node.with_name(name).with_name_span(token.span);
            }
        }
        let id = self.builder.add(parent, node);
        self.skip_expression()?;
        Ok(id)
    }

    fn parse_parameters(&mut self, owner: NodeId) -> ParseResult<()> {
        let open = self.bump().span.start;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    return Err(ParseError::UnclosedDelimiter {
                        delimiter: '(',
                        position: open,
                    });
                }
                TokenKind::Punct(')') => {
                    self.bump();
                    return Ok(());
                }
                TokenKind::Punct(',') => {
                    self.bump();
                }
                _ => {
                    let before = self.pos;
                    self.parse_parameter(owner)?;
                    if self.pos == before {
                        self.bump();
                    }
                }
            }
        }
    }

    fn parse_parameter(&mut self, owner: NodeId) -> ParseResult<()> {
        let start = self.peek().span.start;
        let mut node = Node::new(NodeKind::Parameter);

        loop {
            if self.peek().is_punct('@') {
                let parsed = self.parse_annotations()?;
                node.annotations.extend(parsed);
            } else if self
                .peek()
                .ident()
                .is_some_and(|word| PARAMETER_MODIFIERS.contains(&word))
                && self.peek_at(1).ident().is_some()
            {
                node.modifiers.push(self.bump().raw);
            } else {
                break;
            }
        }

        let mut named = false;
        if self.peek().ident().is_some() {
            let token = self.bump();
            if let TokenKind::Ident(name) = token.kind {
                node = node.with_name(name).with_name_span(token.span);
                named = true;
            }
        }

        // Type and default value, up to the next top-level `,` or `)`.
        let mut angle_depth = 0usize;
        let mut in_default = false;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Punct(')') => break,
                TokenKind::Punct(',') if angle_depth == 0 => break,
                TokenKind::Punct('(') => self.skip_balanced('(', ')')?,
                TokenKind::Punct('[') => self.skip_balanced('[', ']')?,
                TokenKind::Punct('{') => self.skip_balanced('{', '}')?,
                TokenKind::Punct('-') if self.is_arrow_at(self.pos) => {
                    self.bump();
                    self.bump();
                }
                TokenKind::Punct('<') if !in_default => {
                    angle_depth += 1;
                    self.bump();
                }
                TokenKind::Punct('>') if !in_default => {
                    angle_depth = angle_depth.saturating_sub(1);
                    self.bump();
                }
                TokenKind::Punct('=') => {
                    in_default = true;
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }

        if named {
            node.span = Span::new(start, self.prev_end());
            self.builder.add(owner, node);
        }
        Ok(())
    }

    /// Consume a balanced group starting at the current `open` token.
    fn skip_balanced(&mut self, open: char, close: char) -> ParseResult<()> {
        let start = self.peek().span.start;
        match self.skip_balanced_at(self.pos, open, close) {
            Some(next) => {
                self.pos = next;
                Ok(())
            }
            None => Err(ParseError::UnclosedDelimiter {
                delimiter: open,
                position: start,
            }),
        }
    }

    fn skip_angle_brackets(&mut self) {
        let mut depth = 0usize;
        loop {
            if self.is_arrow_at(self.pos) {
                self.bump();
                self.bump();
                continue;
            }
            let token = self.bump();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Punct('<') => depth += 1,
                TokenKind::Punct('>') => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// True when the current token sits on a later line than the previous one
    /// and starts a new statement.
    fn at_new_statement(&self, last_line: usize) -> bool {
        self.peek().span.start.line > last_line && self.is_statement_start_at(self.pos)
    }

    /// Skip a supertype list or `where` clause up to the declaration body.
    fn skip_header(&mut self) {
        loop {
            let last_line = self.prev_end().line;
            let token = self.peek();
            if matches!(
                token.kind,
                TokenKind::Eof | TokenKind::Punct('{') | TokenKind::Punct('}') | TokenKind::Punct(';')
            ) || self.at_new_statement(last_line)
            {
                return;
            }
            if token.is_punct('(') {
                if self.skip_balanced('(', ')').is_err() {
                    return;
                }
            } else {
                self.bump();
            }
        }
    }

    /// Skip an expression body or initializer.
    fn skip_expression(&mut self) -> ParseResult<()> {
        loop {
            let last_line = self.prev_end().line;
            let token = self.peek();
            match token.kind {
                TokenKind::Eof | TokenKind::Punct('}') | TokenKind::Punct(')') => return Ok(()),
                TokenKind::Punct(';') => {
                    self.bump();
                    return Ok(());
                }
                _ if self.at_new_statement(last_line) => return Ok(()),
                TokenKind::Punct('(') => self.skip_balanced('(', ')')?,
                TokenKind::Punct('[') => self.skip_balanced('[', ']')?,
                TokenKind::Punct('{') => self.skip_balanced('{', '}')?,
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Collect a declared type as text, stopping before a body or initializer.
    fn collect_type(&mut self) -> String {
        let mut text = String::new();
        loop {
            let last_line = self.prev_end().line;
            let token = self.peek();
            if matches!(
                token.kind,
                TokenKind::Eof
                    | TokenKind::Punct('{')
                    | TokenKind::Punct('}')
                    | TokenKind::Punct('=')
                    | TokenKind::Punct(';')
            ) || token.is_ident("where")
                || self.at_new_statement(last_line)
            {
                return text;
            }
            if token.is_punct('(') {
                let start = self.pos;
                if self.skip_balanced('(', ')').is_err() {
                    return text;
                }
                for token in &self.tokens[start..self.pos] {
                    text.push_str(&token.raw);
                }
            } else {
                text.push_str(&self.bump().raw);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_of(tree: &SyntaxTree, kind: NodeKind) -> Vec<String> {
        tree.nodes_of_kind(kind)
            .filter_map(|id| tree.get(id).name.clone())
            .collect()
    }

    #[test]
    fn test_parse_file_annotation_and_package() {
        let tree = parse_string(
            r#"@file:Suppress("detekt:ALL")
package com.example.app

import kotlin.math.max

class A"#,
        )
        .unwrap();

        let root = tree.get(tree.root());
        assert_eq!(root.annotations.len(), 1);
        assert_eq!(root.annotations[0].use_site.as_deref(), Some("file"));
        assert_eq!(root.annotations[0].args, vec!["detekt:ALL"]);
        assert_eq!(names_of(&tree, NodeKind::Package), vec!["com.example.app"]);
        assert_eq!(names_of(&tree, NodeKind::Class), vec!["A"]);
    }

    #[test]
    fn test_parse_function_parameters() {
        let tree =
            parse_string("fun lpl(a: Int, b: Int, c: Int, d: Int, e: Int, f: Int) = Unit").unwrap();
        let function = tree.nodes_of_kind(NodeKind::Function).next().unwrap();
        assert_eq!(tree.get(function).name.as_deref(), Some("lpl"));
        assert_eq!(tree.children(function).len(), 6);
    }

    #[test]
    fn test_parameters_with_generics_defaults_and_lambdas() {
        let tree = parse_string(
            "fun f(a: Map<String, Int>, b: (Int, Int) -> Int = { x, y -> x + y }, vararg c: String) {}",
        )
        .unwrap();
        assert_eq!(names_of(&tree, NodeKind::Parameter), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_annotation_directly_before_declaration() {
        let tree = parse_string(r#"@Suppress("complexity")fun lpl(a: Int) = Unit"#).unwrap();
        let function = tree.nodes_of_kind(NodeKind::Function).next().unwrap();
        assert_eq!(tree.get(function).annotations[0].name, "Suppress");
        assert_eq!(tree.get(function).annotations[0].args, vec!["complexity"]);
    }

    #[test]
    fn test_nested_functions_and_locations() {
        let tree = parse_string(
            r#"class C : I {
    override fun shouldNotBeFlagged() {
        fun SHOULD_BE_FLAGGED() { }
    }
}
interface I { fun shouldNotBeFlagged() }"#,
        )
        .unwrap();

        let functions: Vec<NodeId> = tree.nodes_of_kind(NodeKind::Function).collect();
        assert_eq!(functions.len(), 3);

        let outer = tree.get(functions[0]);
        assert!(outer.has_modifier("override"));

        let inner = tree.get(functions[1]);
        assert_eq!(inner.name.as_deref(), Some("SHOULD_BE_FLAGGED"));
        assert_eq!(tree.parent(functions[1]), Some(functions[0]));
        let start = inner.report_span().start;
        assert_eq!((start.line, start.column), (3, 13));

        assert_eq!(names_of(&tree, NodeKind::Interface), vec!["I"]);
    }

    #[test]
    fn test_anonymous_functions_are_not_declarations() {
        let tree = parse_string(
            r#"val f: (Int) -> Int = fun(i: Int): Int {
    return i + i
}"#,
        )
        .unwrap();
        assert_eq!(tree.nodes_of_kind(NodeKind::Function).count(), 0);
        assert_eq!(names_of(&tree, NodeKind::Property), vec!["f"]);
    }

    #[test]
    fn test_return_type_and_following_declaration() {
        let tree = parse_string(
            r#"interface Foo
private class FooImpl : Foo

fun Foo(): Foo = FooImpl()"#,
        )
        .unwrap();
        let function = tree.nodes_of_kind(NodeKind::Function).next().unwrap();
        assert_eq!(tree.get(function).return_type.as_deref(), Some("Foo"));
        assert_eq!(names_of(&tree, NodeKind::Class), vec!["FooImpl"]);
        assert!(tree.get(tree.nodes_of_kind(NodeKind::Class).next().unwrap()).has_modifier("private"));
    }

    #[test]
    fn test_destructuring_in_body_is_skipped() {
        let tree = parse_string(
            r#"data class D(val i: Int, val j: Int)
fun doStuff() {
    val (_, HOLY_GRAIL) = D(5, 4)
}"#,
        )
        .unwrap();
        assert_eq!(names_of(&tree, NodeKind::Function), vec!["doStuff"]);
        assert_eq!(names_of(&tree, NodeKind::Parameter), vec!["i", "j"]);
        assert_eq!(tree.nodes_of_kind(NodeKind::Property).count(), 0);
    }

    #[test]
    fn test_backticked_function_name() {
        let tree = parse_string("fun `7his is a function name _`() = Unit").unwrap();
        let function = tree.get(tree.nodes_of_kind(NodeKind::Function).next().unwrap());
        assert_eq!(function.name.as_deref(), Some("`7his is a function name _`"));
        assert_eq!(function.report_span().start.column, 5);
    }

    #[test]
    fn test_objects_and_companions() {
        let tree = parse_string(
            r#"object Foo {
    fun MYFun() {}
}
class Bar {
    companion object {
        fun create() = Bar()
    }
}"#,
        )
        .unwrap();
        assert_eq!(tree.nodes_of_kind(NodeKind::Object).count(), 2);
        assert_eq!(names_of(&tree, NodeKind::Function), vec!["MYFun", "create"]);
    }

    #[test]
    fn test_deprecated_and_qualified_annotations() {
        let tree = parse_string(
            r#"@Deprecated("This should no longer be used")
@kotlin.Suppress("A", "B")
@JvmInline
class Test"#,
        )
        .unwrap();
        let class = tree.get(tree.nodes_of_kind(NodeKind::Class).next().unwrap());
        let names: Vec<&str> = class.annotations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Deprecated", "kotlin.Suppress", "JvmInline"]);
        assert_eq!(class.annotations[1].args, vec!["A", "B"]);
        assert!(class.annotations[2].args.is_empty());
    }

    #[test]
    fn test_grouped_annotations() {
        let tree = parse_string(
            "@[Suppress(\"A\") Deprecated(\"old\") JvmInline]\nclass Test {\n    fun f(@[Suppress(\"B\")] x: Int) = x\n}\n",
        )
        .unwrap();
        let class = tree.get(tree.nodes_of_kind(NodeKind::Class).next().unwrap());
        let names: Vec<&str> = class.annotations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Suppress", "Deprecated", "JvmInline"]);
        assert_eq!(class.annotations[0].args, vec!["A"]);
        assert_eq!(class.annotations[1].args, vec!["old"]);

        let parameter = tree.get(tree.nodes_of_kind(NodeKind::Parameter).next().unwrap());
        assert_eq!(parameter.annotations[0].args, vec!["B"]);
    }

    #[test]
    fn test_grouped_file_annotations() {
        let tree = parse_string("@file:[Suppress(\"detekt:ALL\")]\n\nclass A\n").unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.annotations.len(), 1);
        assert_eq!(root.annotations[0].use_site.as_deref(), Some("file"));
        assert_eq!(root.annotations[0].args, vec!["detekt:ALL"]);
    }

    #[test]
    fn test_unclosed_grouped_annotation() {
        let err = parse_string("@file:[Suppress(\"A\")\n").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedDelimiter { delimiter: '[', .. }));
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_string("class A {\n fun b() {}\n").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedDelimiter { delimiter: '{', .. }));
    }

    #[test]
    fn test_unmatched_close_brace() {
        let err = parse_string("fun a() {}\n}").unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedCloseBrace { .. }));
    }
}
