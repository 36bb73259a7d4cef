use crate::ast::{Position, Span};
use crate::error::{LexerError, ParseResult};

/// Token types for Kotlin source files
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword (`fun`, `class`, `myName`, `` `name with spaces` ``).
    /// Backticked identifiers keep their backticks.
    Ident(String),
    /// String literal (processed content without quotes, templates kept verbatim)
    Str(String),
    /// Character literal (raw text including quotes)
    Char(String),
    /// Numeric literal
    Number(String),
    /// Any other single character (`@`, `(`, `{`, `:`, `.`, ...)
    Punct(char),
    /// End of file
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind, used in error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Char(_) => "character".to_string(),
            TokenKind::Number(_) => "number".to_string(),
            TokenKind::Punct(ch) => format!("'{}'", ch),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// A token with its position in the source.
#[derive(Debug, Clone)]
pub struct Token {
    /// The kind and optional payload of this token.
    pub kind: TokenKind,
    /// Source span of the token.
    pub span: Span,
    /// Original source text of the token (e.g. `"hello"` including quotes).
    pub raw: String,
}

impl Token {
    /// Check if this token is the identifier or keyword `word`
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(name) if name == word)
    }

    /// Check if this token is the punctuation character `ch`
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Lexer for tokenizing Kotlin source text.
///
/// Whitespace and comments are dropped; line information survives in the
/// token spans. Use [`tokenize`](Lexer::tokenize) to consume the entire input.
pub struct Lexer<'a> {
    source: &'a str,
    line: usize,
    column: usize,
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) -> ParseResult<()> {
        if self.offset == 0 && self.rest().starts_with("#!") {
            while let Some(ch) = self.peek() {
                if ch == '\n' {
                    break;
                }
                self.advance();
            }
        }

        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> ParseResult<()> {
        let start = self.position();
        self.advance();
        self.advance();
        let mut depth = 1;

        while depth > 0 {
            if self.rest().starts_with("/*") {
                self.advance();
                self.advance();
                depth += 1;
            } else if self.rest().starts_with("*/") {
                self.advance();
                self.advance();
                depth -= 1;
            } else if self.advance().is_none() {
                return Err(LexerError::UnterminatedComment { position: start }.into());
            }
        }

        Ok(())
    }

    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_trivia()?;

        let start_pos = self.position();
        let start_offset = self.offset;

        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span::new(start_pos, start_pos),
                raw: String::new(),
            });
        };

        let kind = match ch {
            '"' => self.read_string(start_pos)?,
            '\'' => self.read_char_literal(),
            '`' => self.read_backticked(start_pos)?,
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            c => {
                self.advance();
                TokenKind::Punct(c)
            }
        };

        Ok(Token {
            kind,
            span: Span::new(start_pos, self.position()),
            raw: self.source[start_offset..self.offset].to_string(),
        })
    }

    fn read_identifier(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Ident(name)
    }

    fn read_backticked(&mut self, start: Position) -> ParseResult<TokenKind> {
        let mut name = String::from('`');
        self.advance();
        loop {
            match self.advance() {
                Some('`') => {
                    name.push('`');
                    return Ok(TokenKind::Ident(name));
                }
                Some('\n') | None => {
                    return Err(LexerError::UnterminatedIdentifier { position: start }.into());
                }
                Some(ch) => name.push(ch),
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            let fraction = ch == '.' && self.peek_second().is_some_and(|c| c.is_ascii_digit());
            if ch.is_alphanumeric() || ch == '_' || fraction {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Number(text)
    }

    fn read_char_literal(&mut self) -> TokenKind {
        let start = self.offset;
        self.advance();
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '\'' | '\n' => break,
                _ => {}
            }
        }
        TokenKind::Char(self.source[start..self.offset].to_string())
    }

    fn read_string(&mut self, start: Position) -> ParseResult<TokenKind> {
        if self.rest().starts_with("\"\"\"") {
            return self.read_raw_string(start);
        }

        self.advance();
        let mut content = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(TokenKind::Str(content)),
                Some('\\') => match self.advance() {
                    Some('n') => content.push('\n'),
                    Some('t') => content.push('\t'),
                    Some('r') => content.push('\r'),
                    Some('b') => content.push('\u{8}'),
                    Some('u') => content.push(self.read_unicode_escape()),
                    Some(other) => content.push(other),
                    None => {
                        return Err(LexerError::UnterminatedString { position: start }.into());
                    }
                },
                Some('$') if self.peek() == Some('{') => {
                    content.push('$');
                    self.read_template_expression(&mut content, start)?;
                }
                Some('\n') | None => {
                    return Err(LexerError::UnterminatedString { position: start }.into());
                }
                Some(ch) => content.push(ch),
            }
        }
    }

    fn read_raw_string(&mut self, start: Position) -> ParseResult<TokenKind> {
        for _ in 0..3 {
            self.advance();
        }
        let mut content = String::new();
        loop {
            if self.rest().starts_with("\"\"\"") {
                // Extra quotes before the closing delimiter belong to the content.
                while self.rest().starts_with("\"\"\"\"") {
                    content.push('"');
                    self.advance();
                }
                for _ in 0..3 {
                    self.advance();
                }
                return Ok(TokenKind::Str(content));
            }
            match self.advance() {
                Some('$') if self.peek() == Some('{') => {
                    content.push('$');
                    self.read_template_expression(&mut content, start)?;
                }
                Some(ch) => content.push(ch),
                None => return Err(LexerError::UnterminatedString { position: start }.into()),
            }
        }
    }

    /// Copies a `{ ... }` template expression verbatim, skipping nested strings.
    fn read_template_expression(&mut self, content: &mut String, start: Position) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Some('{') => {
                    depth += 1;
                    content.push('{');
                    self.advance();
                }
                Some('}') => {
                    depth -= 1;
                    content.push('}');
                    self.advance();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some('"') => {
                    let nested_start = self.offset;
                    let nested_pos = self.position();
                    self.read_string(nested_pos)?;
                    content.push_str(&self.source[nested_start..self.offset]);
                }
                Some(ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(LexerError::UnterminatedString { position: start }.into()),
            }
        }
    }

    fn read_unicode_escape(&mut self) -> char {
        let mut hex = String::new();
        while hex.len() < 4 {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    hex.push(ch);
                    self.advance();
                }
                _ => break,
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Tokenizes the entire input, returning all tokens including a trailing [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_annotation_tokens() {
        assert_eq!(
            kinds(r#"@Suppress("LongMethod")"#),
            vec![
                TokenKind::Punct('@'),
                TokenKind::Ident("Suppress".to_string()),
                TokenKind::Punct('('),
                TokenKind::Str("LongMethod".to_string()),
                TokenKind::Punct(')'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "// line\n/* block /* nested */ still */ fun";
        assert_eq!(
            kinds(source),
            vec![TokenKind::Ident("fun".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_backticked_identifier_keeps_backticks() {
        let tokens = Lexer::new("fun `Hi bye`()").tokenize().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Ident("`Hi bye`".to_string()));
        assert_eq!(tokens[1].span.start.column, 5);
    }

    #[test]
    fn test_string_escapes_and_templates() {
        assert_eq!(
            kinds(r#""a\"b ${f("x")} c""#),
            vec![TokenKind::Str(r#"a"b ${f("x")} c"#.to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_raw_string() {
        assert_eq!(
            kinds("\"\"\"\nline \"quoted\"\n\"\"\""),
            vec![TokenKind::Str("\nline \"quoted\"\n".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens = Lexer::new("class A\n  fun b").tokenize().unwrap();
        assert_eq!(tokens[2].span.start.line, 2);
        assert_eq!(tokens[2].span.start.column, 3);
        assert_eq!(tokens[3].span.start.column, 7);
    }

    #[test]
    fn test_numbers_and_ranges() {
        assert_eq!(
            kinds("1.5 1..2"),
            vec![
                TokenKind::Number("1.5".to_string()),
                TokenKind::Number("1".to_string()),
                TokenKind::Punct('.'),
                TokenKind::Punct('.'),
                TokenKind::Number("2".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert_eq!(err.position(), Some(Position::new(1, 1, 0)));
    }
}
