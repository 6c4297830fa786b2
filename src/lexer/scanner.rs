//! Lexer/Scanner for MyPL source code.

use crate::error::LexerError;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// The lexer transforms source code into a stream of tokens, on demand.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    start_pos: usize,
    start_line: usize,
    start_column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scan all tokens from the source, ending with (and including) `Eof`.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, LexerError> {
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

    /// Scan the next token. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments();
        self.mark_start();

        let Some((_, c)) = self.advance() else {
            return Ok(Token::eof(self.line, self.column));
        };

        match c {
            '.' => Ok(self.make_token(TokenKind::Dot)),
            ',' => Ok(self.make_token(TokenKind::Comma)),
            '(' => Ok(self.make_token(TokenKind::LeftParen)),
            ')' => Ok(self.make_token(TokenKind::RightParen)),
            '[' => Ok(self.make_token(TokenKind::LeftBracket)),
            ']' => Ok(self.make_token(TokenKind::RightBracket)),
            '{' => Ok(self.make_token(TokenKind::LeftBrace)),
            '}' => Ok(self.make_token(TokenKind::RightBrace)),
            ';' => Ok(self.make_token(TokenKind::Semicolon)),
            '+' => Ok(self.make_token(TokenKind::Plus)),
            '-' => Ok(self.make_token(TokenKind::Minus)),
            '*' => Ok(self.make_token(TokenKind::Star)),
            '/' => Ok(self.make_token(TokenKind::Slash)),

            '=' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::EqualEqual))
                } else {
                    Ok(self.make_token(TokenKind::Assign))
                }
            }
            '!' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::BangEqual))
                } else {
                    Err(LexerError::LoneBang(self.current_span()))
                }
            }
            '<' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::LessEqual))
                } else {
                    Ok(self.make_token(TokenKind::Less))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::GreaterEqual))
                } else {
                    Ok(self.make_token(TokenKind::Greater))
                }
            }

            '"' => self.scan_string(),
            '\'' => self.scan_char(),

            c if c.is_ascii_digit() => self.scan_number(c),

            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            _ => Err(LexerError::unexpected_char(c, self.current_span())),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan a `"..."` literal. The lexeme excludes the quotes and keeps
    /// escape sequences as written.
    fn scan_string(&mut self) -> Result<Token, LexerError> {
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexerError::UnterminatedString(self.current_span()));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token::new(TokenKind::StringLiteral, value, self.current_span()))
    }

    fn scan_char(&mut self) -> Result<Token, LexerError> {
        let mut value = String::new();

        match self.peek() {
            None | Some('\n') => {
                return Err(LexerError::invalid_char(
                    "unterminated character",
                    self.current_span(),
                ));
            }
            Some('\'') => {
                return Err(LexerError::invalid_char(
                    "empty character",
                    self.current_span(),
                ));
            }
            Some('\\') => {
                self.advance();
                value.push('\\');
                match self.peek() {
                    Some(c) if c != '\n' => {
                        value.push(c);
                        self.advance();
                    }
                    _ => {
                        return Err(LexerError::invalid_char(
                            "unterminated character",
                            self.current_span(),
                        ))
                    }
                }
            }
            Some(c) => {
                value.push(c);
                self.advance();
            }
        }

        if !self.match_char('\'') {
            return Err(LexerError::invalid_char(
                "expecting end of character",
                self.current_span(),
            ));
        }

        Ok(Token::new(TokenKind::CharLiteral, value, self.current_span()))
    }

    fn scan_number(&mut self, first: char) -> Result<Token, LexerError> {
        let mut value = String::from(first);
        let mut is_double = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                value.push(c);
                self.advance();
            } else if c == '.' && !is_double {
                value.push(c);
                self.advance();
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(LexerError::invalid_number(
                        "missing digit in double",
                        value,
                        self.current_span(),
                    ));
                }
                is_double = true;
            } else {
                break;
            }
        }

        let int_part = value.split('.').next().unwrap_or_default();
        if int_part.len() > 1 && int_part.starts_with('0') {
            return Err(LexerError::invalid_number(
                "leading zero in number",
                value,
                self.current_span(),
            ));
        }

        if is_double {
            Ok(Token::new(TokenKind::DoubleLiteral, value, self.current_span()))
        } else {
            if value.parse::<i64>().is_err() {
                return Err(LexerError::invalid_number(
                    "integer literal out of range",
                    value,
                    self.current_span(),
                ));
            }
            Ok(Token::new(TokenKind::IntLiteral, value, self.current_span()))
        }
    }

    fn scan_identifier(&mut self) -> Result<Token, LexerError> {
        self.consume_identifier_chars();

        // `list<T>retrieve` is a single identifier naming the typed retrieval built-in.
        if self.lexeme() == "list" && self.peek() == Some('<') {
            self.advance();
            self.consume_identifier_chars();
            if !self.match_char('>') {
                return Err(LexerError::invalid_char(
                    "expecting '>' in list retrieval name",
                    self.current_span(),
                ));
            }
            self.consume_identifier_chars();
            return Ok(self.make_token(TokenKind::Identifier));
        }

        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        Ok(self.make_token(kind))
    }

    fn consume_identifier_chars(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            self.column += 1;
            Some((pos, c))
        } else {
            None
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn mark_start(&mut self) {
        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start_pos..self.current_pos]
    }

    fn current_span(&self) -> Span {
        Span::new(self.start_line, self.start_column)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.current_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn scan_err(source: &str) -> String {
        Scanner::new(source).scan_tokens().unwrap_err().to_string()
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            scan(". , ( ) [ ] { } ; + - * / = == != < <= > >="),
            vec![
                TokenKind::Dot,
                TokenKind::Comma,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Semicolon,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Assign,
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_literals() {
        assert_eq!(
            scan("struct array list void int x true null"),
            vec![
                TokenKind::Struct,
                TokenKind::Array,
                TokenKind::List,
                TokenKind::Void,
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::BoolLiteral,
                TokenKind::Null,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Scanner::new("0 42 3.25").scan_tokens().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[1].lexeme, "42");
        assert_eq!(tokens[2].kind, TokenKind::DoubleLiteral);
        assert_eq!(tokens[2].lexeme, "3.25");
    }

    #[test]
    fn test_number_errors() {
        assert!(scan_err("007").contains("leading zero in number"));
        assert!(scan_err("1.").contains("missing digit in double"));
        assert!(scan_err("99999999999999999999").contains("out of range"));
    }

    #[test]
    fn test_string_and_char() {
        let tokens = Scanner::new(r#""hi there\n" 'a' '\t'"#).scan_tokens().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, r"hi there\n");
        assert_eq!(tokens[1].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[1].lexeme, "a");
        assert_eq!(tokens[2].lexeme, r"\t");
    }

    #[test]
    fn test_string_and_char_errors() {
        assert!(scan_err("\"abc\ndef\"").contains("unterminated string"));
        assert!(scan_err("''").contains("empty character"));
        assert!(scan_err("'ab'").contains("expecting end of character"));
    }

    #[test]
    fn test_comments_and_positions() {
        let tokens = Scanner::new("# a comment\n  x = 1 # trailing\ny")
            .scan_tokens()
            .unwrap();
        assert_eq!(tokens[0].span, Span::new(2, 3));
        assert_eq!(tokens[1].span, Span::new(2, 5));
        assert_eq!(tokens[2].span, Span::new(2, 7));
        assert_eq!(tokens[3].span, Span::new(3, 1));
    }

    #[test]
    fn test_list_retrieve_identifier() {
        let tokens = Scanner::new("list<int>retrieve(l, 0)").scan_tokens().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "list<int>retrieve");
        assert_eq!(tokens[1].kind, TokenKind::LeftParen);
    }

    #[test]
    fn test_lone_bang() {
        assert_eq!(scan_err("x ! y"), "expecting '!=' at line 1, column 3");
    }

    #[test]
    fn test_next_token_on_demand() {
        let mut scanner = Scanner::new("a");
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Identifier);
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Eof);
    }
}
