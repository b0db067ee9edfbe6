// ABOUTME: Streams tokens from a stack of source buffers, supporting nested import inclusion

use std::io;
use std::path::Path;

use crate::config::ImportConfig;
use crate::token::{lookup_keyword, Token, TokenKind};

/// One pushed source: the raw bytes, a read cursor, the current byte
/// (`0` once exhausted), and a link to the buffer it will pop back to.
struct SourceBuffer {
    text: Vec<u8>,
    position: usize,
    current: u8,
    prev: Option<Box<SourceBuffer>>,
}

impl SourceBuffer {
    fn new(text: String, prev: Option<Box<SourceBuffer>>) -> Self {
        SourceBuffer {
            text: text.into_bytes(),
            position: 0,
            current: 0,
            prev,
        }
    }
}

/// A single saved lexer position, used by the parser's `for`-header
/// speculative semicolon scan.
#[derive(Clone, Copy)]
pub struct SavePoint {
    position: usize,
}

pub struct Lexer {
    top: Box<SourceBuffer>,
    pub line: usize,
    save_position: usize,
    import_config: ImportConfig,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        let mut lexer = Lexer {
            top: Box::new(SourceBuffer::new(input.into(), None)),
            line: 1,
            save_position: 0,
            import_config: ImportConfig::default(),
        };
        lexer.advance();
        lexer
    }

    /// Overrides how `import "path"` resolves relative paths and which
    /// extension it requires. The host calls this before parsing when it
    /// wants imports resolved relative to something other than the
    /// process's current working directory (e.g. the running script's
    /// own directory).
    pub fn set_import_config(&mut self, config: ImportConfig) {
        self.import_config = config;
    }

    /// Pushes a new source buffer on top of the stack, as `import` does.
    /// The lexer resumes from this buffer's start; when it is exhausted
    /// the stack pops back to whatever was on top before.
    pub fn push_buffer(&mut self, text: impl Into<String>) {
        let old_top = std::mem::replace(
            &mut self.top,
            Box::new(SourceBuffer::new(String::new(), None)),
        );
        self.top = Box::new(SourceBuffer::new(text.into(), Some(old_top)));
        self.advance();
    }

    /// Reads `path` from disk and pushes it as a new source buffer, as
    /// an `import "path.april";` statement does. Rejects files without
    /// the language's source extension before touching the filesystem.
    pub fn push_import(&mut self, path: &str) -> io::Result<()> {
        let required_extension = self.import_config.required_extension;
        let ext = Path::new(path).extension().and_then(|e| e.to_str());
        if ext != Some(required_extension) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("import file must have a .{required_extension} extension"),
            ));
        }
        let resolved = if Path::new(path).is_absolute() {
            Path::new(path).to_path_buf()
        } else {
            self.import_config.base_dir.join(path)
        };
        let contents = std::fs::read_to_string(&resolved)?;
        self.push_buffer(contents);
        Ok(())
    }

    fn advance(&mut self) {
        if self.top.position >= self.top.text.len() {
            if !self.pop_if_exhausted() {
                self.top.current = 0;
            }
        } else {
            self.top.current = self.top.text[self.top.position];
            self.top.position += 1;
        }
    }

    fn pop_if_exhausted(&mut self) -> bool {
        if self.top.prev.is_none() {
            return false;
        }
        let prev = self.top.prev.take().unwrap();
        self.top = prev;
        true
    }

    /// Peeks the next unread byte without consuming the current one;
    /// `0` once the active buffer is exhausted.
    fn peek_byte(&self) -> u8 {
        if self.top.position < self.top.text.len() {
            self.top.text[self.top.position]
        } else {
            0
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.top.current {
                b' ' | b'\t' | 7 | b'\r' => self.advance(),
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        if self.top.current == b'/' && self.peek_byte() == b'/' {
            while self.top.current != b'\n' && self.top.current != 0 && self.top.current != b'\r'
            {
                self.advance();
            }
        }
    }

    fn read_string(&mut self) -> String {
        let mut bytes = Vec::new();
        while self.top.current != b'"' && self.top.current != 0 {
            bytes.push(self.top.current);
            self.advance();
        }
        if self.top.current == b'"' {
            self.advance();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn is_ident_byte(c: u8) -> bool {
        c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
    }

    fn read_ident_or_number(&mut self) -> Token {
        let line = self.line;
        let mut bytes = Vec::new();
        while Self::is_ident_byte(self.top.current) {
            bytes.push(self.top.current);
            self.advance();
        }
        let literal = String::from_utf8_lossy(&bytes).into_owned();

        if !literal.is_empty() && literal.bytes().all(|b| b.is_ascii_digit()) {
            return Token::new(TokenKind::Int, literal, line);
        }
        if !literal.is_empty()
            && literal
                .bytes()
                .all(|b| b.is_ascii_digit() || b == b'.')
        {
            return Token::new(TokenKind::Double, literal, line);
        }
        let kind = lookup_keyword(&literal).unwrap_or(TokenKind::Ident);
        Token::new(kind, literal, line)
    }

    /// Saves the current read position for a later `restore`.
    pub fn save(&mut self) -> SavePoint {
        self.save_position = self.top.position;
        SavePoint {
            position: self.top.position,
        }
    }

    /// Rewinds to a previously `save`d position in the *current* buffer.
    pub fn restore(&mut self, point: SavePoint) {
        self.top.position = point.position;
        if self.top.position > 0 {
            self.top.current = self.top.text[self.top.position - 1];
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_line_comment();
        self.skip_whitespace();

        let line = self.line;

        macro_rules! two_char {
            ($second:expr, $two_kind:expr, $two_lit:expr, $one_kind:expr, $one_lit:expr) => {{
                if self.peek_byte() == $second {
                    self.advance();
                    self.advance();
                    Token::new($two_kind, $two_lit, line)
                } else {
                    self.advance();
                    Token::new($one_kind, $one_lit, line)
                }
            }};
        }

        match self.top.current {
            b'[' => {
                self.advance();
                Token::new(TokenKind::LBracket, "[", line)
            }
            b']' => {
                self.advance();
                Token::new(TokenKind::RBracket, "]", line)
            }
            b'(' => {
                self.advance();
                Token::new(TokenKind::LParen, "(", line)
            }
            b')' => {
                self.advance();
                Token::new(TokenKind::RParen, ")", line)
            }
            b'{' => {
                self.advance();
                Token::new(TokenKind::LBrace, "{", line)
            }
            b'}' => {
                self.advance();
                Token::new(TokenKind::RBrace, "}", line)
            }
            b',' => {
                self.advance();
                Token::new(TokenKind::Comma, ",", line)
            }
            b';' => {
                self.advance();
                Token::new(TokenKind::Semicolon, ";", line)
            }
            b'"' => {
                self.advance();
                let literal = self.read_string();
                Token::new(TokenKind::Str, literal, line)
            }
            b':' => two_char!(
                b'=',
                TokenKind::ColonAssign,
                ":=",
                TokenKind::Colon,
                ":"
            ),
            b'<' => two_char!(b'=', TokenKind::LtEq, "<=", TokenKind::Lt, "<"),
            b'>' => two_char!(b'=', TokenKind::GtEq, ">=", TokenKind::Gt, ">"),
            b'=' => two_char!(b'=', TokenKind::Eq, "==", TokenKind::Assign, "="),
            b'!' => {
                if self.peek_byte() == b'=' {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::NotEq, "!=", line)
                } else {
                    self.advance();
                    Token::new(TokenKind::Not, "!", line)
                }
            }
            b'%' => two_char!(
                b'=',
                TokenKind::PercentAssign,
                "%=",
                TokenKind::Percent,
                "%"
            ),
            b'+' => {
                if self.peek_byte() == b'+' {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::PlusPlus, "++", line)
                } else if self.peek_byte() == b'=' {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::PlusAssign, "+=", line)
                } else {
                    self.advance();
                    Token::new(TokenKind::Plus, "+", line)
                }
            }
            b'-' => {
                if self.peek_byte() == b'-' {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::MinusMinus, "--", line)
                } else if self.peek_byte() == b'=' {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::MinusAssign, "-=", line)
                } else {
                    self.advance();
                    Token::new(TokenKind::Minus, "-", line)
                }
            }
            b'*' => two_char!(
                b'=',
                TokenKind::StarAssign,
                "*=",
                TokenKind::Star,
                "*"
            ),
            b'/' => {
                if self.peek_byte() == b'/' {
                    self.skip_line_comment();
                    Token::new(TokenKind::Comment, "//", line)
                } else if self.peek_byte() == b'=' {
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::SlashAssign, "/=", line)
                } else {
                    self.advance();
                    Token::new(TokenKind::Slash, "/", line)
                }
            }
            0 => Token::new(TokenKind::Eof, "", line),
            c if Self::is_ident_byte(c) => self.read_ident_or_number(),
            other => {
                let literal = (other as char).to_string();
                self.advance();
                Token::new(TokenKind::Ident, literal, line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn punctuation_and_operators() {
        let kinds = kinds(":= <= >= == != += -= *= /= %= ++ --");
        assert_eq!(
            kinds,
            vec![
                TokenKind::ColonAssign,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::PlusAssign,
                TokenKind::MinusAssign,
                TokenKind::StarAssign,
                TokenKind::SlashAssign,
                TokenKind::PercentAssign,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers_classify_by_shape() {
        let mut lexer = Lexer::new("42 3.14 var");
        assert_eq!(lexer.next_token().kind, TokenKind::Int);
        assert_eq!(lexer.next_token().kind, TokenKind::Double);
        assert_eq!(lexer.next_token().kind, TokenKind::Var);
    }

    #[test]
    fn string_literal_has_no_escape_processing() {
        let mut lexer = Lexer::new(r#""hi\nthere""#);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Str);
        assert_eq!(tok.literal, r"hi\nthere");
    }

    #[test]
    fn newline_increments_line_counter() {
        let mut lexer = Lexer::new("var\nx");
        let t1 = lexer.next_token();
        let t2 = lexer.next_token();
        assert_eq!(t1.line, 1);
        assert_eq!(t2.line, 2);
    }

    #[test]
    fn line_comment_runs_to_eol() {
        let kinds = kinds("// a comment\nvar");
        assert_eq!(kinds, vec![TokenKind::Comment, TokenKind::Var, TokenKind::Eof]);
    }

    #[test]
    fn push_buffer_resumes_outer_on_exhaustion() {
        let mut lexer = Lexer::new("outer");
        lexer.push_buffer("inner");
        assert_eq!(lexer.next_token().literal, "inner");
        assert_eq!(lexer.next_token().literal, "outer");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn save_and_restore_rewind_position() {
        let mut lexer = Lexer::new("a ; b");
        let first = lexer.next_token();
        assert_eq!(first.literal, "a");
        let save = lexer.save();
        let _ = lexer.next_token();
        lexer.restore(save);
        let replayed = lexer.next_token();
        assert_eq!(replayed.kind, TokenKind::Semicolon);
    }
}
