//! Byte-cursor scanner for the script grammar.
//!
//! Same shape as the JSON text decoder: the raw input in `data`, a cursor in
//! `x`, and a family of `read_*` methods. Whether a `/` starts a regular
//! expression or a division is decided from the previous significant token.

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Num(f64),
    Str(String),
    /// Template literal. Interpolated expressions are kept as raw source and
    /// sub-parsed by the parser.
    Template { quasis: Vec<String>, exprs: Vec<String> },
    Ident(String),
    Punct(&'static str),
    Regex { pattern: String, flags: String },
    Eof,
}

/// Multi-byte punctuators first; matching is first-hit.
const PUNCTS: &[&str] = &[
    ">>>=", "...", "===", "!==", ">>>", "<<=", ">>=", "**=", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".",
];

/// Keywords after which a `/` begins a regular expression.
const OPERATOR_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "do", "else", "case",
    "throw", "yield",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Prev {
    Start,
    /// Previous token can end an operand; `/` is a division.
    Value,
    /// Previous token expects an operand; `/` starts a regex.
    Operator,
}

pub struct Lexer<'a> {
    data: &'a [u8],
    x: usize,
    prev: Prev,
    /// Whether a line terminator preceded the most recently scanned token.
    pub newline_before: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            data: src.as_bytes(),
            x: 0,
            prev: Prev::Start,
            newline_before: false,
        }
    }

    pub fn pos(&self) -> usize {
        self.x
    }

    pub fn next(&mut self) -> Result<Token, ParseError> {
        self.newline_before = self.skip_trivia()?;
        if self.x >= self.data.len() {
            self.prev = Prev::Operator;
            return Ok(Token::Eof);
        }
        let ch = self.data[self.x];
        let tok = match ch {
            b'"' | b'\'' => Token::Str(self.read_string(ch)?),
            b'`' => self.read_template()?,
            b'0'..=b'9' => Token::Num(self.read_number()?),
            b'.' if self.peek_at(self.x + 1).is_some_and(|b| b.is_ascii_digit()) => {
                Token::Num(self.read_number()?)
            }
            b'/' if self.prev != Prev::Value => self.read_regex()?,
            b if is_ident_start(b) => Token::Ident(self.read_ident()),
            _ => Token::Punct(self.read_punct()?),
        };
        self.prev = classify(&tok);
        Ok(tok)
    }

    fn peek_at(&self, pos: usize) -> Option<u8> {
        self.data.get(pos).copied()
    }

    /// Skips whitespace and comments; reports whether a line terminator was
    /// crossed (needed for semicolon insertion).
    fn skip_trivia(&mut self) -> Result<bool, ParseError> {
        let mut newline = false;
        loop {
            match self.peek_at(self.x) {
                Some(b' ') | Some(b'\t') | Some(0x0b) | Some(0x0c) => self.x += 1,
                Some(b'\n') | Some(b'\r') => {
                    newline = true;
                    self.x += 1;
                }
                // U+00A0 no-break space.
                Some(0xc2) if self.peek_at(self.x + 1) == Some(0xa0) => self.x += 2,
                // U+2028 / U+2029 line separators.
                Some(0xe2)
                    if self.peek_at(self.x + 1) == Some(0x80)
                        && matches!(self.peek_at(self.x + 2), Some(0xa8) | Some(0xa9)) =>
                {
                    newline = true;
                    self.x += 3;
                }
                // Byte order mark.
                Some(0xef)
                    if self.peek_at(self.x + 1) == Some(0xbb)
                        && self.peek_at(self.x + 2) == Some(0xbf) =>
                {
                    self.x += 3;
                }
                Some(b'/') if self.peek_at(self.x + 1) == Some(b'/') => {
                    self.x += 2;
                    while let Some(b) = self.peek_at(self.x) {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.x += 1;
                    }
                }
                Some(b'/') if self.peek_at(self.x + 1) == Some(b'*') => {
                    let start = self.x;
                    self.x += 2;
                    loop {
                        match self.peek_at(self.x) {
                            None => {
                                return Err(ParseError::Unterminated {
                                    pos: start,
                                    what: "comment",
                                })
                            }
                            Some(b'*') if self.peek_at(self.x + 1) == Some(b'/') => {
                                self.x += 2;
                                break;
                            }
                            Some(b'\n') | Some(b'\r') => {
                                newline = true;
                                self.x += 1;
                            }
                            Some(_) => self.x += 1,
                        }
                    }
                }
                _ => return Ok(newline),
            }
        }
    }

    fn read_punct(&mut self) -> Result<&'static str, ParseError> {
        let rest = &self.data[self.x..];
        for p in PUNCTS {
            if rest.starts_with(p.as_bytes()) {
                // `?.5` is a conditional with a fractional consequent, not
                // optional chaining.
                if *p == "?." && rest.get(2).is_some_and(|b| b.is_ascii_digit()) {
                    continue;
                }
                self.x += p.len();
                return Ok(p);
            }
        }
        Err(ParseError::UnexpectedChar {
            pos: self.x,
            ch: self.char_at(self.x),
        })
    }

    fn read_ident(&mut self) -> String {
        let start = self.x;
        while self.peek_at(self.x).is_some_and(is_ident_continue) {
            self.x += 1;
        }
        String::from_utf8_lossy(&self.data[start..self.x]).into_owned()
    }

    fn read_number(&mut self) -> Result<f64, ParseError> {
        let start = self.x;
        if self.peek_at(self.x) == Some(b'0') {
            match self.peek_at(self.x + 1) {
                Some(b'x') | Some(b'X') => return self.read_radix(16, start),
                Some(b'o') | Some(b'O') => return self.read_radix(8, start),
                Some(b'b') | Some(b'B') => return self.read_radix(2, start),
                Some(b) if (b'0'..=b'7').contains(&b) => return self.read_legacy_octal(start),
                _ => {}
            }
        }
        let len = self.data.len();
        while self.x < len && self.data[self.x].is_ascii_digit() {
            self.x += 1;
        }
        if self.peek_at(self.x) == Some(b'.') {
            self.x += 1;
            while self.x < len && self.data[self.x].is_ascii_digit() {
                self.x += 1;
            }
        }
        if matches!(self.peek_at(self.x), Some(b'e') | Some(b'E')) {
            self.x += 1;
            if matches!(self.peek_at(self.x), Some(b'+') | Some(b'-')) {
                self.x += 1;
            }
            if !self.peek_at(self.x).is_some_and(|b| b.is_ascii_digit()) {
                return Err(ParseError::BadNumber { pos: start });
            }
            while self.x < len && self.data[self.x].is_ascii_digit() {
                self.x += 1;
            }
        }
        let text = std::str::from_utf8(&self.data[start..self.x])
            .map_err(|_| ParseError::BadNumber { pos: start })?;
        text.parse::<f64>().map_err(|_| ParseError::BadNumber { pos: start })
    }

    fn read_radix(&mut self, radix: u32, start: usize) -> Result<f64, ParseError> {
        self.x += 2; // `0x` / `0o` / `0b`
        let digits_start = self.x;
        let mut value: u64 = 0;
        while let Some(b) = self.peek_at(self.x) {
            let Some(d) = (b as char).to_digit(radix) else { break };
            value = value
                .checked_mul(radix as u64)
                .and_then(|v| v.checked_add(d as u64))
                .ok_or(ParseError::BadNumber { pos: start })?;
            self.x += 1;
        }
        if self.x == digits_start {
            return Err(ParseError::BadNumber { pos: start });
        }
        Ok(value as f64)
    }

    fn read_legacy_octal(&mut self, start: usize) -> Result<f64, ParseError> {
        self.x += 1; // leading `0`
        let mut value: u64 = 0;
        while let Some(b @ b'0'..=b'7') = self.peek_at(self.x) {
            value = value
                .checked_mul(8)
                .and_then(|v| v.checked_add((b - b'0') as u64))
                .ok_or(ParseError::BadNumber { pos: start })?;
            self.x += 1;
        }
        // `089`-style literals fall back to decimal.
        if self.peek_at(self.x).is_some_and(|b| b.is_ascii_digit()) {
            self.x = start;
            let len = self.data.len();
            while self.x < len && self.data[self.x].is_ascii_digit() {
                self.x += 1;
            }
            let text = std::str::from_utf8(&self.data[start..self.x])
                .map_err(|_| ParseError::BadNumber { pos: start })?;
            return text.parse::<f64>().map_err(|_| ParseError::BadNumber { pos: start });
        }
        Ok(value as f64)
    }

    fn read_string(&mut self, quote: u8) -> Result<String, ParseError> {
        let start = self.x;
        self.x += 1; // opening quote
        let mut out: Vec<u8> = Vec::new();
        loop {
            match self.peek_at(self.x) {
                None => return Err(ParseError::Unterminated { pos: start, what: "string" }),
                Some(b'\n') => return Err(ParseError::Unterminated { pos: start, what: "string" }),
                Some(b) if b == quote => {
                    self.x += 1;
                    break;
                }
                Some(b'\\') => {
                    self.x += 1;
                    self.read_escape(&mut out)?;
                }
                Some(b) => {
                    out.push(b);
                    self.x += 1;
                }
            }
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Decodes one escape sequence; the cursor sits just past the backslash.
    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let pos = self.x;
        let Some(b) = self.peek_at(self.x) else {
            return Err(ParseError::BadEscape { pos });
        };
        match b {
            b'n' => {
                out.push(b'\n');
                self.x += 1;
            }
            b't' => {
                out.push(b'\t');
                self.x += 1;
            }
            b'r' => {
                out.push(b'\r');
                self.x += 1;
            }
            b'b' => {
                out.push(0x08);
                self.x += 1;
            }
            b'f' => {
                out.push(0x0c);
                self.x += 1;
            }
            b'v' => {
                out.push(0x0b);
                self.x += 1;
            }
            b'0'..=b'7' => {
                // Legacy octal escape, up to three digits.
                let mut value: u32 = 0;
                let mut taken = 0;
                while taken < 3 {
                    match self.peek_at(self.x) {
                        Some(d @ b'0'..=b'7') if value * 8 + (d - b'0') as u32 <= 0xff => {
                            value = value * 8 + (d - b'0') as u32;
                            self.x += 1;
                            taken += 1;
                        }
                        _ => break,
                    }
                }
                push_char(out, char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'x' => {
                self.x += 1;
                let value = self.read_hex_digits(2, pos)?;
                push_char(out, char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'u' => {
                self.x += 1;
                let value = if self.peek_at(self.x) == Some(b'{') {
                    self.x += 1;
                    let mut value: u32 = 0;
                    let mut any = false;
                    while let Some(d) = self.peek_at(self.x).and_then(hex_val) {
                        value = value.checked_mul(16).and_then(|v| v.checked_add(d))
                            .ok_or(ParseError::BadEscape { pos })?;
                        self.x += 1;
                        any = true;
                    }
                    if !any || self.peek_at(self.x) != Some(b'}') {
                        return Err(ParseError::BadEscape { pos });
                    }
                    self.x += 1;
                    value
                } else {
                    let hi = self.read_hex_digits(4, pos)?;
                    if (0xd800..0xdc00).contains(&hi)
                        && self.peek_at(self.x) == Some(b'\\')
                        && self.peek_at(self.x + 1) == Some(b'u')
                    {
                        // Try to pair with a low surrogate.
                        let save = self.x;
                        self.x += 2;
                        match self.read_hex_digits(4, pos) {
                            Ok(lo) if (0xdc00..0xe000).contains(&lo) => {
                                0x10000 + ((hi - 0xd800) << 10) + (lo - 0xdc00)
                            }
                            _ => {
                                self.x = save;
                                hi
                            }
                        }
                    } else {
                        hi
                    }
                };
                push_char(out, char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'\r' => {
                // Line continuation; swallow an optional `\n` too.
                self.x += 1;
                if self.peek_at(self.x) == Some(b'\n') {
                    self.x += 1;
                }
            }
            b'\n' => self.x += 1,
            _ => {
                let ch = self.char_at(self.x);
                push_char(out, ch);
                self.x += ch.len_utf8();
            }
        }
        Ok(())
    }

    fn read_hex_digits(&mut self, count: usize, pos: usize) -> Result<u32, ParseError> {
        let mut value: u32 = 0;
        for _ in 0..count {
            let d = self
                .peek_at(self.x)
                .and_then(hex_val)
                .ok_or(ParseError::BadEscape { pos })?;
            value = value * 16 + d;
            self.x += 1;
        }
        Ok(value)
    }

    fn read_regex(&mut self) -> Result<Token, ParseError> {
        let start = self.x;
        self.x += 1; // opening slash
        let body_start = self.x;
        let mut in_class = false;
        loop {
            match self.peek_at(self.x) {
                None | Some(b'\n') => {
                    return Err(ParseError::Unterminated {
                        pos: start,
                        what: "regular expression",
                    })
                }
                Some(b'\\') => self.x += 2,
                Some(b'[') => {
                    in_class = true;
                    self.x += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.x += 1;
                }
                Some(b'/') if !in_class => break,
                Some(_) => self.x += 1,
            }
        }
        let pattern = String::from_utf8_lossy(&self.data[body_start..self.x]).into_owned();
        self.x += 1; // closing slash
        let flags_start = self.x;
        while self.peek_at(self.x).is_some_and(is_ident_continue) {
            self.x += 1;
        }
        let flags = String::from_utf8_lossy(&self.data[flags_start..self.x]).into_owned();
        Ok(Token::Regex { pattern, flags })
    }

    fn read_template(&mut self) -> Result<Token, ParseError> {
        let start = self.x;
        self.x += 1; // opening backtick
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();
        let mut cur: Vec<u8> = Vec::new();
        loop {
            match self.peek_at(self.x) {
                None => return Err(ParseError::Unterminated { pos: start, what: "template literal" }),
                Some(b'`') => {
                    self.x += 1;
                    quasis.push(String::from_utf8_lossy(&cur).into_owned());
                    return Ok(Token::Template { quasis, exprs });
                }
                Some(b'\\') => {
                    self.x += 1;
                    self.read_escape(&mut cur)?;
                }
                Some(b'$') if self.peek_at(self.x + 1) == Some(b'{') => {
                    quasis.push(String::from_utf8_lossy(&cur).into_owned());
                    cur = Vec::new();
                    self.x += 2;
                    exprs.push(self.read_template_expr(start)?);
                }
                Some(b) => {
                    cur.push(b);
                    self.x += 1;
                }
            }
        }
    }

    /// Captures the raw source of one `${...}` interpolation, balancing
    /// braces and skipping over nested string/template literals.
    fn read_template_expr(&mut self, start: usize) -> Result<String, ParseError> {
        let expr_start = self.x;
        let mut depth = 1usize;
        loop {
            match self.peek_at(self.x) {
                None => return Err(ParseError::Unterminated { pos: start, what: "template literal" }),
                Some(b'{') => {
                    depth += 1;
                    self.x += 1;
                }
                Some(b'}') => {
                    depth -= 1;
                    self.x += 1;
                    if depth == 0 {
                        let src = String::from_utf8_lossy(&self.data[expr_start..self.x - 1])
                            .into_owned();
                        return Ok(src);
                    }
                }
                Some(q @ (b'"' | b'\'' | b'`')) => {
                    self.x += 1;
                    self.skip_raw_until(q, start)?;
                }
                Some(_) => self.x += 1,
            }
        }
    }

    fn skip_raw_until(&mut self, quote: u8, start: usize) -> Result<(), ParseError> {
        loop {
            match self.peek_at(self.x) {
                None => return Err(ParseError::Unterminated { pos: start, what: "template literal" }),
                Some(b'\\') => self.x += 2,
                Some(b) if b == quote => {
                    self.x += 1;
                    return Ok(());
                }
                Some(_) => self.x += 1,
            }
        }
    }

    fn char_at(&self, pos: usize) -> char {
        let end = (pos + 4).min(self.data.len());
        String::from_utf8_lossy(&self.data[pos..end])
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

fn classify(tok: &Token) -> Prev {
    match tok {
        Token::Num(_) | Token::Str(_) | Token::Template { .. } | Token::Regex { .. } => Prev::Value,
        Token::Ident(s) => {
            if OPERATOR_KEYWORDS.contains(&s.as_str()) {
                Prev::Operator
            } else {
                Prev::Value
            }
        }
        Token::Punct(p) => match *p {
            ")" | "]" | "++" | "--" => Prev::Value,
            _ => Prev::Operator,
        },
        Token::Eof => Prev::Operator,
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn hex_val(b: u8) -> Option<u32> {
    (b as char).to_digit(16)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
