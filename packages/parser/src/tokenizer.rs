use logos::Logos;
use std::fmt;

/// Expression tokens. Markup (tag names, attribute strings, text) is not
/// tokenized here; the parser scans it character by character and only
/// switches to this lexer inside `{...}` and template substitutions.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    // Keywords
    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[token("typeof")]
    Typeof,

    #[token("void")]
    Void,

    #[token("in")]
    In,

    #[token("instanceof")]
    Instanceof,

    #[token("async")]
    Async,

    #[token("const")]
    Const,

    #[token("let")]
    Let,

    #[token("var")]
    Var,

    #[regex(r"[\p{ID_Start}_$][\p{ID_Continue}$\x{200C}\x{200D}]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex.slice())]
    Number(&'src str),

    #[token("`")]
    Backtick,

    // Punctuation
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token("<=")]
    LessEqual,

    #[token(">=")]
    GreaterEqual,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("===")]
    EqEqEq,

    #[token("!==")]
    NotEqEq,

    #[token("=")]
    Equals,

    #[token("=>")]
    Arrow,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("**")]
    StarStar,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("~")]
    Tilde,

    #[token("&")]
    Ampersand,

    #[token("&&")]
    AndAnd,

    #[token("|")]
    Pipe,

    #[token("||")]
    OrOr,

    #[token("^")]
    Caret,

    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    #[token(">>>")]
    UnsignedShiftRight,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("...")]
    Ellipsis,
}

impl<'src> Token<'src> {
    /// Keywords double as property names (`props.default`, `{ in: 1 }`)
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Token::True => Some("true"),
            Token::False => Some("false"),
            Token::Null => Some("null"),
            Token::Typeof => Some("typeof"),
            Token::Void => Some("void"),
            Token::In => Some("in"),
            Token::Instanceof => Some("instanceof"),
            Token::Async => Some("async"),
            Token::Const => Some("const"),
            Token::Let => Some("let"),
            Token::Var => Some("var"),
            _ => None,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword_text() {
            return write!(f, "'{}'", keyword);
        }
        match self {
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Backtick => write!(f, "'`'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::LAngle => write!(f, "'<'"),
            Token::RAngle => write!(f, "'>'"),
            Token::LessEqual => write!(f, "'<='"),
            Token::GreaterEqual => write!(f, "'>='"),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::EqEqEq => write!(f, "'==='"),
            Token::NotEqEq => write!(f, "'!=='"),
            Token::Equals => write!(f, "'='"),
            Token::Arrow => write!(f, "'=>'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::StarStar => write!(f, "'**'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::Bang => write!(f, "'!'"),
            Token::Tilde => write!(f, "'~'"),
            Token::Ampersand => write!(f, "'&'"),
            Token::AndAnd => write!(f, "'&&'"),
            Token::Pipe => write!(f, "'|'"),
            Token::OrOr => write!(f, "'||'"),
            Token::Caret => write!(f, "'^'"),
            Token::ShiftLeft => write!(f, "'<<'"),
            Token::ShiftRight => write!(f, "'>>'"),
            Token::UnsignedShiftRight => write!(f, "'>>>'"),
            Token::Question => write!(f, "'?'"),
            Token::Colon => write!(f, "':'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Ellipsis => write!(f, "'...'"),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Tokenize a whole expression source, dropping unrecognized input
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

/// Process backslash escapes in a string or template body (without quotes)
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('x');
                        out.push_str(&hex);
                    }
                }
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    let digits: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    digits
                } else {
                    chars.by_ref().take(4).collect()
                };
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push('\u{fffd}'),
                }
            }
            other => out.push(other),
        }
    }

    out
}
