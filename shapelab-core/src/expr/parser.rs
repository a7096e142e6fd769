use crate::complex::Complex;
use crate::error::CoreError;

use super::ast::{Ast, BinOp, CmpOp, UnaryOp};
use super::lexer::{tokenize, Token, TokenKind};

/// Longest accepted source text, in bytes.
pub const MAX_SOURCE_LEN: usize = 4096;

/// Maximum depth of the syntax tree. Parentheses, calls, unary operators and
/// powers each add a level, and so does every extra operand of a `+`, `*`,
/// `&`, `|` or comparison chain, since `x+x+x` nests as `(x+x)+x`. Every
/// later pass over the tree recurses at most this deep.
pub const MAX_DEPTH: usize = 128;

/// Namespace prefix accepted in front of whitelisted names (`np.sin`).
const NUMPY_PREFIX: &str = "np";

/// Parse `src` into an [`Ast`].
pub fn parse(src: &str) -> Result<Ast, CoreError> {
    if src.len() > MAX_SOURCE_LEN {
        return Err(CoreError::Parse {
            position: MAX_SOURCE_LEN,
            message: format!("input longer than {MAX_SOURCE_LEN} bytes"),
        });
    }
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    if parser.peek() == &TokenKind::Eof {
        return Err(parser.error("empty expression"));
    }
    let ast = parser.or_expr()?;
    if parser.peek() != &TokenKind::Eof {
        let found = parser.peek().describe();
        return Err(parser.error(format!("unexpected {found}")));
    }
    Ok(ast)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn position(&self) -> usize {
        self.tokens[self.pos].pos
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        kind
    }

    fn error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Parse {
            position: self.position(),
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), CoreError> {
        if self.peek() == &kind {
            self.advance();
            Ok(())
        } else {
            let found = self.peek().describe();
            Err(self.error(format!("expected {}, found {found}", kind.describe())))
        }
    }

    fn is_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), TokenKind::Ident(name) if name == word)
    }

    fn enter(&mut self) -> Result<(), CoreError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("expression nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Undo the `enter` calls of a left-leaning chain with `links` operators.
    fn leave_chain(&mut self, links: usize) {
        self.depth -= links;
    }

    fn or_expr(&mut self) -> Result<Ast, CoreError> {
        let mut left = self.and_expr()?;
        let mut links = 0;
        while self.peek() == &TokenKind::Pipe || self.is_keyword("or") {
            self.advance();
            self.enter()?;
            links += 1;
            let right = self.and_expr()?;
            left = Ast::Or(Box::new(left), Box::new(right));
        }
        self.leave_chain(links);
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Ast, CoreError> {
        let mut left = self.not_expr()?;
        let mut links = 0;
        while self.peek() == &TokenKind::Amp || self.is_keyword("and") {
            self.advance();
            self.enter()?;
            links += 1;
            let right = self.not_expr()?;
            left = Ast::And(Box::new(left), Box::new(right));
        }
        self.leave_chain(links);
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Ast, CoreError> {
        if self.peek() == &TokenKind::Tilde || self.is_keyword("not") {
            self.advance();
            self.enter()?;
            let inner = self.not_expr()?;
            self.leave();
            return Ok(Ast::UnaryOp(UnaryOp::Not, Box::new(inner)));
        }
        self.comparison()
    }

    /// Comparisons chain: `a < b < c` means `a < b and b < c`.
    fn comparison(&mut self) -> Result<Ast, CoreError> {
        let mut left = self.sum()?;
        let mut chain: Option<Ast> = None;
        let mut links = 0;
        while let Some(op) = cmp_op(self.peek()) {
            self.advance();
            self.enter()?;
            links += 1;
            let right = self.sum()?;
            let cmp = Ast::Compare(op, Box::new(left), Box::new(right.clone()));
            chain = Some(match chain {
                None => cmp,
                Some(prev) => Ast::And(Box::new(prev), Box::new(cmp)),
            });
            left = right;
        }
        self.leave_chain(links);
        Ok(chain.unwrap_or(left))
    }

    fn sum(&mut self) -> Result<Ast, CoreError> {
        let mut left = self.product()?;
        let mut links = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter()?;
            links += 1;
            let right = self.product()?;
            left = Ast::BinOp(op, Box::new(left), Box::new(right));
        }
        self.leave_chain(links);
        Ok(left)
    }

    fn product(&mut self) -> Result<Ast, CoreError> {
        let mut left = self.unary()?;
        let mut links = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            self.enter()?;
            links += 1;
            let right = self.unary()?;
            left = Ast::BinOp(op, Box::new(left), Box::new(right));
        }
        self.leave_chain(links);
        Ok(left)
    }

    fn unary(&mut self) -> Result<Ast, CoreError> {
        match self.peek() {
            TokenKind::Minus => {
                self.advance();
                self.enter()?;
                let inner = self.unary()?;
                self.leave();
                Ok(Ast::UnaryOp(UnaryOp::Neg, Box::new(inner)))
            }
            TokenKind::Plus => {
                self.advance();
                self.enter()?;
                let inner = self.unary();
                self.leave();
                inner
            }
            _ => self.power(),
        }
    }

    /// `-x**2` is `-(x**2)` and `2**-1` is allowed.
    fn power(&mut self) -> Result<Ast, CoreError> {
        let base = self.atom()?;
        if self.peek() == &TokenKind::Pow {
            self.advance();
            self.enter()?;
            let exponent = self.unary()?;
            self.leave();
            return Ok(Ast::BinOp(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Ast, CoreError> {
        let start = self.position();
        match self.advance() {
            TokenKind::Num(v) => Ok(Ast::Num(Complex::real(v))),
            TokenKind::Imag(v) => Ok(Ast::Num(Complex::new(0.0, v))),
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.or_expr()?;
                self.leave();
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.name(name, start),
            TokenKind::Eof => Err(self.error("unexpected end of input")),
            other => Err(CoreError::Parse {
                position: start,
                message: format!("unexpected {}", other.describe()),
            }),
        }
    }

    fn name(&mut self, first: String, start: usize) -> Result<Ast, CoreError> {
        let name = if self.peek() == &TokenKind::Dot {
            if first != NUMPY_PREFIX {
                return Err(self.error(format!("attribute access on '{first}' is not allowed")));
            }
            self.advance();
            match self.advance() {
                TokenKind::Ident(attr) => attr,
                other => {
                    return Err(CoreError::Parse {
                        position: start,
                        message: format!("expected a name after 'np.', found {}", other.describe()),
                    })
                }
            }
        } else {
            first
        };

        if matches!(name.as_str(), "and" | "or" | "not") {
            return Err(CoreError::Parse {
                position: start,
                message: format!("unexpected keyword '{name}'"),
            });
        }

        if self.peek() != &TokenKind::LParen {
            return Ok(Ast::Name(name));
        }
        self.advance();
        self.enter()?;
        let mut args = Vec::new();
        if self.peek() != &TokenKind::RParen {
            loop {
                args.push(self.or_expr()?);
                if self.peek() == &TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.leave();
        self.expect(TokenKind::RParen)?;
        Ok(Ast::Call(name, args))
    }
}

fn cmp_op(kind: &TokenKind) -> Option<CmpOp> {
    Some(match kind {
        TokenKind::EqEq => CmpOp::Eq,
        TokenKind::NotEq => CmpOp::Ne,
        TokenKind::Lt => CmpOp::Lt,
        TokenKind::Le => CmpOp::Le,
        TokenKind::Gt => CmpOp::Gt,
        TokenKind::Ge => CmpOp::Ge,
        _ => return None,
    })
}
