use crate::complex::Complex;
use crate::error::CoreError;

/// Value kind of an expression node, checked before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Numeric,
    Boolean,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Numeric => f.write_str("numeric"),
            Kind::Boolean => f.write_str("boolean"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Parsed, unresolved syntax tree. Names are still strings here; the binder
/// turns them into variable slots, constants, and whitelisted functions.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Num(Complex),
    Name(String),
    BinOp(BinOp, Box<Ast>, Box<Ast>),
    UnaryOp(UnaryOp, Box<Ast>),
    Compare(CmpOp, Box<Ast>, Box<Ast>),
    And(Box<Ast>, Box<Ast>),
    Or(Box<Ast>, Box<Ast>),
    Call(String, Vec<Ast>),
}

impl Ast {
    /// Infer the value kind, rejecting numeric/boolean mix-ups such as
    /// `(x < 1) + 2` or `~x`.
    pub fn kind(&self) -> Result<Kind, CoreError> {
        match self {
            Ast::Num(_) | Ast::Name(_) => Ok(Kind::Numeric),
            Ast::BinOp(_, l, r) => {
                expect(l, Kind::Numeric)?;
                expect(r, Kind::Numeric)?;
                Ok(Kind::Numeric)
            }
            Ast::UnaryOp(UnaryOp::Neg, inner) => {
                expect(inner, Kind::Numeric)?;
                Ok(Kind::Numeric)
            }
            Ast::UnaryOp(UnaryOp::Not, inner) => {
                expect(inner, Kind::Boolean)?;
                Ok(Kind::Boolean)
            }
            Ast::Compare(_, l, r) => {
                expect(l, Kind::Numeric)?;
                expect(r, Kind::Numeric)?;
                Ok(Kind::Boolean)
            }
            Ast::And(l, r) | Ast::Or(l, r) => {
                expect(l, Kind::Boolean)?;
                expect(r, Kind::Boolean)?;
                Ok(Kind::Boolean)
            }
            Ast::Call(_, args) => {
                for arg in args {
                    expect(arg, Kind::Numeric)?;
                }
                Ok(Kind::Numeric)
            }
        }
    }
}

pub(crate) fn expect(ast: &Ast, expected: Kind) -> Result<(), CoreError> {
    let found = ast.kind()?;
    if found == expected {
        Ok(())
    } else {
        Err(CoreError::Kind { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Box<Ast> {
        Box::new(Ast::Name(n.into()))
    }

    fn num(v: f64) -> Box<Ast> {
        Box::new(Ast::Num(Complex::real(v)))
    }

    #[test]
    fn comparison_is_boolean() {
        let ast = Ast::Compare(CmpOp::Lt, name("x"), num(1.0));
        assert_eq!(ast.kind().unwrap(), Kind::Boolean);
    }

    #[test]
    fn arithmetic_on_boolean_is_rejected() {
        let cmp = Box::new(Ast::Compare(CmpOp::Lt, name("x"), num(1.0)));
        let ast = Ast::BinOp(BinOp::Add, cmp, num(2.0));
        assert_eq!(
            ast.kind().unwrap_err(),
            CoreError::Kind {
                expected: Kind::Numeric,
                found: Kind::Boolean
            }
        );
    }

    #[test]
    fn not_requires_boolean() {
        let ast = Ast::UnaryOp(UnaryOp::Not, name("x"));
        assert!(ast.kind().is_err());
    }
}
