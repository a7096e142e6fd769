//! Sandboxed expression language for relations in `x`, `y` and complex maps
//! in `z`.
//!
//! Source text goes through [`parser::parse`] into an [`Ast`], is kind-checked
//! (numeric vs boolean), then bound against a fixed variable list into a
//! [`Node`] tree that evaluates one point at a time. Only literals, the bound
//! variables, the constants `pi`, `e`, `i`, and the [`Func`] whitelist are
//! reachable from user input.

mod ast;
mod eval;
mod lexer;
mod parser;

use std::str::FromStr;

pub use ast::{Ast, BinOp, CmpOp, Kind, UnaryOp};
pub use eval::{bind, Env, Func, Node, Singularities};
pub use parser::{parse, MAX_DEPTH, MAX_SOURCE_LEN};

use crate::complex::Complex;
use crate::error::CoreError;

/// A boolean-valued condition on two real variables `x` and `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    source: String,
    ast: Ast,
}

impl Relation {
    pub const VARIABLES: [&'static str; 2] = ["x", "y"];

    /// Parse and kind-check a relation such as `x**2 + y**2 == 1`.
    pub fn parse(src: &str) -> crate::Result<Self> {
        let ast = parse(src)?;
        ast::expect(&ast, Kind::Boolean)?;
        Ok(Self {
            source: src.trim().to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Resolve names against `x` and `y`. Unknown names fail here.
    pub fn bind(&self) -> crate::Result<BoundRelation> {
        Ok(BoundRelation {
            root: bind(&self.ast, &Self::VARIABLES)?,
        })
    }
}

impl FromStr for Relation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A [`Relation`] with its names resolved, ready for grid evaluation.
#[derive(Debug, Clone)]
pub struct BoundRelation {
    root: Node,
}

impl BoundRelation {
    /// Whether `(x, y)` satisfies the relation. `==` holds when both sides
    /// are within `tolerance` of each other. A point where the relation
    /// divides by zero or takes `log(0)` does not match; it is not an error.
    #[inline]
    pub fn matches(&self, x: f64, y: f64, tolerance: f64) -> crate::Result<bool> {
        let vars = [Complex::real(x), Complex::real(y)];
        self.root.eval_bool(&Env {
            vars: &vars,
            eq_tolerance: tolerance,
            singularities: Singularities::Propagate,
        })
    }
}

/// A complex-valued map of one complex variable `z`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Ast,
}

impl Expression {
    pub const VARIABLE: &'static str = "z";

    /// Parse and kind-check an expression such as `(z - 1j)**2`.
    pub fn parse(src: &str) -> crate::Result<Self> {
        let ast = parse(src)?;
        ast::expect(&ast, Kind::Numeric)?;
        Ok(Self {
            source: src.trim().to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Resolve names against `z`. Unknown names fail here.
    pub fn bind(&self) -> crate::Result<BoundExpression> {
        Ok(BoundExpression {
            root: bind(&self.ast, &[Self::VARIABLE])?,
        })
    }
}

impl FromStr for Expression {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An [`Expression`] with its names resolved.
#[derive(Debug, Clone)]
pub struct BoundExpression {
    root: Node,
}

impl BoundExpression {
    #[inline]
    pub fn eval(&self, z: Complex) -> crate::Result<Complex> {
        self.root.eval_num(&Env {
            vars: &[z],
            eq_tolerance: 0.0,
            singularities: Singularities::Error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_must_be_boolean() {
        assert!(Relation::parse("x**2 + y**2 == 1").is_ok());
        assert!(Relation::parse("y > x & x > 0").is_ok());
        assert_eq!(
            Relation::parse("x**2 + y**2").unwrap_err(),
            CoreError::Kind {
                expected: Kind::Boolean,
                found: Kind::Numeric
            }
        );
    }

    #[test]
    fn expression_must_be_numeric() {
        assert!(Expression::parse("(z - 1j)**2").is_ok());
        assert!(matches!(
            Expression::parse("z == 1"),
            Err(CoreError::Kind {
                expected: Kind::Numeric,
                ..
            })
        ));
    }

    #[test]
    fn relation_poles_do_not_match_but_expression_poles_fail() {
        let rel = Relation::parse("1/x == y").unwrap().bind().unwrap();
        assert_eq!(rel.matches(0.0, 1.0, 0.1), Ok(false));
        assert_eq!(rel.matches(0.5, 2.0, 0.1), Ok(true));

        let f = Expression::parse("1/z").unwrap().bind().unwrap();
        assert_eq!(f.eval(Complex::ZERO), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn undefined_name_fails_at_bind_not_parse() {
        let rel = Relation::parse("q**2 == 1").unwrap();
        assert_eq!(
            rel.bind().unwrap_err(),
            CoreError::UnknownVariable("q".into())
        );
    }

    #[test]
    fn relation_variables_are_not_visible_to_expressions() {
        let expr = Expression::parse("x + 1").unwrap();
        assert!(expr.bind().is_err());
    }

    #[test]
    fn bound_relation_matches_unit_circle() {
        let rel = Relation::parse("x**2 + y**2 == 1").unwrap().bind().unwrap();
        assert!(rel.matches(0.6, 0.8, 1e-9).unwrap());
        assert!(!rel.matches(0.6, 0.9, 1e-3).unwrap());
    }

    #[test]
    fn bound_expression_evaluates() {
        let f = Expression::parse("z**2").unwrap().bind().unwrap();
        let w = f.eval(Complex::new(0.0, 1.0)).unwrap();
        assert_eq!(w, Complex::new(-1.0, 0.0));
    }

    #[test]
    fn from_str_round() {
        let rel: Relation = " x < 1 ".parse().unwrap();
        assert_eq!(rel.source(), "x < 1");
    }
}
