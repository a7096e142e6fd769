use std::f64::consts::{E, LN_10, PI};

use crate::complex::Complex;
use crate::error::CoreError;

use super::ast::{Ast, BinOp, CmpOp, Kind, UnaryOp};

/// Exponents with `|n|` up to this bound that are whole numbers are
/// evaluated by repeated squaring.
const MAX_INTEGER_EXPONENT: f64 = 1024.0;

/// Whitelisted functions. Every one takes exactly one complex argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Exp,
    Log,
    Log10,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Abs,
    Real,
    Imag,
    Conj,
    Angle,
}

impl Func {
    pub fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Self::Sqrt,
            "exp" => Self::Exp,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "abs" => Self::Abs,
            "real" | "re" => Self::Real,
            "imag" | "im" => Self::Imag,
            "conj" | "conjugate" => Self::Conj,
            "angle" | "arg" => Self::Angle,
            _ => return None,
        })
    }

    fn apply(self, z: Complex, poles: Singularities) -> Result<Complex, CoreError> {
        Ok(match self {
            Self::Sqrt => z.sqrt(),
            Self::Exp => z.exp(),
            Self::Log => {
                if z.is_zero() {
                    return poles.resolve(log_of_zero("log"), Complex::real(f64::NEG_INFINITY));
                }
                z.ln()
            }
            Self::Log10 => {
                if z.is_zero() {
                    return poles.resolve(log_of_zero("log10"), Complex::real(f64::NEG_INFINITY));
                }
                z.ln() * (1.0 / LN_10)
            }
            Self::Sin => z.sin(),
            Self::Cos => z.cos(),
            Self::Tan => z.tan(),
            Self::Sinh => z.sinh(),
            Self::Cosh => z.cosh(),
            Self::Tanh => z.tanh(),
            Self::Abs => Complex::real(z.norm()),
            Self::Real => Complex::real(z.re),
            Self::Imag => Complex::real(z.im),
            Self::Conj => z.conj(),
            Self::Angle => Complex::real(z.arg()),
        })
    }
}

fn log_of_zero(function: &'static str) -> CoreError {
    CoreError::Domain {
        function,
        reason: "logarithm of zero",
    }
}

const NAN: Complex = Complex {
    re: f64::NAN,
    im: f64::NAN,
};

/// What evaluation does at a singular point such as `1/0` or `log(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Singularities {
    /// Fail with [`CoreError::DivisionByZero`] or [`CoreError::Domain`].
    #[default]
    Error,
    /// Continue with the IEEE value (`±inf` or NaN). A non-finite side never
    /// falls inside an `==` band, so the point simply does not match.
    Propagate,
}

impl Singularities {
    fn resolve(self, error: CoreError, value: Complex) -> Result<Complex, CoreError> {
        match self {
            Self::Error => Err(error),
            Self::Propagate => Ok(value),
        }
    }
}

/// Named constants available in every expression.
fn constant(name: &str) -> Option<Complex> {
    match name {
        "pi" => Some(Complex::real(PI)),
        "e" => Some(Complex::real(E)),
        "i" => Some(Complex::I),
        _ => None,
    }
}

/// A syntax tree with every name resolved: variables to slot indices,
/// constants to values, calls to [`Func`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Const(Complex),
    Var(usize),
    Neg(Box<Node>),
    Not(Box<Node>),
    Arith(BinOp, Box<Node>, Box<Node>),
    Compare(CmpOp, Box<Node>, Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

/// Resolve all names in `ast`. `variables[k]` is bound to slot `k`; the
/// evaluator later reads `env.vars[k]`.
pub fn bind(ast: &Ast, variables: &[&str]) -> Result<Node, CoreError> {
    Ok(match ast {
        Ast::Num(v) => Node::Const(*v),
        Ast::Name(name) => {
            if let Some(slot) = variables.iter().position(|v| v == name) {
                Node::Var(slot)
            } else if let Some(value) = constant(name) {
                Node::Const(value)
            } else {
                return Err(CoreError::UnknownVariable(name.clone()));
            }
        }
        Ast::UnaryOp(UnaryOp::Neg, inner) => Node::Neg(Box::new(bind(inner, variables)?)),
        Ast::UnaryOp(UnaryOp::Not, inner) => Node::Not(Box::new(bind(inner, variables)?)),
        Ast::BinOp(op, l, r) => Node::Arith(
            *op,
            Box::new(bind(l, variables)?),
            Box::new(bind(r, variables)?),
        ),
        Ast::Compare(op, l, r) => Node::Compare(
            *op,
            Box::new(bind(l, variables)?),
            Box::new(bind(r, variables)?),
        ),
        Ast::And(l, r) => Node::And(
            Box::new(bind(l, variables)?),
            Box::new(bind(r, variables)?),
        ),
        Ast::Or(l, r) => Node::Or(
            Box::new(bind(l, variables)?),
            Box::new(bind(r, variables)?),
        ),
        Ast::Call(name, args) => {
            let func =
                Func::lookup(name).ok_or_else(|| CoreError::UnknownFunction(name.clone()))?;
            if args.len() != 1 {
                return Err(CoreError::Arity {
                    function: name.clone(),
                    expected: 1,
                    found: args.len(),
                });
            }
            Node::Call(func, Box::new(bind(&args[0], variables)?))
        }
    })
}

/// Per-point evaluation environment.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    /// Variable values indexed by slot.
    pub vars: &'a [Complex],
    /// Half-width of the `==` band; `0.0` means exact equality.
    pub eq_tolerance: f64,
    pub singularities: Singularities,
}

impl Node {
    /// Evaluate a numeric node.
    pub fn eval_num(&self, env: &Env<'_>) -> Result<Complex, CoreError> {
        match self {
            Node::Const(v) => Ok(*v),
            Node::Var(slot) => env
                .vars
                .get(*slot)
                .copied()
                .ok_or_else(|| CoreError::UnknownVariable(format!("#{slot}"))),
            // `0 - v` keeps a negated real on +0 imaginary: sqrt(-4) is 2i.
            Node::Neg(inner) => Ok(Complex::ZERO - inner.eval_num(env)?),
            Node::Arith(op, l, r) => {
                let a = l.eval_num(env)?;
                let b = r.eval_num(env)?;
                arith(*op, a, b, env.singularities)
            }
            Node::Call(func, arg) => func.apply(arg.eval_num(env)?, env.singularities),
            Node::Not(_) | Node::Compare(..) | Node::And(..) | Node::Or(..) => {
                Err(CoreError::Kind {
                    expected: Kind::Numeric,
                    found: Kind::Boolean,
                })
            }
        }
    }

    /// Evaluate a boolean node. Both sides of `&`/`|` are always evaluated,
    /// so an error anywhere in the tree surfaces.
    pub fn eval_bool(&self, env: &Env<'_>) -> Result<bool, CoreError> {
        match self {
            Node::Not(inner) => Ok(!inner.eval_bool(env)?),
            Node::And(l, r) => {
                let a = l.eval_bool(env)?;
                let b = r.eval_bool(env)?;
                Ok(a && b)
            }
            Node::Or(l, r) => {
                let a = l.eval_bool(env)?;
                let b = r.eval_bool(env)?;
                Ok(a || b)
            }
            Node::Compare(op, l, r) => {
                let a = l.eval_num(env)?;
                let b = r.eval_num(env)?;
                Ok(compare(*op, a, b, env.eq_tolerance))
            }
            Node::Const(_) | Node::Var(_) | Node::Neg(_) | Node::Arith(..) | Node::Call(..) => {
                Err(CoreError::Kind {
                    expected: Kind::Boolean,
                    found: Kind::Numeric,
                })
            }
        }
    }
}

fn arith(op: BinOp, a: Complex, b: Complex, poles: Singularities) -> Result<Complex, CoreError> {
    match op {
        BinOp::Add => Ok(a + b),
        BinOp::Sub => Ok(a - b),
        BinOp::Mul => Ok(a * b),
        BinOp::Div => match a.checked_div(b) {
            Some(q) => Ok(q),
            None => poles.resolve(CoreError::DivisionByZero, divide_by_zero(a, b)),
        },
        BinOp::Pow => pow(a, b, poles),
    }
}

/// IEEE quotient by a signed zero: `1/0` is `inf`, `-1/0` is `-inf`, `0/0`
/// is NaN.
fn divide_by_zero(a: Complex, zero: Complex) -> Complex {
    if a.is_real() {
        Complex::real(a.re / zero.re)
    } else {
        Complex::new(a.re / zero.re, a.im / zero.re)
    }
}

fn pow(base: Complex, exponent: Complex, poles: Singularities) -> Result<Complex, CoreError> {
    let infinite = Complex::real(f64::INFINITY);
    if exponent.is_real() {
        let p = exponent.re;
        if p.fract() == 0.0 && p.abs() <= MAX_INTEGER_EXPONENT {
            if p < 0.0 && base.is_zero() {
                return poles.resolve(CoreError::DivisionByZero, infinite);
            }
            return Ok(base.powi(p as i32));
        }
        if base.is_zero() {
            return if p > 0.0 {
                Ok(Complex::ZERO)
            } else if p < 0.0 {
                poles.resolve(CoreError::DivisionByZero, infinite)
            } else {
                poles.resolve(
                    CoreError::Domain {
                        function: "pow",
                        reason: "exponent is not a number",
                    },
                    NAN,
                )
            };
        }
        return Ok(base.powf(p));
    }
    if base.is_zero() {
        return if exponent.re > 0.0 {
            Ok(Complex::ZERO)
        } else {
            poles.resolve(
                CoreError::Domain {
                    function: "pow",
                    reason: "zero raised to a complex power with non-positive real part",
                },
                NAN,
            )
        };
    }
    Ok(base.powc(exponent))
}

/// `==`/`!=` use the tolerance band; ordering compares real parts and is
/// false whenever either side is not a real number.
fn compare(op: CmpOp, a: Complex, b: Complex, tolerance: f64) -> bool {
    let equal = || {
        if tolerance > 0.0 {
            (a - b).norm_sq() < tolerance * tolerance
        } else {
            a == b
        }
    };
    let ordered = |f: fn(f64, f64) -> bool| a.is_real() && b.is_real() && f(a.re, b.re);
    match op {
        CmpOp::Eq => equal(),
        CmpOp::Ne => !equal(),
        CmpOp::Lt => ordered(|x, y| x < y),
        CmpOp::Le => ordered(|x, y| x <= y),
        CmpOp::Gt => ordered(|x, y| x > y),
        CmpOp::Ge => ordered(|x, y| x >= y),
    }
}
