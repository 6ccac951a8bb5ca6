//! Closed arithmetic grammar for effect values.
//!
//! Expressions are parsed once when a template is loaded and evaluated
//! against the owning effect at execution time. The grammar is:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | variable | '(' expr ')'
//! ```
//!
//! Variables are drawn from a fixed set:
//! `effect.potency`, `effect.duration`, `effect.elapsed`,
//! `effect.target_count`.
//!
//! ## Examples
//!
//! ```
//! use combat_core::action::formula::{Bindings, Expr, Variable};
//!
//! struct Fixed;
//! impl Bindings for Fixed {
//!     fn value(&self, variable: Variable) -> f64 {
//!         match variable {
//!             Variable::Potency => 0.5,
//!             _ => 2.0,
//!         }
//!     }
//! }
//!
//! let expr = Expr::parse("effect.potency * 100 + effect.duration").unwrap();
//! assert_eq!(expr.evaluate(&Fixed).unwrap(), 52.0);
//! ```

pub mod evaluate;
mod parse;

use std::fmt;

pub use evaluate::{Bindings, EvalError};
pub use parse::ExprError;

// ============================================================================
// Expression Tree
// ============================================================================

/// Whitelisted variable readable from an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    Potency,
    Duration,
    Elapsed,
    TargetCount,
}

impl Variable {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "effect.potency" => Some(Self::Potency),
            "effect.duration" => Some(Self::Duration),
            "effect.elapsed" => Some(Self::Elapsed),
            "effect.target_count" => Some(Self::TargetCount),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Potency => "effect.potency",
            Self::Duration => "effect.duration",
            Self::Elapsed => "effect.elapsed",
            Self::TargetCount => "effect.target_count",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

/// Parsed arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Variable),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Parses and validates an expression.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        parse::parse(source)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Var(variable) => f.write_str(variable.name()),
            Self::Neg(inner) => write!(f, "-{inner}"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

impl std::str::FromStr for Expr {
    type Err = ExprError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}
