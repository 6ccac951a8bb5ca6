//! Expression evaluation.

use super::{BinaryOp, Expr, Variable};

/// Supplies values for expression variables.
pub trait Bindings {
    fn value(&self, variable: Variable) -> f64;
}

/// Errors raised while evaluating a parsed expression.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("expression produced a non-finite value ({0})")]
    NonFinite(f64),
}

impl Expr {
    /// Evaluates the expression. The result is always finite.
    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> Result<f64, EvalError> {
        let value = eval(self, bindings)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite(value))
        }
    }
}

fn eval<B: Bindings + ?Sized>(expr: &Expr, bindings: &B) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Var(variable) => Ok(bindings.value(*variable)),
        Expr::Neg(inner) => Ok(-eval(inner, bindings)?),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, bindings)?;
            let rhs = eval(rhs, bindings)?;
            match op {
                BinaryOp::Add => Ok(lhs + rhs),
                BinaryOp::Sub => Ok(lhs - rhs),
                BinaryOp::Mul => Ok(lhs * rhs),
                BinaryOp::Div if rhs == 0.0 => Err(EvalError::DivisionByZero),
                BinaryOp::Div => Ok(lhs / rhs),
            }
        }
    }
}
