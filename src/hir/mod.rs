//! The typed expression tree produced by the analyzer.

use std::fmt::{self, Display};

use crate::data::{BinaryOp, LiteralValue, UnaryOp, ValueType};
use crate::location::{Locatable, Location};

#[derive(Clone, Debug, PartialEq)]
pub enum ExprType {
    Literal(LiteralValue),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// The target type is the `ctype` of the cast node itself.
    Cast(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    /// expr: holds the actual expression
    pub expr: ExprType,

    /// ctype: holds the type of the expression, fixed when the node is built
    pub ctype: ValueType,

    /// location: the best approximation of where the expression is
    ///
    /// for operators this covers both operands,
    /// for literals it is just the literal
    pub location: Location,
}

impl Expr {
    pub fn new(expr: ExprType, ctype: ValueType, location: Location) -> Self {
        Expr {
            expr,
            ctype,
            location,
        }
    }

    /// The type of this expression, tagged with where it came from.
    pub fn located_type(&self) -> Locatable<ValueType> {
        self.location.with(self.ctype)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.expr {
            ExprType::Literal(value) => write!(f, "{}", value),
            ExprType::Unary(op, expr) => write!(f, "{}({})", op, expr),
            ExprType::Binary(op, left, right) => write!(f, "({}) {} ({})", left, op, right),
            ExprType::Cast(expr) => write!(f, "({})({})", self.ctype, expr),
        }
    }
}
