//! Arithmetic expressions over the variables `x` and `y`.
//!
//! Expressions are parsed once into a closed AST ([`Expr`]) and then
//! evaluated any number of times with [`Expression::eval`]. The variables
//! are AST leaves bound at evaluation time, so there is no textual
//! substitution.
//!
//! # Grammar
//!
//! - Numeric literals (`2`, `0.5`, `.5`, `1e-3`)
//! - Variables `x` and `y`
//! - Binary `+ - * /`, left associative, `* /` binding tighter than `+ -`
//! - Unary `-` and `+`, binding tighter than any binary operator
//! - Parentheses
//! - Single-argument calls: `sin cos tan sqrt exp log`
//!
//! # Example
//!
//! ```
//! use trueno_points::expr::{evaluate, Expression};
//!
//! let expr = Expression::parse("sin(x) * cos(y)").unwrap();
//! assert_eq!(expr.eval(0.0, 0.0).unwrap(), 0.0);
//! assert_eq!(evaluate("x + y", 2.0, 3.0).unwrap(), 5.0);
//! ```

mod parse;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use parse::Parser;

/// Failure while parsing or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The text is not a well-formed expression.
    #[error("parse error at column {column}: {message}")]
    Parse {
        /// 0-based character column of the offending token.
        column: usize,
        /// What went wrong.
        message: String,
    },

    /// A function received an argument outside its domain.
    #[error("domain error: {function}({argument}) is undefined")]
    Domain {
        /// Function name.
        function: &'static str,
        /// The offending argument.
        argument: f64,
    },

    /// Arithmetic failure such as division by zero.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Well-formed but outside the supported language.
    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

/// A variable bound at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// The first sampling coordinate.
    X,
    /// The second sampling coordinate.
    Y,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    /// Operator symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    fn apply(self, a: f64, b: f64) -> Result<f64, EvalError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Sub => Ok(a - b),
            Self::Mul => Ok(a * b),
            Self::Div => {
                if b == 0.0 {
                    Err(EvalError::Arithmetic("division by zero".into()))
                } else {
                    Ok(a / b)
                }
            }
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Plus,
}

/// Supported single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Sine (radians).
    Sin,
    /// Cosine (radians).
    Cos,
    /// Tangent (radians).
    Tan,
    /// Square root; argument must be `>= 0`.
    Sqrt,
    /// Natural exponential.
    Exp,
    /// Natural logarithm; argument must be `> 0`.
    Log,
}

impl Function {
    /// All supported functions.
    pub const ALL: [Self; 6] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Sqrt,
        Self::Exp,
        Self::Log,
    ];

    /// Look up a function by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Function name as written in expressions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
        }
    }

    fn apply(self, arg: f64) -> Result<f64, EvalError> {
        match self {
            Self::Sin => Ok(arg.sin()),
            Self::Cos => Ok(arg.cos()),
            Self::Tan => Ok(arg.tan()),
            Self::Exp => Ok(arg.exp()),
            Self::Sqrt if arg < 0.0 => Err(self.domain_error(arg)),
            Self::Sqrt => Ok(arg.sqrt()),
            Self::Log if arg <= 0.0 => Err(self.domain_error(arg)),
            Self::Log => Ok(arg.ln()),
        }
    }

    fn domain_error(self, argument: f64) -> EvalError {
        EvalError::Domain {
            function: self.name(),
            argument,
        }
    }
}

/// Expression syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant.
    Literal(f64),
    /// Bound variable.
    Variable(Variable),
    /// Parenthesized sub-expression.
    Grouping(Box<Expr>),
    /// Prefix operator.
    Unary(UnaryOp, Box<Expr>),
    /// Infix operator.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Function call with exactly one argument.
    Call(Function, Box<Expr>),
}

impl Expr {
    /// Build a binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary(op, Box::new(left), Box::new(right))
    }

    /// Build a unary node.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary(op, Box::new(operand))
    }

    /// Build a call node.
    #[must_use]
    pub fn call(function: Function, arg: Self) -> Self {
        Self::Call(function, Box::new(arg))
    }

    /// Evaluate with `x` and `y` bound to the given values.
    ///
    /// Operands are evaluated left to right; the first failure wins.
    pub fn eval(&self, x: f64, y: f64) -> Result<f64, EvalError> {
        match self {
            Self::Literal(v) => Ok(*v),
            Self::Variable(Variable::X) => Ok(x),
            Self::Variable(Variable::Y) => Ok(y),
            Self::Grouping(inner) => inner.eval(x, y),
            Self::Unary(op, operand) => {
                let v = operand.eval(x, y)?;
                Ok(match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                })
            }
            Self::Binary(op, left, right) => {
                let a = left.eval(x, y)?;
                let b = right.eval(x, y)?;
                op.apply(a, b)
            }
            Self::Call(function, arg) => function.apply(arg.eval(x, y)?),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "{v}"),
            Self::Variable(Variable::X) => f.write_str("x"),
            Self::Variable(Variable::Y) => f.write_str("y"),
            Self::Grouping(inner) => write!(f, "({inner})"),
            Self::Unary(UnaryOp::Neg, operand) => write!(f, "-{operand}"),
            Self::Unary(UnaryOp::Plus, operand) => write!(f, "+{operand}"),
            Self::Binary(op, left, right) => write!(f, "{left} {} {right}", op.symbol()),
            Self::Call(function, arg) => write!(f, "{}({arg})", function.name()),
        }
    }
}

/// A parsed expression together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Parse expression text.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Parse`] for malformed text and
    /// [`EvalError::Unsupported`] for constructs outside the grammar.
    pub fn parse(text: &str) -> Result<Self, EvalError> {
        let root = Parser::parse_str(text)?;
        Ok(Self {
            source: text.to_string(),
            root,
        })
    }

    /// Evaluate with `x` and `y` bound to the given values.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Arithmetic`] or [`EvalError::Domain`].
    pub fn eval(&self, x: f64, y: f64) -> Result<f64, EvalError> {
        self.root.eval(x, y)
    }

    /// The text this expression was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree.
    #[must_use]
    pub fn root(&self) -> &Expr {
        &self.root
    }
}

impl FromStr for Expression {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse and evaluate `text` in one step.
///
/// # Errors
///
/// Any [`EvalError`] from parsing or evaluation.
pub fn evaluate(text: &str, x: f64, y: f64) -> Result<f64, EvalError> {
    Expression::parse(text)?.eval(x, y)
}

/// Anything that maps `(x, y)` to a height or an error.
///
/// Implemented for [`Expression`], [`FunctionEvaluator`] and plain closures,
/// so the sampler accepts any of them.
pub trait Evaluate {
    /// Evaluate at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Implementation-defined [`EvalError`].
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, EvalError>;
}

impl Evaluate for Expression {
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, EvalError> {
        self.eval(x, y)
    }
}

impl<F> Evaluate for F
where
    F: Fn(f64, f64) -> Result<f64, EvalError>,
{
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, EvalError> {
        self(x, y)
    }
}

/// Evaluator bound to a fixed expression text.
///
/// The text is parsed once on construction. A malformed text still yields
/// an evaluator; every evaluation then reports the parse failure.
#[derive(Debug, Clone)]
pub struct FunctionEvaluator {
    source: String,
    parsed: Result<Expression, EvalError>,
}

impl FunctionEvaluator {
    /// Create an evaluator for `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let source = text.into();
        let parsed = Expression::parse(&source);
        if let Err(e) = &parsed {
            log::debug!("expression '{source}' rejected: {e}");
        }
        Self { source, parsed }
    }

    /// The expression text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the text parsed successfully.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.parsed.is_ok()
    }

    /// The parse failure, if any.
    #[must_use]
    pub fn parse_error(&self) -> Option<&EvalError> {
        self.parsed.as_ref().err()
    }
}

impl Evaluate for FunctionEvaluator {
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, EvalError> {
        match &self.parsed {
            Ok(expr) => expr.eval(x, y),
            Err(e) => Err(e.clone()),
        }
    }
}
