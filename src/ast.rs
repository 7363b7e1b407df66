use crate::error::Position;
use crate::lexer::Operator;
use std::rc::Rc;

/// A single expression node. Everything in the language is an expression,
/// so a program is just one `Expr`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `fn [name] [(params)] :: body [and ...] [end]`
    FunctionDef {
        name: Option<String>,
        params: Rc<[String]>,
        body: Rc<Expr>,
        next: Option<Box<Expr>>,
        position: Position,
    },
    /// `let name :: value [in body] [and ...]`
    LetBinding {
        name: String,
        value: Box<Expr>,
        body: Box<Expr>,
        next: Option<Box<Expr>>,
        position: Position,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        position: Position,
    },
    /// Each argument is applied as its own curried step.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        position: Position,
    },
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        position: Position,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        position: Position,
    },
    Number {
        value: f64,
        position: Position,
    },
    String {
        value: String,
        position: Position,
    },
    Bool {
        value: bool,
        position: Position,
    },
    Variable {
        name: String,
        position: Position,
    },
    /// `target :: value in next`
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        next: Box<Expr>,
        position: Position,
    },
    Sequence {
        first: Box<Expr>,
        second: Box<Expr>,
        position: Position,
    },
    List {
        items: Vec<Expr>,
        position: Position,
    },
    Nil {
        position: Position,
    },
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Expr::FunctionDef { position, .. }
            | Expr::LetBinding { position, .. }
            | Expr::If { position, .. }
            | Expr::Call { position, .. }
            | Expr::Binary { position, .. }
            | Expr::Unary { position, .. }
            | Expr::Number { position, .. }
            | Expr::String { position, .. }
            | Expr::Bool { position, .. }
            | Expr::Variable { position, .. }
            | Expr::Assign { position, .. }
            | Expr::Sequence { position, .. }
            | Expr::List { position, .. }
            | Expr::Nil { position } => *position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Compose,
    Concat,
}

impl BinaryOp {
    pub fn from_operator(operator: Operator) -> Option<Self> {
        let op = match operator {
            Operator::Plus => BinaryOp::Add,
            Operator::Minus => BinaryOp::Subtract,
            Operator::Star => BinaryOp::Multiply,
            Operator::Slash => BinaryOp::Divide,
            Operator::Equal => BinaryOp::Equal,
            Operator::NotEqual => BinaryOp::NotEqual,
            Operator::Less => BinaryOp::Less,
            Operator::LessEqual => BinaryOp::LessEqual,
            Operator::Greater => BinaryOp::Greater,
            Operator::GreaterEqual => BinaryOp::GreaterEqual,
            Operator::AndAnd => BinaryOp::And,
            Operator::OrOr => BinaryOp::Or,
            Operator::Dot => BinaryOp::Compose,
            Operator::DotDot => BinaryOp::Concat,
            Operator::Bang | Operator::Semicolon => return None,
        };
        Some(op)
    }

    /// Name of the global the operator dispatches to. Rebinding that name
    /// changes what the operator does.
    pub fn builtin_name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "sub",
            BinaryOp::Multiply => "mul",
            BinaryOp::Divide => "div",
            BinaryOp::Equal => "eq",
            BinaryOp::NotEqual => "neq",
            BinaryOp::Less => "lt",
            BinaryOp::LessEqual => "lte",
            BinaryOp::Greater => "gt",
            BinaryOp::GreaterEqual => "gte",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Compose => "compose",
            BinaryOp::Concat => "concat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn builtin_name(&self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Negate => "neg",
        }
    }
}
