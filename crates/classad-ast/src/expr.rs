//! Expression tree

/// Constant values that can be written directly in source text
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Undefined,
    Error,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
}

/// Scope keywords used as the base of an attribute selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `MY` - the ad that holds the expression
    My,
    /// `TARGET` - the other ad during matchmaking
    Target,
    /// `PARENT` (or `SUPER`) - the record enclosing the current one
    Parent,
    /// Leading `.` - the outermost record
    Root,
}

impl Scope {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::My => "MY",
            Self::Target => "TARGET",
            Self::Parent => "PARENT",
            Self::Root => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
}

impl UnaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    /// `=?=` / `is`
    Is,
    /// `=!=` / `isnt`
    IsNot,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Binding strength of the conditional operator
pub const CONDITIONAL_PRECEDENCE: u8 = 1;
/// Binding strength of prefix operators
pub const UNARY_PRECEDENCE: u8 = 12;
/// Binding strength of selections, subscripts and primaries
pub const POSTFIX_PRECEDENCE: u8 = 13;

impl BinaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Is => "=?=",
            Self::IsNot => "=!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }

    /// Higher numbers bind tighter; all binary operators are left associative
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 2,
            Self::And => 3,
            Self::BitOr => 4,
            Self::BitXor => 5,
            Self::BitAnd => 6,
            Self::Equal | Self::NotEqual | Self::Is | Self::IsNot => 7,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => 8,
            Self::ShiftLeft | Self::ShiftRight | Self::UnsignedShiftRight => 9,
            Self::Add | Self::Subtract => 10,
            Self::Multiply | Self::Divide | Self::Modulo => 11,
        }
    }
}

/// A ClassAd expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Unscoped attribute reference: `Memory`
    Attribute(String),
    /// Bare scope keyword: `TARGET`
    Scope(Scope),
    /// Attribute selection: `TARGET.Memory`, `job.Owner`, `.Owner`
    Select { base: Box<Expr>, name: String },
    /// `base[index]`
    Subscript { base: Box<Expr>, index: Box<Expr> },
    /// `{ a, b, c }`
    List(Vec<Expr>),
    /// `[ a = 1; b = 2 ]` or an old-style ad
    Record(Vec<(String, Expr)>),
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `condition ? then : otherwise`; `then` is absent for `condition ?: otherwise`
    Conditional {
        condition: Box<Expr>,
        then: Option<Box<Expr>>,
        otherwise: Box<Expr>,
    },
    /// Function call: `strcat("a", "b")`
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    #[must_use]
    pub fn real(value: f64) -> Self {
        Self::Literal(Literal::Real(value))
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    #[must_use]
    pub fn select(base: Self, name: impl Into<String>) -> Self {
        Self::Select {
            base: Box::new(base),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn call(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }

    /// Binding strength of the outermost node, used to decide on parentheses
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Conditional { .. } => CONDITIONAL_PRECEDENCE,
            Self::Binary { op, .. } => op.precedence(),
            Self::Unary { .. } => UNARY_PRECEDENCE,
            Self::Literal(Literal::Integer(value)) if *value < 0 => UNARY_PRECEDENCE,
            Self::Literal(Literal::Real(value)) if value.is_sign_negative() => UNARY_PRECEDENCE,
            _ => POSTFIX_PRECEDENCE,
        }
    }

    /// True for expressions that name an attribute rather than compute a value
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Attribute(_) | Self::Select { .. })
    }
}
