use crate::stmt::Stmt;
use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerData {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatData {
    pub token: Token,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringData {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanData {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullData {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierData {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayData {
    pub token: Token,
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashData {
    pub token: Token,
    pub pairs: Vec<(Expr, Expr)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteralData {
    pub token: Token,
    pub name: Option<String>,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixData {
    pub token: Token,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixData {
    pub token: Token,
    pub operator: Token,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// One `(condition, consequence-block)` pair; `elif` arms desugar into
/// additional entries of this same list rather than nested `IfExpression`s.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfData {
    pub token: Token,
    pub branches: Vec<IfBranch>,
    pub else_body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallData {
    pub token: Token,
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexData {
    pub token: Token,
    pub object: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyData {
    pub token: Token,
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentData {
    pub token: Token,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewData {
    pub token: Token,
    pub class_name: Token,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThisData {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperData {
    pub token: Token,
    pub method: Option<Token>,
}

/// Every expression form in the grammar. Each variant's data struct carries
/// its leading token for diagnostics, so `Expr::token()` can report a
/// position without a separate parallel structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(IntegerData),
    Float(FloatData),
    Str(StringData),
    Boolean(BooleanData),
    Null(NullData),
    Identifier(IdentifierData),
    Array(ArrayData),
    Hash(HashData),
    Function(FunctionLiteralData),
    Prefix(PrefixData),
    Infix(InfixData),
    If(IfData),
    Call(CallData),
    Index(IndexData),
    Property(PropertyData),
    Assignment(AssignmentData),
    New(NewData),
    This(ThisData),
    Super(SuperData),
}

impl Expr {
    pub fn token(&self) -> &Token {
        match self {
            Expr::Integer(d) => &d.token,
            Expr::Float(d) => &d.token,
            Expr::Str(d) => &d.token,
            Expr::Boolean(d) => &d.token,
            Expr::Null(d) => &d.token,
            Expr::Identifier(d) => &d.token,
            Expr::Array(d) => &d.token,
            Expr::Hash(d) => &d.token,
            Expr::Function(d) => &d.token,
            Expr::Prefix(d) => &d.token,
            Expr::Infix(d) => &d.token,
            Expr::If(d) => &d.token,
            Expr::Call(d) => &d.token,
            Expr::Index(d) => &d.token,
            Expr::Property(d) => &d.token,
            Expr::Assignment(d) => &d.token,
            Expr::New(d) => &d.token,
            Expr::This(d) => &d.token,
            Expr::Super(d) => &d.token,
        }
    }
}
