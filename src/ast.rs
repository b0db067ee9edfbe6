// ABOUTME: The tagged node universe for statements and expressions

/// Syntactic type annotation, as written in declarations and parameter
/// lists. Distinct from `crate::value::Value`'s runtime tags, though
/// `type_name()` keeps them in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Bool,
    Double,
    String,
    List,
    Map,
    Func,
    Stream,
}

impl TypeName {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Bool => "bool",
            TypeName::Double => "double",
            TypeName::String => "string",
            TypeName::List => "list",
            TypeName::Map => "map",
            TypeName::Func => "func",
            TypeName::Stream => "stream",
        }
    }

    pub fn from_token(kind: crate::token::TokenKind) -> Option<Self> {
        use crate::token::TokenKind::*;
        Some(match kind {
            TypeInt => TypeName::Int,
            TypeBool => TypeName::Bool,
            TypeDouble => TypeName::Double,
            TypeString => TypeName::String,
            TypeList => TypeName::List,
            TypeMap => TypeName::Map,
            TypeFunc => TypeName::Func,
            TypeStream => TypeName::Stream,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Fn,
    If,
    For,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub declared_type: TypeName,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Var {
        name: String,
        declared_type: TypeName,
        init: Option<Expr>,
        line: usize,
    },
    Global {
        name: String,
        declared_type: TypeName,
        init: Option<Expr>,
        line: usize,
    },
    Return {
        value: Option<Expr>,
        line: usize,
    },
    Break {
        line: usize,
    },
    Block {
        stmts: Vec<Stmt>,
        kind: BlockKind,
        line: usize,
    },
    For {
        decl: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
        line: usize,
    },
    Function {
        name: String,
        params: Vec<Param>,
        return_type: Option<TypeName>,
        body: Box<Stmt>,
        line: usize,
    },
    Expr {
        expr: Expr,
        line: usize,
    },
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::Var { line, .. }
            | Stmt::Global { line, .. }
            | Stmt::Return { line, .. }
            | Stmt::Break { line }
            | Stmt::Block { line, .. }
            | Stmt::For { line, .. }
            | Stmt::Function { line, .. }
            | Stmt::Expr { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Identifier {
        name: String,
        line: usize,
    },
    Nil {
        line: usize,
    },
    Integer {
        value: i64,
        line: usize,
    },
    Double {
        value: f64,
        line: usize,
    },
    Boolean {
        value: bool,
        line: usize,
    },
    Str {
        value: String,
        line: usize,
    },
    List {
        elements: Vec<Expr>,
        line: usize,
    },
    Hash {
        pairs: Vec<(Expr, Expr)>,
        line: usize,
    },
    Prefix {
        op: String,
        right: Box<Expr>,
        line: usize,
    },
    Infix {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
        line: usize,
    },
    Postfix {
        op: String,
        left_ident: String,
        line: usize,
    },
    ImplicitDecl {
        left_ident: String,
        right: Box<Expr>,
        line: usize,
    },
    Assign {
        left: Box<Expr>,
        right: Box<Expr>,
        line: usize,
    },
    AssignOp {
        left_ident: String,
        op: String,
        right: Box<Expr>,
        line: usize,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
        line: usize,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
    },
    FunctionClosure {
        params: Vec<Param>,
        return_type: Option<TypeName>,
        body: Box<Stmt>,
        line: usize,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        line: usize,
    },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Identifier { line, .. }
            | Expr::Nil { line }
            | Expr::Integer { line, .. }
            | Expr::Double { line, .. }
            | Expr::Boolean { line, .. }
            | Expr::Str { line, .. }
            | Expr::List { line, .. }
            | Expr::Hash { line, .. }
            | Expr::Prefix { line, .. }
            | Expr::Infix { line, .. }
            | Expr::Postfix { line, .. }
            | Expr::ImplicitDecl { line, .. }
            | Expr::Assign { line, .. }
            | Expr::AssignOp { line, .. }
            | Expr::Index { line, .. }
            | Expr::Call { line, .. }
            | Expr::FunctionClosure { line, .. }
            | Expr::If { line, .. } => *line,
        }
    }
}

pub type Program = Vec<Stmt>;
