use std::rc::Rc;

use crate::error::Pos;

/// A parsed `.demo` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `let NAME = expr` at file scope.
    Const { name: String, value: Expr, pos: Pos },
    Function(Rc<FnDecl>),
    Example(Rc<ExampleDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub pos: Pos,
}

/// Lifecycle hooks an example may declare with `on <hook> { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Init,
    Update,
    Draw,
    ButtonDown,
    ButtonUp,
}

impl Hook {
    pub fn from_name(name: &str) -> Option<Hook> {
        match name {
            "init" => Some(Hook::Init),
            "update" => Some(Hook::Update),
            "draw" => Some(Hook::Draw),
            "button_down" => Some(Hook::ButtonDown),
            "button_up" => Some(Hook::ButtonUp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hook::Init => "init",
            Hook::Update => "update",
            Hook::Draw => "draw",
            Hook::ButtonDown => "button_down",
            Hook::ButtonUp => "button_up",
        }
    }

    /// Whether the hook receives a button id argument.
    pub fn takes_button(self) -> bool {
        matches!(self, Hook::ButtonDown | Hook::ButtonUp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HookDecl {
    pub hook: Hook,
    pub param: Option<String>,
    pub body: Vec<Stmt>,
}

/// An `example` or `feature` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleDecl {
    pub name: String,
    pub is_feature: bool,
    pub caption: Option<String>,
    pub vars: Vec<(String, Expr)>,
    pub methods: Vec<Rc<FnDecl>>,
    pub hooks: Vec<HookDecl>,
    pub pos: Pos,
}

impl ExampleDecl {
    pub fn hook(&self, hook: Hook) -> Option<&HookDecl> {
        self.hooks.iter().find(|h| h.hook == hook)
    }

    pub fn method(&self, name: &str) -> Option<&Rc<FnDecl>> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Let(String, Expr),
    Assign(Expr, Expr),
    If { cond: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt> },
    While { cond: Expr, body: Vec<Stmt> },
    For { var: String, iter: Expr, body: Vec<Stmt> },
    Return(Option<Expr>),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Color([u8; 4]),
    Bool(bool),
    None,
    Name(String),
    List(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    Index(Box<Expr>, Box<Expr>),
}
