use crate::ast::{BinOpKind, Expr, Ident, Ty, VarDecl};
use derive_more::From;

common_enum! {
    #[derive(From)]
    pub enum StmtKind {
        Assign(StmtAssign),
        Decl(StmtDecl),
        If(StmtIf),
        Loop(StmtLoop),
        Block(ExecutionPart),
    }
}

common_struct! {
    pub struct Stmt {
        /// Source line the statement was parsed from, when known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub line: Option<u32>,
        #[serde(flatten)]
        pub kind: StmtKind,
    }
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self { line: None, kind }
    }

    pub fn at_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    pub fn kind(&self) -> &StmtKind {
        &self.kind
    }

    pub fn assign(target: impl Into<Expr>, value: impl Into<Expr>) -> Self {
        StmtAssign::new(target, value).into()
    }

    pub fn decl(vars: Vec<VarDecl>) -> Self {
        StmtDecl { vars }.into()
    }

    pub fn as_assign(&self) -> Option<&StmtAssign> {
        match &self.kind {
            StmtKind::Assign(assign) => Some(assign),
            _ => None,
        }
    }
}

impl<T> From<T> for Stmt
where
    StmtKind: From<T>,
{
    fn from(value: T) -> Self {
        Stmt::new(StmtKind::from(value))
    }
}

common_struct! {
    /// `target = value`
    pub struct StmtAssign {
        pub target: Expr,
        pub value: Expr,
    }
}

impl StmtAssign {
    pub fn new(target: impl Into<Expr>, value: impl Into<Expr>) -> Self {
        Self {
            target: target.into(),
            value: value.into(),
        }
    }
}

common_struct! {
    /// Declarations appearing among executable statements, such as generated
    /// loop variables.
    pub struct StmtDecl {
        pub vars: Vec<VarDecl>,
    }
}

impl StmtDecl {
    pub fn loop_var(name: impl Into<Ident>) -> Self {
        Self {
            vars: vec![VarDecl::scalar(name, Ty::Integer)],
        }
    }
}

common_struct! {
    pub struct StmtIf {
        pub cond: Expr,
        pub then: ExecutionPart,
        #[serde(default)]
        pub elze: ExecutionPart,
    }
}

common_struct! {
    /// Counted loop with explicit init / condition / increment.
    ///
    /// The body runs while `cond` holds; `iter` executes after each pass.
    pub struct StmtLoop {
        pub init: StmtAssign,
        pub cond: Expr,
        pub iter: StmtAssign,
        pub body: ExecutionPart,
    }
}

impl StmtLoop {
    /// `var = start; var <= end; var = var + 1`
    pub fn counted(var: &Ident, start: Expr, end: Expr, body: ExecutionPart) -> Self {
        Self {
            init: StmtAssign::new(Expr::name(var.clone()), start),
            cond: Expr::binop(Expr::name(var.clone()), BinOpKind::Le, end),
            iter: StmtAssign::new(
                Expr::name(var.clone()),
                Expr::binop(Expr::name(var.clone()), BinOpKind::Add, Expr::int(1)),
            ),
            body,
        }
    }

    /// Name of the variable the loop counts with.
    pub fn var(&self) -> Option<&Ident> {
        self.init.target.as_name()
    }
}

common_struct! {
    /// A sequence of executable statements.
    #[derive(Default)]
    pub struct ExecutionPart {
        pub stmts: Vec<Stmt>,
    }
}

impl ExecutionPart {
    pub fn new() -> Self {
        Self { stmts: Vec::new() }
    }

    pub fn new_stmts(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}
