use crate::ast::{Ident, Ty, TySlot};
use derive_more::From;
use std::fmt;

pub type BExpr = Box<Expr>;

common_enum! {
    /// Expr is an expression that produces a value
    #[derive(From)]
    pub enum ExprKind {
        Name(ExprName),
        ArraySubscript(ExprArraySubscript),
        BinOp(ExprBinOp),
        UnOp(ExprUnOp),
        /// A call to a source-level intrinsic that name resolution has not seen yet
        IntrinsicCall(ExprIntrinsicCall),
        /// A resolved call; `Expr::ty` carries its result type
        Call(ExprCall),
        Value(Literal),
    }
}

common_struct! {
    pub struct Expr {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub ty: TySlot,
        #[serde(flatten)]
        pub kind: ExprKind,
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { ty: None, kind }
    }

    pub fn with_ty(kind: ExprKind, ty: TySlot) -> Self {
        Self { ty, kind }
    }

    pub fn ty(&self) -> Option<&Ty> {
        self.ty.as_ref()
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ExprKind {
        &mut self.kind
    }

    pub fn name(name: impl Into<Ident>) -> Expr {
        ExprName::new(name).into()
    }

    pub fn int(value: i64) -> Expr {
        Literal::Int(value).into()
    }

    pub fn real(value: f64) -> Expr {
        Literal::Real(value).into()
    }

    pub fn logical(value: bool) -> Expr {
        Literal::Logical(value).into()
    }

    pub fn binop(lhs: impl Into<Expr>, op: BinOpKind, rhs: impl Into<Expr>) -> Expr {
        ExprBinOp::new(lhs, op, rhs).into()
    }

    pub fn neg(val: impl Into<Expr>) -> Expr {
        ExprUnOp {
            op: UnOpKind::Neg,
            val: Box::new(val.into()),
        }
        .into()
    }

    pub fn subscript(name: impl Into<Ident>, indices: Vec<Index>) -> Expr {
        ExprArraySubscript::new(name, indices).into()
    }

    pub fn intrinsic(name: impl Into<Ident>, args: Vec<Expr>) -> Expr {
        ExprIntrinsicCall {
            name: name.into(),
            args,
        }
        .into()
    }

    pub fn call(name: impl Into<Ident>, args: Vec<Expr>, ty: TySlot) -> Expr {
        Expr::with_ty(
            ExprCall {
                name: name.into(),
                args,
            }
            .into(),
            ty,
        )
    }

    pub fn as_name(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Name(name) => Some(&name.name),
            _ => None,
        }
    }

    pub fn as_subscript(&self) -> Option<&ExprArraySubscript> {
        match &self.kind {
            ExprKind::ArraySubscript(subscript) => Some(subscript),
            _ => None,
        }
    }

    pub fn as_binop(&self) -> Option<&ExprBinOp> {
        match &self.kind {
            ExprKind::BinOp(binop) => Some(binop),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&ExprCall> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Integer value of a literal, looking through a unary minus.
    pub fn as_int(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::Value(Literal::Int(value)) => Some(*value),
            ExprKind::UnOp(ExprUnOp {
                op: UnOpKind::Neg,
                val,
            }) => val.as_int().and_then(i64::checked_neg),
            _ => None,
        }
    }

    pub fn is_call_to(&self, name: &str) -> bool {
        self.as_call()
            .map(|call| call.name.as_str() == name)
            .unwrap_or(false)
    }
}

impl<T> From<T> for Expr
where
    ExprKind: From<T>,
{
    fn from(value: T) -> Self {
        Expr::new(ExprKind::from(value))
    }
}

impl From<BExpr> for Expr {
    fn from(expr: BExpr) -> Self {
        *expr
    }
}

common_struct! {
    pub struct ExprName {
        pub name: Ident,
    }
}

impl ExprName {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self { name: name.into() }
    }
}

common_struct! {
    pub struct IndexRange {
        pub start: Expr,
        pub end: Expr,
    }
}

common_enum! {
    /// Index descriptor for one subscript position.
    pub enum Index {
        /// A single element, `a(i)`.
        Element(Expr),
        /// A bounded section, `a(2:5)`.
        Range(IndexRange),
        /// The whole dimension, `a(:)`.
        All,
    }
}

impl Index {
    pub fn element(expr: impl Into<Expr>) -> Self {
        Index::Element(expr.into())
    }

    pub fn range(start: impl Into<Expr>, end: impl Into<Expr>) -> Self {
        Index::Range(IndexRange {
            start: start.into(),
            end: end.into(),
        })
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            Index::Element(_) => IndexKind::Element,
            Index::Range(_) => IndexKind::Range,
            Index::All => IndexKind::All,
        }
    }

    pub fn is_slice(&self) -> bool {
        !matches!(self, Index::Element(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Element,
    Range,
    All,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Element => f.write_str("element"),
            IndexKind::Range => f.write_str("range"),
            IndexKind::All => f.write_str("whole-dimension"),
        }
    }
}

common_struct! {
    pub struct ExprArraySubscript {
        pub name: Ident,
        pub indices: Vec<Index>,
    }
}

impl ExprArraySubscript {
    pub fn new(name: impl Into<Ident>, indices: Vec<Index>) -> Self {
        Self {
            name: name.into(),
            indices,
        }
    }

    pub fn rank(&self) -> usize {
        self.indices.len()
    }
}

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum BinOpKind {
        Add,
        Sub,
        Mul,
        Div,
        Pow,
        Eq,
        Ne,
        Lt,
        Le,
        Gt,
        Ge,
        And,
        Or,
    }
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Pow => "**",
            BinOpKind::Eq => "==",
            BinOpKind::Ne => "/=",
            BinOpKind::Lt => "<",
            BinOpKind::Le => "<=",
            BinOpKind::Gt => ">",
            BinOpKind::Ge => ">=",
            BinOpKind::And => ".AND.",
            BinOpKind::Or => ".OR.",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOpKind::Eq
                | BinOpKind::Ne
                | BinOpKind::Lt
                | BinOpKind::Le
                | BinOpKind::Gt
                | BinOpKind::Ge
        )
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinOpKind::Or => 1,
            BinOpKind::And => 2,
            BinOpKind::Eq
            | BinOpKind::Ne
            | BinOpKind::Lt
            | BinOpKind::Le
            | BinOpKind::Gt
            | BinOpKind::Ge => 3,
            BinOpKind::Add | BinOpKind::Sub => 4,
            BinOpKind::Mul | BinOpKind::Div => 5,
            BinOpKind::Pow => 6,
        }
    }
}

common_struct! {
    pub struct ExprBinOp {
        pub lhs: BExpr,
        pub op: BinOpKind,
        pub rhs: BExpr,
    }
}

impl ExprBinOp {
    pub fn new(lhs: impl Into<Expr>, op: BinOpKind, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        }
    }
}

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum UnOpKind {
        Neg,
        Not,
    }
}

common_struct! {
    pub struct ExprUnOp {
        pub op: UnOpKind,
        pub val: BExpr,
    }
}

common_struct! {
    pub struct ExprIntrinsicCall {
        pub name: Ident,
        #[serde(default)]
        pub args: Vec<Expr>,
    }
}

common_struct! {
    pub struct ExprCall {
        pub name: Ident,
        #[serde(default)]
        pub args: Vec<Expr>,
    }
}

common_enum! {
    pub enum Literal {
        Int(i64),
        Real(f64),
        Logical(bool),
    }
}
