//! AST are trees, so Box<T> is fine
//!
//! The tree models the subset of an array-oriented procedural language that
//! the intrinsic lowering passes read and rewrite: program units with their
//! declarations, assignment/conditional/loop statements, and expressions with
//! array subscripts and intrinsic calls.

mod expr;
mod ident;
mod pretty;
mod stmt;
pub mod visit;

pub use expr::*;
pub use ident::*;
pub use pretty::render_expr;
pub use stmt::*;

/// Shared slot for storing optional type annotations on AST nodes.
pub type TySlot = Option<Ty>;

common_enum! {
    /// Scalar types known to the lowering passes.
    #[derive(Copy, Eq, Hash)]
    pub enum Ty {
        Integer,
        Real,
        Double,
        Logical,
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ty::Integer => "INTEGER",
            Ty::Real => "REAL",
            Ty::Double => "DOUBLE",
            Ty::Logical => "LOGICAL",
        };
        f.write_str(name)
    }
}

common_struct! {
    /// One declared dimension. A missing lower bound means the default of 1.
    pub struct Dimension {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub lower: Option<Expr>,
        pub upper: Expr,
    }
}

impl Dimension {
    pub fn new(upper: impl Into<Expr>) -> Self {
        Self {
            lower: None,
            upper: upper.into(),
        }
    }

    pub fn bounded(lower: impl Into<Expr>, upper: impl Into<Expr>) -> Self {
        Self {
            lower: Some(lower.into()),
            upper: upper.into(),
        }
    }

    pub fn lower_bound(&self) -> Expr {
        self.lower.clone().unwrap_or_else(|| Expr::int(1))
    }
}

common_struct! {
    pub struct VarDecl {
        pub name: Ident,
        pub ty: Ty,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub dims: Vec<Dimension>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub init: Option<Expr>,
    }
}

impl VarDecl {
    pub fn scalar(name: impl Into<Ident>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            dims: Vec::new(),
            init: None,
        }
    }

    pub fn array(name: impl Into<Ident>, ty: Ty, dims: Vec<Dimension>) -> Self {
        Self {
            name: name.into(),
            ty,
            dims,
            init: None,
        }
    }

    pub fn with_init(mut self, init: impl Into<Expr>) -> Self {
        self.init = Some(init.into());
        self
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }
}

common_enum! {
    #[derive(Copy, Eq, Hash)]
    pub enum UnitKind {
        Program,
        Subroutine,
        Function,
    }
}

common_struct! {
    /// A program, subroutine or function together with its nested units.
    ///
    /// Each unit opens a lexical scope; units listed in `contains` see the
    /// declarations of their host.
    pub struct ProgramUnit {
        pub name: Ident,
        pub kind: UnitKind,
        #[serde(default)]
        pub specification: Vec<VarDecl>,
        #[serde(default)]
        pub execution: ExecutionPart,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub contains: Vec<ProgramUnit>,
    }
}

impl ProgramUnit {
    pub fn new(name: impl Into<Ident>, kind: UnitKind) -> Self {
        Self {
            name: name.into(),
            kind,
            specification: Vec::new(),
            execution: ExecutionPart::new(),
            contains: Vec::new(),
        }
    }

    pub fn program(name: impl Into<Ident>) -> Self {
        Self::new(name, UnitKind::Program)
    }

    pub fn subroutine(name: impl Into<Ident>) -> Self {
        Self::new(name, UnitKind::Subroutine)
    }

    pub fn with_decls(mut self, decls: impl IntoIterator<Item = VarDecl>) -> Self {
        self.specification.extend(decls);
        self
    }

    pub fn with_stmts(mut self, stmts: impl IntoIterator<Item = Stmt>) -> Self {
        self.execution.stmts.extend(stmts);
        self
    }

    pub fn with_contained(mut self, unit: ProgramUnit) -> Self {
        self.contains.push(unit);
        self
    }
}

common_struct! {
    pub struct Program {
        pub units: Vec<ProgramUnit>,
    }
}

impl Program {
    pub fn new(units: Vec<ProgramUnit>) -> Self {
        Self { units }
    }

    pub fn single(unit: ProgramUnit) -> Self {
        Self { units: vec![unit] }
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
