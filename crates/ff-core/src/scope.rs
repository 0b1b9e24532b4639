//! Declarations visible from each program unit.
//!
//! Every unit opens a scope named by its path from the outermost unit
//! (`main::inner`). Names are looked up case-insensitively, falling back to
//! the host unit when the local scope does not declare them.

use std::collections::HashMap;
use std::fmt;

use crate::ast::visit::for_each_stmt;
use crate::ast::{Dimension, Ident, Program, ProgramUnit, StmtKind, VarDecl};
use crate::error::Error;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn root(unit: &Ident) -> Self {
        Self(unit.key())
    }

    pub fn child(&self, unit: &Ident) -> Self {
        Self(format!("{}::{}", self.0, unit.key()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
struct ScopeEntry {
    parent: Option<ScopeId>,
    vars: HashMap<String, VarDecl>,
}

#[derive(Debug, Default)]
pub struct ScopeVars {
    scopes: HashMap<ScopeId, ScopeEntry>,
}

impl ScopeVars {
    pub fn collect(program: &Program) -> Result<Self> {
        let mut vars = ScopeVars::default();
        for unit in &program.units {
            vars.collect_unit(unit, None)?;
        }
        Ok(vars)
    }

    fn collect_unit(&mut self, unit: &ProgramUnit, parent: Option<&ScopeId>) -> Result<()> {
        let id = match parent {
            Some(parent) => parent.child(&unit.name),
            None => ScopeId::root(&unit.name),
        };
        if self.scopes.contains_key(&id) {
            bail!("program unit `{}` is defined twice", id);
        }

        let mut entry = ScopeEntry {
            parent: parent.cloned(),
            vars: HashMap::new(),
        };
        for decl in &unit.specification {
            entry.vars.insert(decl.name.key(), decl.clone());
        }
        for_each_stmt(&unit.execution, &mut |stmt| {
            if let StmtKind::Decl(decl) = &stmt.kind {
                for var in &decl.vars {
                    entry.vars.insert(var.name.key(), var.clone());
                }
            }
        });
        self.scopes.insert(id.clone(), entry);

        for child in &unit.contains {
            self.collect_unit(child, Some(&id))?;
        }
        Ok(())
    }

    pub fn contains_scope(&self, scope: &ScopeId) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Nearest declaration of `name` visible from `scope`.
    pub fn lookup(&self, scope: &ScopeId, name: &str) -> Option<&VarDecl> {
        let key = name.to_ascii_lowercase();
        let mut current = self.scopes.get(scope);
        while let Some(entry) = current {
            if let Some(decl) = entry.vars.get(&key) {
                return Some(decl);
            }
            current = entry.parent.as_ref().and_then(|p| self.scopes.get(p));
        }
        None
    }

    /// Declared dimensions of `name`; empty for scalars.
    pub fn declared_shape(&self, scope: &ScopeId, name: &str) -> Result<&[Dimension]> {
        self.lookup(scope, name)
            .map(|decl| decl.dims.as_slice())
            .ok_or_else(|| Error::UndeclaredVariable {
                name: name.to_string(),
                scope: scope.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Stmt, StmtDecl, Ty};

    fn program() -> Program {
        let inner = ProgramUnit::subroutine("Inner")
            .with_decls([VarDecl::scalar("x", Ty::Double)])
            .with_stmts([StmtDecl::loop_var("tmp_parfor_0").into()]);
        Program::single(
            ProgramUnit::program("main")
                .with_decls([
                    VarDecl::array("A", Ty::Double, vec![Dimension::new(Expr::int(10))]),
                    VarDecl::scalar("x", Ty::Integer),
                ])
                .with_stmts([Stmt::assign(Expr::name("x"), Expr::int(0))])
                .with_contained(inner),
        )
    }

    #[test]
    fn lookups_fall_back_to_host_scope() -> Result<()> {
        let vars = ScopeVars::collect(&program())?;
        let main = ScopeId::root(&"main".into());
        let inner = main.child(&"inner".into());

        assert_eq!(inner.as_str(), "main::inner");
        assert_eq!(vars.declared_shape(&inner, "a")?.len(), 1);
        assert_eq!(vars.lookup(&inner, "X").map(|d| d.ty), Some(Ty::Double));
        assert_eq!(vars.lookup(&main, "x").map(|d| d.ty), Some(Ty::Integer));
        assert!(vars.lookup(&inner, "tmp_parfor_0").is_some());
        assert!(vars.lookup(&main, "tmp_parfor_0").is_none());
        Ok(())
    }

    #[test]
    fn undeclared_names_are_reported_with_scope() -> Result<()> {
        let vars = ScopeVars::collect(&program())?;
        let main = ScopeId::root(&"main".into());
        match vars.declared_shape(&main, "missing") {
            Err(Error::UndeclaredVariable { name, scope }) => {
                assert_eq!(name, "missing");
                assert_eq!(scope, "main");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn duplicate_units_are_rejected() {
        let program = Program::new(vec![
            ProgramUnit::program("main"),
            ProgramUnit::subroutine("MAIN"),
        ]);
        assert!(ScopeVars::collect(&program).is_err());
    }
}
