use ff_core::ast::{Stmt, StmtAssign, StmtKind};

/// Assignments of `stmt` whose whole right-hand side calls `internal_name`.
///
/// Only the statement itself is inspected; statements nested in its blocks
/// are found when the engine lowers those blocks.
pub fn find_call_sites<'a>(stmt: &'a Stmt, internal_name: &str) -> Vec<&'a StmtAssign> {
    match stmt.kind() {
        StmtKind::Assign(assign) if assign.value.is_call_to(internal_name) => vec![assign],
        StmtKind::Assign(_)
        | StmtKind::Decl(_)
        | StmtKind::If(_)
        | StmtKind::Loop(_)
        | StmtKind::Block(_) => Vec::new(),
    }
}
