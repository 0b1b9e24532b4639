mod support;

use ff_core::ast::{Expr, ProgramUnit, Stmt, Ty, VarDecl};
use ff_core::error::Error;
use ff_core::intrinsics::LoopIntrinsic;
use ff_core::Result;
use ff_optimize::resolve_intrinsics;
use pretty_assertions::assert_eq;
use support::ast::{any_of, main_program, real_array, real_scalar, sum_of};

#[test]
fn kind_queries_fold_to_literals() -> Result<()> {
    let mut program = main_program(
        vec![real_scalar("ik"), real_scalar("rk")],
        vec![
            Stmt::assign(
                Expr::name("ik"),
                Expr::intrinsic("SELECTED_INT_KIND", vec![Expr::int(9)]),
            ),
            Stmt::assign(
                Expr::name("rk"),
                Expr::intrinsic("selected_real_kind", vec![Expr::int(6), Expr::int(30)]),
            ),
        ],
    );

    let pending = resolve_intrinsics(&mut program)?;

    assert!(pending.is_empty());
    let stmts = &program.units[0].execution.stmts;
    assert_eq!(stmts[0], Stmt::assign(Expr::name("ik"), Expr::int(4)));
    assert_eq!(stmts[1], Stmt::assign(Expr::name("rk"), Expr::int(4)));
    Ok(())
}

#[test]
fn kind_queries_fold_inside_declarations() -> Result<()> {
    let mut program = main_program(
        vec![VarDecl::scalar("dp", Ty::Integer).with_init(Expr::intrinsic(
            "SELECTED_REAL_KIND",
            vec![Expr::int(15), Expr::int(307)],
        ))],
        vec![],
    );

    resolve_intrinsics(&mut program)?;

    assert_eq!(program.units[0].specification[0].init, Some(Expr::int(8)));
    Ok(())
}

#[test]
fn loop_intrinsics_become_typed_calls_and_are_scheduled_once() -> Result<()> {
    let mut program = main_program(
        vec![real_array("a", &[(1, 4)]), real_scalar("s"), real_scalar("f")],
        vec![
            Stmt::assign(Expr::name("f"), any_of(Expr::name("a"))),
            Stmt::assign(Expr::name("s"), sum_of(Expr::name("a"))),
            Stmt::assign(Expr::name("s"), sum_of(Expr::name("a"))),
        ],
    );

    let pending = resolve_intrinsics(&mut program)?;

    assert_eq!(
        pending.iter().collect::<Vec<_>>(),
        vec![LoopIntrinsic::Sum, LoopIntrinsic::Any]
    );
    let value = &program.units[0].execution.stmts[1].as_assign().map(|a| a.value.clone());
    assert_eq!(
        value,
        &Some(Expr::call(
            "__ff_sum",
            vec![Expr::name("a")],
            Some(Ty::Double)
        ))
    );
    Ok(())
}

#[test]
fn elemental_intrinsics_are_renamed_with_result_types() -> Result<()> {
    let mut program = main_program(
        vec![real_scalar("x"), real_scalar("n")],
        vec![
            Stmt::assign(
                Expr::name("x"),
                Expr::intrinsic("Sqrt", vec![Expr::name("x")]),
            ),
            Stmt::assign(
                Expr::name("n"),
                Expr::intrinsic("INT", vec![Expr::name("x")]),
            ),
        ],
    );

    let pending = resolve_intrinsics(&mut program)?;

    assert!(pending.is_empty());
    let stmts = &program.units[0].execution.stmts;
    assert_eq!(
        stmts[0].as_assign().map(|a| &a.value),
        Some(&Expr::call("sqrt", vec![Expr::name("x")], Some(Ty::Double)))
    );
    assert_eq!(
        stmts[1].as_assign().map(|a| &a.value),
        Some(&Expr::call(
            "__ff_int",
            vec![Expr::name("x")],
            Some(Ty::Integer)
        ))
    );
    Ok(())
}

#[test]
fn nested_kind_queries_fold_before_their_parent() -> Result<()> {
    let mut program = main_program(
        vec![real_scalar("x")],
        vec![Stmt::assign(
            Expr::name("x"),
            Expr::intrinsic(
                "DBLE",
                vec![Expr::intrinsic("SELECTED_INT_KIND", vec![Expr::int(2)])],
            ),
        )],
    );

    resolve_intrinsics(&mut program)?;

    assert_eq!(
        program.units[0].execution.stmts[0].to_string(),
        "x = __ff_dble(1)"
    );
    Ok(())
}

#[test]
fn contained_units_are_resolved() -> Result<()> {
    let inner = ProgramUnit::subroutine("inner")
        .with_decls([real_array("b", &[(1, 3)]), real_scalar("t")])
        .with_stmts([Stmt::assign(Expr::name("t"), sum_of(Expr::name("b")))]);
    let mut program = main_program(vec![], vec![]);
    program.units[0].contains.push(inner);

    let pending = resolve_intrinsics(&mut program)?;

    assert!(pending.contains(LoopIntrinsic::Sum));
    assert!(!pending.contains(LoopIntrinsic::Any));
    Ok(())
}

#[test]
fn unknown_intrinsics_are_rejected() {
    let mut program = main_program(
        vec![real_array("a", &[(1, 4)]), real_scalar("s")],
        vec![Stmt::assign(
            Expr::name("s"),
            Expr::intrinsic("PRODUCT", vec![Expr::name("a")]),
        )],
    );

    match resolve_intrinsics(&mut program) {
        Err(Error::UnsupportedIntrinsic(name)) => assert_eq!(name, "PRODUCT"),
        other => panic!("expected an unsupported intrinsic, got {:?}", other),
    }
}

#[test]
fn kind_query_arguments_must_be_literals() {
    let mut program = main_program(
        vec![real_scalar("k"), real_scalar("p")],
        vec![Stmt::assign(
            Expr::name("k"),
            Expr::intrinsic("SELECTED_REAL_KIND", vec![Expr::int(6), Expr::name("p")]),
        )],
    );

    match resolve_intrinsics(&mut program) {
        Err(Error::MalformedLiteral {
            intrinsic,
            position,
            found,
        }) => {
            assert_eq!(intrinsic, "SELECTED_REAL_KIND");
            assert_eq!(position, 2);
            assert_eq!(found, "p");
        }
        other => panic!("expected a malformed literal, got {:?}", other),
    }
}
