//! End-to-end scenarios: build a `Program` AST directly (standing in for the
//! out-of-scope parser) and check the shape of the emitted IR text.

use glyphc::{
    ast::*,
    error::{CodegenError, ErrorKind, Position},
};

fn pos() -> Position {
    Position::synthetic()
}

fn int_lit(value: i64) -> Expression {
    Expression::IntLiteral(IntLiteral { value, position: pos() })
}

fn float_lit(value: f64) -> Expression {
    Expression::FloatLiteral(FloatLiteral { value, position: pos() })
}

fn ident(name: &str) -> Expression {
    Expression::Identifier(Identifier { name: name.to_owned(), position: pos() })
}

fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Expression {
    Expression::Binary(BinaryExpr {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        position: pos(),
    })
}

fn cast(target: glyphc::types::PrimKind, operand: Expression) -> Expression {
    Expression::Cast(CastExpr { target, operand: Box::new(operand), position: pos() })
}

fn call(name: &str, args: Vec<Expression>) -> Expression {
    Expression::Call(CallExpr { name: name.to_owned(), args, position: pos() })
}

fn ty(name: &str, is_array: bool) -> TypeAnnotation {
    TypeAnnotation { name: name.to_owned(), is_array, position: pos() }
}

fn var_decl(name: &str, type_name: &str, is_array: bool, size: Option<Expression>, init: Option<Expression>) -> Statement {
    Statement::VarDecl(VarDecl {
        name: name.to_owned(),
        type_annotation: ty(type_name, is_array),
        size,
        init,
        position: pos(),
    })
}

fn assign(name: &str, index: Option<Expression>, value: Expression) -> Statement {
    Statement::Assignment(Assignment {
        target: LValue { name: name.to_owned(), index, position: pos() },
        value,
        position: pos(),
    })
}

fn ret(value: Expression) -> Statement {
    Statement::Return(ReturnStmt { value, position: pos() })
}

fn while_stmt(condition: Expression, statements: Vec<Statement>) -> Statement {
    Statement::While(WhileStmt { condition, block: Block { statements }, position: pos() })
}

fn if_stmt(condition: Expression, then: Vec<Statement>, other: Option<Vec<Statement>>) -> Statement {
    Statement::If(IfStmt {
        condition,
        then_block: Block { statements: then },
        else_block: other.map(|statements| Block { statements }),
        position: pos(),
    })
}

fn print(format: &str, args: Vec<Expression>) -> Statement {
    Statement::Print(PrintStmt {
        format: StringLiteral { value: format.to_owned(), position: pos() },
        args,
        position: pos(),
    })
}

fn func(name: &str, return_ty: &str, params: Vec<(&str, &str, bool)>, body: Vec<Statement>) -> FunctionDecl {
    FunctionDecl {
        name: name.to_owned(),
        return_type: ty(return_ty, false),
        params: params
            .into_iter()
            .map(|(pname, pty, is_array)| Param {
                name: pname.to_owned(),
                type_annotation: ty(pty, is_array),
                position: pos(),
            })
            .collect(),
        body: Block { statements: body },
        position: pos(),
    }
}

fn program(functions: Vec<FunctionDecl>) -> Program {
    Program { functions }
}

fn compile(functions: Vec<FunctionDecl>) -> String {
    glyphc::compile_program(&program(functions)).expect("compilation should succeed")
}

fn compile_err(functions: Vec<FunctionDecl>) -> CodegenError {
    glyphc::compile_program(&program(functions)).expect_err("compilation should fail")
}

#[test]
fn integer_return() {
    let ir = compile(vec![func("main", "int", vec![], vec![ret(int_lit(42))])]);

    assert!(ir.contains("define i64 @main()"));
    assert!(ir.contains("entry:"));
    assert!(ir.contains("= add i64 0, 42"));
    assert!(ir.contains("ret i64 %val."));
    // The guarding trailing ret is still present even though the body
    // already returns on every path.
    assert_eq!(ir.matches("ret i64 0").count(), 1);
    assert!(ir.trim_end().ends_with('}'));
}

#[test]
fn float_promotion() {
    let ir = compile(vec![func(
        "main",
        "int",
        vec![],
        vec![
            var_decl("f", "float", false, None, Some(float_lit(1.0))),
            var_decl("i", "int", false, None, Some(int_lit(2))),
            ret(cast(
                glyphc::types::PrimKind::Int,
                binary(BinaryOperator::Add, ident("f"), ident("i")),
            )),
        ],
    )]);

    assert!(ir.contains("sitofp i64"));
    assert!(ir.contains("fadd double"));
    assert!(ir.contains("fptosi double"));
    assert!(ir.contains("ret i64"));
}

#[test]
fn while_loop_countdown() {
    let ir = compile(vec![func(
        "main",
        "int",
        vec![],
        vec![
            var_decl("i", "int", false, None, Some(int_lit(3))),
            while_stmt(
                ident("i"),
                vec![assign("i", None, binary(BinaryOperator::Sub, ident("i"), int_lit(1)))],
            ),
            ret(ident("i")),
        ],
    )]);

    assert!(ir.contains("br label %while."));
    assert!(ir.contains("block."));
    assert!(ir.contains("end."));
    assert!(ir.contains("icmp ne i64"));
}

#[test]
fn array_sum() {
    let ir = compile(vec![func(
        "main",
        "int",
        vec![],
        vec![
            var_decl("a", "int", true, Some(int_lit(3)), None),
            assign("a", Some(int_lit(0)), int_lit(10)),
            assign("a", Some(int_lit(1)), int_lit(20)),
            assign("a", Some(int_lit(2)), int_lit(30)),
            ret(binary(
                BinaryOperator::Add,
                binary(
                    BinaryOperator::Add,
                    Expression::Indexed(IndexedIdentifier {
                        name: "a".to_owned(),
                        index: Box::new(int_lit(0)),
                        position: pos(),
                    }),
                    Expression::Indexed(IndexedIdentifier {
                        name: "a".to_owned(),
                        index: Box::new(int_lit(1)),
                        position: pos(),
                    }),
                ),
                Expression::Indexed(IndexedIdentifier {
                    name: "a".to_owned(),
                    index: Box::new(int_lit(2)),
                    position: pos(),
                }),
            )),
        ],
    )]);

    assert_eq!(ir.matches("alloca i64, i64 3").count(), 1);
    assert_eq!(ir.matches("getelementptr").count(), 1 + 3 + 3);
    assert_eq!(ir.matches("store i64").count(), 3);
    assert_eq!(ir.matches("= load i64, ptr %arrayPtr.").count(), 3);
    // Literal evaluation also emits `add i64 0, <n>`; only count adds of two
    // registers, which is what the two `+` expressions in the sum produce.
    assert_eq!(ir.matches("add i64 %").count(), 2);
}

#[test]
fn string_dedup() {
    let ir = compile(vec![func(
        "main",
        "int",
        vec![],
        vec![print("hi\n", vec![]), print("hi\n", vec![]), ret(int_lit(0))],
    )]);

    assert_eq!(ir.matches("private constant").count(), 1);
    assert!(ir.contains("@str.0 = private constant [4 x i8] c\"hi\\0A\\00\""));
    assert_eq!(ir.matches("call i32 (i8*, ...) @printf(i8* @str.0)").count(), 2);
}

#[test]
fn recursion() {
    let fib = func(
        "fib",
        "int",
        vec![("n", "int", false)],
        vec![
            if_stmt(
                binary(BinaryOperator::Le, ident("n"), int_lit(1)),
                vec![ret(ident("n"))],
                None,
            ),
            ret(binary(
                BinaryOperator::Add,
                call("fib", vec![binary(BinaryOperator::Sub, ident("n"), int_lit(1))]),
                call("fib", vec![binary(BinaryOperator::Sub, ident("n"), int_lit(2))]),
            )),
        ],
    );
    let main = func("main", "int", vec![], vec![ret(call("fib", vec![int_lit(5)]))]);

    let ir = compile(vec![fib, main]);

    assert_eq!(ir.matches("call i64 @fib(i64").count(), 3);
    assert!(ir.contains("define i64 @fib(i64 %n)"));
}

#[test]
fn if_else_both_return_terminates_end_block() {
    let abs = func(
        "abs",
        "int",
        vec![("x", "int", false)],
        vec![if_stmt(
            binary(BinaryOperator::Lt, ident("x"), int_lit(0)),
            vec![ret(Expression::Unary(UnaryExpr {
                op: UnaryOperator::Minus,
                operand: Box::new(ident("x")),
                position: pos(),
            }))],
            Some(vec![ret(ident("x"))]),
        )],
    );

    let ir = compile(vec![abs]);

    // The `end.N:` block between the two always-returning arms must not be
    // left as an empty, terminator-less block.
    assert!(ir.contains("unreachable"));
    let end_pos = ir.find("end.").expect("end label present");
    let after_end = &ir[end_pos..];
    let next_line = after_end.lines().nth(1).unwrap_or("");
    assert!(next_line.trim().starts_with("unreachable"));
}

#[test]
fn print_accepts_array_argument() {
    let ir = compile(vec![func(
        "main",
        "int",
        vec![],
        vec![
            var_decl("a", "int", true, Some(int_lit(3)), None),
            print("%p\n", vec![ident("a")]),
            ret(int_lit(0)),
        ],
    )]);

    assert!(ir.contains("call i32 (i8*, ...) @printf(i8* @str.0, i64* %ptr.a."));
}

#[test]
fn undefined_variable_fails() {
    let err = compile_err(vec![func("main", "int", vec![], vec![ret(ident("missing"))])]);
    assert_eq!(err.kind, ErrorKind::UndefinedVariable);
}

#[test]
fn undefined_function_fails() {
    let err = compile_err(vec![func(
        "main",
        "int",
        vec![],
        vec![ret(call("nope", vec![]))],
    )]);
    assert_eq!(err.kind, ErrorKind::UndefinedFunction);
}

#[test]
fn arity_mismatch_fails() {
    let identity = func("identity", "int", vec![("x", "int", false)], vec![ret(ident("x"))]);
    let main = func("main", "int", vec![], vec![ret(call("identity", vec![]))]);
    let err = compile_err(vec![identity, main]);
    assert_eq!(err.kind, ErrorKind::ArityMismatch);
}

#[test]
fn assigning_whole_array_fails() {
    let err = compile_err(vec![func(
        "main",
        "int",
        vec![],
        vec![
            var_decl("a", "int", true, Some(int_lit(1)), None),
            assign("a", None, int_lit(0)),
            ret(int_lit(0)),
        ],
    )]);
    assert_eq!(err.kind, ErrorKind::CannotAssignToArray);
}

#[test]
fn array_without_size_fails() {
    let err = compile_err(vec![func(
        "main",
        "int",
        vec![],
        vec![var_decl("a", "int", true, None, None), ret(int_lit(0))],
    )]);
    assert_eq!(err.kind, ErrorKind::MissingArraySize);
}

#[test]
fn duplicate_variable_in_same_scope_fails() {
    let err = compile_err(vec![func(
        "main",
        "int",
        vec![],
        vec![
            var_decl("x", "int", false, None, Some(int_lit(1))),
            var_decl("x", "int", false, None, Some(int_lit(2))),
            ret(int_lit(0)),
        ],
    )]);
    assert_eq!(err.kind, ErrorKind::DuplicateVariable);
}
