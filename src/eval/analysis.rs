//! Static reachability: decides whether a block is guaranteed to end in a
//! `return` on every path, so the function/if emitters know when a trailing
//! terminator would be redundant (or, for `if`, illegal — LLVM rejects a
//! block with two terminators).

use crate::ast::{Block, Statement};

/// True if control can never fall off the end of `block` — every path
/// through it ends in `return`.
pub fn block_always_returns(block: &Block) -> bool {
    match block.statements.last() {
        Some(stmt) => stmt_always_returns(stmt),
        None => false,
    }
}

fn stmt_always_returns(stmt: &Statement) -> bool {
    match stmt {
        Statement::Return(_) => true,
        Statement::Block(block) => block_always_returns(block),
        Statement::If(if_stmt) => match &if_stmt.else_block {
            Some(else_block) => {
                block_always_returns(&if_stmt.then_block) && block_always_returns(else_block)
            }
            None => false,
        },
        // A `while` loop may run zero iterations, so it never guarantees a return.
        Statement::While(_) => false,
        Statement::VarDecl(_)
        | Statement::Assignment(_)
        | Statement::Print(_)
        | Statement::Scan(_)
        | Statement::Expr(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Expression, IntLiteral, ReturnStmt, WhileStmt},
        error::Position,
    };

    fn ret() -> Statement {
        Statement::Return(ReturnStmt {
            value: Expression::IntLiteral(IntLiteral {
                value: 0,
                position: Position::synthetic(),
            }),
            position: Position::synthetic(),
        })
    }

    fn block(statements: Vec<Statement>) -> Block {
        Block { statements }
    }

    #[test]
    fn empty_block_never_returns() {
        assert!(!block_always_returns(&block(vec![])));
    }

    #[test]
    fn block_ending_in_return_always_returns() {
        assert!(block_always_returns(&block(vec![ret()])));
    }

    #[test]
    fn if_without_else_never_always_returns() {
        let if_stmt = Statement::If(crate::ast::IfStmt {
            condition: Expression::IntLiteral(IntLiteral {
                value: 1,
                position: Position::synthetic(),
            }),
            then_block: block(vec![ret()]),
            else_block: None,
            position: Position::synthetic(),
        });
        assert!(!block_always_returns(&block(vec![if_stmt])));
    }

    #[test]
    fn if_with_both_branches_returning_always_returns() {
        let if_stmt = Statement::If(crate::ast::IfStmt {
            condition: Expression::IntLiteral(IntLiteral {
                value: 1,
                position: Position::synthetic(),
            }),
            then_block: block(vec![ret()]),
            else_block: Some(block(vec![ret()])),
            position: Position::synthetic(),
        });
        assert!(block_always_returns(&block(vec![if_stmt])));
    }

    #[test]
    fn while_is_never_counted_as_always_returning() {
        let while_stmt = Statement::While(WhileStmt {
            condition: Expression::IntLiteral(IntLiteral {
                value: 1,
                position: Position::synthetic(),
            }),
            block: block(vec![ret()]),
            position: Position::synthetic(),
        });
        assert!(!block_always_returns(&block(vec![while_stmt])));
    }
}
