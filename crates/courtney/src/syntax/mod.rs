//! The typed syntax model the analysis runs over.
//!
//! Trees are produced by a syntax provider (see
//! [`AstProvider`](crate::driver::AstProvider)) and borrowed by the
//! analysis; nothing in this module parses source. Expressions form a
//! closed sum ([`ExprKind`]), name resolution and type attribution are
//! side maps keyed by [`NodeId`] ([`SemanticInfo`]), and traversal goes
//! through the [`visit`] module.

mod expr;
mod info;
mod span;
mod stmt;
pub mod visit;

pub use expr::{BinaryOp, BindingId, ChanDir, Expr, ExprKind, LitKind, NodeId, UnaryOp};
pub use info::{ConstValue, SemanticInfo, TypeAttr, ERROR_TYPE_NAME, ERROR_TYPE_UNDERLYING};
pub use span::{Pos, Span};
pub use stmt::{
    AssignOp, AssignStmt, Block, CaseClause, Comment, CommClause, DeferStmt, ElseArm, ExprStmt,
    Field, ForStmt, FuncDecl, GoStmt, IfStmt, IncDecOp, IncDecStmt, LabeledStmt, RangeStmt,
    ReturnStmt, SelectStmt, SendStmt, SourceFile, Stmt, SwitchStmt, TypeSwitchStmt, VarDecl,
};
