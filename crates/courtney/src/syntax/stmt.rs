//! Statements, declarations and files.
//!
//! The excluder reasons about a handful of statement shapes (branches,
//! returns, assignments); every other construct that can nest
//! statements or expressions (loops with their init and post clauses,
//! `select` clauses, `go`/`defer` calls, labeled statements, channel
//! sends, increments) is modelled with enough structure for the walk to
//! reach what is inside it, so panic calls and marker comments are
//! found wherever they sit. Function literals do not appear here: the
//! expression grammar classifies them as non-comparable, so they carry
//! no analysable body.

use std::path::PathBuf;

use super::expr::Expr;
use super::span::Span;

/// A single analysed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// On-disk path of the file.
    pub path: PathBuf,
    /// Range covering the whole file.
    pub span: Span,
    /// Top-level function declarations.
    pub funcs: Vec<FuncDecl>,
    /// Line comments, in source order.
    pub comments: Vec<Comment>,
}

/// A line comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Range of the comment, including its marker.
    pub span: Span,
    /// Comment body, without the leading `//`.
    pub text: String,
}

impl Comment {
    /// Whether this comment disables the coverage requirement for its
    /// enclosing scope. The body must begin with `notest`, optionally
    /// preceded by a single space; anything after the word is ignored.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        let body = self.text.strip_prefix(' ').unwrap_or(&self.text);
        body.starts_with("notest")
    }
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Range of the whole declaration.
    pub span: Span,
    /// Function name.
    pub name: String,
    /// Result fields, possibly named.
    pub results: Vec<Field>,
    /// Function body.
    pub body: Block,
}

/// A parameter or result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field names; empty for anonymous fields. Each entry is a
    /// [`ExprKind::Name`](super::ExprKind::Name) node so named results
    /// resolve through the binding maps.
    pub names: Vec<Expr>,
    /// Field type expression, if the provider surfaces one.
    pub ty: Option<Expr>,
}

/// A brace-delimited statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Range from the opening to the closing brace.
    pub span: Span,
    /// Statements in source order.
    pub stmts: Vec<Stmt>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// A nested block.
    Block(Block),
    /// An `if` statement, possibly with an else arm.
    If(IfStmt),
    /// An expression `switch` statement.
    Switch(SwitchStmt),
    /// A type switch.
    TypeSwitch(TypeSwitchStmt),
    /// A `select` statement.
    Select(SelectStmt),
    /// A `return` statement.
    Return(ReturnStmt),
    /// An assignment or short variable declaration.
    Assign(AssignStmt),
    /// A `var` declaration statement.
    VarDecl(VarDecl),
    /// An expression statement.
    Expr(ExprStmt),
    /// A three-clause or condition-only loop.
    For(ForStmt),
    /// A `range` loop.
    Range(RangeStmt),
    /// A `go` statement.
    Go(GoStmt),
    /// A `defer` statement.
    Defer(DeferStmt),
    /// A labeled statement.
    Labeled(LabeledStmt),
    /// A channel send.
    Send(SendStmt),
    /// An increment or decrement.
    IncDec(IncDecStmt),
}

impl Stmt {
    /// The source range of the statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(b) => b.span,
            Self::If(s) => s.span,
            Self::Switch(s) => s.span,
            Self::TypeSwitch(s) => s.span,
            Self::Select(s) => s.span,
            Self::Return(s) => s.span,
            Self::Assign(s) => s.span,
            Self::VarDecl(s) => s.span,
            Self::Expr(s) => s.span,
            Self::For(s) => s.span,
            Self::Range(s) => s.span,
            Self::Go(s) => s.span,
            Self::Defer(s) => s.span,
            Self::Labeled(s) => s.span,
            Self::Send(s) => s.span,
            Self::IncDec(s) => s.span,
        }
    }
}

/// `if init; cond { then } else ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    /// Range of the whole statement.
    pub span: Span,
    /// Optional init statement, e.g. the short declaration in
    /// `if v, err := f(); err != nil { ... }`.
    pub init: Option<Box<Stmt>>,
    /// The guard condition.
    pub cond: Expr,
    /// Branch taken when the guard holds.
    pub then: Block,
    /// The else arm, if present.
    pub els: Option<Box<ElseArm>>,
}

/// The else arm of an [`IfStmt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElseArm {
    /// A plain `else { ... }` block.
    Block(Block),
    /// An `else if` continuation.
    If(IfStmt),
}

/// `switch tag { case ...: ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    /// Range of the whole statement.
    pub span: Span,
    /// Tag expression. Guard solving only applies to tagless switches.
    pub tag: Option<Expr>,
    /// Case clauses in source order.
    pub cases: Vec<CaseClause>,
}

/// One clause of a switch. An empty guard list is the default clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseClause {
    /// Range from the `case` keyword to the end of the clause body.
    pub span: Span,
    /// Guard expressions; empty for `default`.
    pub guards: Vec<Expr>,
    /// Clause body.
    pub body: Vec<Stmt>,
}

/// `switch init; v := x.(type) { case ...: ... }`
///
/// Type switches are never solved as guard conditions; the model exists
/// so the walk reaches the clause bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSwitchStmt {
    /// Range of the whole statement.
    pub span: Span,
    /// Optional init statement.
    pub init: Option<Box<Stmt>>,
    /// The statement holding the type assertion, either a bare
    /// expression statement or the `v := x.(type)` assignment.
    pub subject: Box<Stmt>,
    /// Case clauses; guards are type expressions.
    pub cases: Vec<CaseClause>,
}

/// `select { case ...: ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStmt {
    /// Range of the whole statement.
    pub span: Span,
    /// Communication clauses in source order.
    pub clauses: Vec<CommClause>,
}

/// One clause of a `select`. An absent communication statement is the
/// default clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommClause {
    /// Range from the `case` keyword to the end of the clause body.
    pub span: Span,
    /// The send or receive statement; absent for `default`.
    pub comm: Option<Box<Stmt>>,
    /// Clause body.
    pub body: Vec<Stmt>,
}

/// `return results...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    /// Range of the statement.
    pub span: Span,
    /// Result expressions; empty for a bare return.
    pub results: Vec<Expr>,
}

/// Whether an assignment introduces its left-hand names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// Plain assignment `=`.
    Assign,
    /// Short variable declaration `:=`.
    Define,
}

/// `lhs... = rhs...` or `lhs... := rhs...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignStmt {
    /// Range of the statement.
    pub span: Span,
    /// Assigned expressions.
    pub lhs: Vec<Expr>,
    /// Value expressions.
    pub rhs: Vec<Expr>,
    /// Assignment flavour.
    pub op: AssignOp,
}

/// `var names ty = values`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    /// Range of the statement.
    pub span: Span,
    /// Declared names, each a name node.
    pub names: Vec<Expr>,
    /// Optional type annotation.
    pub ty: Option<Expr>,
    /// Initialiser expressions; may be empty.
    pub values: Vec<Expr>,
}

/// A bare expression in statement position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    /// Range of the statement.
    pub span: Span,
    /// The expression.
    pub expr: Expr,
}

/// A three-clause or condition-only loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    /// Range of the statement.
    pub span: Span,
    /// Optional init statement.
    pub init: Option<Box<Stmt>>,
    /// Loop condition, if any.
    pub cond: Option<Expr>,
    /// Optional post statement.
    pub post: Option<Box<Stmt>>,
    /// Loop body.
    pub body: Block,
}

/// `for key, value := range expr { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeStmt {
    /// Range of the statement.
    pub span: Span,
    /// Key variable, if bound.
    pub key: Option<Expr>,
    /// Value variable, if bound.
    pub value: Option<Expr>,
    /// The expression being ranged over.
    pub expr: Expr,
    /// Loop body.
    pub body: Block,
}

/// `go call(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoStmt {
    /// Range of the statement.
    pub span: Span,
    /// The spawned call.
    pub call: Expr,
}

/// `defer call(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferStmt {
    /// Range of the statement.
    pub span: Span,
    /// The deferred call.
    pub call: Expr,
}

/// `label: stmt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStmt {
    /// Range of the statement.
    pub span: Span,
    /// The label text.
    pub label: String,
    /// The labeled statement.
    pub stmt: Box<Stmt>,
}

/// `chan <- value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendStmt {
    /// Range of the statement.
    pub span: Span,
    /// The channel expression.
    pub chan: Expr,
    /// The sent value.
    pub value: Expr,
}

/// Increment or decrement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    /// `++`
    Inc,
    /// `--`
    Dec,
}

/// `expr++` or `expr--`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncDecStmt {
    /// Range of the statement.
    pub span: Span,
    /// The updated expression.
    pub expr: Expr,
    /// Which direction.
    pub op: IncDecOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::span::{Pos, Span};

    fn comment(text: &str) -> Comment {
        Comment {
            span: Span::at(Pos::new(1, 1)),
            text: text.to_string(),
        }
    }

    #[test]
    fn marker_comment_forms() {
        assert!(comment("notest").is_marker());
        assert!(comment(" notest").is_marker());
        assert!(comment("notest because flaky").is_marker());
        assert!(comment("notest:reason").is_marker());
    }

    #[test]
    fn non_marker_comments() {
        assert!(!comment("  notest").is_marker());
        assert!(!comment("no test").is_marker());
        assert!(!comment("TODO").is_marker());
        assert!(!comment("").is_marker());
    }
}
