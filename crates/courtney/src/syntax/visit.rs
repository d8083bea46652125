//! Syntax tree traversal.
//!
//! A visitor trait in the style of `syn::visit`: every method has a
//! default that delegates to the free function of the same name, which
//! walks the node's children. Implementations override the methods they
//! care about and call the free function to keep descending.

use super::expr::{Expr, ExprKind};
use super::stmt::{Block, CaseClause, CommClause, ElseArm, FuncDecl, IfStmt, SourceFile, Stmt};

/// Tree visitor with default walks.
pub trait Visit<'ast> {
    /// Visit a file.
    fn visit_file(&mut self, node: &'ast SourceFile) {
        visit_file(self, node);
    }

    /// Visit a function declaration.
    fn visit_func(&mut self, node: &'ast FuncDecl) {
        visit_func(self, node);
    }

    /// Visit a block.
    fn visit_block(&mut self, node: &'ast Block) {
        visit_block(self, node);
    }

    /// Visit a statement.
    fn visit_stmt(&mut self, node: &'ast Stmt) {
        visit_stmt(self, node);
    }

    /// Visit an `if` statement. Called both for `if` statements in
    /// statement position and for `else if` continuations.
    fn visit_if(&mut self, node: &'ast IfStmt) {
        visit_if(self, node);
    }

    /// Visit a case clause.
    fn visit_case(&mut self, node: &'ast CaseClause) {
        visit_case(self, node);
    }

    /// Visit a select communication clause.
    fn visit_comm(&mut self, node: &'ast CommClause) {
        visit_comm(self, node);
    }

    /// Visit an expression.
    fn visit_expr(&mut self, node: &'ast Expr) {
        visit_expr(self, node);
    }
}

/// Walk the declarations of a file.
pub fn visit_file<'ast, V>(v: &mut V, node: &'ast SourceFile)
where
    V: Visit<'ast> + ?Sized,
{
    for func in &node.funcs {
        v.visit_func(func);
    }
}

/// Walk the result names and body of a function.
pub fn visit_func<'ast, V>(v: &mut V, node: &'ast FuncDecl)
where
    V: Visit<'ast> + ?Sized,
{
    for field in &node.results {
        for name in &field.names {
            v.visit_expr(name);
        }
    }
    v.visit_block(&node.body);
}

/// Walk the statements of a block.
pub fn visit_block<'ast, V>(v: &mut V, node: &'ast Block)
where
    V: Visit<'ast> + ?Sized,
{
    for stmt in &node.stmts {
        v.visit_stmt(stmt);
    }
}

/// Walk the children of a statement.
pub fn visit_stmt<'ast, V>(v: &mut V, node: &'ast Stmt)
where
    V: Visit<'ast> + ?Sized,
{
    match node {
        Stmt::Block(block) => v.visit_block(block),
        Stmt::If(stmt) => v.visit_if(stmt),
        Stmt::Switch(stmt) => {
            if let Some(tag) = &stmt.tag {
                v.visit_expr(tag);
            }
            for case in &stmt.cases {
                v.visit_case(case);
            }
        }
        Stmt::Return(stmt) => {
            for result in &stmt.results {
                v.visit_expr(result);
            }
        }
        Stmt::Assign(stmt) => {
            for e in &stmt.lhs {
                v.visit_expr(e);
            }
            for e in &stmt.rhs {
                v.visit_expr(e);
            }
        }
        Stmt::VarDecl(stmt) => {
            for name in &stmt.names {
                v.visit_expr(name);
            }
            if let Some(ty) = &stmt.ty {
                v.visit_expr(ty);
            }
            for value in &stmt.values {
                v.visit_expr(value);
            }
        }
        Stmt::Expr(stmt) => v.visit_expr(&stmt.expr),
        Stmt::TypeSwitch(stmt) => {
            if let Some(init) = &stmt.init {
                v.visit_stmt(init);
            }
            v.visit_stmt(&stmt.subject);
            for case in &stmt.cases {
                v.visit_case(case);
            }
        }
        Stmt::Select(stmt) => {
            for clause in &stmt.clauses {
                v.visit_comm(clause);
            }
        }
        Stmt::For(stmt) => {
            if let Some(init) = &stmt.init {
                v.visit_stmt(init);
            }
            if let Some(cond) = &stmt.cond {
                v.visit_expr(cond);
            }
            if let Some(post) = &stmt.post {
                v.visit_stmt(post);
            }
            v.visit_block(&stmt.body);
        }
        Stmt::Range(stmt) => {
            if let Some(key) = &stmt.key {
                v.visit_expr(key);
            }
            if let Some(value) = &stmt.value {
                v.visit_expr(value);
            }
            v.visit_expr(&stmt.expr);
            v.visit_block(&stmt.body);
        }
        Stmt::Go(stmt) => v.visit_expr(&stmt.call),
        Stmt::Defer(stmt) => v.visit_expr(&stmt.call),
        Stmt::Labeled(stmt) => v.visit_stmt(&stmt.stmt),
        Stmt::Send(stmt) => {
            v.visit_expr(&stmt.chan);
            v.visit_expr(&stmt.value);
        }
        Stmt::IncDec(stmt) => v.visit_expr(&stmt.expr),
    }
}

/// Walk the init, guard and branches of an `if` statement. The `else if`
/// continuation is visited through [`Visit::visit_if`] again, so chain
/// links are observed the same way stand-alone `if` statements are.
pub fn visit_if<'ast, V>(v: &mut V, node: &'ast IfStmt)
where
    V: Visit<'ast> + ?Sized,
{
    if let Some(init) = &node.init {
        v.visit_stmt(init);
    }
    v.visit_expr(&node.cond);
    v.visit_block(&node.then);
    match node.els.as_deref() {
        Some(ElseArm::Block(block)) => v.visit_block(block),
        Some(ElseArm::If(nested)) => v.visit_if(nested),
        None => {}
    }
}

/// Walk the guards and body of a case clause.
pub fn visit_case<'ast, V>(v: &mut V, node: &'ast CaseClause)
where
    V: Visit<'ast> + ?Sized,
{
    for guard in &node.guards {
        v.visit_expr(guard);
    }
    for stmt in &node.body {
        v.visit_stmt(stmt);
    }
}

/// Walk the communication statement and body of a select clause.
pub fn visit_comm<'ast, V>(v: &mut V, node: &'ast CommClause)
where
    V: Visit<'ast> + ?Sized,
{
    if let Some(comm) = &node.comm {
        v.visit_stmt(comm);
    }
    for stmt in &node.body {
        v.visit_stmt(stmt);
    }
}

/// Walk the children of an expression.
pub fn visit_expr<'ast, V>(v: &mut V, node: &'ast Expr)
where
    V: Visit<'ast> + ?Sized,
{
    match &node.kind {
        ExprKind::Name(_) | ExprKind::Literal { .. } | ExprKind::NonComparable => {}
        ExprKind::Select { recv, field } => {
            v.visit_expr(recv);
            v.visit_expr(field);
        }
        ExprKind::Call {
            callee,
            args,
            ellipsis: _,
        } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Paren(inner) | ExprKind::Star(inner) => v.visit_expr(inner),
        ExprKind::Index { base, index } => {
            v.visit_expr(base);
            v.visit_expr(index);
        }
        ExprKind::Slice {
            base,
            low,
            high,
            max,
            three_index: _,
        } => {
            v.visit_expr(base);
            for part in [low, high, max].into_iter().flatten() {
                v.visit_expr(part);
            }
        }
        ExprKind::TypeAssert { base, ty } => {
            v.visit_expr(base);
            if let Some(ty) = ty {
                v.visit_expr(ty);
            }
        }
        ExprKind::Unary { op: _, operand } => v.visit_expr(operand),
        ExprKind::Binary { left, op: _, right } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Ellipsis(elem) => {
            if let Some(elem) = elem {
                v.visit_expr(elem);
            }
        }
        ExprKind::Composite { ty, elems } => {
            if let Some(ty) = ty {
                v.visit_expr(ty);
            }
            for elem in elems {
                v.visit_expr(elem);
            }
        }
        ExprKind::KeyValue { key, value } => {
            v.visit_expr(key);
            v.visit_expr(value);
        }
        ExprKind::ArrayType { elem, len } => {
            v.visit_expr(elem);
            if let Some(len) = len {
                v.visit_expr(len);
            }
        }
        ExprKind::MapType { key, value } => {
            v.visit_expr(key);
            v.visit_expr(value);
        }
        ExprKind::ChanType { value, dir: _ } => v.visit_expr(value),
    }
}
