//! The per-file exclusion walk.
//!
//! One pass over the statement tree finds panic calls and drives the
//! solver over every conditional construct; a second pass over the
//! comment list resolves `notest` markers against their innermost
//! enclosing scope.

use crate::matcher::Matcher;
use crate::solver::{any_of, Outcome, Solver};
use crate::syntax::visit::{self, Visit};
use crate::syntax::{
    BinaryOp, CaseClause, Comment, ElseArm, Expr, ExprKind, IfStmt, Pos, ReturnStmt, SemanticInfo,
    SourceFile, Span, Stmt, SwitchStmt,
};

use super::ExclusionSet;

pub(super) struct FileScan<'a, 'x> {
    source: &'a SourceFile,
    info: &'a SemanticInfo,
    matcher: Matcher<'a>,
    excludes: &'x mut ExclusionSet,
}

impl<'a, 'x> FileScan<'a, 'x> {
    pub(super) fn new(
        source: &'a SourceFile,
        info: &'a SemanticInfo,
        excludes: &'x mut ExclusionSet,
    ) -> Self {
        Self {
            source,
            info,
            matcher: Matcher::new(&info.uses, &info.defs),
            excludes,
        }
    }

    pub(super) fn run(&mut self) {
        let source = self.source;
        self.visit_file(source);
        for comment in &source.comments {
            self.scan_comment(comment);
        }
    }

    fn add(&mut self, line: u32) {
        self.excludes.add(&self.source.path, line);
    }

    // ---- panics ------------------------------------------------------

    /// A call of the predeclared `panic`: the callee is a bare name with
    /// that text and no binding in either name map.
    fn is_panic_call(&self, expr: &Expr) -> bool {
        let ExprKind::Call { callee, .. } = &expr.kind else {
            return false;
        };
        let ExprKind::Name(text) = &callee.kind else {
            return false;
        };
        text == "panic"
            && !self.info.uses.contains_key(&callee.id)
            && !self.info.defs.contains_key(&callee.id)
    }

    // ---- error-guard branches ----------------------------------------

    /// Solve each branch of an if/else-if chain. `priors` holds the
    /// guards already known to be false when the chain position is
    /// reached.
    fn process_if(&mut self, stmt: &IfStmt, mut priors: Vec<Expr>) {
        let matcher = self.matcher;

        let mut solver = Solver::new(&matcher, Some(stmt.cond.clone()), priors.clone());
        solver.solve_true();
        self.process_outcomes(&solver, &stmt.then.stmts);

        match stmt.els.as_deref() {
            Some(ElseArm::Block(block)) => {
                let mut solver = Solver::new(&matcher, Some(stmt.cond.clone()), priors);
                solver.solve_false();
                self.process_outcomes(&solver, &block.stmts);
            }
            Some(ElseArm::If(nested)) => {
                priors.push(stmt.cond.clone());
                self.process_if(nested, priors);
            }
            None => {}
        }
    }

    /// Solve each clause of a tagless switch. A clause's guard is the
    /// disjunction of its expressions; earlier clauses accumulate as
    /// priors, and the default clause (held to last, wherever it appears)
    /// gets an absent guard with every other clause as prior.
    fn process_switch(&mut self, stmt: &SwitchStmt) {
        if stmt.tag.is_some() {
            return;
        }
        let matcher = self.matcher;
        let mut priors: Vec<Expr> = Vec::new();
        let mut default_clause: Option<&CaseClause> = None;

        for case in &stmt.cases {
            let Some(guard) = any_of(&case.guards) else {
                default_clause = Some(case);
                continue;
            };
            let mut solver = Solver::new(&matcher, Some(guard.clone()), priors.clone());
            solver.solve_true();
            self.process_outcomes(&solver, &case.body);
            priors.push(guard);
        }

        if let Some(case) = default_clause {
            let mut solver = Solver::new(&matcher, None, priors);
            solver.solve_true();
            self.process_outcomes(&solver, &case.body);
        }
    }

    /// For every pinned atom that compares an error against nil, work out
    /// whether this branch runs because the error is non-nil, and if so
    /// mark its error returns.
    fn process_outcomes(&mut self, solver: &Solver<'_, '_>, body: &[Stmt]) {
        for (atom, outcome) in solver.outcomes() {
            if outcome == Outcome::Unknown {
                continue;
            }
            let Some((sign, err_expr)) = self.error_comparison(atom) else {
                continue;
            };
            let non_nil = (sign == BinaryOp::Ne && outcome == Outcome::Match)
                || (sign == BinaryOp::Eq && outcome == Outcome::Inverse);
            if non_nil {
                self.mark_error_returns(body, err_expr);
                self.mark_wrapped_returns(body, err_expr);
            }
        }
    }

    /// Split an equality comparison between an error expression and nil
    /// into its sign and the error side, in either operand order.
    fn error_comparison<'e>(&self, expr: &'e Expr) -> Option<(BinaryOp, &'e Expr)> {
        let ExprKind::Binary { left, op, right } = &expr.kind else {
            return None;
        };
        if !matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
            return None;
        }
        if self.info.is_error(left) && self.info.is_nil(right) {
            return Some((*op, left));
        }
        if self.info.is_error(right) && self.info.is_nil(left) {
            return Some((*op, right));
        }
        None
    }

    /// Mark every return in the branch that is an error return for
    /// `target`.
    fn mark_error_returns(&mut self, body: &[Stmt], target: &Expr) {
        let mut lines = Vec::new();
        each_stmt(body, &mut |stmt| {
            if let Stmt::Return(ret) = stmt {
                if self.is_error_return(ret, target) {
                    lines.push(ret.span.start.line);
                }
            }
        });
        for line in lines {
            self.add(line);
        }
    }

    /// One-hop wrap propagation: a single-name assignment or declaration
    /// whose value is an error-typed call taking `target` as an argument
    /// re-targets the return scan at the new name.
    fn mark_wrapped_returns(&mut self, body: &[Stmt], target: &Expr) {
        let mut rebound: Vec<&Expr> = Vec::new();
        each_stmt(body, &mut |stmt| {
            let (name, value) = match stmt {
                Stmt::VarDecl(decl) if decl.names.len() == 1 && decl.values.len() == 1 => {
                    (&decl.names[0], &decl.values[0])
                }
                Stmt::Assign(assign) if assign.lhs.len() == 1 && assign.rhs.len() == 1 => {
                    (&assign.lhs[0], &assign.rhs[0])
                }
                _ => return,
            };
            if self.is_error_call(value, target) {
                rebound.push(name);
            }
        });
        for name in rebound {
            self.mark_error_returns(body, name);
        }
    }

    /// Whether `ret` returns the error held by `target`: either the
    /// target itself (with every earlier result zero), a call wrapping
    /// it, or a bare return whose enclosing function names `target` as
    /// its final result.
    fn is_error_return(&self, ret: &ReturnStmt, target: &Expr) -> bool {
        let Some((last, earlier)) = ret.results.split_last() else {
            return self.named_result_matches(ret, target);
        };
        if !self.info.is_error(last) {
            return false;
        }
        if !earlier.iter().all(|result| self.is_zero(result)) {
            return false;
        }
        self.matcher.matches(last, target) || self.is_error_call(last, target)
    }

    /// A bare return is an error return when the enclosing function
    /// declares named results and the last of them is `target`.
    fn named_result_matches(&self, ret: &ReturnStmt, target: &Expr) -> bool {
        let Some(func) = self
            .source
            .funcs
            .iter()
            .find(|func| func.span.contains(ret.span.start))
        else {
            return false;
        };
        let Some(field) = func.results.last() else {
            return false;
        };
        let Some(name) = field.names.last() else {
            return false;
        };
        self.matcher.matches(name, target)
    }

    /// An error-typed call with `target` among its arguments.
    fn is_error_call(&self, expr: &Expr, target: &Expr) -> bool {
        let ExprKind::Call { args, .. } = &expr.kind else {
            return false;
        };
        self.info.is_error(expr) && args.iter().any(|arg| self.matcher.matches(arg, target))
    }

    /// Whether an expression is its type's zero value: nil, a zero
    /// constant, or a composite literal whose elements are all zero.
    fn is_zero(&self, expr: &Expr) -> bool {
        let Some(attr) = self.info.type_of(expr) else {
            return false;
        };
        if attr.is_nil {
            return true;
        }
        if let Some(constant) = &attr.constant {
            return constant.is_zero();
        }
        if attr.is_value {
            if let ExprKind::Composite { elems, .. } = &expr.kind {
                return elems.iter().all(|elem| {
                    let value = match &elem.kind {
                        ExprKind::KeyValue { value, .. } => value,
                        _ => elem,
                    };
                    self.is_zero(value)
                });
            }
        }
        false
    }

    // ---- marker comments ---------------------------------------------

    /// Resolve a `notest` marker: every line from the comment to the end
    /// of its innermost enclosing scope (exclusive) is excluded. Case
    /// clauses extend one line further so the clause separator is
    /// covered. A comment with no enclosing scope contributes nothing.
    fn scan_comment(&mut self, comment: &Comment) {
        if !comment.is_marker() {
            return;
        }
        let Some(scope) = innermost_scope(self.source, comment.span.start) else {
            return;
        };
        let mut end_line = scope.span.end.line;
        if scope.is_case {
            end_line += 1;
        }
        for line in comment.span.start.line..end_line {
            self.add(line);
        }
    }
}

impl<'a> Visit<'a> for FileScan<'a, '_> {
    fn visit_if(&mut self, node: &'a IfStmt) {
        // Chains are also entered at every `else if` link by the walk
        // below; re-solving the tail with an empty prior list only adds
        // lines the full chain already added.
        self.process_if(node, Vec::new());
        visit::visit_if(self, node);
    }

    fn visit_stmt(&mut self, node: &'a Stmt) {
        if let Stmt::Switch(stmt) = node {
            self.process_switch(stmt);
        }
        visit::visit_stmt(self, node);
    }

    fn visit_expr(&mut self, node: &'a Expr) {
        if self.is_panic_call(node) {
            self.add(node.span.start.line);
        }
        visit::visit_expr(self, node);
    }
}

/// Depth-first statement iteration, entering nested blocks, branches,
/// clause bodies, loop clauses and labeled statements.
fn each_stmt<'a>(stmts: &'a [Stmt], f: &mut dyn FnMut(&'a Stmt)) {
    for stmt in stmts {
        each_one(stmt, f);
    }
}

fn each_one<'a>(stmt: &'a Stmt, f: &mut dyn FnMut(&'a Stmt)) {
    f(stmt);
    match stmt {
        Stmt::Block(block) => each_stmt(&block.stmts, f),
        Stmt::If(nested) => each_if(nested, f),
        Stmt::Switch(switch) => {
            for case in &switch.cases {
                each_stmt(&case.body, f);
            }
        }
        Stmt::TypeSwitch(switch) => {
            if let Some(init) = &switch.init {
                each_one(init, f);
            }
            each_one(&switch.subject, f);
            for case in &switch.cases {
                each_stmt(&case.body, f);
            }
        }
        Stmt::Select(select) => {
            for clause in &select.clauses {
                if let Some(comm) = &clause.comm {
                    each_one(comm, f);
                }
                each_stmt(&clause.body, f);
            }
        }
        Stmt::For(stmt) => {
            if let Some(init) = &stmt.init {
                each_one(init, f);
            }
            if let Some(post) = &stmt.post {
                each_one(post, f);
            }
            each_stmt(&stmt.body.stmts, f);
        }
        Stmt::Range(stmt) => each_stmt(&stmt.body.stmts, f),
        Stmt::Labeled(stmt) => each_one(&stmt.stmt, f),
        Stmt::Return(_)
        | Stmt::Assign(_)
        | Stmt::VarDecl(_)
        | Stmt::Expr(_)
        | Stmt::Go(_)
        | Stmt::Defer(_)
        | Stmt::Send(_)
        | Stmt::IncDec(_) => {}
    }
}

fn each_if<'a>(stmt: &'a IfStmt, f: &mut dyn FnMut(&'a Stmt)) {
    if let Some(init) = &stmt.init {
        each_one(init, f);
    }
    each_stmt(&stmt.then.stmts, f);
    match stmt.els.as_deref() {
        Some(ElseArm::Block(block)) => each_stmt(&block.stmts, f),
        Some(ElseArm::If(nested)) => each_if(nested, f),
        None => {}
    }
}

/// The innermost node whose span contains `pos`, recorded in depth-first
/// order so deeper nodes win.
fn innermost_scope(source: &SourceFile, pos: Pos) -> Option<ScopeHit> {
    let mut finder = ScopeFinder {
        pos,
        found: source.span.contains(pos).then_some(ScopeHit {
            span: source.span,
            is_case: false,
        }),
    };
    finder.visit_file(source);
    finder.found
}

#[derive(Debug, Clone, Copy)]
struct ScopeHit {
    span: Span,
    is_case: bool,
}

struct ScopeFinder {
    pos: Pos,
    found: Option<ScopeHit>,
}

impl ScopeFinder {
    fn record(&mut self, span: Span, is_case: bool) {
        if span.contains(self.pos) {
            self.found = Some(ScopeHit { span, is_case });
        }
    }
}

impl<'a> Visit<'a> for ScopeFinder {
    fn visit_func(&mut self, node: &'a crate::syntax::FuncDecl) {
        self.record(node.span, false);
        visit::visit_func(self, node);
    }

    fn visit_block(&mut self, node: &'a crate::syntax::Block) {
        self.record(node.span, false);
        visit::visit_block(self, node);
    }

    fn visit_stmt(&mut self, node: &'a Stmt) {
        self.record(node.span(), false);
        visit::visit_stmt(self, node);
    }

    fn visit_if(&mut self, node: &'a IfStmt) {
        self.record(node.span, false);
        visit::visit_if(self, node);
    }

    fn visit_case(&mut self, node: &'a CaseClause) {
        self.record(node.span, true);
        visit::visit_case(self, node);
    }

    // Select clauses are scopes too, but only case clauses get the
    // separator-line shift.
    fn visit_comm(&mut self, node: &'a crate::syntax::CommClause) {
        self.record(node.span, false);
        visit::visit_comm(self, node);
    }

    fn visit_expr(&mut self, node: &'a Expr) {
        self.record(node.span, false);
        visit::visit_expr(self, node);
    }
}
