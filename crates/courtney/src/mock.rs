//! In-memory syntax fixtures and a mock provider.
//!
//! Real runs get their trees from a host-side provider; tests (and hosts
//! testing their own integration) build them here instead. [`Builder`]
//! hands out node ids, keeps the binding and type maps consistent, and
//! offers shorthand for the shapes that come up constantly in fixtures
//! (error-typed names, nil literals, comparisons). [`MockProvider`]
//! serves pre-built packages through the [`AstProvider`] interface.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::driver::{AstProvider, FileAst, PackageAst, PackageSpec};
use crate::result::{CourtneyError, CourtneyResult};
use crate::syntax::{
    AssignOp, AssignStmt, BinaryOp, BindingId, Block, CaseClause, Comment, CommClause, ConstValue,
    DeferStmt, ElseArm, Expr, ExprKind, ExprStmt, Field, ForStmt, FuncDecl, GoStmt, IfStmt,
    IncDecOp, IncDecStmt, LabeledStmt, LitKind, NodeId, Pos, RangeStmt, ReturnStmt, SelectStmt,
    SemanticInfo, SendStmt, SourceFile, Span, Stmt, SwitchStmt, TypeAttr, TypeSwitchStmt, UnaryOp,
    VarDecl, ERROR_TYPE_NAME, ERROR_TYPE_UNDERLYING,
};

/// Builds expression and statement fixtures with consistent semantic
/// maps.
#[derive(Debug, Default)]
pub struct Builder {
    next_node: u32,
    next_binding: u32,
    next_col: u32,
    info: SemanticInfo,
}

impl Builder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_node: 0,
            next_binding: 0,
            next_col: 0,
            info: SemanticInfo::new(),
        }
    }

    /// A snapshot of the semantic maps built so far.
    #[must_use]
    pub fn info(&self) -> SemanticInfo {
        self.info.clone()
    }

    /// Consume the builder, yielding the semantic maps.
    #[must_use]
    pub fn into_info(self) -> SemanticInfo {
        self.info
    }

    /// Allocate a fresh binding.
    pub fn binding(&mut self) -> BindingId {
        self.next_binding += 1;
        BindingId::new(self.next_binding)
    }

    fn node(&mut self) -> NodeId {
        self.next_node += 1;
        NodeId::new(self.next_node)
    }

    fn expr_span(&mut self, line: u32) -> Span {
        self.next_col += 2;
        Span::new(Pos::new(line, self.next_col), Pos::new(line, self.next_col + 1))
    }

    fn expr(&mut self, kind: ExprKind, line: u32) -> Expr {
        Expr {
            id: self.node(),
            span: self.expr_span(line),
            kind,
        }
    }

    /// A span from explicit coordinates.
    #[must_use]
    pub const fn span(l1: u32, c1: u32, l2: u32, c2: u32) -> Span {
        Span::new(Pos::new(l1, c1), Pos::new(l2, c2))
    }

    // ---- names -------------------------------------------------------

    /// An unbound name (e.g. a predeclared builtin).
    pub fn name(&mut self, text: &str, line: u32) -> Expr {
        self.expr(ExprKind::Name(text.to_string()), line)
    }

    /// A name referencing an existing declaration.
    pub fn use_name(&mut self, text: &str, binding: BindingId, line: u32) -> Expr {
        let expr = self.name(text, line);
        self.info.uses.insert(expr.id, binding);
        expr
    }

    /// A name introducing a declaration.
    pub fn def_name(&mut self, text: &str, binding: BindingId, line: u32) -> Expr {
        let expr = self.name(text, line);
        self.info.defs.insert(expr.id, binding);
        expr
    }

    /// An error-typed use of a name, the everyday `err`.
    pub fn err_use(&mut self, text: &str, binding: BindingId, line: u32) -> Expr {
        let expr = self.use_name(text, binding, line);
        self.mark_error(&expr);
        expr
    }

    /// An error-typed definition of a name.
    pub fn err_def(&mut self, text: &str, binding: BindingId, line: u32) -> Expr {
        let expr = self.def_name(text, binding, line);
        self.mark_error(&expr);
        expr
    }

    // ---- literals ----------------------------------------------------

    /// A literal of the given kind and source text.
    pub fn lit(&mut self, kind: LitKind, text: &str, line: u32) -> Expr {
        self.expr(
            ExprKind::Literal {
                kind,
                text: text.to_string(),
            },
            line,
        )
    }

    /// An integer literal.
    pub fn int_lit(&mut self, text: &str, line: u32) -> Expr {
        self.lit(LitKind::Int, text, line)
    }

    /// A boolean literal.
    pub fn bool_lit(&mut self, val: bool, line: u32) -> Expr {
        self.lit(LitKind::Bool, if val { "true" } else { "false" }, line)
    }

    /// The nil literal, attributed as nil.
    pub fn nil_lit(&mut self, line: u32) -> Expr {
        let expr = self.lit(LitKind::Nil, "nil", line);
        self.info.types.insert(
            expr.id,
            TypeAttr {
                is_nil: true,
                is_value: true,
                ..TypeAttr::default()
            },
        );
        expr
    }

    /// An integer literal carrying its constant sign.
    pub fn const_int(&mut self, text: &str, sign: i8, line: u32) -> Expr {
        let expr = self.int_lit(text, line);
        self.attr(
            &expr,
            TypeAttr {
                name: "int".to_string(),
                underlying: "int".to_string(),
                is_value: true,
                constant: Some(ConstValue::Int(sign)),
                ..TypeAttr::default()
            },
        );
        expr
    }

    /// A string literal carrying its constant value.
    pub fn const_str(&mut self, value: &str, line: u32) -> Expr {
        let expr = self.lit(LitKind::Str, &format!("{value:?}"), line);
        self.attr(
            &expr,
            TypeAttr {
                name: "string".to_string(),
                underlying: "string".to_string(),
                is_value: true,
                constant: Some(ConstValue::Str(value.to_string())),
                ..TypeAttr::default()
            },
        );
        expr
    }

    // ---- compound expressions ----------------------------------------

    /// A binary operation spanning its operands.
    pub fn binary(&mut self, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        let span = Span::new(left.span.start, right.span.end);
        Expr {
            id: self.node(),
            span,
            kind: ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
        }
    }

    /// `err != nil` for an error-typed use of `binding`.
    pub fn err_not_nil(&mut self, text: &str, binding: BindingId, line: u32) -> Expr {
        let err = self.err_use(text, binding, line);
        let nil = self.nil_lit(line);
        self.binary(err, BinaryOp::Ne, nil)
    }

    /// `err == nil` for an error-typed use of `binding`.
    pub fn err_is_nil(&mut self, text: &str, binding: BindingId, line: u32) -> Expr {
        let err = self.err_use(text, binding, line);
        let nil = self.nil_lit(line);
        self.binary(err, BinaryOp::Eq, nil)
    }

    /// Logical negation.
    pub fn not(&mut self, operand: Expr) -> Expr {
        let span = operand.span;
        Expr {
            id: self.node(),
            span,
            kind: ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
        }
    }

    /// A parenthesised expression.
    pub fn paren(&mut self, inner: Expr) -> Expr {
        let span = inner.span;
        Expr {
            id: self.node(),
            span,
            kind: ExprKind::Paren(Box::new(inner)),
        }
    }

    /// A call expression.
    pub fn call(&mut self, callee: Expr, args: Vec<Expr>, line: u32) -> Expr {
        self.expr(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
                ellipsis: false,
            },
            line,
        )
    }

    /// A call with a spread final argument.
    pub fn call_spread(&mut self, callee: Expr, args: Vec<Expr>, line: u32) -> Expr {
        self.expr(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
                ellipsis: true,
            },
            line,
        )
    }

    /// An error-typed call, the everyday `wrap(err)`.
    pub fn err_call(&mut self, callee: Expr, args: Vec<Expr>, line: u32) -> Expr {
        let expr = self.call(callee, args, line);
        self.mark_error(&expr);
        expr
    }

    /// A composite literal, attributed as a value.
    pub fn composite(&mut self, ty: Option<Expr>, elems: Vec<Expr>, line: u32) -> Expr {
        let expr = self.expr(
            ExprKind::Composite {
                ty: ty.map(Box::new),
                elems,
            },
            line,
        );
        self.attr(
            &expr,
            TypeAttr {
                is_value: true,
                ..TypeAttr::default()
            },
        );
        expr
    }

    /// A `key: value` element.
    pub fn key_value(&mut self, key: Expr, value: Expr, line: u32) -> Expr {
        self.expr(
            ExprKind::KeyValue {
                key: Box::new(key),
                value: Box::new(value),
            },
            line,
        )
    }

    /// A type assertion; no asserted type gives the `x.(type)` form.
    pub fn type_assert(&mut self, base: Expr, ty: Option<Expr>, line: u32) -> Expr {
        self.expr(
            ExprKind::TypeAssert {
                base: Box::new(base),
                ty: ty.map(Box::new),
            },
            line,
        )
    }

    /// A non-comparable expression (e.g. a function literal).
    pub fn non_comparable(&mut self, line: u32) -> Expr {
        self.expr(ExprKind::NonComparable, line)
    }

    // ---- attribution -------------------------------------------------

    /// Attach arbitrary type attribution to an expression.
    pub fn attr(&mut self, expr: &Expr, attr: TypeAttr) {
        self.info.types.insert(expr.id, attr);
    }

    /// Attribute an expression with the predeclared error interface type.
    pub fn mark_error(&mut self, expr: &Expr) {
        self.attr(
            expr,
            TypeAttr {
                name: ERROR_TYPE_NAME.to_string(),
                underlying: ERROR_TYPE_UNDERLYING.to_string(),
                is_value: true,
                ..TypeAttr::default()
            },
        );
    }

    // ---- statements and files ----------------------------------------

    /// A return statement.
    pub fn ret(&self, line: u32, results: Vec<Expr>) -> Stmt {
        Stmt::Return(ReturnStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            results,
        })
    }

    /// An assignment or short declaration.
    pub fn assign(&self, line: u32, op: AssignOp, lhs: Vec<Expr>, rhs: Vec<Expr>) -> Stmt {
        Stmt::Assign(AssignStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            lhs,
            rhs,
            op,
        })
    }

    /// A `var` declaration statement.
    pub fn var_decl(
        &self,
        line: u32,
        names: Vec<Expr>,
        ty: Option<Expr>,
        values: Vec<Expr>,
    ) -> Stmt {
        Stmt::VarDecl(VarDecl {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            names,
            ty,
            values,
        })
    }

    /// An expression statement.
    pub fn expr_stmt(&self, line: u32, expr: Expr) -> Stmt {
        Stmt::Expr(ExprStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            expr,
        })
    }

    /// A block with an explicit span.
    #[must_use]
    pub fn block(&self, span: Span, stmts: Vec<Stmt>) -> Block {
        Block { span, stmts }
    }

    /// A block spanning whole lines, opening brace on `start_line` and
    /// closing brace on `end_line`.
    #[must_use]
    pub fn block_lines(&self, start_line: u32, end_line: u32, stmts: Vec<Stmt>) -> Block {
        self.block(Self::span(start_line, 1, end_line, 1), stmts)
    }

    /// An `if` statement.
    #[must_use]
    pub fn if_stmt(&self, span: Span, cond: Expr, then: Block, els: Option<ElseArm>) -> Stmt {
        Stmt::If(self.if_raw(span, None, cond, then, els))
    }

    /// An `if` statement with an init clause.
    #[must_use]
    pub fn if_with_init(
        &self,
        span: Span,
        init: Stmt,
        cond: Expr,
        then: Block,
        els: Option<ElseArm>,
    ) -> Stmt {
        Stmt::If(self.if_raw(span, Some(init), cond, then, els))
    }

    /// The bare [`IfStmt`], for building `else if` chains.
    #[must_use]
    pub fn if_raw(
        &self,
        span: Span,
        init: Option<Stmt>,
        cond: Expr,
        then: Block,
        els: Option<ElseArm>,
    ) -> IfStmt {
        IfStmt {
            span,
            init: init.map(Box::new),
            cond,
            then,
            els: els.map(Box::new),
        }
    }

    /// A case clause; empty guards make it the default.
    #[must_use]
    pub fn case(&self, span: Span, guards: Vec<Expr>, body: Vec<Stmt>) -> CaseClause {
        CaseClause { span, guards, body }
    }

    /// A tagless switch.
    #[must_use]
    pub fn switch(&self, span: Span, cases: Vec<CaseClause>) -> Stmt {
        Stmt::Switch(SwitchStmt {
            span,
            tag: None,
            cases,
        })
    }

    /// A type switch.
    #[must_use]
    pub fn type_switch(
        &self,
        span: Span,
        init: Option<Stmt>,
        subject: Stmt,
        cases: Vec<CaseClause>,
    ) -> Stmt {
        Stmt::TypeSwitch(TypeSwitchStmt {
            span,
            init: init.map(Box::new),
            subject: Box::new(subject),
            cases,
        })
    }

    /// A `select` statement.
    #[must_use]
    pub fn select(&self, span: Span, clauses: Vec<CommClause>) -> Stmt {
        Stmt::Select(SelectStmt { span, clauses })
    }

    /// A select clause; no communication statement makes it the default.
    #[must_use]
    pub fn comm(&self, span: Span, comm: Option<Stmt>, body: Vec<Stmt>) -> CommClause {
        CommClause {
            span,
            comm: comm.map(Box::new),
            body,
        }
    }

    /// A three-clause or condition-only loop.
    #[must_use]
    pub fn for_stmt(
        &self,
        span: Span,
        init: Option<Stmt>,
        cond: Option<Expr>,
        post: Option<Stmt>,
        body: Block,
    ) -> Stmt {
        Stmt::For(ForStmt {
            span,
            init: init.map(Box::new),
            cond,
            post: post.map(Box::new),
            body,
        })
    }

    /// A `range` loop.
    #[must_use]
    pub fn range_stmt(
        &self,
        span: Span,
        key: Option<Expr>,
        value: Option<Expr>,
        expr: Expr,
        body: Block,
    ) -> Stmt {
        Stmt::Range(RangeStmt {
            span,
            key,
            value,
            expr,
            body,
        })
    }

    /// A `go` statement.
    pub fn go_stmt(&self, line: u32, call: Expr) -> Stmt {
        Stmt::Go(GoStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            call,
        })
    }

    /// A `defer` statement.
    pub fn defer_stmt(&self, line: u32, call: Expr) -> Stmt {
        Stmt::Defer(DeferStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            call,
        })
    }

    /// A labeled statement.
    #[must_use]
    pub fn labeled(&self, span: Span, label: &str, stmt: Stmt) -> Stmt {
        Stmt::Labeled(LabeledStmt {
            span,
            label: label.to_string(),
            stmt: Box::new(stmt),
        })
    }

    /// A channel send.
    pub fn send(&self, line: u32, chan: Expr, value: Expr) -> Stmt {
        Stmt::Send(SendStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            chan,
            value,
        })
    }

    /// An increment or decrement.
    pub fn inc_dec(&self, line: u32, expr: Expr, op: IncDecOp) -> Stmt {
        Stmt::IncDec(IncDecStmt {
            span: Span::new(Pos::new(line, 2), Pos::new(line, 3)),
            expr,
            op,
        })
    }

    /// A result field.
    #[must_use]
    pub fn field(&self, names: Vec<Expr>, ty: Option<Expr>) -> Field {
        Field { names, ty }
    }

    /// A function declaration.
    #[must_use]
    pub fn func(&self, name: &str, span: Span, results: Vec<Field>, body: Block) -> FuncDecl {
        FuncDecl {
            span,
            name: name.to_string(),
            results,
            body,
        }
    }

    /// A line comment at an explicit position; `text` is the body after
    /// the comment marker.
    #[must_use]
    pub fn comment(&self, line: u32, col: u32, text: &str) -> Comment {
        Comment {
            span: Span::new(Pos::new(line, col), Pos::new(line, col + 2 + text.len() as u32)),
            text: text.to_string(),
        }
    }

    /// A source file.
    #[must_use]
    pub fn file(
        &self,
        path: impl Into<PathBuf>,
        span: Span,
        funcs: Vec<FuncDecl>,
        comments: Vec<Comment>,
    ) -> SourceFile {
        SourceFile {
            path: path.into(),
            span,
            funcs,
            comments,
        }
    }
}

/// Serves pre-built packages through [`AstProvider`].
#[derive(Debug, Default)]
pub struct MockProvider {
    packages: HashMap<String, PackageAst>,
}

impl MockProvider {
    /// Create a provider with no packages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package.
    #[must_use]
    pub fn with_package(mut self, package: PackageAst) -> Self {
        self.packages.insert(package.path.clone(), package);
        self
    }

    /// Register a single-file package.
    #[must_use]
    pub fn with_file(self, package_path: &str, source: SourceFile, info: SemanticInfo) -> Self {
        self.with_package(PackageAst {
            path: package_path.to_string(),
            files: vec![FileAst { source, info }],
        })
    }
}

impl AstProvider for MockProvider {
    fn load(&self, packages: &[PackageSpec]) -> CourtneyResult<Vec<PackageAst>> {
        packages
            .iter()
            .map(|spec| {
                self.packages.get(&spec.path).cloned().ok_or_else(|| {
                    CourtneyError::provider(spec.path.clone(), "package not registered")
                })
            })
            .collect()
    }
}
