//! Structural expression equivalence and logical inversion.
//!
//! The matcher decides whether two expression trees denote the same
//! thing: same shape, same operators, and names resolving to the same
//! declaration. It is pure and never fails; anything outside the
//! comparable set simply compares unequal.

use std::collections::HashMap;

use crate::syntax::{
    BindingId, Expr, ExprKind, LitKind, NodeId, Span, UnaryOp,
};

/// Decides structural equivalence of expression trees using the
/// provider's name resolution.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    uses: &'a HashMap<NodeId, BindingId>,
    defs: &'a HashMap<NodeId, BindingId>,
}

impl<'a> Matcher<'a> {
    /// Create a matcher over the `uses` and `defs` maps of one file.
    #[must_use]
    pub const fn new(
        uses: &'a HashMap<NodeId, BindingId>,
        defs: &'a HashMap<NodeId, BindingId>,
    ) -> Self {
        Self { uses, defs }
    }

    /// Whether two optional expressions are equivalent. Absent matches
    /// only absent.
    #[must_use]
    pub fn matches_opt(&self, a: Option<&Expr>, b: Option<&Expr>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.matches(a, b),
            _ => false,
        }
    }

    /// Whether two expressions are equivalent.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn matches(&self, a: &Expr, b: &Expr) -> bool {
        if (a.is_bool_lit(true) && b.is_bool_lit(true))
            || (a.is_bool_lit(false) && b.is_bool_lit(false))
        {
            return true;
        }
        match (&a.kind, &b.kind) {
            (ExprKind::Name(_), ExprKind::Name(_)) => self.same_binding(a.id, b.id),
            (
                ExprKind::Select { recv: ar, field: af },
                ExprKind::Select { recv: br, field: bf },
            ) => self.matches(af, bf) && self.matches(ar, br),
            (
                ExprKind::Call {
                    callee: ac,
                    args: aa,
                    ellipsis: ae,
                },
                ExprKind::Call {
                    callee: bc,
                    args: ba,
                    ellipsis: be,
                },
            ) => self.matches(ac, bc) && self.matches_slice(aa, ba) && ae == be,
            (
                ExprKind::Literal { kind: ak, text: at },
                ExprKind::Literal { kind: bk, text: bt },
            ) => ak == bk && at == bt,
            (ExprKind::Paren(ai), ExprKind::Paren(bi)) => self.matches(ai, bi),
            (
                ExprKind::Index { base: ab, index: ai },
                ExprKind::Index { base: bb, index: bi },
            ) => self.matches(ab, bb) && self.matches(ai, bi),
            (
                ExprKind::Slice {
                    base: ab,
                    low: al,
                    high: ah,
                    max: am,
                    three_index: a3,
                },
                ExprKind::Slice {
                    base: bb,
                    low: bl,
                    high: bh,
                    max: bm,
                    three_index: b3,
                },
            ) => {
                self.matches(ab, bb)
                    && self.matches_opt(al.as_deref(), bl.as_deref())
                    && self.matches_opt(ah.as_deref(), bh.as_deref())
                    && self.matches_opt(am.as_deref(), bm.as_deref())
                    && a3 == b3
            }
            (
                ExprKind::TypeAssert { base: ab, ty: at },
                ExprKind::TypeAssert { base: bb, ty: bt },
            ) => self.matches(ab, bb) && self.matches_opt(at.as_deref(), bt.as_deref()),
            (ExprKind::Star(ai), ExprKind::Star(bi)) => self.matches(ai, bi),
            (
                ExprKind::Unary {
                    op: ao,
                    operand: ax,
                },
                ExprKind::Unary {
                    op: bo,
                    operand: bx,
                },
            ) => ao == bo && self.matches(ax, bx),
            (
                ExprKind::Binary {
                    left: al,
                    op: ao,
                    right: ar,
                },
                ExprKind::Binary {
                    left: bl,
                    op: bo,
                    right: br,
                },
            ) => ao == bo && self.matches(al, bl) && self.matches(ar, br),
            (ExprKind::Ellipsis(ae), ExprKind::Ellipsis(be)) => {
                self.matches_opt(ae.as_deref(), be.as_deref())
            }
            (
                ExprKind::Composite { ty: at, elems: ae },
                ExprKind::Composite { ty: bt, elems: be },
            ) => self.matches_opt(at.as_deref(), bt.as_deref()) && self.matches_slice(ae, be),
            (
                ExprKind::KeyValue { key: ak, value: av },
                ExprKind::KeyValue { key: bk, value: bv },
            ) => self.matches(ak, bk) && self.matches(av, bv),
            (
                ExprKind::ArrayType { elem: ae, len: al },
                ExprKind::ArrayType { elem: be, len: bl },
            ) => self.matches(ae, be) && self.matches_opt(al.as_deref(), bl.as_deref()),
            (
                ExprKind::MapType { key: ak, value: av },
                ExprKind::MapType { key: bk, value: bv },
            ) => self.matches(ak, bk) && self.matches(av, bv),
            (
                ExprKind::ChanType { value: av, dir: ad },
                ExprKind::ChanType { value: bv, dir: bd },
            ) => self.matches(av, bv) && ad == bd,
            // NonComparable never matches, not even itself; everything
            // else is a variant mismatch.
            _ => false,
        }
    }

    /// Whether two expression lists are pairwise equivalent.
    #[must_use]
    pub fn matches_slice(&self, a: &[Expr], b: &[Expr]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(ae, be)| self.matches(ae, be))
    }

    /// Two name nodes are the same iff both resolve to the same binding,
    /// no matter whether each side is a use or a def.
    fn same_binding(&self, a: NodeId, b: NodeId) -> bool {
        let use_a = self.uses.get(&a);
        let use_b = self.uses.get(&b);
        let def_a = self.defs.get(&a);
        let def_b = self.defs.get(&b);
        matches!((use_a, use_b), (Some(x), Some(y)) if x == y)
            || matches!((def_a, def_b), (Some(x), Some(y)) if x == y)
            || matches!((def_a, use_b), (Some(x), Some(y)) if x == y)
            || matches!((use_a, def_b), (Some(x), Some(y)) if x == y)
    }
}

/// Produce the logical negation of `expr`, staying within the expression
/// grammar.
///
/// Comparisons flip to their complementary operator, `!x` unwraps to
/// `x`, boolean literals swap, and everything else is wrapped in `!`
/// (with parentheses where precedence would otherwise change the
/// meaning). Reused sub-trees are cloned; clones keep their node ids, so
/// bindings and type attribution still resolve on them.
#[must_use]
pub fn invert(expr: &Expr) -> Expr {
    match &expr.kind {
        ExprKind::Binary { left, op, right } => match op.complement() {
            Some(complement) => Expr::synthetic(
                ExprKind::Binary {
                    left: left.clone(),
                    op: complement,
                    right: right.clone(),
                },
                expr.span,
            ),
            None => not(paren(expr.clone())),
        },
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => (**operand).clone(),
        ExprKind::Literal {
            kind: LitKind::Bool,
            text,
        } => bool_lit(text != "true", expr.span),
        ExprKind::Name(_) | ExprKind::Paren(_) => not(expr.clone()),
        _ => not(paren(expr.clone())),
    }
}

fn not(expr: Expr) -> Expr {
    let span = expr.span;
    Expr::synthetic(
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand: Box::new(expr),
        },
        span,
    )
}

fn paren(expr: Expr) -> Expr {
    let span = expr.span;
    Expr::synthetic(ExprKind::Paren(Box::new(expr)), span)
}

fn bool_lit(val: bool, span: Span) -> Expr {
    Expr::synthetic(
        ExprKind::Literal {
            kind: LitKind::Bool,
            text: if val { "true" } else { "false" }.to_string(),
        },
        span,
    )
}
