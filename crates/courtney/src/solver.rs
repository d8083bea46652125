//! Boolean condition solver.
//!
//! Given a branch guard and the guards already known to be false when the
//! branch is reached, the solver classifies every atomic sub-term of the
//! combined proposition: must it be true (`Match`), must it be false
//! (`Inverse`), or is it unconstrained (`Unknown`)? A proposition with no
//! satisfying assignment at all is flagged impossible.
//!
//! The combined proposition is decomposed through `&&`, `||`, `!` and
//! parentheses; comparisons and any other leaf expression are atoms.
//! Repeated occurrences of the same atom (or of its inversion) are
//! deduplicated through the [`Matcher`] so that every occurrence
//! contributes to the same truth variable. Solving enumerates all `2^k`
//! assignments of the `k` atoms; this is intentional, as real guard
//! conditions rarely hold more than a handful of distinct atoms.

use crate::matcher::{invert, Matcher};
use crate::syntax::{BinaryOp, Expr, ExprKind, Span, UnaryOp};

/// Classification of one atom over all satisfying assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The atom is true in every satisfying assignment.
    Match,
    /// The atom is false in every satisfying assignment.
    Inverse,
    /// The atom takes both values across satisfying assignments.
    Unknown,
}

/// The combined proposition compiled to truth-variable leaves.
///
/// Compiling during atomisation means evaluation cannot meet an
/// unregistered atom; that invariant is structural rather than checked.
#[derive(Debug)]
enum Prop {
    And(Box<Prop>, Box<Prop>),
    Or(Box<Prop>, Box<Prop>),
    Not(Box<Prop>),
    Leaf { atom: usize, inverted: bool },
    Lit(bool),
}

/// Solves one branch guard against its prior falsity context.
#[derive(Debug)]
pub struct Solver<'m, 'a> {
    matcher: &'m Matcher<'a>,
    positive: Option<Expr>,
    priors: Vec<Expr>,
    atoms: Vec<Expr>,
    results: Vec<(bool, bool)>, // (match, inverse) bits per atom
    impossible: bool,
}

impl<'m, 'a> Solver<'m, 'a> {
    /// Create a solver for the guard `positive` (absent for a default
    /// clause) with `priors` known to be false on entry.
    #[must_use]
    pub fn new(matcher: &'m Matcher<'a>, positive: Option<Expr>, priors: Vec<Expr>) -> Self {
        Self {
            matcher,
            positive,
            priors,
            atoms: Vec::new(),
            results: Vec::new(),
            impossible: false,
        }
    }

    /// Solve with the guard as given, for the branch taken when it holds.
    pub fn solve_true(&mut self) {
        self.solve(false);
    }

    /// Solve with the guard negated, for the else branch.
    pub fn solve_false(&mut self) {
        self.solve(true);
    }

    /// Whether no satisfying assignment exists.
    #[must_use]
    pub const fn impossible(&self) -> bool {
        self.impossible
    }

    /// The classification of every distinct atom. Empty until one of the
    /// solve methods has run, and empty for a vacuous proposition.
    pub fn outcomes(&self) -> impl Iterator<Item = (&Expr, Outcome)> {
        self.atoms.iter().zip(&self.results).map(|(atom, bits)| {
            let outcome = match bits {
                (true, false) => Outcome::Match,
                (false, true) => Outcome::Inverse,
                _ => Outcome::Unknown,
            };
            (atom, outcome)
        })
    }

    fn solve(&mut self, invert_positive: bool) {
        let Some(full) = self.combined(invert_positive) else {
            // No guard and no priors: vacuously satisfiable, no atoms.
            return;
        };
        let prop = self.register(&full);

        // Start from both-constrained and clear bits as satisfying
        // assignments rule them out.
        self.results = vec![(true, true); self.atoms.len()];

        let count = self.atoms.len();
        let mut satisfiable = false;
        for assignment in 0u64..(1u64 << count) {
            if !Self::eval(&prop, assignment) {
                continue;
            }
            satisfiable = true;
            for (bit, result) in self.results.iter_mut().enumerate() {
                if assignment & (1 << bit) != 0 {
                    result.1 = false; // atom can be true, so not Inverse
                } else {
                    result.0 = false; // atom can be false, so not Match
                }
            }
        }

        if !satisfiable {
            for result in &mut self.results {
                *result = (false, false);
            }
            self.impossible = true;
        }
    }

    /// Combine the guard with the negation of every prior:
    /// `(P ∧ ¬Q1 ∧ … ∧ ¬Qn)`, or `(¬Q1 ∧ … ∧ ¬Qn)` when the guard is
    /// absent. An absent guard ignores the solve direction.
    fn combined(&self, invert_positive: bool) -> Option<Expr> {
        let mut out = match &self.positive {
            Some(p) if invert_positive => Some(invert(p)),
            Some(p) => Some(p.clone()),
            None => None,
        };
        for prior in &self.priors {
            let negated = invert(prior);
            out = Some(match out {
                Some(left) => and(left, negated),
                None => negated,
            });
        }
        out
    }

    /// Decompose the proposition, registering atoms as they appear.
    fn register(&mut self, expr: &Expr) -> Prop {
        match &expr.kind {
            ExprKind::Binary {
                left,
                op: BinaryOp::And,
                right,
            } => Prop::And(
                Box::new(self.register(left)),
                Box::new(self.register(right)),
            ),
            ExprKind::Binary {
                left,
                op: BinaryOp::Or,
                right,
            } => Prop::Or(
                Box::new(self.register(left)),
                Box::new(self.register(right)),
            ),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => Prop::Not(Box::new(self.register(operand))),
            ExprKind::Paren(inner) => self.register(inner),
            _ if expr.is_bool_lit(true) => Prop::Lit(true),
            _ if expr.is_bool_lit(false) => Prop::Lit(false),
            // Comparisons and every other leaf are atomic.
            _ => self.leaf(expr),
        }
    }

    /// Map an occurrence onto an existing atom (directly or as its
    /// inversion), or register a new one.
    fn leaf(&mut self, expr: &Expr) -> Prop {
        for (i, atom) in self.atoms.iter().enumerate() {
            if self.matcher.matches(atom, expr) {
                return Prop::Leaf {
                    atom: i,
                    inverted: false,
                };
            }
            if self.matcher.matches(&invert(atom), expr) {
                return Prop::Leaf {
                    atom: i,
                    inverted: true,
                };
            }
        }
        self.atoms.push(expr.clone());
        Prop::Leaf {
            atom: self.atoms.len() - 1,
            inverted: false,
        }
    }

    fn eval(prop: &Prop, assignment: u64) -> bool {
        match prop {
            Prop::And(left, right) => Self::eval(left, assignment) && Self::eval(right, assignment),
            Prop::Or(left, right) => Self::eval(left, assignment) || Self::eval(right, assignment),
            Prop::Not(inner) => !Self::eval(inner, assignment),
            Prop::Leaf { atom, inverted } => {
                let value = assignment & (1 << atom) != 0;
                value != *inverted
            }
            Prop::Lit(value) => *value,
        }
    }
}

fn and(left: Expr, right: Expr) -> Expr {
    let span = Span::new(left.span.start, right.span.end);
    Expr::synthetic(
        ExprKind::Binary {
            left: Box::new(left),
            op: BinaryOp::And,
            right: Box::new(right),
        },
        span,
    )
}

/// Combine guard expressions into a single disjunction, the proposition a
/// case clause's guard list denotes. Returns `None` for an empty list
/// (the default clause).
#[must_use]
pub fn any_of(guards: &[Expr]) -> Option<Expr> {
    let mut iter = guards.iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |acc, guard| {
        let span = Span::new(acc.span.start, guard.span.end);
        Expr::synthetic(
            ExprKind::Binary {
                left: Box::new(acc),
                op: BinaryOp::Or,
                right: Box::new(guard.clone()),
            },
            span,
        )
    }))
}
