//! Semantic attribution supplied by the provider.
//!
//! The syntax trees themselves carry no name resolution or type
//! information; everything semantic lives in maps keyed by [`NodeId`].
//! Two maps resolve names (`uses` for references to existing
//! declarations, `defs` for names that introduce one) and a third
//! attaches type attribution to arbitrary expressions. A name appears in
//! `uses` or `defs`, never both. Predeclared builtins (notably `panic`)
//! appear in neither; their absence is how the analysis recognises them.

use std::collections::HashMap;

use super::expr::{BindingId, Expr, NodeId};

/// The canonical type name of the predeclared error interface.
pub const ERROR_TYPE_NAME: &str = "error";

/// The underlying shape of the predeclared error interface.
pub const ERROR_TYPE_UNDERLYING: &str = "interface{Error() string}";

/// A constant value, reduced to what zero-detection needs: booleans and
/// strings verbatim, numeric kinds by sign only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstValue {
    /// A boolean constant.
    Bool(bool),
    /// A string constant.
    Str(String),
    /// An integer constant, by sign (-1, 0, 1).
    Int(i8),
    /// A floating-point constant, by sign.
    Float(i8),
    /// A complex constant, by sign (zero iff both parts are zero).
    Complex(i8),
}

impl ConstValue {
    /// Whether the constant is the zero value of its kind: `false`, the
    /// empty string, or a numeric constant of sign zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::Str(s) => s.is_empty(),
            Self::Int(sign) | Self::Float(sign) | Self::Complex(sign) => *sign == 0,
        }
    }
}

/// Type attribution for one expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeAttr {
    /// Canonical type name, e.g. `error` or `int`.
    pub name: String,
    /// Underlying type as a canonical string, e.g.
    /// `interface{Error() string}`.
    pub underlying: String,
    /// Whether the expression is the predeclared `nil`.
    pub is_nil: bool,
    /// Whether the expression denotes a run-time value rather than a type.
    pub is_value: bool,
    /// Constant value, if the expression is constant.
    pub constant: Option<ConstValue>,
}

impl TypeAttr {
    /// Whether this attribution names the predeclared error interface.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.name == ERROR_TYPE_NAME && self.underlying == ERROR_TYPE_UNDERLYING
    }
}

/// Name resolution and type attribution for one file.
#[derive(Debug, Clone, Default)]
pub struct SemanticInfo {
    /// Name nodes that reference an existing declaration.
    pub uses: HashMap<NodeId, BindingId>,
    /// Name nodes that introduce a declaration.
    pub defs: HashMap<NodeId, BindingId>,
    /// Type attribution per expression node.
    pub types: HashMap<NodeId, TypeAttr>,
}

impl SemanticInfo {
    /// Create an empty map set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type attribution for an expression, if the provider supplied any.
    #[must_use]
    pub fn type_of(&self, expr: &Expr) -> Option<&TypeAttr> {
        self.types.get(&expr.id)
    }

    /// Whether the expression has the predeclared error interface type.
    #[must_use]
    pub fn is_error(&self, expr: &Expr) -> bool {
        self.type_of(expr).is_some_and(TypeAttr::is_error)
    }

    /// Whether the expression is the predeclared `nil`.
    #[must_use]
    pub fn is_nil(&self, expr: &Expr) -> bool {
        self.type_of(expr).is_some_and(|attr| attr.is_nil)
    }
}
