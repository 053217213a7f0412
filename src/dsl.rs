use crate::ops::{AndOp, OrOp};
use crate::variable::{Variable, VariableKey};

/// Antecedent expression tree.
///
/// Built with [`Variable::is`] and the combinators below, e.g.
/// `hmb.is("yes").and(size.is("large"))`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(VariableKey, String),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn or(self, rhs: Expr) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(rhs);
                Expr::Or(exprs)
            },
            lhs => Expr::Or(vec![lhs, rhs]),
        }
    }

    pub fn and(self, rhs: Expr) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(rhs);
                Expr::And(exprs)
            },
            lhs => Expr::And(vec![lhs, rhs]),
        }
    }

    pub fn and2(self, rhs: Expr, rhs2: Expr) -> Self {
        self.and(rhs).and(rhs2)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Or(exprs.into_iter().collect())
    }

    /// Every `variable is label` leaf, left to right.
    pub fn propositions(&self) -> Vec<(VariableKey, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<(VariableKey, &'p str)>) {
            match expr {
                Expr::Is(var_key, term) => out.push((*var_key, term.as_str())),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
                Expr::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }

    pub(crate) fn has_empty_node(&self) -> bool {
        match self {
            Expr::Is(..) => false,
            Expr::And(exprs) | Expr::Or(exprs) => exprs.is_empty() || exprs.iter().any(Expr::has_empty_node),
            Expr::Not(expr) => expr.has_empty_node(),
        }
    }

    /// Degree to which the expression holds, given the degree of each leaf.
    pub fn firing_strength<D>(&self, degree_of: &D, and_op: AndOp, or_op: OrOp) -> f64
    where
        D: Fn(VariableKey, &str) -> f64,
    {
        match self {
            Expr::Is(var_key, term) => degree_of(*var_key, term.as_str()),
            Expr::And(exprs) => exprs
                .iter()
                .map(|e| e.firing_strength(degree_of, and_op, or_op))
                .fold(1., |acc, d| and_op.call(acc, d)),
            Expr::Or(exprs) => exprs
                .iter()
                .map(|e| e.firing_strength(degree_of, and_op, or_op))
                .fold(0., |acc, d| or_op.call(acc, d)),
            Expr::Not(expr) => 1. - expr.firing_strength(degree_of, and_op, or_op),
        }
    }
}

impl Variable {
    pub fn is(self, label: impl Into<String>) -> Expr {
        Expr::Is(self.0, label.into())
    }
}
