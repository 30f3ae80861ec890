use std::collections::HashSet;
use std::fmt;

use crate::term::{Substitution, Term};

/// A predicate application, possibly negated. The only building block of a [`Clause`](crate::clause::Clause).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub polarity: bool,
    pub predicate: String,
    pub args: Vec<Term>,
}

impl Literal {
    pub fn new(polarity: bool, predicate: impl Into<String>, args: Vec<Term>) -> Literal {
        Literal {
            polarity,
            predicate: predicate.into(),
            args,
        }
    }

    pub fn negate(&self) -> Literal {
        Literal {
            polarity: !self.polarity,
            predicate: self.predicate.clone(),
            args: self.args.clone(),
        }
    }

    /// Two literals are "complementary" if they have opposite polarity but the
    /// same predicate and arity, i.e. they are candidates for resolution.
    pub fn is_complementary_shape(&self, other: &Literal) -> bool {
        self.polarity != other.polarity
            && self.predicate == other.predicate
            && self.args.len() == other.args.len()
    }

    pub fn free_vars(&self, out: &mut HashSet<String>) {
        for arg in &self.args {
            arg.free_vars(out);
        }
    }

    pub fn apply(&self, subst: &Substitution) -> Literal {
        Literal {
            polarity: self.polarity,
            predicate: self.predicate.clone(),
            args: self.args.iter().map(|a| a.apply(subst)).collect(),
        }
    }

    pub fn rename(&self, from: &str, to: &str) -> Literal {
        Literal {
            polarity: self.polarity,
            predicate: self.predicate.clone(),
            args: self.args.iter().map(|a| a.rename(from, to)).collect(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "!")?;
        }
        write!(f, "{}", self.predicate)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complementary_shape_requires_opposite_polarity_and_matching_arity() {
        let p = Literal::new(true, "P", vec![Term::Var("x".to_string())]);
        let not_p = Literal::new(false, "P", vec![Term::Const("A".to_string())]);
        let q = Literal::new(false, "Q", vec![Term::Var("x".to_string())]);
        assert!(p.is_complementary_shape(&not_p));
        assert!(!p.is_complementary_shape(&q));
        assert!(!p.is_complementary_shape(&p));
    }

    #[test]
    fn display_formats_nullary_and_negated_literals() {
        let nullary = Literal::new(true, "Foo", vec![]);
        assert_eq!(nullary.to_string(), "Foo");
        let negated = Literal::new(false, "P", vec![Term::Const("A".to_string())]);
        assert_eq!(negated.to_string(), "!P(A)");
    }
}
