use std::collections::HashSet;
use std::fmt;

use crate::term::Term;

/// A pre-clausal formula tree, produced by the parser and consumed by the clausifier.
/// Never appears inside a [`Literal`](crate::literal::Literal); only used between
/// parsing and clausification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// An atomic predicate application, unsigned (the clausifier attaches polarity).
    Atom(String, Vec<Term>),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Imp(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    ForAll(String, Box<Formula>),
    Exists(String, Box<Formula>),
}

impl Formula {
    pub fn not(f: Formula) -> Formula {
        Formula::Not(Box::new(f))
    }

    pub fn and(l: Formula, r: Formula) -> Formula {
        Formula::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Formula, r: Formula) -> Formula {
        Formula::Or(Box::new(l), Box::new(r))
    }

    pub fn imp(l: Formula, r: Formula) -> Formula {
        Formula::Imp(Box::new(l), Box::new(r))
    }

    pub fn iff(l: Formula, r: Formula) -> Formula {
        Formula::Iff(Box::new(l), Box::new(r))
    }

    pub fn forall(v: impl Into<String>, f: Formula) -> Formula {
        Formula::ForAll(v.into(), Box::new(f))
    }

    pub fn exists(v: impl Into<String>, f: Formula) -> Formula {
        Formula::Exists(v.into(), Box::new(f))
    }

    /// All variables occurring free in this formula (i.e. not bound by an
    /// enclosing `forall`/`exists` of the same name).
    pub fn free_vars(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        self.collect_free_vars(&HashSet::new(), &mut out);
        out
    }

    fn collect_free_vars(&self, bound: &HashSet<String>, out: &mut HashSet<String>) {
        match self {
            Formula::Atom(_, args) => {
                let mut vars = HashSet::new();
                for arg in args {
                    arg.free_vars(&mut vars);
                }
                for v in vars {
                    if !bound.contains(&v) {
                        out.insert(v);
                    }
                }
            }
            Formula::Not(f) => f.collect_free_vars(bound, out),
            Formula::And(l, r) | Formula::Or(l, r) | Formula::Imp(l, r) | Formula::Iff(l, r) => {
                l.collect_free_vars(bound, out);
                r.collect_free_vars(bound, out);
            }
            Formula::ForAll(v, f) | Formula::Exists(v, f) => {
                let mut bound = bound.clone();
                bound.insert(v.clone());
                f.collect_free_vars(&bound, out);
            }
        }
    }

}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(pred, args) => {
                write!(f, "{}", pred)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Formula::Not(inner) => write!(f, "!({})", inner),
            Formula::And(l, r) => write!(f, "({} & {})", l, r),
            Formula::Or(l, r) => write!(f, "({} | {})", l, r),
            Formula::Imp(l, r) => write!(f, "({} -> {})", l, r),
            Formula::Iff(l, r) => write!(f, "({} <-> {})", l, r),
            Formula::ForAll(v, body) => write!(f, "(forall {} {})", v, body),
            Formula::Exists(v, body) => write!(f, "(exists {} {})", v, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_vars_excludes_bound_variables() {
        let f = Formula::forall(
            "x",
            Formula::Atom("P".to_string(), vec![Term::Var("x".to_string()), Term::Var("y".to_string())]),
        );
        assert_eq!(f.free_vars(), HashSet::from(["y".to_string()]));
    }

    #[test]
    fn display_renders_infix_connectives() {
        let f = Formula::imp(
            Formula::Atom("P".to_string(), vec![Term::Var("x".to_string())]),
            Formula::Atom("Q".to_string(), vec![Term::Var("x".to_string())]),
        );
        assert_eq!(f.to_string(), "(P(x) -> Q(x))");
    }
}
