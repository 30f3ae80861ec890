use std::collections::{HashMap, HashSet};
use std::fmt;

/// A first-order term: a variable, a constant, or a function application.
///
/// Lexical class is fixed at construction time (lowercase-leading names are
/// variables or functions, uppercase/digit-leading names are constants) and
/// never reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Var(String),
    Const(String),
    Func(String, Vec<Term>),
}

/// A substitution maps variable names to terms. Applying one is always total:
/// substitutions built by the unifier are idempotent (`sigma . sigma == sigma`).
pub type Substitution = HashMap<String, Term>;

impl Term {
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Collects the free variable names occurring in this term.
    pub fn free_vars(&self, out: &mut HashSet<String>) {
        match self {
            Term::Var(name) => {
                out.insert(name.clone());
            }
            Term::Const(_) => {}
            Term::Func(_, args) => {
                for arg in args {
                    arg.free_vars(out);
                }
            }
        }
    }

    /// Whether `var` occurs anywhere inside this term (the unifier's occurs check).
    pub fn occurs(&self, var: &str) -> bool {
        match self {
            Term::Var(name) => name == var,
            Term::Const(_) => false,
            Term::Func(_, args) => args.iter().any(|a| a.occurs(var)),
        }
    }

    /// Applies a substitution recursively, replacing every bound variable.
    pub fn apply(&self, subst: &Substitution) -> Term {
        match self {
            Term::Var(name) => match subst.get(name) {
                Some(t) => t.apply(subst),
                None => self.clone(),
            },
            Term::Const(_) => self.clone(),
            Term::Func(name, args) => {
                Term::Func(name.clone(), args.iter().map(|a| a.apply(subst)).collect())
            }
        }
    }

    /// Renames every occurrence of variable `from` to `to`.
    pub fn rename(&self, from: &str, to: &str) -> Term {
        match self {
            Term::Var(name) if name == from => Term::Var(to.to_string()),
            Term::Var(_) | Term::Const(_) => self.clone(),
            Term::Func(name, args) => {
                Term::Func(name.clone(), args.iter().map(|a| a.rename(from, to)).collect())
            }
        }
    }

    /// Maximum nesting depth of function applications; 1 for a bare variable or constant.
    pub fn depth(&self) -> usize {
        match self {
            Term::Var(_) | Term::Const(_) => 1,
            Term::Func(_, args) => 1 + args.iter().map(|a| a.depth()).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) | Term::Const(name) => write!(f, "{}", name),
            Term::Func(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_vars_collects_nested_variables() {
        let t = Term::Func("f".to_string(), vec![Term::Var("x".to_string()), Term::Const("A".to_string())]);
        let mut out = HashSet::new();
        t.free_vars(&mut out);
        assert_eq!(out, HashSet::from(["x".to_string()]));
    }

    #[test]
    fn occurs_check_detects_self_reference() {
        let t = Term::Func("f".to_string(), vec![Term::Var("x".to_string())]);
        assert!(t.occurs("x"));
        assert!(!t.occurs("y"));
    }

    #[test]
    fn apply_substitutes_transitively() {
        let mut subst = Substitution::new();
        subst.insert("x".to_string(), Term::Var("y".to_string()));
        subst.insert("y".to_string(), Term::Const("A".to_string()));
        let t = Term::Var("x".to_string());
        assert_eq!(t.apply(&subst), Term::Const("A".to_string()));
    }

    #[test]
    fn depth_counts_nesting() {
        let flat = Term::Const("A".to_string());
        assert_eq!(flat.depth(), 1);
        let nested = Term::Func(
            "f".to_string(),
            vec![Term::Func("g".to_string(), vec![Term::Const("A".to_string())])],
        );
        assert_eq!(nested.depth(), 3);
    }
}
