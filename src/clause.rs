use std::collections::HashSet;
use std::fmt;

use crate::literal::Literal;
use crate::term::{Substitution, Term};

/// A disjunction of literals, implicitly universally closed over its variables.
/// The empty clause represents falsity (`⊥`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    /// Builds a clause from literals, sorting and deduplicating them.
    pub fn new(mut literals: Vec<Literal>) -> Clause {
        literals.sort();
        literals.dedup();
        Clause { literals }
    }

    pub fn empty() -> Clause {
        Clause { literals: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A clause is tautological if it contains both `L` and `!L` for some literal `L`.
    pub fn is_tautology(&self) -> bool {
        for lit in &self.literals {
            if lit.polarity {
                let negated = lit.negate();
                if self.literals.contains(&negated) {
                    return true;
                }
            }
        }
        false
    }

    pub fn free_vars(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        for lit in &self.literals {
            lit.free_vars(&mut out);
        }
        out
    }

    pub fn apply(&self, subst: &Substitution) -> Clause {
        Clause::new(self.literals.iter().map(|l| l.apply(subst)).collect())
    }

    /// Renames every free variable in this clause by appending `suffix`, so it
    /// shares no variable names with another clause. Used to standardize
    /// clauses apart before resolving them against each other.
    pub fn standardize_apart(&self, suffix: &str) -> Clause {
        let renames: Substitution = self
            .free_vars()
            .into_iter()
            .map(|v| (v.clone(), Term::Var(format!("{}_{}", v, suffix))))
            .collect();
        self.apply(&renames)
    }

    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    /// Whether `self` subsumes `other`: some substitution maps `self`'s
    /// literals into a subset of `other`'s literals.
    pub fn subsumes(&self, other: &Clause) -> bool {
        if self.literals.len() > other.literals.len() {
            return false;
        }
        subsumes_rec(&self.literals, other, &Substitution::new())
    }
}

fn subsumes_rec(remaining: &[Literal], target: &Clause, subst: &Substitution) -> bool {
    let Some((first, rest)) = remaining.split_first() else {
        return true;
    };
    let mapped = first.apply(subst);
    for candidate in &target.literals {
        if mapped.polarity != candidate.polarity || mapped.args.len() != candidate.args.len() {
            continue;
        }
        if mapped.predicate != candidate.predicate {
            continue;
        }
        if let Some(extended) = try_match(&mapped.args, &candidate.args, subst) {
            if subsumes_rec(rest, target, &extended) {
                return true;
            }
        }
    }
    false
}

/// One-directional matching (only variables on the left may bind), used by subsumption.
fn try_match(pattern: &[Term], target: &[Term], subst: &Substitution) -> Option<Substitution> {
    let mut result = subst.clone();
    for (p, t) in pattern.iter().zip(target.iter()) {
        if !match_term(p, t, &mut result) {
            return None;
        }
    }
    Some(result)
}

fn match_term(pattern: &Term, target: &Term, subst: &mut Substitution) -> bool {
    let pattern = pattern.apply(subst);
    match &pattern {
        Term::Var(name) => {
            if let Some(bound) = subst.get(name) {
                return bound == target;
            }
            subst.insert(name.clone(), target.clone());
            true
        }
        Term::Const(name) => matches!(target, Term::Const(t) if t == name),
        Term::Func(name, args) => match target {
            Term::Func(tname, targs) if tname == name && targs.len() == args.len() => {
                args.iter().zip(targs.iter()).all(|(a, t)| match_term(a, t, subst))
            }
            _ => false,
        },
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "\u{22a5}");
        }
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", lit)?;
        }
        Ok(())
    }
}
