use std::fmt;

use crate::clause::Clause;

/// Where a premise clause originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Axiom(usize),
    Theorem(usize),
    Conclusion,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Axiom(i) => write!(f, "Premise, Axiom {}", i),
            Source::Theorem(i) => write!(f, "Premise, Theorem {}", i),
            Source::Conclusion => write!(f, "Conclusion"),
        }
    }
}

/// How a clause entered the proof trace: either it was one of the input
/// premises, or it was derived by resolving (and factoring) two earlier steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Premise(Source),
    Resolve(usize, usize),
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Justification::Premise(source) => write!(f, "{}", source),
            Justification::Resolve(i, j) => write!(f, "Resolve {}, {}", i, j),
        }
    }
}

/// One line of a proof trace: a derived clause plus how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    pub index: usize,
    pub clause: Clause,
    pub justification: Justification,
}

impl fmt::Display for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({})", self.index, self.clause, self.justification)
    }
}
