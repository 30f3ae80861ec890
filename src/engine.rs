use std::time::{Duration, Instant};

use crate::clause::Clause;
use crate::proof_step::{Justification, ProofStep, Source};
use crate::unifier::{unify_for_factoring, unify_for_resolution};

/// Resource bounds the saturation loop polls between given-clause iterations.
/// All four are independently configurable; the defaults are tuned so the
/// textbook scenarios in the specification finish in well under a second.
#[derive(Debug, Clone)]
pub struct Budget {
    pub max_resolvents: usize,
    pub max_processed: usize,
    pub max_literals_per_clause: usize,
    pub max_term_depth: usize,
    pub deadline: Option<Duration>,
}

impl Default for Budget {
    fn default() -> Budget {
        Budget {
            max_resolvents: 20_000,
            max_processed: 5_000,
            max_literals_per_clause: 48,
            max_term_depth: 24,
            deadline: Some(Duration::from_secs(5)),
        }
    }
}

/// The result of a saturation search. FOL is only semi-decidable, so failure
/// to find `⊥` is never reported as "disproved": `Saturated` means the clause
/// set closed under resolution without a contradiction, `BudgetExhausted`
/// means the caller's resource bound was hit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Proof(Vec<ProofStep>),
    Saturated,
    BudgetExhausted,
}

/// Runs the given-clause saturation loop over `premises` until it derives the
/// empty clause, saturates, or exhausts `budget`. Deterministic: given the
/// same premises (in the same order) and the same budget, repeated calls
/// produce byte-identical proof traces.
pub fn search(premises: Vec<(Clause, Source)>, budget: &Budget) -> Outcome {
    let start = Instant::now();
    let mut engine = Engine {
        steps: Vec::new(),
        processed: Vec::new(),
        unprocessed: Vec::new(),
        resolvent_count: 0,
    };

    for (clause, source) in premises {
        if let Some(proof) = engine.admit(clause, Justification::Premise(source), budget) {
            return Outcome::Proof(proof);
        }
        if engine.resolvent_count >= budget.max_resolvents {
            log::debug!(target: "engine::budget", "resolvent cap reached while loading premises");
            return Outcome::BudgetExhausted;
        }
    }

    loop {
        if engine.unprocessed.is_empty() {
            return Outcome::Saturated;
        }
        if engine.processed.len() >= budget.max_processed {
            log::debug!(target: "engine::budget", "processed-clause cap reached");
            return Outcome::BudgetExhausted;
        }
        if let Some(deadline) = budget.deadline {
            if start.elapsed() >= deadline {
                log::debug!(target: "engine::budget", "wall-clock deadline reached");
                return Outcome::BudgetExhausted;
            }
        }

        let given_idx = engine.pop_smallest();
        log::trace!(target: "engine::saturation", "given clause: {}", engine.steps[given_idx].clause);

        let mut candidates = engine.processed.clone();
        candidates.push(given_idx);

        for other_idx in candidates {
            for (clause, justification) in resolve_pair(&engine.steps, given_idx, other_idx) {
                if let Some(proof) = engine.admit(clause, justification, budget) {
                    return Outcome::Proof(proof);
                }
                if engine.resolvent_count >= budget.max_resolvents {
                    log::debug!(target: "engine::budget", "resolvent cap reached");
                    return Outcome::BudgetExhausted;
                }
            }
        }

        engine.processed.push(given_idx);
    }
}

struct Engine {
    steps: Vec<ProofStep>,
    processed: Vec<usize>,
    unprocessed: Vec<usize>,
    resolvent_count: usize,
}

impl Engine {
    /// Picks the smallest clause in `unprocessed` (fewest literals), ties
    /// broken by insertion order, and removes it from the pool.
    fn pop_smallest(&mut self) -> usize {
        let (pos, _) = self
            .unprocessed
            .iter()
            .enumerate()
            .min_by_key(|(_, &idx)| (self.steps[idx].clause.num_literals(), idx))
            .expect("unprocessed is non-empty");
        self.unprocessed.remove(pos)
    }

    fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.processed.iter().copied().chain(self.unprocessed.iter().copied())
    }

    /// Admits a clause produced either as an input premise or as a resolvent.
    /// Applies the resource bounds, the tautology and forward-subsumption
    /// filters, and the mandatory factoring pre-step; evicts clauses
    /// subsumed by the new one. Returns the proof trace if this clause is `⊥`.
    fn admit(&mut self, clause: Clause, justification: Justification, budget: &Budget) -> Option<Vec<ProofStep>> {
        if !matches!(justification, Justification::Premise(_)) {
            self.resolvent_count += 1;
        }
        if clause.is_tautology() {
            return None;
        }
        if clause.num_literals() > budget.max_literals_per_clause {
            return None;
        }
        let max_depth = clause
            .literals
            .iter()
            .flat_map(|l| l.args.iter())
            .map(|t| t.depth())
            .max()
            .unwrap_or(0);
        if max_depth > budget.max_term_depth {
            return None;
        }

        let idx = self.steps.len();
        let clause = clause.standardize_apart(&idx.to_string());

        if self.active_indices().any(|i| self.steps[i].clause.subsumes(&clause)) {
            return None;
        }

        self.steps.push(ProofStep { index: idx, clause: clause.clone(), justification });

        if clause.is_empty() {
            return Some(reconstruct_trace(&self.steps, idx));
        }

        self.unprocessed.retain(|&i| !clause.subsumes(&self.steps[i].clause));
        self.processed.retain(|&i| !clause.subsumes(&self.steps[i].clause));
        self.unprocessed.push(idx);

        for (factored, factor_justification) in factor(&self.steps, idx) {
            if let Some(proof) = self.admit(factored, factor_justification, budget) {
                return Some(proof);
            }
        }

        None
    }
}

/// Generates every resolvent obtainable from an opposite-polarity,
/// same-predicate/arity literal pair between `given_idx` and `other_idx`,
/// standardizing each clause's variables apart first. `other_idx` may equal
/// `given_idx`: resolving a clause against a variable-disjoint copy of itself
/// is legitimate and is how the search discovers self-contradictory axioms.
fn resolve_pair(steps: &[ProofStep], given_idx: usize, other_idx: usize) -> Vec<(Clause, Justification)> {
    let given = steps[given_idx].clause.standardize_apart(&format!("g{}", given_idx));
    let other = steps[other_idx].clause.standardize_apart(&format!("o{}", other_idx));

    let mut out = Vec::new();
    for (gi, g_lit) in given.literals.iter().enumerate() {
        for (oi, o_lit) in other.literals.iter().enumerate() {
            if let Some(sigma) = unify_for_resolution(g_lit, o_lit) {
                let mut literals = Vec::new();
                for (i, lit) in given.literals.iter().enumerate() {
                    if i != gi {
                        literals.push(lit.apply(&sigma));
                    }
                }
                for (i, lit) in other.literals.iter().enumerate() {
                    if i != oi {
                        literals.push(lit.apply(&sigma));
                    }
                }
                out.push((Clause::new(literals), Justification::Resolve(other_idx, given_idx)));
            }
        }
    }
    out
}

/// Unifies pairs of same-polarity literals within one clause to produce a
/// strictly shorter factored clause, mandated as a pre-admission step.
fn factor(steps: &[ProofStep], idx: usize) -> Vec<(Clause, Justification)> {
    let clause = &steps[idx].clause;
    let mut out = Vec::new();
    for i in 0..clause.literals.len() {
        for j in (i + 1)..clause.literals.len() {
            if let Some(sigma) = unify_for_factoring(&clause.literals[i], &clause.literals[j]) {
                let factored = Clause::new(clause.literals.iter().map(|l| l.apply(&sigma)).collect());
                if factored.num_literals() < clause.num_literals() {
                    out.push((factored, Justification::Resolve(idx, idx)));
                }
            }
        }
    }
    out
}

/// Walks backward from the empty clause keeping only its ancestors, so the
/// returned trace has no irrelevant derived clauses mixed in.
fn reconstruct_trace(steps: &[ProofStep], final_idx: usize) -> Vec<ProofStep> {
    let mut needed = vec![false; steps.len()];
    needed[final_idx] = true;
    let mut stack = vec![final_idx];
    while let Some(idx) = stack.pop() {
        if let Justification::Resolve(a, b) = steps[idx].justification {
            for ancestor in [a, b] {
                if !needed[ancestor] {
                    needed[ancestor] = true;
                    stack.push(ancestor);
                }
            }
        }
    }

    let mut kept: Vec<usize> = (0..steps.len()).filter(|&i| needed[i]).collect();
    kept.sort_unstable();
    let renumber: std::collections::HashMap<usize, usize> =
        kept.iter().enumerate().map(|(new, &old)| (old, new)).collect();

    kept.into_iter()
        .map(|old| {
            let step = &steps[old];
            let justification = match step.justification {
                Justification::Premise(source) => Justification::Premise(source),
                Justification::Resolve(a, b) => Justification::Resolve(renumber[&a], renumber[&b]),
            };
            ProofStep {
                index: renumber[&old],
                clause: step.clause.clone(),
                justification,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use crate::term::Term;

    fn lit(polarity: bool, pred: &str, args: Vec<Term>) -> Literal {
        Literal::new(polarity, pred, args)
    }

    #[test]
    fn finds_a_trivial_contradiction() {
        let p_a = Clause::new(vec![lit(true, "P", vec![Term::Const("A".to_string())])]);
        let not_p_a = Clause::new(vec![lit(false, "P", vec![Term::Const("A".to_string())])]);
        let premises = vec![(p_a, Source::Axiom(0)), (not_p_a, Source::Conclusion)];
        match search(premises, &Budget::default()) {
            Outcome::Proof(trace) => {
                assert!(trace.last().unwrap().clause.is_empty());
            }
            other => panic!("expected a proof, got {:?}", other),
        }
    }

    #[test]
    fn reports_saturated_when_premises_do_not_entail_the_goal() {
        let p_a = Clause::new(vec![lit(true, "P", vec![Term::Const("A".to_string())])]);
        let not_q_a = Clause::new(vec![lit(false, "Q", vec![Term::Const("A".to_string())])]);
        let premises = vec![(p_a, Source::Axiom(0)), (not_q_a, Source::Conclusion)];
        assert_eq!(search(premises, &Budget::default()), Outcome::Saturated);
    }

    #[test]
    fn modus_ponens_proof_has_expected_trace_length() {
        // forall x (P(x) -> Q(x)), P(a) |- Q(a). Three premises (axiom1, axiom2,
        // the negated goal) can only combine via two binary resolution steps, so
        // the shortest trace has one intermediate resolvent (Q(a)) before `⊥`.
        let axiom1 = Clause::new(vec![
            lit(false, "P", vec![Term::Var("x".to_string())]),
            lit(true, "Q", vec![Term::Var("x".to_string())]),
        ]);
        let axiom2 = Clause::new(vec![lit(true, "P", vec![Term::Const("a".to_string())])]);
        let negated_goal = Clause::new(vec![lit(false, "Q", vec![Term::Const("a".to_string())])]);
        let premises = vec![
            (axiom1, Source::Axiom(0)),
            (axiom2, Source::Axiom(1)),
            (negated_goal, Source::Conclusion),
        ];
        match search(premises, &Budget::default()) {
            Outcome::Proof(trace) => assert_eq!(trace.len(), 5),
            other => panic!("expected a proof, got {:?}", other),
        }
    }

    #[test]
    fn premise_loading_honors_the_resolvent_budget() {
        // P(x) | P(A) factors to P(A), which counts as a resolvent (engine.rs
        // admit()). With a zero-resolvent budget the cap must be hit while
        // still loading premises, before the second premise (which would
        // otherwise resolve against the factored clause to a trivial proof)
        // is ever reached.
        let factorable = Clause::new(vec![
            lit(true, "P", vec![Term::Var("x".to_string())]),
            lit(true, "P", vec![Term::Const("A".to_string())]),
        ]);
        let negated_goal = Clause::new(vec![lit(false, "P", vec![Term::Const("A".to_string())])]);
        let zero_resolvent_budget = Budget {
            max_resolvents: 0,
            max_processed: 48,
            max_literals_per_clause: 48,
            max_term_depth: 48,
            deadline: None,
        };
        let premises = vec![(factorable, Source::Axiom(0)), (negated_goal, Source::Conclusion)];
        assert_eq!(search(premises, &zero_resolvent_budget), Outcome::BudgetExhausted);
    }

    #[test]
    fn exhausts_budget_on_an_infinite_generator() {
        // forall x (P(x) -> P(f(x))), P(a) |- forall x P(x). The negated goal
        // Skolemizes to the ground literal !P(sk_0), which never unifies with
        // the ever-taller P(a), P(f(a)), P(f(f(a))), ... terms the axiom keeps
        // generating, so a small resolvent cap must cut the search off.
        let axiom = Clause::new(vec![
            lit(false, "P", vec![Term::Var("x".to_string())]),
            lit(true, "P", vec![Term::Func("f".to_string(), vec![Term::Var("x".to_string())])]),
        ]);
        let base_case = Clause::new(vec![lit(true, "P", vec![Term::Const("a".to_string())])]);
        let negated_goal = Clause::new(vec![lit(false, "P", vec![Term::Const("sk_0".to_string())])]);
        let tiny_budget = Budget {
            max_resolvents: 3,
            max_processed: 48,
            max_literals_per_clause: 48,
            max_term_depth: 48,
            deadline: None,
        };
        let premises = vec![
            (axiom, Source::Axiom(0)),
            (base_case, Source::Axiom(1)),
            (negated_goal, Source::Conclusion),
        ];
        assert_eq!(search(premises, &tiny_budget), Outcome::BudgetExhausted);
    }
}
