use crate::clausifier::clausify;
use crate::engine::{self, Budget, Outcome};
use crate::error::{Kind, KbError};
use crate::formula::Formula;
use crate::proof_step::{ProofStep, Source};
use crate::ranker::PremiseRanker;

/// One accepted axiom or proved theorem: its original formula, an optional
/// human description, and the clause set produced when it was clausified.
#[derive(Debug, Clone)]
pub struct KbEntry {
    pub index: usize,
    pub original_formula: Formula,
    pub description: Option<String>,
    pub clause_set: Vec<crate::clause::Clause>,
}

/// The result of a `prove` call. `ProofNotFound` from the error taxonomy is
/// split here into its two named reasons, mirroring `engine::Outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProveOutcome {
    Proof(Vec<ProofStep>),
    Saturated,
    BudgetExhausted,
}

/// The ordered, append-only store of axioms and proved theorems, and the
/// façade the interactive shell calls to register axioms and attempt proofs.
/// Owns the single Skolem-name counter shared across every clausification
/// this session performs, so Skolem symbols from different axioms and goals
/// never collide once their clause sets are merged into one premise set.
pub struct KnowledgeBase {
    axioms: Vec<KbEntry>,
    theorems: Vec<KbEntry>,
    skolem_counter: u64,
}

impl KnowledgeBase {
    pub fn new() -> KnowledgeBase {
        KnowledgeBase {
            axioms: Vec::new(),
            theorems: Vec::new(),
            skolem_counter: 0,
        }
    }

    /// Clausifies and appends `formula` as a new axiom. Clausification is
    /// total in this implementation, so this always succeeds.
    pub fn add_axiom(&mut self, formula: Formula, description: Option<String>) -> usize {
        let clause_set = clausify(&formula, &mut self.skolem_counter);
        let index = self.axioms.len();
        log::debug!(target: "kb::axiom", "accepted axiom {}: {}", index, formula);
        self.axioms.push(KbEntry { index, original_formula: formula, description, clause_set });
        index
    }

    /// Assembles the premise set (every axiom, plus ranker-selected theorem
    /// lemmas), clausifies the negated goal, and searches for a refutation.
    /// On success the goal is clausified again (this time un-negated) and
    /// appended to the theorem list so it can serve as a lemma later. When
    /// `verbose` is set, the premise-selection outcome is printed to stdout
    /// in addition to the `log::debug!` line, per the shell's `verbose`
    /// command (§6): this is user-requested diagnostic output, not a
    /// background log.
    pub fn prove(
        &mut self,
        goal: Formula,
        description: Option<String>,
        budget: &Budget,
        ranker: &dyn PremiseRanker,
        verbose: bool,
    ) -> ProveOutcome {
        let candidates: Vec<(usize, Option<String>)> =
            self.theorems.iter().map(|t| (t.index, t.description.clone())).collect();
        let selected = ranker.select(description.as_deref(), &candidates);
        log::debug!(target: "kb::prove", "ranker selected {} of {} lemmas", selected.len(), candidates.len());
        if verbose {
            println!("premise selection: {} of {} lemmas selected: {:?}", selected.len(), candidates.len(), selected);
        }

        let mut premises: Vec<(crate::clause::Clause, Source)> = Vec::new();
        for axiom in &self.axioms {
            for clause in &axiom.clause_set {
                premises.push((clause.clone(), Source::Axiom(axiom.index)));
            }
        }
        for &lemma_index in &selected {
            let theorem = &self.theorems[lemma_index];
            for clause in &theorem.clause_set {
                premises.push((clause.clone(), Source::Theorem(theorem.index)));
            }
        }

        let negated_goal = Formula::not(goal.clone());
        for clause in clausify(&negated_goal, &mut self.skolem_counter) {
            premises.push((clause, Source::Conclusion));
        }

        match engine::search(premises, budget) {
            Outcome::Proof(trace) => {
                let clause_set = clausify(&goal, &mut self.skolem_counter);
                let index = self.theorems.len();
                log::info!(target: "kb::prove", "proved theorem {}: {}", index, goal);
                self.theorems.push(KbEntry { index, original_formula: goal, description, clause_set });
                ProveOutcome::Proof(trace)
            }
            Outcome::Saturated => ProveOutcome::Saturated,
            Outcome::BudgetExhausted => ProveOutcome::BudgetExhausted,
        }
    }

    pub fn describe(&mut self, kind: Kind, index: usize, description: String) -> Result<(), KbError> {
        let list = self.list_mut(kind);
        let len = list.len();
        let entry = list.get_mut(index).ok_or(KbError::IndexOutOfRange { kind, index, len })?;
        entry.description = Some(description);
        Ok(())
    }

    pub fn list(&self, kind: Kind) -> &[KbEntry] {
        match kind {
            Kind::Axiom => &self.axioms,
            Kind::Theorem => &self.theorems,
        }
    }

    fn list_mut(&mut self, kind: Kind) -> &mut Vec<KbEntry> {
        match kind {
            Kind::Axiom => &mut self.axioms,
            Kind::Theorem => &mut self.theorems,
        }
    }

    pub fn get(&self, kind: Kind, index: usize) -> Result<&KbEntry, KbError> {
        self.list(kind)
            .get(index)
            .ok_or(KbError::IndexOutOfRange { kind, index, len: self.list(kind).len() })
    }
}

impl Default for KnowledgeBase {
    fn default() -> KnowledgeBase {
        KnowledgeBase::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::ranker::IdentityRanker;

    fn kb_with_modus_ponens() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.add_axiom(parse("forall x (P(x) -> Q(x))").unwrap(), None);
        kb.add_axiom(parse("P(a)").unwrap(), None);
        kb
    }

    #[test]
    fn proves_modus_ponens_and_records_the_theorem() {
        let mut kb = kb_with_modus_ponens();
        let goal = parse("Q(a)").unwrap();
        let outcome = kb.prove(goal, Some("Q holds for a".to_string()), &Budget::default(), &IdentityRanker, false);
        assert!(matches!(outcome, ProveOutcome::Proof(_)));
        assert_eq!(kb.list(Kind::Theorem).len(), 1);
    }

    #[test]
    fn reports_saturated_for_a_non_consequence() {
        let mut kb = KnowledgeBase::new();
        kb.add_axiom(parse("P(a)").unwrap(), None);
        let outcome = kb.prove(parse("Q(a)").unwrap(), None, &Budget::default(), &IdentityRanker, false);
        assert_eq!(outcome, ProveOutcome::Saturated);
        assert!(kb.list(Kind::Theorem).is_empty());
    }

    #[test]
    fn proved_theorem_is_usable_as_a_lemma_in_a_later_proof() {
        let mut kb = KnowledgeBase::new();
        kb.add_axiom(parse("forall x (P(x) -> Q(x))").unwrap(), None);
        kb.add_axiom(parse("P(a)").unwrap(), None);
        kb.prove(parse("Q(a)").unwrap(), None, &Budget::default(), &IdentityRanker, false);

        kb.add_axiom(parse("forall x (Q(x) -> R(x))").unwrap(), None);
        let outcome = kb.prove(parse("R(a)").unwrap(), None, &Budget::default(), &IdentityRanker, false);
        let trace = match outcome {
            ProveOutcome::Proof(trace) => trace,
            other => panic!("expected a proof, got {:?}", other),
        };
        assert!(trace.iter().any(|step| matches!(
            step.justification,
            crate::proof_step::Justification::Premise(Source::Theorem(0))
        )));
    }

    #[test]
    fn describe_on_an_out_of_range_index_fails_without_mutating_state() {
        let mut kb = kb_with_modus_ponens();
        let result = kb.describe(Kind::Axiom, 5, "oops".to_string());
        assert_eq!(result, Err(KbError::IndexOutOfRange { kind: Kind::Axiom, index: 5, len: 2 }));
        assert!(kb.list(Kind::Axiom).iter().all(|e| e.description.is_none()));
    }

    #[test]
    fn verbose_flag_does_not_change_the_proof_outcome() {
        let mut kb = kb_with_modus_ponens();
        let outcome = kb.prove(parse("Q(a)").unwrap(), None, &Budget::default(), &IdentityRanker, true);
        assert!(matches!(outcome, ProveOutcome::Proof(_)));
    }

    #[test]
    fn get_and_list_expose_stored_entries() {
        let kb = kb_with_modus_ponens();
        assert_eq!(kb.get(Kind::Axiom, 0).unwrap().index, 0);
        assert!(kb.get(Kind::Axiom, 9).is_err());
        assert_eq!(kb.list(Kind::Axiom).len(), 2);
    }
}
