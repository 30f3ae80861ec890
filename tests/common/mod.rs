use folprover::engine::Budget;
use folprover::kb::{KnowledgeBase, ProveOutcome};
use folprover::parser::parse;
use folprover::ranker::IdentityRanker;

/// Parses and adds an axiom with no description, panicking on a malformed formula.
pub fn axiom(kb: &mut KnowledgeBase, formula: &str) -> usize {
    kb.add_axiom(parse(formula).expect("axiom should parse"), None)
}

/// Parses `formula` and attempts a proof against the default budget and the identity ranker.
pub fn prove(kb: &mut KnowledgeBase, formula: &str) -> ProveOutcome {
    kb.prove(parse(formula).expect("theorem should parse"), None, &Budget::default(), &IdentityRanker, false)
}

pub fn expect_proof(outcome: ProveOutcome) -> Vec<folprover::proof_step::ProofStep> {
    match outcome {
        ProveOutcome::Proof(trace) => trace,
        other => panic!("expected a proof, got {:?}", other),
    }
}
