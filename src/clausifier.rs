use std::collections::HashMap;

use crate::clause::Clause;
use crate::formula::Formula;
use crate::literal::Literal;
use crate::term::{Substitution, Term};

/// Rewrites a formula into an equisatisfiable set of clauses, following the
/// fixed rewrite order from the specification: implication/biconditional
/// removal, negation normal form, alpha-renaming, Skolemization, dropping the
/// universal prefix, and CNF distribution.
///
/// `skolem_counter` is shared across every call made during a single proof
/// (axioms and the negated goal alike) so that Skolem symbols introduced by
/// different formulas never collide; see DESIGN.md for why this counter must
/// not reset per call the way the bound-variable renaming counter does.
pub fn clausify(formula: &Formula, skolem_counter: &mut u64) -> Vec<Clause> {
    let no_iff_imp = eliminate_iff_imp(formula);
    let in_nnf = nnf(&no_iff_imp);
    let renamed = alpha_rename(&in_nnf);
    let mut outer_universals: Vec<String> = renamed.free_vars().into_iter().collect();
    outer_universals.sort();
    let skolemized = skolemize(&renamed, &outer_universals, skolem_counter);
    let quantifier_free = strip_foralls(&skolemized);
    let cnf = distribute(&quantifier_free);
    split_into_clauses(&cnf)
}

fn eliminate_iff_imp(f: &Formula) -> Formula {
    match f {
        Formula::Atom(..) => f.clone(),
        Formula::Not(inner) => Formula::not(eliminate_iff_imp(inner)),
        Formula::And(l, r) => Formula::and(eliminate_iff_imp(l), eliminate_iff_imp(r)),
        Formula::Or(l, r) => Formula::or(eliminate_iff_imp(l), eliminate_iff_imp(r)),
        Formula::Imp(l, r) => {
            Formula::or(Formula::not(eliminate_iff_imp(l)), eliminate_iff_imp(r))
        }
        Formula::Iff(l, r) => {
            let l = eliminate_iff_imp(l);
            let r = eliminate_iff_imp(r);
            Formula::and(
                Formula::or(Formula::not(l.clone()), r.clone()),
                Formula::or(l, Formula::not(r)),
            )
        }
        Formula::ForAll(v, body) => Formula::forall(v.clone(), eliminate_iff_imp(body)),
        Formula::Exists(v, body) => Formula::exists(v.clone(), eliminate_iff_imp(body)),
    }
}

/// Pushes negation down to the literals. Assumes implications/biconditionals
/// have already been eliminated.
fn nnf(f: &Formula) -> Formula {
    match f {
        Formula::Atom(..) => f.clone(),
        Formula::Not(inner) => nnf_negated(inner),
        Formula::And(l, r) => Formula::and(nnf(l), nnf(r)),
        Formula::Or(l, r) => Formula::or(nnf(l), nnf(r)),
        Formula::ForAll(v, body) => Formula::forall(v.clone(), nnf(body)),
        Formula::Exists(v, body) => Formula::exists(v.clone(), nnf(body)),
        Formula::Imp(..) | Formula::Iff(..) => unreachable!("implications already eliminated"),
    }
}

fn nnf_negated(f: &Formula) -> Formula {
    match f {
        Formula::Atom(..) => Formula::not(f.clone()),
        Formula::Not(inner) => nnf(inner),
        Formula::And(l, r) => Formula::or(nnf_negated(l), nnf_negated(r)),
        Formula::Or(l, r) => Formula::and(nnf_negated(l), nnf_negated(r)),
        Formula::ForAll(v, body) => Formula::exists(v.clone(), nnf_negated(body)),
        Formula::Exists(v, body) => Formula::forall(v.clone(), nnf_negated(body)),
        Formula::Imp(..) | Formula::Iff(..) => unreachable!("implications already eliminated"),
    }
}

/// Renames every bound variable to a fresh, globally unique name so no two
/// quantifiers (or a quantifier and a free variable) share a name.
fn alpha_rename(f: &Formula) -> Formula {
    let mut counter = 0u64;
    rename_rec(f, &HashMap::new(), &mut counter)
}

fn rename_rec(f: &Formula, scope: &HashMap<String, String>, counter: &mut u64) -> Formula {
    match f {
        Formula::Atom(pred, args) => {
            Formula::Atom(pred.clone(), args.iter().map(|a| apply_scope(a, scope)).collect())
        }
        Formula::Not(inner) => Formula::not(rename_rec(inner, scope, counter)),
        Formula::And(l, r) => Formula::and(rename_rec(l, scope, counter), rename_rec(r, scope, counter)),
        Formula::Or(l, r) => Formula::or(rename_rec(l, scope, counter), rename_rec(r, scope, counter)),
        Formula::ForAll(v, body) => {
            let fresh = format!("V{}", *counter);
            *counter += 1;
            let mut inner_scope = scope.clone();
            inner_scope.insert(v.clone(), fresh.clone());
            Formula::forall(fresh, rename_rec(body, &inner_scope, counter))
        }
        Formula::Exists(v, body) => {
            let fresh = format!("V{}", *counter);
            *counter += 1;
            let mut inner_scope = scope.clone();
            inner_scope.insert(v.clone(), fresh.clone());
            Formula::exists(fresh, rename_rec(body, &inner_scope, counter))
        }
        Formula::Imp(..) | Formula::Iff(..) => unreachable!("implications already eliminated"),
    }
}

fn apply_scope(t: &Term, scope: &HashMap<String, String>) -> Term {
    match t {
        Term::Var(name) => Term::Var(scope.get(name).cloned().unwrap_or_else(|| name.clone())),
        Term::Const(_) => t.clone(),
        Term::Func(name, args) => Term::Func(name.clone(), args.iter().map(|a| apply_scope(a, scope)).collect()),
    }
}

/// Replaces each existential variable by a fresh Skolem function of the
/// universals enclosing it (a constant when there are none), then drops the
/// existential. `universals` is extended as we descend through `ForAll` nodes;
/// it starts out as the formula's free variables, which are implicitly
/// universal at the outermost scope.
fn skolemize(f: &Formula, universals: &[String], skolem_counter: &mut u64) -> Formula {
    match f {
        Formula::Atom(..) => f.clone(),
        Formula::Not(inner) => Formula::not(skolemize(inner, universals, skolem_counter)),
        Formula::And(l, r) => Formula::and(
            skolemize(l, universals, skolem_counter),
            skolemize(r, universals, skolem_counter),
        ),
        Formula::Or(l, r) => Formula::or(
            skolemize(l, universals, skolem_counter),
            skolemize(r, universals, skolem_counter),
        ),
        Formula::ForAll(v, body) => {
            let mut extended = universals.to_vec();
            extended.push(v.clone());
            Formula::forall(v.clone(), skolemize(body, &extended, skolem_counter))
        }
        Formula::Exists(v, body) => {
            let skolem_term = if universals.is_empty() {
                Term::Const(format!("sk_{}", *skolem_counter))
            } else {
                Term::Func(
                    format!("sk_{}", *skolem_counter),
                    universals.iter().map(|u| Term::Var(u.clone())).collect(),
                )
            };
            *skolem_counter += 1;
            let subst = Substitution::from([(v.clone(), skolem_term)]);
            let substituted = substitute_formula(body, &subst);
            skolemize(&substituted, universals, skolem_counter)
        }
        Formula::Imp(..) | Formula::Iff(..) => unreachable!("implications already eliminated"),
    }
}

fn substitute_formula(f: &Formula, subst: &Substitution) -> Formula {
    match f {
        Formula::Atom(pred, args) => {
            Formula::Atom(pred.clone(), args.iter().map(|a| a.apply(subst)).collect())
        }
        Formula::Not(inner) => Formula::not(substitute_formula(inner, subst)),
        Formula::And(l, r) => Formula::and(substitute_formula(l, subst), substitute_formula(r, subst)),
        Formula::Or(l, r) => Formula::or(substitute_formula(l, subst), substitute_formula(r, subst)),
        Formula::ForAll(v, body) => Formula::forall(v.clone(), substitute_formula(body, subst)),
        Formula::Exists(v, body) => Formula::exists(v.clone(), substitute_formula(body, subst)),
        Formula::Imp(..) | Formula::Iff(..) => unreachable!("implications already eliminated"),
    }
}

/// Drops the now-vacuous universal prefix: every remaining free variable is
/// implicitly universally closed at the clause level.
fn strip_foralls(f: &Formula) -> Formula {
    match f {
        Formula::Atom(..) => f.clone(),
        Formula::Not(inner) => Formula::not(strip_foralls(inner)),
        Formula::And(l, r) => Formula::and(strip_foralls(l), strip_foralls(r)),
        Formula::Or(l, r) => Formula::or(strip_foralls(l), strip_foralls(r)),
        Formula::ForAll(_, body) => strip_foralls(body),
        Formula::Exists(_, body) => strip_foralls(body),
        Formula::Imp(..) | Formula::Iff(..) => unreachable!("implications already eliminated"),
    }
}

/// Applies `A | (B & C) == (A|B) & (A|C)` until the formula is a conjunction
/// of disjunctions of literals.
fn distribute(f: &Formula) -> Formula {
    match f {
        Formula::Atom(..) | Formula::Not(_) => f.clone(),
        Formula::And(l, r) => Formula::and(distribute(l), distribute(r)),
        Formula::Or(l, r) => distribute_or(distribute(l), distribute(r)),
        Formula::ForAll(..) | Formula::Exists(..) | Formula::Imp(..) | Formula::Iff(..) => {
            unreachable!("quantifiers and implications already eliminated")
        }
    }
}

fn distribute_or(l: Formula, r: Formula) -> Formula {
    match (l, r) {
        (Formula::And(a, b), r) => Formula::and(distribute_or(*a, r.clone()), distribute_or(*b, r)),
        (l, Formula::And(a, b)) => Formula::and(distribute_or(l.clone(), *a), distribute_or(l, *b)),
        (l, r) => Formula::or(l, r),
    }
}

fn collect_conjuncts(f: &Formula, out: &mut Vec<Formula>) {
    match f {
        Formula::And(l, r) => {
            collect_conjuncts(l, out);
            collect_conjuncts(r, out);
        }
        other => out.push(other.clone()),
    }
}

fn collect_literals(f: &Formula, out: &mut Vec<Literal>) {
    match f {
        Formula::Atom(pred, args) => out.push(Literal::new(true, pred.clone(), args.clone())),
        Formula::Not(inner) => match inner.as_ref() {
            Formula::Atom(pred, args) => out.push(Literal::new(false, pred.clone(), args.clone())),
            _ => unreachable!("negation normal form guarantees Not wraps only atoms"),
        },
        Formula::Or(l, r) => {
            collect_literals(l, out);
            collect_literals(r, out);
        }
        _ => unreachable!("CNF distribution guarantees only And/Or/Not(Atom)/Atom remain"),
    }
}

fn split_into_clauses(f: &Formula) -> Vec<Clause> {
    let mut conjuncts = Vec::new();
    collect_conjuncts(f, &mut conjuncts);
    conjuncts
        .into_iter()
        .filter_map(|conjunct| {
            let mut literals = Vec::new();
            collect_literals(&conjunct, &mut literals);
            let clause = Clause::new(literals);
            if clause.is_tautology() {
                None
            } else {
                Some(clause)
            }
        })
        .collect()
}
