use crate::literal::Literal;
use crate::term::{Substitution, Term};

/// Robinson-style most general unifier over terms, with an occurs check.
/// Returns `None` on failure; on success the returned substitution is
/// idempotent (`apply(sigma, apply(sigma, t)) == apply(sigma, t)`).
pub fn unify(a: &Term, b: &Term) -> Option<Substitution> {
    let mut subst = Substitution::new();
    if unify_into(a, b, &mut subst) {
        Some(subst)
    } else {
        None
    }
}

fn unify_into(a: &Term, b: &Term, subst: &mut Substitution) -> bool {
    let a = a.apply(subst);
    let b = b.apply(subst);
    match (&a, &b) {
        (Term::Var(x), Term::Var(y)) if x == y => true,
        (Term::Var(x), _) => bind(x, &b, subst),
        (_, Term::Var(y)) => bind(y, &a, subst),
        (Term::Const(x), Term::Const(y)) => x == y,
        (Term::Func(f, fargs), Term::Func(g, gargs)) => {
            if f != g || fargs.len() != gargs.len() {
                return false;
            }
            fargs.iter().zip(gargs.iter()).all(|(x, y)| unify_into(x, y, subst))
        }
        _ => false,
    }
}

fn bind(var: &str, term: &Term, subst: &mut Substitution) -> bool {
    if let Term::Var(other) = term {
        if other == var {
            return true;
        }
    }
    if term.occurs(var) {
        return false;
    }
    // Keep the substitution idempotent: push the new binding through every
    // existing entry before recording it.
    for bound in subst.values_mut() {
        *bound = bound.apply(&Substitution::from([(var.to_string(), term.clone())]));
    }
    subst.insert(var.to_string(), term.clone());
    true
}

/// Unifies two literals for resolution: polarities must be opposite and
/// predicate/arity must match, in addition to the arguments unifying.
pub fn unify_for_resolution(a: &Literal, b: &Literal) -> Option<Substitution> {
    if a.polarity == b.polarity || a.predicate != b.predicate || a.args.len() != b.args.len() {
        return None;
    }
    unify_literal_args(a, b)
}

/// Unifies two literals for factoring: same polarity and predicate/arity, ignoring sign.
pub fn unify_for_factoring(a: &Literal, b: &Literal) -> Option<Substitution> {
    if a.polarity != b.polarity || a.predicate != b.predicate || a.args.len() != b.args.len() {
        return None;
    }
    unify_literal_args(a, b)
}

fn unify_literal_args(a: &Literal, b: &Literal) -> Option<Substitution> {
    let mut subst = Substitution::new();
    for (x, y) in a.args.iter().zip(b.args.iter()) {
        if !unify_into(x, y, &mut subst) {
            return None;
        }
    }
    Some(subst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unifies_variable_with_constant() {
        let sigma = unify(&Term::Var("x".to_string()), &Term::Const("A".to_string())).unwrap();
        assert_eq!(sigma.get("x"), Some(&Term::Const("A".to_string())));
    }

    #[test]
    fn occurs_check_rejects_self_containing_term() {
        let x = Term::Var("x".to_string());
        let fx = Term::Func("f".to_string(), vec![x.clone()]);
        assert!(unify(&x, &fx).is_none());
    }

    #[test]
    fn unifies_nested_function_terms() {
        let left = Term::Func(
            "f".to_string(),
            vec![Term::Var("x".to_string()), Term::Const("A".to_string())],
        );
        let right = Term::Func(
            "f".to_string(),
            vec![Term::Const("B".to_string()), Term::Var("y".to_string())],
        );
        let sigma = unify(&left, &right).unwrap();
        assert_eq!(left.apply(&sigma), right.apply(&sigma));
    }

    #[test]
    fn fails_on_mismatched_function_symbol_or_arity() {
        let f1 = Term::Func("f".to_string(), vec![Term::Const("A".to_string())]);
        let f2 = Term::Func("g".to_string(), vec![Term::Const("A".to_string())]);
        assert!(unify(&f1, &f2).is_none());
        let f3 = Term::Func(
            "f".to_string(),
            vec![Term::Const("A".to_string()), Term::Const("B".to_string())],
        );
        assert!(unify(&f1, &f3).is_none());
    }

    #[test]
    fn survives_pathologically_nested_terms() {
        // Two structurally identical depth-8 `sk(sk(...))` wrappers, differing
        // only in the innermost leaf. Unification must recurse through all 8
        // levels to reach that leaf, then `apply` must walk the same 8 levels
        // again to substitute it back out, without blowing the stack.
        let mut left = Term::Var("x0".to_string());
        let mut right = Term::Const("Base".to_string());
        for _ in 0..8 {
            left = Term::Func("sk".to_string(), vec![left]);
            right = Term::Func("sk".to_string(), vec![right]);
        }
        let sigma = unify(&left, &right).expect("identically-shaped depth-8 terms should unify");
        assert_eq!(left.apply(&sigma), right);
    }

    #[test]
    fn resolution_unification_requires_opposite_polarity() {
        let p = Literal::new(true, "P", vec![Term::Var("x".to_string())]);
        let also_p = Literal::new(true, "P", vec![Term::Const("A".to_string())]);
        assert!(unify_for_resolution(&p, &also_p).is_none());
        let not_p = Literal::new(false, "P", vec![Term::Const("A".to_string())]);
        assert!(unify_for_resolution(&p, &not_p).is_some());
    }
}
