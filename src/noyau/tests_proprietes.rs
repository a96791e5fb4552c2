//! Tests de propriétés (proptest) : invariants de la calculatrice.
//!
//! - add/subtract inverses l’une de l’autre
//! - division par zéro toujours refusée
//! - √ : domaine + carré
//! - factorielle : domaine
//! - historique : +1 par succès, +0 par échec
//! - evaluate ne panique jamais, et la notation courte se ré-évalue à l’identique

use proptest::prelude::*;

use super::calculatrice::Calculatrice;
use super::erreurs::ErreurCalc;
use super::eval::eval_expression;

fn proche(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Expressions bien formées (petits entiers pour rester dans le domaine, réels en notation e).
fn expr_strategy() -> impl Strategy<Value = String> {
    let feuille = prop_oneof![
        (0u32..50).prop_map(|n| n.to_string()),
        (0u32..100, 1u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        (0u32..8).prop_map(|n| format!("{n}!")),
        (0u32..200).prop_map(|n| format!("√{n}")),
        // exposants : sous-normaux, grands, et au-delà de f64 (refusés)
        (1u32..10, -330i32..330).prop_map(|(m, k)| format!("{m}e{k}")),
    ];

    feuille.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")], inner.clone())
                .prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.clone().prop_map(|a| format!("({a})")),
            inner.clone().prop_map(|a| format!("-{a}")),
            (inner.clone(), 0u32..4).prop_map(|(a, n)| format!("({a})^{n}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("max({a}, {b})")),
            inner.clone().prop_map(|a| format!("abs({a})")),
        ]
    })
}

proptest! {
    #[test]
    fn add_puis_retrait(a in -1e12f64..1e12, b in -1e12f64..1e12) {
        let mut c = Calculatrice::new();
        let s = c.add(a, b);
        // l’arrondi de a + b se mesure à l’échelle du plus grand opérande
        let tolerance = 1e-9 * a.abs().max(b.abs()).max(1.0);
        prop_assert!((s - b - a).abs() <= tolerance);
        prop_assert!((c.subtract(s, b) - a).abs() <= tolerance);
        prop_assert_eq!(c.get_history().len(), 2);
    }

    #[test]
    fn division_par_zero_toujours(a in proptest::num::f64::ANY) {
        let mut c = Calculatrice::new();
        prop_assert_eq!(c.divide(a, 0.0), Err(ErreurCalc::DivisionParZero));
        prop_assert!(c.get_history().is_empty());
    }

    #[test]
    fn racine_negative_refusee(a in -1e12f64..-1e-12) {
        let mut c = Calculatrice::new();
        prop_assert!(matches!(c.sqrt(a), Err(ErreurCalc::ArgumentInvalide(_))));
    }

    #[test]
    fn racine_au_carre(a in 0f64..1e12) {
        let mut c = Calculatrice::new();
        let r = c.sqrt(a).unwrap();
        prop_assert!(r >= 0.0);
        prop_assert!(proche(r * r, a));
    }

    #[test]
    fn factorielle_hors_domaine(n in -1000i64..0, frac in 0.01f64..0.99) {
        let mut c = Calculatrice::new();
        prop_assert!(matches!(c.factorial(n as f64), Err(ErreurCalc::ArgumentInvalide(_))));
        prop_assert!(matches!(c.factorial(-(n as f64) + frac), Err(ErreurCalc::ArgumentInvalide(_))));
        prop_assert!(c.get_history().is_empty());
    }

    #[test]
    fn historique_compte_les_succes(ops in proptest::collection::vec((0u8..5, -50f64..50.0, -5f64..5.0), 0..40)) {
        let mut c = Calculatrice::new();
        for (op, a, b) in ops {
            let avant = c.get_history().len();
            let succes = match op {
                0 => { c.add(a, b); true }
                1 => c.divide(a, b.trunc()).is_ok(),
                2 => c.sqrt(b).is_ok(),
                3 => c.factorial(b).is_ok(),
                _ => c.power(a, b).is_ok(),
            };
            let attendu = if succes { avant + 1 } else { avant };
            prop_assert_eq!(c.get_history().len(), attendu);
        }
        c.clear_history();
        prop_assert_eq!(c.get_history().len(), 0);
    }

    #[test]
    fn evaluate_ne_panique_jamais(s in "[0-9+*/^().!√,a-z -]{0,40}") {
        let mut c = Calculatrice::new();
        let avant = c.get_history().len();
        match c.evaluate(&s) {
            Ok(_) => prop_assert_eq!(c.get_history().len(), avant + 1),
            Err(e) => {
                prop_assert!(matches!(e, ErreurCalc::ArgumentInvalide(_)));
                prop_assert_eq!(c.get_history().len(), avant);
            }
        }
    }

    #[test]
    fn notation_courte_stable(s in expr_strategy()) {
        if let Ok((v1, d1)) = eval_expression(&s) {
            let (v2, d2) = eval_expression(&d1.forme)
                .unwrap_or_else(|e| panic!("forme {:?} (de {s:?}) refusée : {e}", d1.forme));
            prop_assert_eq!(&d2.forme, &d1.forme);
            match (v1.en_f64(), v2.en_f64()) {
                (Ok(x), Ok(y)) if x.is_nan() => prop_assert!(y.is_nan()),
                (Ok(x), Ok(y)) if x.is_infinite() => prop_assert_eq!(x, y),
                (Ok(x), Ok(y)) => prop_assert!(proche(x, y), "{} != {}", x, y),
                _ => prop_assert_eq!(v1, v2),
            }
        }
    }
}
