//! Noyau : évaluation (pipeline réel)
//!
//! espaces retirés -> jetons (liste blanche) -> RPN -> Expr -> valeur
//!
//! Toute erreur, de grammaire ou de calcul, ressort en `ArgumentInvalide`
//! avec la cause dans le message.

use tracing::{debug, warn};

use super::erreurs::ErreurCalc;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{analyse, format_rpn};
use super::valeur::Valeur;

/// Garde-fou : longueur d’entrée (après retrait des espaces).
pub const LONGUEUR_MAX: usize = 1024;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
    /// Notation courte (^, √, n!) : c’est elle qui part dans l’historique.
    pub forme: String,
}

/// API publique : évalue une expression et retourne la valeur + la démarche.
pub fn eval_expression(expr_str: &str) -> Result<(Valeur, Demarche), ErreurCalc> {
    // 1) Espaces retirés (toutes positions : "2 3" == "23")
    let s: String = expr_str.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Err(ErreurCalc::invalide("Expression vide !"));
    }
    if s.chars().count() > LONGUEUR_MAX {
        return Err(ErreurCalc::invalide(format!(
            "Expression trop longue (max {LONGUEUR_MAX} caractères)"
        )));
    }

    // 2) Jetons + 3) RPN/AST : la grammaire est le seul contrôle de sûreté
    let (jetons, rpn, expr) = tokenize(&s)
        .and_then(|jetons| analyse(&jetons).map(|(rpn, expr)| (jetons, rpn, expr)))
        .map_err(|cause| {
            warn!(expression = %s, %cause, "expression refusée");
            ErreurCalc::invalide(format!("Expression invalide : {cause}"))
        })?;

    let d = Demarche {
        jetons: format_tokens(&jetons),
        rpn: format_rpn(&rpn),
        forme: expr.to_string(),
    };
    debug!(jetons = %d.jetons, rpn = %d.rpn, forme = %d.forme, "expression analysée");

    // 4) Évaluation
    let valeur = expr.evalue().map_err(|cause| {
        debug!(forme = %d.forme, %cause, "échec d'évaluation");
        ErreurCalc::invalide(format!("Erreur d'évaluation de l'expression : {cause}"))
    })?;

    Ok((valeur, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(s: &str) -> (Valeur, Demarche) {
        eval_expression(s).unwrap_or_else(|e| panic!("eval_expression({s:?}) erreur: {e}"))
    }

    fn err(s: &str) -> String {
        match eval_expression(s) {
            Ok((v, _)) => panic!("{s:?} aurait dû échouer, obtenu {v}"),
            Err(ErreurCalc::ArgumentInvalide(msg)) => msg,
            Err(autre) => panic!("{s:?} : genre d'erreur inattendu {autre:?}"),
        }
    }

    #[test]
    fn valeurs_de_base() {
        assert_eq!(ok("2 + 3 * 4").0, Valeur::from(14));
        assert_eq!(ok("√(100 - 36)").0, Valeur::from(8.0));
        assert_eq!(ok("5! / 10").0, Valeur::from(12.0));
        assert_eq!(ok("2^10").0, Valeur::from(1024));
        assert_eq!(ok("(10 + 5) / 3").0, Valeur::from(5.0));
        assert_eq!(ok("4! + 5*3").0, Valeur::from(39));
        assert_eq!(ok("√64").0, Valeur::from(8.0));
    }

    #[test]
    fn espaces_retires_partout() {
        assert_eq!(ok("1 000 + 1").0, Valeur::from(1001));
        assert_eq!(ok("  m a x ( 1 , 2 ) ").0, Valeur::from(2));
    }

    #[test]
    fn demarche_remplie() {
        let (_v, d) = ok("2 ** 10");
        assert_eq!(d.jetons, "2 ^ 10");
        assert_eq!(d.rpn, "2 10 ^");
        assert_eq!(d.forme, "2^10");
    }

    #[test]
    fn refus_de_surete() {
        for s in [
            "import os",
            "__import__('os')",
            "eval(1)",
            "globals()",
            "open(1)",
            "os.system(1)",
            "exec(2)",
        ] {
            let msg = err(s);
            assert!(msg.starts_with("Expression invalide"), "{s:?} => {msg}");
        }
    }

    #[test]
    fn erreurs_de_calcul_requalifiees() {
        assert!(err("1/0").contains("Division par zéro"));
        assert!(err("√(0-4)").contains("négatif"));
        assert!(err("(0-3)!").contains("négatif"));
        assert!(err("2.5!").contains("entiers"));
        assert!(err("10.0^400").contains("trop grand"));
    }

    #[test]
    fn entrees_vides_ou_trop_longues() {
        assert!(err("").contains("vide"));
        assert!(err("   ").contains("vide"));
        let long = "1+".repeat(LONGUEUR_MAX) + "1";
        assert!(err(&long).contains("trop longue"));
    }

    #[test]
    fn litteraux_hors_f64() {
        assert!(err("1e400").starts_with("Expression invalide"));

        // l’infini calculé reste affichable, et sa forme se relit
        let (v, d) = ok("1e308 * 10");
        assert_eq!(v.to_string(), "inf");
        assert_eq!(d.forme, "1e+308*10");
        assert_eq!(ok(&d.forme).0, v);
    }

    #[test]
    fn fonctions_autorisees() {
        assert_eq!(ok("abs(-3)").0, Valeur::from(3));
        assert_eq!(ok("round(2.5)").0, Valeur::from(2));
        assert_eq!(ok("round(2.675, 2)").0, Valeur::from(2.67));
        assert_eq!(ok("pow(2, 3)").0, Valeur::from(8));
        assert_eq!(ok("min(3, 1, 2)").0, Valeur::from(1));
        assert_eq!(ok("max(1, 2.5)").0, Valeur::from(2.5));
        assert_eq!(ok("factorial(6)").0, Valeur::from(720));
        assert_eq!(ok("sqrt(2)^2").0.en_f64().unwrap().round(), 2.0);
    }
}
