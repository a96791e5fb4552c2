//! Calculatrice : opérations directes + évaluation d’expressions + historique.
//!
//! Contrats :
//! - Une opération réussie ajoute exactement UNE entrée d’historique.
//! - Une opération échouée n’ajoute rien.
//! - L’historique est en ajout seul ; seul `clear_history` le vide.

use num_bigint::BigInt;
use tracing::{debug, info};

use super::erreurs::ErreurCalc;
use super::eval::{eval_expression, Demarche};
use super::valeur::{format_reel, Valeur};

#[derive(Clone, Debug, Default)]
pub struct Calculatrice {
    historique: Vec<String>,
}

impl Calculatrice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, a: f64, b: f64) -> f64 {
        let r = a + b;
        self.enregistre(format!("{} + {} = {}", format_reel(a), format_reel(b), format_reel(r)));
        r
    }

    pub fn subtract(&mut self, a: f64, b: f64) -> f64 {
        let r = a - b;
        self.enregistre(format!("{} - {} = {}", format_reel(a), format_reel(b), format_reel(r)));
        r
    }

    pub fn multiply(&mut self, a: f64, b: f64) -> f64 {
        let r = a * b;
        self.enregistre(format!("{} * {} = {}", format_reel(a), format_reel(b), format_reel(r)));
        r
    }

    pub fn divide(&mut self, a: f64, b: f64) -> Result<f64, ErreurCalc> {
        if b == 0.0 {
            return Err(ErreurCalc::DivisionParZero);
        }
        let r = a / b;
        self.enregistre(format!("{} / {} = {}", format_reel(a), format_reel(b), format_reel(r)));
        Ok(r)
    }

    pub fn power(&mut self, a: f64, b: f64) -> Result<f64, ErreurCalc> {
        let r = Valeur::Reel(a).puissance(&Valeur::Reel(b))?.en_f64()?;
        self.enregistre(format!("{} ^ {} = {}", format_reel(a), format_reel(b), format_reel(r)));
        Ok(r)
    }

    pub fn sqrt(&mut self, a: f64) -> Result<f64, ErreurCalc> {
        let r = Valeur::Reel(a).racine()?.en_f64()?;
        self.enregistre(format!("√{} = {}", format_reel(a), format_reel(r)));
        Ok(r)
    }

    pub fn factorial(&mut self, a: f64) -> Result<BigInt, ErreurCalc> {
        let r = Valeur::Reel(a).factorielle()?;
        // a est entier ici (vérifié par factorielle)
        self.enregistre(format!("{}! = {r}", a as i64));
        Ok(r)
    }

    pub fn evaluate(&mut self, expression: &str) -> Result<Valeur, ErreurCalc> {
        self.evaluate_avec_demarche(expression).map(|(v, _d)| v)
    }

    /// Comme `evaluate`, avec la démarche (jetons, RPN, notation courte).
    pub fn evaluate_avec_demarche(
        &mut self,
        expression: &str,
    ) -> Result<(Valeur, Demarche), ErreurCalc> {
        let (valeur, d) = eval_expression(expression)?;
        self.enregistre(format!("{} = {valeur}", d.forme));
        Ok((valeur, d))
    }

    pub fn clear_history(&mut self) {
        info!(entrees = self.historique.len(), "historique effacé");
        self.historique.clear();
    }

    /// Copie : la modifier ne touche pas l’état interne.
    pub fn get_history(&self) -> Vec<String> {
        self.historique.clone()
    }

    /// Lecture sans copie (affichage).
    pub fn historique(&self) -> &[String] {
        &self.historique
    }

    fn enregistre(&mut self, entree: String) {
        debug!(%entree, "historique");
        self.historique.push(entree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn operations_directes() {
        let mut c = Calculatrice::new();
        assert_eq!(c.add(10.0, 5.0), 15.0);
        assert_eq!(c.subtract(10.0, 3.0), 7.0);
        assert_eq!(c.multiply(4.0, 7.0), 28.0);
        assert_eq!(c.divide(15.0, 3.0), Ok(5.0));
        assert_eq!(c.power(3.0, 4.0), Ok(81.0));
        assert_eq!(c.sqrt(144.0), Ok(12.0));
        assert_eq!(c.factorial(6.0), Ok(BigInt::from(720)));

        assert_eq!(
            c.get_history(),
            vec![
                "10.0 + 5.0 = 15.0",
                "10.0 - 3.0 = 7.0",
                "4.0 * 7.0 = 28.0",
                "15.0 / 3.0 = 5.0",
                "3.0 ^ 4.0 = 81.0",
                "√144.0 = 12.0",
                "6! = 720",
            ]
        );
    }

    #[test]
    fn erreurs_des_operations() {
        let mut c = Calculatrice::new();
        assert_eq!(c.divide(10.0, 0.0), Err(ErreurCalc::DivisionParZero));
        assert_eq!(c.divide(0.0, -0.0), Err(ErreurCalc::DivisionParZero));
        assert!(matches!(c.sqrt(-4.0), Err(ErreurCalc::ArgumentInvalide(_))));
        assert!(matches!(c.factorial(-1.0), Err(ErreurCalc::ArgumentInvalide(_))));
        assert!(matches!(c.factorial(2.5), Err(ErreurCalc::ArgumentInvalide(_))));
        assert!(matches!(c.power(10.0, 400.0), Err(ErreurCalc::Depassement(_))));
        assert!(matches!(c.evaluate("import os"), Err(ErreurCalc::ArgumentInvalide(_))));
        assert!(c.get_history().is_empty(), "aucun échec ne doit laisser de trace");
    }

    #[test]
    fn factorielles_de_reference() {
        let mut c = Calculatrice::new();
        assert_eq!(c.factorial(0.0), Ok(BigInt::from(1)));
        assert_eq!(c.factorial(5.0), Ok(BigInt::from(120)));
        assert_eq!(c.get_history(), vec!["0! = 1", "5! = 120"]);
    }

    #[test]
    fn expressions_de_reference() {
        let mut c = Calculatrice::new();
        assert_eq!(c.evaluate("2 + 3 * 4"), Ok(Valeur::from(14)));
        assert_eq!(c.evaluate("√(100 - 36)"), Ok(Valeur::from(8.0)));
        assert_eq!(c.evaluate("5! / 10"), Ok(Valeur::from(12.0)));

        assert_eq!(
            c.get_history(),
            vec!["2+3*4 = 14", "√(100-36) = 8.0", "5!/10 = 12.0"]
        );
    }

    #[test]
    fn historique_garde_la_notation_courte() {
        let mut c = Calculatrice::new();
        c.evaluate("2**10").unwrap();
        c.evaluate("2^10").unwrap();

        for entree in c.get_history() {
            let (gauche, droite) = entree.split_once(" = ").unwrap();
            assert!(gauche.contains('^'), "{entree}");
            assert!(!gauche.contains("**"), "{entree}");
            assert_eq!(droite, "1024");
        }
    }

    #[test]
    fn copie_de_l_historique() {
        let mut c = Calculatrice::new();
        c.add(1.0, 2.0);
        let mut copie = c.get_history();
        copie.push("falsifié".to_string());
        copie[0].clear();
        assert_eq!(c.get_history(), vec!["1.0 + 2.0 = 3.0"]);
    }

    #[test]
    fn effacement() {
        let mut c = Calculatrice::new();
        c.add(1.0, 2.0);
        c.evaluate("1+1").unwrap();
        assert_eq!(c.historique().len(), 2);
        c.clear_history();
        assert!(c.get_history().is_empty());
        c.clear_history();
        assert!(c.get_history().is_empty());
    }

    #[test]
    fn racine_puis_carre() {
        let mut c = Calculatrice::new();
        for a in [0.0, 2.0, 49.0, 1e-8, 12345.678] {
            let r = c.sqrt(a).unwrap();
            assert!(approx(r * r, a), "√{a}² = {}", r * r);
        }
    }
}
