//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, opérandes, résultat, erreur,
//! démarche, historique via `Calculatrice`) et offrir des opérations simples
//! (C/CLR/AC) sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici (le noyau est appelé depuis vue.rs).
//! - AC ne touche pas à l’historique : seul « Effacer l’historique » le vide.

use crate::noyau::{Calculatrice, Demarche};

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- opérandes des opérations directes ---
    pub a: f64,
    pub b: f64,

    // --- sorties ---
    pub resultat: String, // "forme = valeur" du dernier succès
    pub erreur: String,   // message d’erreur (si l’opération échoue)

    // --- démarche (panneau d’explication) ---
    pub demarche: Demarche,

    // --- noyau (porte l’historique) ---
    pub calc: Calculatrice,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            a: 0.0,
            b: 0.0,
            resultat: String::new(),
            erreur: String::new(),
            demarche: Demarche::default(),
            calc: Calculatrice::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro (entrée + opérandes + résultats), historique conservé.
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.a = 0.0;
        self.b = 0.0;
        self.clear_resultats();
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur + démarche (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.erreur.clear();
        self.demarche = Demarche::default();
        self.focus_entree = true;
    }

    /// Utilitaire : placer une erreur.
    ///
    /// Choix UX : on CONSERVE `resultat` (dernier succès) pour ne pas “effacer l’écran”
    /// sur une faute, mais la démarche n’a plus de sens.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.demarche = Demarche::default();
        self.focus_entree = true;
    }

    /// Utilitaire : déposer un résultat (+ démarche si évaluation d’expression).
    pub fn set_resultat(&mut self, resultat: impl Into<String>, demarche: Demarche) {
        self.erreur.clear();
        self.resultat = resultat.into();
        self.demarche = demarche;
        self.focus_entree = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ac_conserve_l_historique() {
        let mut app = AppCalc::default();
        app.calc.add(1.0, 2.0);
        app.entree = "1+1".into();
        app.a = 3.0;
        app.set_resultat("1+1 = 2", Demarche::default());

        app.reset_total();

        assert!(app.entree.is_empty());
        assert_eq!(app.a, 0.0);
        assert!(app.resultat.is_empty());
        assert_eq!(app.calc.get_history().len(), 1);
    }

    #[test]
    fn erreur_garde_le_dernier_resultat() {
        let mut app = AppCalc::default();
        app.set_resultat("2 = 2", Demarche::default());
        app.set_erreur("oups");
        assert_eq!(app.resultat, "2 = 2");
        assert_eq!(app.erreur, "oups");

        app.set_resultat("3 = 3", Demarche::default());
        assert!(app.erreur.is_empty());
    }
}
