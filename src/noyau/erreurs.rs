// src/noyau/erreurs.rs
//
// Erreurs du noyau exposées à l’appelant.
// Les étapes internes (jetons, RPN, AST) travaillent en `String` et sont
// converties en `ArgumentInvalide` à la frontière du pipeline (eval.rs).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurCalc {
    /// Dénominateur nul (ou 0 élevé à une puissance négative).
    #[error("Division par zéro impossible !")]
    DivisionParZero,

    /// Argument hors domaine, expression refusée ou mal formée.
    #[error("{0}")]
    ArgumentInvalide(String),

    /// Résultat hors de la plage représentable.
    #[error("{0}")]
    Depassement(String),
}

impl ErreurCalc {
    pub fn invalide(msg: impl Into<String>) -> Self {
        Self::ArgumentInvalide(msg.into())
    }

    pub fn depassement(msg: impl Into<String>) -> Self {
        Self::Depassement(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::ErreurCalc;

    #[test]
    fn messages_lisibles() {
        assert_eq!(
            ErreurCalc::DivisionParZero.to_string(),
            "Division par zéro impossible !"
        );
        assert_eq!(ErreurCalc::invalide("√ négatif").to_string(), "√ négatif");
        assert_eq!(ErreurCalc::depassement("trop grand").to_string(), "trop grand");
    }
}
