//! Noyau de la calculatrice
//!
//! Organisation interne :
//! - erreurs.rs      : genres d’erreurs (division par zéro, argument invalide, dépassement)
//! - valeur.rs       : Entier (BigInt) / Reel (f64), arithmétique + affichage
//! - jetons.rs       : tokenisation = liste blanche (caractères + noms de fonctions)
//! - rpn.rs          : shunting-yard + construction Expr
//! - expr.rs         : AST fermé, évaluation, notation courte (^, √, !)
//! - eval.rs         : pipeline complet + démarche
//! - calculatrice.rs : opérations directes + historique

pub mod calculatrice;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod rpn;
pub mod valeur;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_robustesse;

// API publique minimale
pub use calculatrice::Calculatrice;
pub use erreurs::ErreurCalc;
pub use eval::Demarche;
