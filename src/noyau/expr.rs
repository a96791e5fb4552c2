// src/noyau/expr.rs
//
// AST arithmétique fermé : nombres, + - * / ^, moins unaire, √, !,
// et appels aux seules fonctions de `Fonction`.
//
// Affichage (Display) = notation courte pour l’historique :
// ^ pour la puissance, √ pour la racine, n! pour la factorielle,
// parenthèses minimales selon la précédence.

use std::cmp::Ordering;
use std::fmt;

use super::erreurs::ErreurCalc;
use super::valeur::Valeur;

/// Fonctions autorisées (liste blanche unique du noyau).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sqrt,
    Abs,
    Round,
    Pow,
    Min,
    Max,
    Factorial,
}

impl Fonction {
    pub const TOUTES: [Fonction; 7] = [
        Fonction::Sqrt,
        Fonction::Abs,
        Fonction::Round,
        Fonction::Pow,
        Fonction::Min,
        Fonction::Max,
        Fonction::Factorial,
    ];

    /// Nom attendu en minuscules.
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        Self::TOUTES.into_iter().find(|f| f.nom() == nom)
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sqrt => "sqrt",
            Fonction::Abs => "abs",
            Fonction::Round => "round",
            Fonction::Pow => "pow",
            Fonction::Min => "min",
            Fonction::Max => "max",
            Fonction::Factorial => "factorial",
        }
    }

    pub fn accepte_arite(self, n: usize) -> bool {
        match self {
            Fonction::Sqrt | Fonction::Abs | Fonction::Factorial => n == 1,
            Fonction::Round => n == 1 || n == 2,
            Fonction::Pow => n == 2,
            Fonction::Min | Fonction::Max => n >= 2,
        }
    }

    /// Texte d’aide pour les erreurs d’arité.
    pub fn arite_attendue(self) -> &'static str {
        match self {
            Fonction::Sqrt | Fonction::Abs | Fonction::Factorial => "1 argument",
            Fonction::Round => "1 ou 2 arguments",
            Fonction::Pow => "2 arguments",
            Fonction::Min | Fonction::Max => "au moins 2 arguments",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(Valeur),

    Neg(Box<Expr>),
    Racine(Box<Expr>),      // √x
    Factorielle(Box<Expr>), // x!

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>), // x^y (associatif à droite)

    Appel(Fonction, Vec<Expr>),
}

/* ------------------------ Précédences (affichage) ------------------------ */

const P_ADD: u8 = 1;
const P_MUL: u8 = 2;
const P_NEG: u8 = 3;
const P_POW: u8 = 4;
const P_RACINE: u8 = 5;
const P_FACT: u8 = 6;
const P_ATOME: u8 = 7;

impl Expr {
    fn precedence(&self) -> u8 {
        use Expr::*;
        match self {
            Add(..) | Sub(..) => P_ADD,
            Mul(..) | Div(..) => P_MUL,
            Neg(_) => P_NEG,
            Pow(..) => P_POW,
            Racine(_) => P_RACINE,
            Factorielle(_) => P_FACT,
            // un nombre négatif s’affiche comme un moins unaire
            Nombre(v) if est_negatif(v) => P_NEG,
            Nombre(_) | Appel(..) => P_ATOME,
        }
    }

    /// Évaluation récursive. Les erreurs gardent leur genre
    /// (le pipeline les requalifie en ArgumentInvalide).
    pub fn evalue(&self) -> Result<Valeur, ErreurCalc> {
        use Expr::*;

        match self {
            Nombre(v) => Ok(v.clone()),

            Neg(x) => Ok(x.evalue()?.oppose()),
            Racine(x) => x.evalue()?.racine(),
            Factorielle(x) => x.evalue()?.factorielle().map(Valeur::Entier),

            Add(a, b) => a.evalue()?.addition(&b.evalue()?),
            Sub(a, b) => a.evalue()?.soustraction(&b.evalue()?),
            Mul(a, b) => a.evalue()?.multiplication(&b.evalue()?),
            Div(a, b) => a.evalue()?.division(&b.evalue()?),
            Pow(a, b) => a.evalue()?.puissance(&b.evalue()?),

            Appel(f, args) => {
                let vals = args
                    .iter()
                    .map(Expr::evalue)
                    .collect::<Result<Vec<_>, _>>()?;
                appelle(*f, &vals)
            }
        }
    }
}

fn appelle(f: Fonction, args: &[Valeur]) -> Result<Valeur, ErreurCalc> {
    if !f.accepte_arite(args.len()) {
        return Err(ErreurCalc::invalide(format!(
            "{}() attend {}, reçu {}",
            f.nom(),
            f.arite_attendue(),
            args.len()
        )));
    }

    match f {
        Fonction::Sqrt => args[0].racine(),
        Fonction::Abs => Ok(args[0].valeur_absolue()),
        Fonction::Round => args[0].arrondi(args.get(1)),
        Fonction::Pow => args[0].puissance(&args[1]),
        Fonction::Factorial => args[0].factorielle().map(Valeur::Entier),
        Fonction::Min => Ok(extreme(args, Ordering::Less)),
        Fonction::Max => Ok(extreme(args, Ordering::Greater)),
    }
}

/// Premier argument extrême (on ne remplace que sur inégalité stricte).
fn extreme(args: &[Valeur], sens: Ordering) -> Valeur {
    let mut best = &args[0];
    for v in &args[1..] {
        if v.compare(best) == Some(sens) {
            best = v;
        }
    }
    best.clone()
}

fn est_negatif(v: &Valeur) -> bool {
    match v {
        Valeur::Entier(n) => n.sign() == num_bigint::Sign::Minus,
        Valeur::Reel(x) => x.is_sign_negative() && !x.is_nan(),
    }
}

/* ------------------------ Notation courte ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;

        match self {
            Nombre(v) => write!(f, "{v}"),

            Neg(x) => {
                f.write_str("-")?;
                enfant(f, x, P_NEG)
            }
            Racine(x) => {
                f.write_str("√")?;
                enfant(f, x, P_FACT)
            }
            Factorielle(x) => {
                enfant(f, x, P_ATOME)?;
                f.write_str("!")
            }

            Add(a, b) => binaire(f, a, "+", b, P_ADD),
            Sub(a, b) => binaire(f, a, "-", b, P_ADD),
            Mul(a, b) => binaire(f, a, "*", b, P_MUL),
            Div(a, b) => binaire(f, a, "/", b, P_MUL),
            Pow(a, b) => {
                // gauche stricte (associatif à droite), droite accepte un moins unaire : 2^-1
                enfant(f, a, P_POW + 1)?;
                f.write_str("^")?;
                enfant(f, b, P_NEG)
            }

            Appel(fonction, args) => {
                write!(f, "{}(", fonction.nom())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Opérateur binaire associatif à gauche : la droite doit être strictement plus forte.
fn binaire(f: &mut fmt::Formatter<'_>, a: &Expr, op: &str, b: &Expr, p: u8) -> fmt::Result {
    enfant(f, a, p)?;
    f.write_str(op)?;
    enfant(f, b, p + 1)
}

fn enfant(f: &mut fmt::Formatter<'_>, e: &Expr, min: u8) -> fmt::Result {
    if e.precedence() < min {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}
