// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), en validant la grammaire
// - Puis reconstruire Expr
//
// Règles:
// - Précédences : + - (1) < * / (2) < moins unaire (3) < ^ (4) < √ (5) < ! (postfixe)
// - ^ est associatif à droite : 2^3^2 = 2^9
// - ! sort immédiatement (il s’applique à la valeur qui vient d’être lue)
// - Fonction : doit être suivie de '(' ; les virgules comptent les arguments
// - Pas de multiplication implicite : "2(3)" et "2√4" sont refusés

use super::expr::{Expr, Fonction};
use super::jetons::Tok;
use super::valeur::{format_reel, Valeur};

/// Garde-fou : profondeur de parenthèses.
pub const PROFONDEUR_MAX: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Racine,
    Fact,
}

impl Operateur {
    fn precedence(self) -> u8 {
        match self {
            Operateur::Add | Operateur::Sub => 1,
            Operateur::Mul | Operateur::Div => 2,
            Operateur::Neg => 3,
            Operateur::Pow => 4,
            Operateur::Racine => 5,
            Operateur::Fact => 6,
        }
    }

    fn symbole(self) -> &'static str {
        match self {
            Operateur::Add => "+",
            Operateur::Sub => "-",
            Operateur::Mul => "*",
            Operateur::Div => "/",
            Operateur::Pow => "^",
            Operateur::Neg => "neg",
            Operateur::Racine => "√",
            Operateur::Fact => "!",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemRpn {
    Num(Valeur),
    Op(Operateur),
    Appel(Fonction, usize),
}

/// Éléments de la pile d’opérateurs.
#[derive(Clone, Copy, Debug)]
enum Pile {
    Op(Operateur),
    Fonction(Fonction),
    ParOuvrante,
    // parenthèse d’un appel : porte le compteur d’arguments
    ParAppel(usize),
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Racine, LPar, Num(100), Minus, Num(36), RPar]
///   rpn:    [Num(100), Num(36), Op(Sub), Op(Racine)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<ItemRpn>, String> {
    if tokens.is_empty() {
        return Err("expression vide".into());
    }

    let mut out: Vec<ItemRpn> = Vec::new();
    let mut ops: Vec<Pile> = Vec::new();
    let mut profondeur: usize = 0;

    // “valeur” = un atome ou une expression fermée.
    // Sert à distinguer moins unaire / binaire et à refuser les juxtapositions.
    let mut prev_was_value = false;

    for (idx, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Num(v) => {
                if prev_was_value {
                    return Err("opérateur manquant entre deux valeurs".into());
                }
                out.push(ItemRpn::Num(v.clone()));
                prev_was_value = true;
            }

            Tok::Fonction(f) => {
                if prev_was_value {
                    return Err(format!("opérateur manquant avant {}()", f.nom()));
                }
                if tokens.get(idx + 1) != Some(&Tok::LPar) {
                    return Err(format!("{}() doit être suivie de '('", f.nom()));
                }
                ops.push(Pile::Fonction(*f));
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err("opérateur manquant avant '('".into());
                }
                profondeur += 1;
                if profondeur > PROFONDEUR_MAX {
                    return Err("expression trop imbriquée".into());
                }
                if matches!(ops.last(), Some(Pile::Fonction(_))) {
                    ops.push(Pile::ParAppel(1));
                } else {
                    ops.push(Pile::ParOuvrante);
                }
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err("argument manquant avant ','".into());
                }
                depile_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.last_mut() {
                    Some(Pile::ParAppel(n)) => *n += 1,
                    _ => return Err("',' en dehors d'un appel de fonction".into()),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err("expression incomplète avant ')'".into());
                }
                depile_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.pop() {
                    Some(Pile::ParOuvrante) => {}
                    Some(Pile::ParAppel(n)) => match ops.pop() {
                        Some(Pile::Fonction(f)) => out.push(ItemRpn::Appel(f, n)),
                        _ => return Err("appel de fonction mal formé".into()),
                    },
                    _ => return Err("parenthèse fermante sans ouvrante".into()),
                }
                profondeur = profondeur.saturating_sub(1);
                prev_was_value = true;
            }

            Tok::Bang => {
                if !prev_was_value {
                    return Err("'!' doit suivre une valeur".into());
                }
                out.push(ItemRpn::Op(Operateur::Fact));
            }

            Tok::Racine => {
                if prev_was_value {
                    return Err("opérateur manquant avant '√'".into());
                }
                // préfixe : rien à dépiler, l’opérande n’est pas encore lu
                ops.push(Pile::Op(Operateur::Racine));
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // signe unaire : + ignoré, - devient Neg
                if *tok == Tok::Minus {
                    ops.push(Pile::Op(Operateur::Neg));
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let op = match tok {
                    Tok::Plus => Operateur::Add,
                    Tok::Minus => Operateur::Sub,
                    Tok::Star => Operateur::Mul,
                    Tok::Slash => Operateur::Div,
                    _ => Operateur::Pow,
                };
                if !prev_was_value {
                    return Err(format!("opérande gauche manquante pour '{}'", op.symbole()));
                }

                // dépile tant que la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(Pile::Op(top)) = ops.last().copied() {
                    let doit_pop = if op == Operateur::Pow {
                        top.precedence() > op.precedence()
                    } else {
                        top.precedence() >= op.precedence()
                    };
                    if !doit_pop {
                        break;
                    }
                    ops.pop();
                    out.push(ItemRpn::Op(top));
                }

                ops.push(Pile::Op(op));
                prev_was_value = false;
            }
        }
    }

    if !prev_was_value {
        return Err("expression incomplète".into());
    }

    // vide la pile ops
    while let Some(p) = ops.pop() {
        match p {
            Pile::Op(op) => out.push(ItemRpn::Op(op)),
            Pile::ParOuvrante | Pile::ParAppel(_) => return Err("parenthèses non fermées".into()),
            Pile::Fonction(f) => return Err(format!("appel à {}() non fermé", f.nom())),
        }
    }

    Ok(out)
}

fn depile_jusqu_a_parenthese(ops: &mut Vec<Pile>, out: &mut Vec<ItemRpn>) {
    while let Some(Pile::Op(op)) = ops.last().copied() {
        ops.pop();
        out.push(ItemRpn::Op(op));
    }
}

/// Construit une Expr à partir d’une RPN (arité des fonctions vérifiée ici).
pub fn from_rpn(rpn: &[ItemRpn]) -> Result<Expr, String> {
    let mut st: Vec<Expr> = Vec::new();

    for item in rpn {
        match item {
            ItemRpn::Num(v) => st.push(Expr::Nombre(v.clone())),

            ItemRpn::Op(op @ (Operateur::Neg | Operateur::Racine | Operateur::Fact)) => {
                let x = Box::new(st.pop().ok_or("expression invalide")?);
                st.push(match op {
                    Operateur::Neg => Expr::Neg(x),
                    Operateur::Racine => Expr::Racine(x),
                    _ => Expr::Factorielle(x),
                });
            }

            ItemRpn::Op(op) => {
                let b = Box::new(st.pop().ok_or("expression invalide")?);
                let a = Box::new(st.pop().ok_or("expression invalide")?);
                st.push(match op {
                    Operateur::Add => Expr::Add(a, b),
                    Operateur::Sub => Expr::Sub(a, b),
                    Operateur::Mul => Expr::Mul(a, b),
                    Operateur::Div => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                });
            }

            ItemRpn::Appel(f, n) => {
                if !f.accepte_arite(*n) {
                    return Err(format!(
                        "{}() attend {}, reçu {}",
                        f.nom(),
                        f.arite_attendue(),
                        n
                    ));
                }
                if st.len() < *n {
                    return Err("expression invalide".into());
                }
                let args = st.split_off(st.len() - n);
                st.push(Expr::Appel(*f, args));
            }
        }
    }

    let e = st.pop().ok_or("expression invalide")?;
    if !st.is_empty() {
        return Err("expression invalide".into());
    }
    Ok(e)
}

/// Jetons -> RPN -> AST en une étape.
pub fn analyse(tokens: &[Tok]) -> Result<(Vec<ItemRpn>, Expr), String> {
    let rpn = to_rpn(tokens)?;
    let expr = from_rpn(&rpn)?;
    Ok((rpn, expr))
}

/// Format utilitaire (journal / démarche).
pub fn format_rpn(rpn: &[ItemRpn]) -> String {
    rpn.iter()
        .map(|item| match item {
            ItemRpn::Num(Valeur::Reel(x)) => format_reel(*x),
            ItemRpn::Num(v) => v.to_string(),
            ItemRpn::Op(op) => op.symbole().to_string(),
            ItemRpn::Appel(f, n) => format!("{}/{n}", f.nom()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
