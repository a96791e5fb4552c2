//! Mode console : menu texte (natif seulement).
//!
//! Écrit contre `BufRead`/`Write` : stdin/stdout en vrai, tampons en mémoire
//! pour les tests. Fin d’entrée (Ctrl-D) à n’importe quelle invite = sortie
//! propre avec message d’interruption.

use std::io::{self, BufRead, Write};

use crate::noyau::{Calculatrice, ErreurCalc};

const LIGNE: &str = "==================================================";

/// Comment la boucle s’est terminée.
enum Fin {
    Quitte,
    Interrompu,
}

/// Lance le menu jusqu’à `0` ou fin d’entrée.
pub fn lance_menu<R: BufRead, W: Write>(
    calc: &mut Calculatrice,
    entree: &mut R,
    sortie: &mut W,
) -> io::Result<()> {
    writeln!(sortie, "Bienvenue dans la Calculatrice parfaite !")?;

    match boucle(calc, entree, sortie)? {
        Fin::Quitte => writeln!(sortie, "Merci d’avoir utilisé la Calculatrice parfaite. Au revoir !")?,
        Fin::Interrompu => writeln!(sortie, "\n\nCalculatrice interrompue. Au revoir !")?,
    }
    sortie.flush()
}

fn boucle<R: BufRead, W: Write>(
    calc: &mut Calculatrice,
    entree: &mut R,
    sortie: &mut W,
) -> io::Result<Fin> {
    loop {
        affiche_menu(sortie)?;

        let Some(choix) = demande(entree, sortie, "\nVotre choix (0-10) : ")? else {
            return Ok(Fin::Interrompu);
        };

        let issue = match choix.trim() {
            "0" => return Ok(Fin::Quitte),
            "1" | "2" | "3" | "4" | "5" => {
                let (invite_a, invite_b) = if choix.trim() == "5" {
                    ("Base : ", "Exposant : ")
                } else {
                    ("Premier nombre : ", "Second nombre : ")
                };
                let Some(a) = demande_nombre(entree, sortie, invite_a)? else {
                    return Ok(Fin::Interrompu);
                };
                let Some(b) = demande_nombre(entree, sortie, invite_b)? else {
                    return Ok(Fin::Interrompu);
                };
                match choix.trim() {
                    "1" => {
                        calc.add(a, b);
                        Ok(())
                    }
                    "2" => {
                        calc.subtract(a, b);
                        Ok(())
                    }
                    "3" => {
                        calc.multiply(a, b);
                        Ok(())
                    }
                    "4" => calc.divide(a, b).map(|_| ()),
                    _ => calc.power(a, b).map(|_| ()),
                }
            }
            "6" => {
                let Some(a) = demande_nombre(entree, sortie, "Nombre : ")? else {
                    return Ok(Fin::Interrompu);
                };
                calc.sqrt(a).map(|_| ())
            }
            "7" => {
                let Some(a) = demande_nombre(entree, sortie, "Entier positif ou nul : ")? else {
                    return Ok(Fin::Interrompu);
                };
                calc.factorial(a).map(|_| ())
            }
            "8" => {
                let Some(expr) =
                    demande(entree, sortie, "Expression (ex. '2 + 3 * 4', '5^2', '√16') : ")?
                else {
                    return Ok(Fin::Interrompu);
                };
                calc.evaluate(&expr).map(|_| ())
            }
            "9" => {
                affiche_historique(calc, sortie)?;
                Ok(())
            }
            "10" => {
                calc.clear_history();
                writeln!(sortie, "\nHistorique effacé.")?;
                Ok(())
            }
            _ => {
                writeln!(sortie, "\nChoix invalide ! Entrez un nombre entre 0 et 10.")?;
                Ok(())
            }
        };

        if matches!(choix.trim(), "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8") {
            affiche_issue(calc, issue, sortie)?;
        }

        if demande(entree, sortie, "\nAppuyez sur Entrée pour continuer…")?.is_none() {
            return Ok(Fin::Interrompu);
        }
    }
}

fn affiche_menu<W: Write>(sortie: &mut W) -> io::Result<()> {
    writeln!(sortie, "\n{LIGNE}")?;
    writeln!(sortie, "           CALCULATRICE PARFAITE")?;
    writeln!(sortie, "{LIGNE}")?;
    writeln!(sortie, "Opérations :")?;
    for ligne in [
        "  1. Addition (+)",
        "  2. Soustraction (-)",
        "  3. Multiplication (*)",
        "  4. Division (/)",
        "  5. Puissance (^)",
        "  6. Racine carrée (√)",
        "  7. Factorielle (!)",
        "  8. Évaluer une expression",
        "  9. Afficher l’historique",
        "  10. Effacer l’historique",
        "  0. Quitter",
    ] {
        writeln!(sortie, "{ligne}")?;
    }
    writeln!(sortie, "{LIGNE}")
}

/// Résultat affiché = l’entrée d’historique qui vient d’être ajoutée.
fn affiche_issue<W: Write>(
    calc: &Calculatrice,
    issue: Result<(), ErreurCalc>,
    sortie: &mut W,
) -> io::Result<()> {
    match issue {
        Ok(()) => {
            if let Some(derniere) = calc.historique().last() {
                writeln!(sortie, "\nRésultat : {derniere}")?;
            }
        }
        Err(e) => writeln!(sortie, "\nErreur : {e}")?,
    }
    Ok(())
}

fn affiche_historique<W: Write>(calc: &Calculatrice, sortie: &mut W) -> io::Result<()> {
    let historique = calc.historique();
    if historique.is_empty() {
        return writeln!(sortie, "\nAucun calcul dans l’historique.");
    }

    writeln!(sortie, "\nHistorique des calculs :")?;
    for (i, entree) in historique.iter().enumerate() {
        writeln!(sortie, "  {}. {entree}", i + 1)?;
    }
    Ok(())
}

/// Affiche l’invite et lit une ligne (sans fin de ligne). `None` = fin d’entrée.
fn demande<R: BufRead, W: Write>(
    entree: &mut R,
    sortie: &mut W,
    invite: &str,
) -> io::Result<Option<String>> {
    write!(sortie, "{invite}")?;
    sortie.flush()?;

    let mut ligne = String::new();
    if entree.read_line(&mut ligne)? == 0 {
        return Ok(None);
    }
    Ok(Some(ligne.trim_end_matches(['\r', '\n']).to_string()))
}

/// Redemande tant que la saisie n’est pas un nombre.
fn demande_nombre<R: BufRead, W: Write>(
    entree: &mut R,
    sortie: &mut W,
    invite: &str,
) -> io::Result<Option<f64>> {
    loop {
        let Some(saisie) = demande(entree, sortie, invite)? else {
            return Ok(None);
        };
        match saisie.trim().parse::<f64>() {
            Ok(x) => return Ok(Some(x)),
            Err(_) => writeln!(sortie, "Saisie invalide ! Entrez un nombre valide.")?,
        }
    }
}
