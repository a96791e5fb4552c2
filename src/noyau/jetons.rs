// src/noyau/jetons.rs
//
// Tokenisation = contrôle de sûreté.
// Tout ce qui n’est pas dans la grammaire est refusé ici :
// - caractères hors {chiffres, . + - * / ( ) ^ √ ! ,} et lettres ASCII
// - mots qui ne sont pas une fonction autorisée (import, os, __x__ ...)

use num_bigint::BigInt;

use super::expr::Fonction;
use super::valeur::{format_reel, Valeur};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(Valeur),
    Fonction(Fonction),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,  // ^ ou **
    Racine, // √ (préfixe)
    Bang,   // ! (postfixe)
    Virgule,

    LPar,
    RPar,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers (12), décimaux (2.5, .5), exposants (1e3, 2.5E-3)
/// - opérateurs + - * / ^ ** √ !
/// - parenthèses et virgules (arguments de fonctions)
/// - fonctions sqrt, abs, round, pow, min, max, factorial (insensible à la casse)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, String> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '√' => Some(Tok::Racine),
            '!' => Some(Tok::Bang),
            ',' => Some(Tok::Virgule),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // * ou ** (puissance)
        if c == '*' {
            if chars.get(i + 1) == Some(&'*') {
                out.push(Tok::Caret);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (tok, suivant) = lire_nombre(&chars, i)?;
            out.push(tok);
            i = suivant;
            continue;
        }

        // Mots : seulement les fonctions de la liste blanche
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let w = word.to_lowercase();

            match Fonction::depuis_nom(&w) {
                Some(f) => out.push(Tok::Fonction(f)),
                None => return Err(format!("nom non autorisé : '{word}'")),
            }
            continue;
        }

        return Err(format!("caractère inattendu : '{c}'"));
    }

    Ok(out)
}

/// Lit un nombre à partir de `start`. Renvoie le jeton et l’index suivant.
fn lire_nombre(chars: &[char], start: usize) -> Result<(Tok, usize), String> {
    let mut i = start;
    let mut reel = false;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        reel = true;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    let mantisse: String = chars[start..i].iter().collect();
    if mantisse == "." {
        return Err("nombre invalide : '.'".into());
    }

    // exposant : e/E, signe optionnel, au moins un chiffre
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            reel = true;
            i = j;
        }
    }

    let texte: String = chars[start..i].iter().collect();
    let tok = if reel {
        let x: f64 = texte
            .parse()
            .map_err(|_| format!("nombre invalide : '{texte}'"))?;
        // "1e400" donnerait inf, qui n’est pas réécrivable comme littéral
        if !x.is_finite() {
            return Err(format!("nombre trop grand : '{texte}'"));
        }
        Tok::Num(Valeur::Reel(x))
    } else {
        let n = BigInt::parse_bytes(texte.as_bytes(), 10)
            .ok_or_else(|| format!("nombre invalide : '{texte}'"))?;
        Tok::Num(Valeur::Entier(n))
    };

    Ok((tok, i))
}

/// Format utilitaire (journal / démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(Valeur::Reel(x)) => format_reel(*x),
            Tok::Num(v) => v.to_string(),
            Tok::Fonction(f) => f.nom().to_string(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Racine => "√".to_string(),
            Tok::Bang => "!".to_string(),
            Tok::Virgule => ",".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
