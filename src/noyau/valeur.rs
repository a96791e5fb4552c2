// src/noyau/valeur.rs
//
// Valeur numérique du noyau : entier exact (BigInt) ou réel (f64).
//
// Règles de type :
// - Entier ∘ Entier reste Entier pour + - * et ^ (exposant entier >= 0)
// - / et √ donnent toujours un Reel
// - mélange Entier/Reel => Reel
//
// Garde-fous : tout entier produit par + - * ^ est borné en bits, factorielle bornée.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;
use std::fmt;

use super::erreurs::ErreurCalc;

/// Taille max (en bits) d’un entier calculé (~39 000 chiffres).
/// Vérifiée AVANT le calcul, sur une borne supérieure de la taille du résultat.
pub const LIMITE_BITS_ENTIER: u64 = 1 << 17;

const TROP_GRAND: &str = "Résultat trop grand pour être calculé !";

/// Plus grand n accepté pour n!.
pub const LIMITE_FACTORIELLE: u64 = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Entier(BigInt),
    Reel(f64),
}

impl From<i64> for Valeur {
    fn from(n: i64) -> Self {
        Valeur::Entier(BigInt::from(n))
    }
}

impl From<f64> for Valeur {
    fn from(x: f64) -> Self {
        Valeur::Reel(x)
    }
}

impl From<BigInt> for Valeur {
    fn from(n: BigInt) -> Self {
        Valeur::Entier(n)
    }
}

impl Valeur {
    /// Conversion en réel ; un entier trop grand pour f64 est un dépassement.
    pub fn en_f64(&self) -> Result<f64, ErreurCalc> {
        match self {
            Valeur::Reel(x) => Ok(*x),
            Valeur::Entier(n) => n
                .to_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| ErreurCalc::depassement("entier trop grand pour être converti en réel")),
        }
    }

    pub fn est_nul(&self) -> bool {
        match self {
            Valeur::Entier(n) => n.is_zero(),
            Valeur::Reel(x) => *x == 0.0,
        }
    }

    pub fn oppose(&self) -> Valeur {
        match self {
            Valeur::Entier(n) => Valeur::Entier(-n),
            Valeur::Reel(x) => Valeur::Reel(-x),
        }
    }

    pub fn valeur_absolue(&self) -> Valeur {
        match self {
            Valeur::Entier(n) => Valeur::Entier(n.abs()),
            Valeur::Reel(x) => Valeur::Reel(x.abs()),
        }
    }

    pub fn addition(&self, autre: &Valeur) -> Result<Valeur, ErreurCalc> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => {
                borne_bits(a.bits().max(b.bits()) + 1)?;
                Ok(Valeur::Entier(a + b))
            }
            _ => Ok(Valeur::Reel(self.en_f64()? + autre.en_f64()?)),
        }
    }

    pub fn soustraction(&self, autre: &Valeur) -> Result<Valeur, ErreurCalc> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => {
                borne_bits(a.bits().max(b.bits()) + 1)?;
                Ok(Valeur::Entier(a - b))
            }
            _ => Ok(Valeur::Reel(self.en_f64()? - autre.en_f64()?)),
        }
    }

    pub fn multiplication(&self, autre: &Valeur) -> Result<Valeur, ErreurCalc> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => {
                borne_bits(a.bits() + b.bits())?;
                Ok(Valeur::Entier(a * b))
            }
            _ => Ok(Valeur::Reel(self.en_f64()? * autre.en_f64()?)),
        }
    }

    /// Division réelle (toujours un Reel, même pour 10/2).
    pub fn division(&self, autre: &Valeur) -> Result<Valeur, ErreurCalc> {
        if autre.est_nul() {
            return Err(ErreurCalc::DivisionParZero);
        }
        Ok(Valeur::Reel(self.en_f64()? / autre.en_f64()?))
    }

    pub fn puissance(&self, exposant: &Valeur) -> Result<Valeur, ErreurCalc> {
        if let (Valeur::Entier(b), Valeur::Entier(e)) = (self, exposant) {
            if !e.is_negative() {
                return puissance_entiere(b, e).map(Valeur::Entier);
            }
            if b.is_zero() {
                return Err(ErreurCalc::DivisionParZero);
            }
        }

        let x = self.en_f64()?;
        let y = exposant.en_f64()?;
        if x == 0.0 && y < 0.0 {
            return Err(ErreurCalc::DivisionParZero);
        }

        let r = x.powf(y);
        if r.is_nan() && !x.is_nan() && !y.is_nan() {
            return Err(ErreurCalc::invalide(
                "puissance : résultat non réel (base négative, exposant fractionnaire)",
            ));
        }
        if r.is_infinite() && x.is_finite() && y.is_finite() {
            return Err(ErreurCalc::depassement(TROP_GRAND));
        }
        Ok(Valeur::Reel(r))
    }

    pub fn racine(&self) -> Result<Valeur, ErreurCalc> {
        let x = self.en_f64()?;
        if x < 0.0 {
            return Err(ErreurCalc::invalide(
                "Racine carrée d'un nombre négatif impossible !",
            ));
        }
        Ok(Valeur::Reel(x.sqrt()))
    }

    /// n! exact. Un réel est accepté s’il est entier (5.0).
    pub fn factorielle(&self) -> Result<BigInt, ErreurCalc> {
        let n = match self {
            Valeur::Entier(n) => n.clone(),
            Valeur::Reel(x) => {
                if *x < 0.0 {
                    return Err(erreur_factorielle_negative());
                }
                if !x.is_finite() || x.fract() != 0.0 {
                    return Err(ErreurCalc::invalide(
                        "La factorielle n'est définie que pour les entiers !",
                    ));
                }
                BigInt::from_f64(*x).ok_or_else(|| {
                    ErreurCalc::invalide("La factorielle n'est définie que pour les entiers !")
                })?
            }
        };

        if n.is_negative() {
            return Err(erreur_factorielle_negative());
        }

        let n = n
            .to_u64()
            .filter(|n| *n <= LIMITE_FACTORIELLE)
            .ok_or_else(|| {
                ErreurCalc::depassement(format!(
                    "factorielle limitée à {LIMITE_FACTORIELLE}!"
                ))
            })?;

        Ok(factorielle_u64(n))
    }

    /// Arrondi « au pair le plus proche ».
    /// - `round(x)` => Entier
    /// - `round(x, n)` => même type que x
    pub fn arrondi(&self, decimales: Option<&Valeur>) -> Result<Valeur, ErreurCalc> {
        let Some(decimales) = decimales else {
            return match self {
                Valeur::Entier(_) => Ok(self.clone()),
                Valeur::Reel(x) if x.is_nan() => {
                    Err(ErreurCalc::invalide("impossible d'arrondir nan en entier"))
                }
                Valeur::Reel(x) => BigInt::from_f64(x.round_ties_even())
                    .map(Valeur::Entier)
                    .ok_or_else(|| ErreurCalc::depassement("impossible d'arrondir l'infini en entier")),
            };
        };

        let k = match decimales {
            Valeur::Entier(k) => k.to_i64().unwrap_or(if k.is_negative() { -400 } else { 400 }),
            Valeur::Reel(_) => {
                return Err(ErreurCalc::invalide(
                    "round : le nombre de décimales doit être un entier",
                ))
            }
        }
        .clamp(-400, 400) as i32;

        match self {
            Valeur::Entier(n) => {
                if k >= 0 {
                    Ok(self.clone())
                } else {
                    Ok(Valeur::Entier(arrondi_entier_pair(n, (-k) as u32)))
                }
            }
            Valeur::Reel(x) => {
                if !x.is_finite() {
                    return Ok(self.clone());
                }
                if k >= 0 {
                    let f = 10f64.powi(k);
                    let y = x * f;
                    if !y.is_finite() {
                        return Ok(self.clone());
                    }
                    Ok(Valeur::Reel(y.round_ties_even() / f))
                } else {
                    let f = 10f64.powi(-k);
                    if !f.is_finite() {
                        return Ok(Valeur::Reel(0.0_f64.copysign(*x)));
                    }
                    Ok(Valeur::Reel((x / f).round_ties_even() * f))
                }
            }
        }
    }

    /// Ordre numérique (None si nan est impliqué).
    pub fn compare(&self, autre: &Valeur) -> Option<Ordering> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => Some(a.cmp(b)),
            _ => {
                let x = approx_f64(self);
                let y = approx_f64(autre);
                x.partial_cmp(&y)
            }
        }
    }
}

/// Conversion sans échec (±inf pour les entiers géants), pour comparer.
fn approx_f64(v: &Valeur) -> f64 {
    match v {
        Valeur::Reel(x) => *x,
        Valeur::Entier(n) => n.to_f64().unwrap_or(if n.is_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }),
    }
}

fn erreur_factorielle_negative() -> ErreurCalc {
    ErreurCalc::invalide("Factorielle d'un nombre négatif impossible !")
}

pub fn factorielle_u64(n: u64) -> BigInt {
    (2..=n).fold(BigInt::one(), |acc, k| acc * BigInt::from(k))
}

/// b^e pour e >= 0, avec cas triviaux avant la borne en bits.
fn puissance_entiere(b: &BigInt, e: &BigInt) -> Result<BigInt, ErreurCalc> {
    if e.is_zero() || b.is_one() {
        return Ok(BigInt::one());
    }
    if b.is_zero() {
        return Ok(BigInt::zero());
    }
    if *b == BigInt::from(-1) {
        let pair = (e % BigInt::from(2)).is_zero();
        return Ok(if pair { BigInt::one() } else { BigInt::from(-1) });
    }

    let n = e
        .to_u64()
        .filter(|n| n.saturating_mul(b.bits()) <= LIMITE_BITS_ENTIER)
        .ok_or_else(|| ErreurCalc::depassement(TROP_GRAND))?;

    // |b| >= 2 => bits >= 2 => n <= 2^16
    Ok(b.pow(n as u32))
}

fn borne_bits(bits: u64) -> Result<(), ErreurCalc> {
    if bits > LIMITE_BITS_ENTIER {
        return Err(ErreurCalc::depassement(TROP_GRAND));
    }
    Ok(())
}

/// Arrondi d’un entier à 10^k près, égalité => multiple pair.
fn arrondi_entier_pair(n: &BigInt, k: u32) -> BigInt {
    let f = BigInt::from(10).pow(k);
    let a = n.abs();
    let mut q = &a / &f;
    let reste = &a - &q * &f;
    let double = reste * BigInt::from(2);

    let impair = !(&q % BigInt::from(2)).is_zero();
    if double > f || (double == f && impair) {
        q += BigInt::one();
    }

    let r = q * f;
    if n.is_negative() {
        -r
    } else {
        r
    }
}

/* ------------------------ Affichage ------------------------ */

/// Réel “à la repr” : 12.0, 0.1, 1e+16, 1.5e-05, inf, nan.
pub fn format_reel(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let a = x.abs();
    if a != 0.0 && !(1e-4..1e16).contains(&a) {
        let s = format!("{x:e}");
        if let Some((mantisse, exposant)) = s.split_once('e') {
            let (signe, chiffres) = match exposant.strip_prefix('-') {
                Some(c) => ('-', c),
                None => ('+', exposant),
            };
            return format!("{mantisse}e{signe}{chiffres:0>2}");
        }
        return s;
    }

    if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valeur::Entier(n) => write!(f, "{n}"),
            Valeur::Reel(x) => f.write_str(&format_reel(*x)),
        }
    }
}
