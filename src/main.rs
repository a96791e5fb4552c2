// src/main.rs
//
// Calculatrice parfaite : point d’entrée NATIF + WEB (WASM)
// ---------------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : fenêtre eframe, ou menu console (--console),
//                                 ou évaluation unique (--expression)
// - WEB  (wasm32)              : eframe::WebRunner + WebOptions + <canvas>
//
// Côté WEB (WASM) : index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>
//
// Journal (natif) : stderr, niveau "warn" par défaut, "debug" avec --verbose,
// RUST_LOG a priorité.

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
#[cfg(not(target_arch = "wasm32"))]
mod console;
mod noyau;

use app::AppCalc;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice parfaite";

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(
    name = "calculatrice_parfaite",
    version,
    about = "Calculatrice : opérations de base, expressions (^, √, !) et historique"
)]
struct Args {
    /// Menu texte dans le terminal au lieu de la fenêtre
    #[arg(long)]
    console: bool,

    /// Évalue une expression, affiche le résultat et quitte
    #[arg(short, long, value_name = "EXPR", conflicts_with = "console")]
    expression: Option<String>,

    /// Journal détaillé (debug) sur stderr
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn init_journal(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let defaut = if verbose { "debug" } else { "warn" };
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(defaut));

    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use clap::Parser;

    let args = Args::parse();
    init_journal(args.verbose);

    if let Some(expr) = args.expression {
        let mut calc = noyau::Calculatrice::new();
        match calc.evaluate(&expr) {
            Ok(valeur) => {
                println!("{valeur}");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Erreur : {e}");
                std::process::exit(1);
            }
        }
    }

    if args.console {
        let mut calc = noyau::Calculatrice::new();
        let stdin = std::io::stdin();
        let mut sortie = std::io::stdout();
        if let Err(e) = console::lance_menu(&mut calc, &mut stdin.lock(), &mut sortie) {
            tracing::error!(%e, "entrée/sortie console");
            std::process::exit(1);
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([520.0, 780.0])
            .with_min_inner_size([420.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppCalc>::default())),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// - Fixe le titre de l’onglet (document.title)
    /// - Récupère le <canvas id="the_canvas_id">
    /// - Démarre eframe WebRunner dessus
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        let web_options = eframe::WebOptions::default();

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|_cc| Ok(Box::<AppCalc>::default())),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
