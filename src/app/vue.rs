// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue (le champ perd le focus en validant), Backspace retire
//   un appel de fonction entier ("sqrt(") quand il termine l’entrée
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Opérations directes sur deux opérandes a/b (comme le menu console)
// - Historique consultable + effaçable

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::Demarche;

/// Motifs effacés d’un bloc par DEL / Backspace.
const MOTIFS_FONCTIONS: [&str; 7] = [
    "factorial(",
    "round(",
    "sqrt(",
    "abs(",
    "pow(",
    "min(",
    "max(",
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice parfaite");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_operations(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);

                ui.add_space(8.0);
                self.ui_demarche(ui);

                ui.add_space(8.0);
                self.ui_historique(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Expression :");

        // Texte avant que TextEdit n’applique les touches de cette frame.
        let avant = self.entree.clone();

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 2 + 3 * 4, 5^2, √16, √(100 - 36), 5! / 10")
                .id_source("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter : un TextEdit mono-ligne rend le focus en validant => lost_focus().
        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        // Backspace : TextEdit a déjà retiré un caractère pendant ui.add(...).
        let backspace = resp.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Backspace));
        self.touches_entree(&avant, enter, backspace);

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout sauf historique
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultat + erreur + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro (historique conservé)", Action::ResetTotal);
        });

        ui.add_space(8.0);

        // Touches rapides + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "√", "√", InsertKind::Prefixe);
            self.bouton_insert(ui, "!", "!", InsertKind::Postfixe);
            self.bouton_insert(ui, ",", ",", InsertKind::Postfixe);

            ui.separator();

            for nom in ["sqrt", "abs", "round", "pow", "min", "max", "factorial"] {
                self.bouton_insert(ui, nom, &format!("{nom}("), InsertKind::Func);
            }

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.eval_via_noyau();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
                    for chiffre in ligne {
                        self.bouton_insert(ui, chiffre, chiffre, InsertKind::Digit);
                    }
                    match ligne[0] {
                        "7" => self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace),
                        "4" => self.bouton_insert(ui, "/", "/", InsertKind::Op),
                        _ => self.bouton_insert(ui, ".", ".", InsertKind::Digit),
                    }
                    ui.end_row();
                }

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    fn ui_operations(&mut self, ui: &mut egui::Ui) {
        ui.label("Opérations directes :");

        ui.horizontal(|ui| {
            ui.label("a :");
            ui.add(egui::DragValue::new(&mut self.a).speed(0.1));
            ui.label("b :");
            ui.add(egui::DragValue::new(&mut self.b).speed(0.1));
        });

        ui.horizontal_wrapped(|ui| {
            for (label, op) in [
                ("a + b", Operation::Addition),
                ("a − b", Operation::Soustraction),
                ("a × b", Operation::Multiplication),
                ("a ÷ b", Operation::Division),
                ("a ^ b", Operation::Puissance),
                ("√a", Operation::Racine),
                ("a!", Operation::Factorielle),
            ] {
                if ui.add_sized([56.0, 28.0], egui::Button::new(label)).clicked() {
                    self.execute_operation(op);
                }
            }
        });
    }

    /// Suites clavier du champ d’entrée (Enter / Backspace déjà vus par TextEdit).
    fn touches_entree(&mut self, avant: &str, enter: bool, backspace: bool) {
        if enter {
            self.eval_via_noyau();
            self.focus_entree = true;
        }
        if backspace {
            self.backspace_clavier(avant);
        }
    }

    /// Backspace clavier : si le texte d’avant finissait par un appel ("sqrt(")
    /// et que TextEdit n’en a retiré que le dernier caractère, l’appel part en entier.
    fn backspace_clavier(&mut self, avant: &str) {
        let fin = avant.trim_end_matches(' ');
        if !MOTIFS_FONCTIONS.iter().any(|m| fin.ends_with(m)) {
            return;
        }

        let mut attendu = avant.to_string();
        attendu.pop();
        if self.entree != attendu {
            // curseur ailleurs qu’en fin de texte : on laisse TextEdit faire
            return;
        }

        self.entree = avant.to_string();
        self.backspace_entree();
        self.focus_entree = true;
    }

    /// Backspace “intelligent” (bouton DEL) : retire d’un coup les appels ("sqrt(", "max(", ...).
    fn backspace_entree(&mut self) {
        if self.entree.is_empty() {
            return;
        }

        // Retire espaces finaux
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        for pat in MOTIFS_FONCTIONS {
            if self.entree.ends_with(pat) {
                let garde = self.entree.len() - pat.len();
                self.entree.truncate(garde);
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                return;
            }
        }

        // Sinon : un caractère (√ compris, pop() travaille en char)
        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 1);
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Forme", "demarche_forme", &self.demarche.forme);
            });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        let n = self.calc.historique().len();
        egui::CollapsingHeader::new(format!("Historique ({n})"))
            .default_open(true)
            .show(ui, |ui| {
                if n == 0 {
                    ui.monospace("Aucun calcul dans l’historique.");
                } else {
                    for (i, entree) in self.calc.historique().iter().enumerate() {
                        ui.monospace(format!("{:>3}. {entree}", i + 1));
                    }
                }

                ui.add_space(4.0);
                if ui.button("Effacer l’historique").clicked() {
                    self.calc.clear_history();
                    self.focus_entree = true;
                }
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if resp.clicked() {
            self.insere(to_insert, kind);
        }
    }

    fn insere(&mut self, to_insert: &str, kind: InsertKind) {
        if to_insert.is_empty() {
            return;
        }

        match kind {
            InsertKind::CloseParen | InsertKind::Postfixe => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func | InsertKind::Prefixe => {
                // espace de lisibilité après une valeur ; les espaces sont ignorés à l’évaluation
                let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                if let Some(c) = last {
                    if c.is_ascii_digit() || c == ')' || c == '!' {
                        self.entree.push(' ');
                    }
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => {
                // chiffres: pas d’espaces auto
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /// Évalue l’expression via le noyau, puis dépose résultat/démarche dans l’état UI.
    fn eval_via_noyau(&mut self) {
        let s = self.entree.trim().to_string();
        if s.is_empty() {
            self.set_erreur("Entrée vide");
            return;
        }

        match self.calc.evaluate_avec_demarche(&s) {
            Ok((valeur, d)) => {
                let resultat = format!("{} = {valeur}", d.forme);
                self.set_resultat(resultat, d);
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
    }

    /// Opération directe sur (a, b) ; le résultat affiché est l’entrée d’historique.
    fn execute_operation(&mut self, op: Operation) {
        let (a, b) = (self.a, self.b);

        let issue = match op {
            Operation::Addition => {
                self.calc.add(a, b);
                Ok(())
            }
            Operation::Soustraction => {
                self.calc.subtract(a, b);
                Ok(())
            }
            Operation::Multiplication => {
                self.calc.multiply(a, b);
                Ok(())
            }
            Operation::Division => self.calc.divide(a, b).map(|_| ()),
            Operation::Puissance => self.calc.power(a, b).map(|_| ()),
            Operation::Racine => self.calc.sqrt(a).map(|_| ()),
            Operation::Factorielle => self.calc.factorial(a).map(|_| ()),
        };

        match issue {
            Ok(()) => {
                let derniere = self.calc.historique().last().cloned().unwrap_or_default();
                self.set_resultat(derniere, Demarche::default());
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Func,
    Op,
    Prefixe,
    Postfixe,
    OpenParen,
    CloseParen,
}

#[derive(Clone, Copy, Debug)]
enum Operation {
    Addition,
    Soustraction,
    Multiplication,
    Division,
    Puissance,
    Racine,
    Factorielle,
}
