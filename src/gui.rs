use eframe::egui;
use eframe::egui::Color32;
use eframe::egui::RichText;
use eframe::egui::ScrollArea;
use eframe::egui::Ui;
use log::debug;

use crate::libquiz::agent::{self, Difficulty};
use crate::libquiz::config::Config;
use crate::libquiz::quiz::{Outcome, Session};

struct GuiState {
    config: Config,
    text: String,
    difficulty: Difficulty,
    question_count: u32,

    session: Option<Session>,
    // Outcome shown under each question after its check button was pressed.
    feedback: Vec<Option<Outcome>>,
    error: Option<String>,
}

impl GuiState {
    fn new(config: Config, text: String, question_count: u32, difficulty: Difficulty) -> Self {
        Self {
            config,
            text,
            difficulty,
            question_count,

            session: None,
            feedback: Vec::new(),
            error: None,
        }
    }

    /// Blocking generation on the UI thread; the one outbound call this app
    /// makes. A fresh session replaces the old one and clears all answers.
    fn generate(&mut self) {
        if self.text.trim().is_empty() {
            self.error = Some("Please enter some text first.".to_string());
            return;
        }
        self.error = None;
        match agent::generate_quiz(&self.config, &self.text, self.question_count, self.difficulty)
        {
            Ok(questions) => {
                debug!("[Gui] Installing a new session of {} questions", questions.len());
                self.feedback = vec![None; questions.len()];
                self.session = Some(Session::new(questions));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn reset(&mut self) {
        debug!("[Gui] Discarding the current session");
        self.session = None;
        self.feedback.clear();
    }

    fn draw_question_frame(&mut self, ui: &mut Ui, question_idx: usize) {
        let session = match &mut self.session {
            Some(session) => session,
            None => return,
        };
        let question = session.questions()[question_idx].clone();

        ui.label(
            RichText::new(format!("Q{}: {}", question_idx + 1, question.question)).strong(),
        );
        for (opt_idx, option) in question.options.iter().enumerate() {
            let checked = session.selection(question_idx) == Some(opt_idx);
            if ui.radio(checked, option.as_str()).clicked() {
                debug!("[Gui] Question {} -> option {}", question_idx + 1, opt_idx + 1);
                session.select(question_idx, opt_idx);
                self.feedback[question_idx] = None;
            }
        }
        if ui.button(format!("Check Answer {}", question_idx + 1)).clicked() {
            self.feedback[question_idx] = Some(session.check(question_idx));
        }
        match &self.feedback[question_idx] {
            Some(Outcome::Correct) => {
                ui.label(RichText::new("Correct!").color(Color32::GREEN));
            }
            Some(Outcome::Incorrect {
                answer,
                explanation,
            }) => {
                ui.label(
                    RichText::new(format!("Wrong. The correct answer is {}", answer))
                        .color(Color32::RED),
                );
                if !explanation.is_empty() {
                    ui.label(
                        RichText::new(format!("Explanation: {}", explanation))
                            .color(Color32::YELLOW),
                    );
                }
            }
            Some(Outcome::NoSelection) => {
                ui.label(RichText::new("Please select an option.").color(Color32::YELLOW));
            }
            None => {}
        }
        ui.separator();
    }
}

impl eframe::App for GuiState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("settings").show(ctx, |ui| {
            ui.heading("Settings");
            egui::ComboBox::from_label("Difficulty")
                .selected_text(self.difficulty.to_string())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.difficulty, Difficulty::Easy, "Easy");
                    ui.selectable_value(&mut self.difficulty, Difficulty::Medium, "Medium");
                    ui.selectable_value(&mut self.difficulty, Difficulty::Hard, "Hard");
                });
            ui.add(egui::Slider::new(&mut self.question_count, 1..=5).text("Questions"));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Quiz Master - AI Quiz Generator");
            ui.label("1. Provide Study Material");
            ui.add(
                egui::TextEdit::multiline(&mut self.text)
                    .hint_text("Paste your notes, article, or code snippet here")
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Generate Quiz").clicked() {
                self.generate();
            }
            if let Some(error) = &self.error {
                ui.label(RichText::new(error).color(Color32::RED));
            }

            if self.session.is_some() {
                ui.separator();
                ui.label("2. Take the Quiz");
                ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
                    let count = self.session.as_ref().map(Session::len).unwrap_or(0);
                    for idx in 0..count {
                        self.draw_question_frame(ui, idx);
                    }
                    if let Some(session) = &self.session {
                        ui.label(format!("Score: {}/{}", session.score(), session.len()));
                    }
                    if ui.button("Start Over").clicked() {
                        self.reset();
                    }
                });
            }
        });
    }
}

pub fn init_gui(
    config: Config,
    text: String,
    question_count: u32,
    difficulty: Difficulty,
) -> Result<(), eframe::Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 640.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Quiz Master",
        native_options,
        Box::new(|_cc| {
            Ok(Box::new(GuiState::new(
                config,
                text,
                question_count,
                difficulty,
            )))
        }),
    )?;

    Ok(())
}
