use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use signup_client::{
    view::{LOADING_TEXT, LOAD_FAILED_TEXT, NO_PARTICIPANTS_TEXT, SELECT_PLACEHOLDER},
    ActivityCard, BannerState, ListView, ParticipantsView,
};
use signup_shared::domain::ActivityName;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent, orchestration::dispatch_backend_command, reducer::RosterState,
};

const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub struct SignupGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: RosterState,
}

impl SignupGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        message_hide_after: Duration,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: RosterState::new(message_hide_after),
        };
        let load = app.state.request_roster();
        app.dispatch(load);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.banner, Instant::now());
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let Some(follow_up) = self.state.apply(event, Instant::now()) {
                self.dispatch(follow_up);
            }
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Extracurricular Activities");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").clicked() {
                    let load = self.state.request_roster();
                    self.dispatch(load);
                }
            });
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let (text, fill, stroke) = match self.state.banner.state() {
            BannerState::Hidden => return,
            BannerState::Success(text) => (
                text.clone(),
                egui::Color32::from_rgb(40, 94, 58),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(86, 160, 108)),
            ),
            BannerState::Error(text) => (
                text.clone(),
                egui::Color32::from_rgb(111, 53, 53),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
            ),
        };

        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.state.banner.dismiss();
                        }
                    });
                });
            });
    }

    fn show_signup_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Sign Up for an Activity");
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Student Email").strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.state.form.email)
                .hint_text("your-email@mergington.edu"),
        );
        ui.add_space(6.0);

        ui.label(egui::RichText::new("Select Activity").strong());
        let options = self.state.view.options().to_vec();
        let selected_text = self
            .state
            .form
            .activity
            .as_ref()
            .map(ActivityName::to_string)
            .unwrap_or_else(|| SELECT_PLACEHOLDER.to_string());
        egui::ComboBox::from_id_salt("activity_select")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.state.form.activity, None, SELECT_PLACEHOLDER);
                for option in options {
                    ui.selectable_value(
                        &mut self.state.form.activity,
                        Some(option.value),
                        option.label,
                    );
                }
            });
        ui.add_space(10.0);

        if ui.button("Sign Up").clicked() {
            if let Some(cmd) = self.state.submit_signup() {
                self.dispatch(cmd);
            }
        }
    }

    fn show_activity_card(ui: &mut egui::Ui, card: &ActivityCard) -> Option<(ActivityName, String)> {
        let mut remove_request = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(card.name.as_str()).strong().size(16.0));
            ui.label(&card.description);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Schedule:").strong());
                ui.label(&card.schedule);
            });
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Availability:").strong());
                ui.label(card.availability_text());
            });

            match &card.participants {
                ParticipantsView::Empty => {
                    ui.label(egui::RichText::new(NO_PARTICIPANTS_TEXT).italics());
                }
                ParticipantsView::Listed(rows) => {
                    ui.label(egui::RichText::new("Participants:").strong());
                    for email in rows {
                        ui.horizontal(|ui| {
                            ui.label(format!("• {email}"));
                            if ui
                                .small_button("×")
                                .on_hover_text("Remove participant")
                                .clicked()
                            {
                                remove_request = Some((card.name.clone(), email.clone()));
                            }
                        });
                    }
                }
            }
        });
        remove_request
    }

    fn show_roster(&mut self, ui: &mut egui::Ui) {
        ui.heading("Available Activities");
        ui.add_space(8.0);

        let mut remove_request = None;
        match self.state.view.list() {
            ListView::Loading => {
                ui.label(LOADING_TEXT);
            }
            ListView::Failed => {
                ui.label(LOAD_FAILED_TEXT);
            }
            ListView::Cards(cards) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for card in cards {
                        if let Some(request) = Self::show_activity_card(ui, card) {
                            remove_request = Some(request);
                        }
                        ui.add_space(8.0);
                    }
                });
            }
        }

        if let Some((activity, email)) = remove_request {
            self.state.request_removal(activity, email);
        }
    }

    fn show_removal_confirmation(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.state.pending_removal().map(|pending| pending.prompt()) else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Confirm removal")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(prompt);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    confirmed = ui.button("Unregister").clicked();
                    cancelled = ui.button("Cancel").clicked();
                });
            });

        if confirmed {
            if let Some(cmd) = self.state.confirm_removal() {
                self.dispatch(cmd);
            }
        } else if cancelled {
            self.state.cancel_removal();
        }
    }
}

impl eframe::App for SignupGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let now = Instant::now();
        self.state.banner.tick(now);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.show_header(ui);
            self.show_status_banner(ui);
            ui.add_space(6.0);
        });

        egui::SidePanel::right("signup_form")
            .resizable(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.show_signup_form(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_roster(ui);
        });

        self.show_removal_confirmation(ctx);

        let repaint_after = self
            .state
            .banner
            .time_until_hide(now)
            .map_or(IDLE_REPAINT, |remaining| remaining.min(IDLE_REPAINT));
        ctx.request_repaint_after(repaint_after);
    }
}
