use std::collections::HashMap;

use chrono::Local;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{PortraitState, ViewState};
use crate::media::PreviewImage;

const PORTRAIT_DISPLAY_EDGE: f32 = 320.0;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub base_url: String,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    base_url: String,
    state: ViewState,
    portrait_textures: HashMap<String, TextureHandle>,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            base_url: startup.base_url,
            state: ViewState::new(),
            portrait_textures: HashMap::new(),
        };
        app.dispatch(BackendCommand::Refresh);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let UiEvent::PortraitLoaded { url, image } = &event {
                self.store_portrait_texture(ctx, url, image);
            }
            for follow_up in self.state.apply(event, Local::now()) {
                self.dispatch(follow_up);
            }
        }
    }

    fn store_portrait_texture(&mut self, ctx: &egui::Context, url: &str, image: &PreviewImage) {
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
        let texture = ctx.load_texture(
            format!("portrait:{url}"),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.portrait_textures.insert(url.to_string(), texture);
    }

    fn show_roster(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("character_bar")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                let blocked = self.state.is_blocked();
                ui.add_enabled_ui(!blocked, |ui| self.show_roster_entries(ui));
            });
    }

    fn show_roster_entries(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Characters");
            if ui.small_button("⟳").on_hover_text("Reload").clicked() {
                self.dispatch(BackendCommand::Refresh);
            }
        });
        ui.separator();

        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.state.roster.is_empty() {
                ui.weak("No characters loaded.");
            }
            for entry in &self.state.roster {
                let selected = self.state.is_selected(entry);
                let response = ui.add_sized(
                    [ui.available_width(), 24.0],
                    egui::Button::new(entry.name.as_str()).selected(selected),
                );
                if response.clicked() {
                    clicked = Some(entry.id.clone());
                }
            }
        });
        if let Some(id) = clicked {
            self.dispatch(BackendCommand::Select { id });
        }
    }

    fn show_detail(&mut self, ui: &mut egui::Ui) {
        let Some(character) = self.state.selected.clone() else {
            ui.centered_and_justified(|ui| {
                ui.weak("Select a character to see their details.");
            });
            return;
        };

        ui.heading(&character.name);
        ui.add_space(6.0);
        self.show_portrait(ui, &character.image, &character.name);
        ui.add_space(6.0);
        ui.label(egui::RichText::new(format!("Votes: {}", character.votes)).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.state.vote_input)
                    .id_salt("votes_input")
                    .desired_width(120.0)
                    .hint_text("Enter votes"),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add Votes").clicked() || submitted {
                let raw_input = self.state.vote_input.clone();
                self.dispatch(BackendCommand::AddVotes { raw_input });
            }
        });
        ui.add_space(4.0);
        if ui.button("Reset Votes").clicked() {
            self.dispatch(BackendCommand::ResetVotes);
        }
    }

    fn show_portrait(&self, ui: &mut egui::Ui, url: &str, name: &str) {
        if let Some(texture) = self.portrait_textures.get(url) {
            let mut size = texture.size_vec2();
            let scale = (PORTRAIT_DISPLAY_EDGE / size.x.max(size.y)).min(1.0);
            size *= scale;
            ui.add(egui::Image::new(texture).fit_to_exact_size(size))
                .on_hover_text(name);
            return;
        }

        match self.state.portraits.get(url) {
            Some(PortraitState::Failed(reason)) => {
                let err = UiError::from_message(UiErrorContext::Portrait, reason.clone());
                ui.weak(err.status_text()).on_hover_text(url);
            }
            Some(PortraitState::Loading) | Some(PortraitState::Ready) => {
                ui.spinner();
            }
            None => {
                ui.weak(url);
            }
        }
    }

    fn show_creation_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add a character");
        egui::Grid::new("character_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Name");
                ui.add(
                    egui::TextEdit::singleline(&mut self.state.new_name)
                        .id_salt("new_character_name")
                        .hint_text("Name"),
                );
                ui.end_row();
                ui.label("Image URL");
                ui.add(
                    egui::TextEdit::singleline(&mut self.state.new_image)
                        .id_salt("new_character_image")
                        .hint_text("https://..."),
                );
                ui.end_row();
            });
        if ui.button("Add Character").clicked() {
            let name = self.state.new_name.trim().to_string();
            let image = self.state.new_image.trim().to_string();
            self.dispatch(BackendCommand::CreateCharacter { name, image });
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(synced) = self.state.last_synced {
                        ui.weak(format!("synced {}", synced.format("%H:%M:%S")));
                    }
                    ui.weak(&self.base_url);
                });
            });
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Notice")
            .id(egui::Id::new("blocking_alert"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    dismissed = true;
                }
            });
        if dismissed {
            self.state.dismiss_alert();
        }
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        let blocked = self.state.is_blocked();
        self.show_status_bar(ctx);
        self.show_roster(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_detail(ui);
                    ui.add_space(16.0);
                    ui.separator();
                    self.show_creation_form(ui);
                });
            });
        });
        self.show_alert(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
