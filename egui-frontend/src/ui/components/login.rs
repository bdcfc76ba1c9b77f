//! Login screen.
//!
//! A thin form over the backend login gate. The gate itself is a demo
//! placeholder (fixed password), so the screen says as much.

use eframe::egui;
use log::warn;

use watermeter_backend::domain::commands::auth::LoginCommand;

use crate::ui::app_state::WaterMeterApp;

impl WaterMeterApp {
    pub fn draw_login_screen(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);

            ui.heading(egui::RichText::new("WaterMeter").size(32.0).strong());
            ui.label("Sistem Manajemen Air Warga");
            ui.add_space(24.0);

            let form_width = 320.0;
            ui.allocate_ui(egui::vec2(form_width, 260.0), |ui| {
                ui.label("Username");
                ui.add(
                    egui::TextEdit::singleline(&mut self.login_username)
                        .hint_text("Masukkan username")
                        .desired_width(form_width),
                );
                ui.add_space(8.0);

                ui.label("Password");
                let password_response = ui.add(
                    egui::TextEdit::singleline(&mut self.login_password)
                        .password(true)
                        .hint_text("Password (admin)")
                        .desired_width(form_width),
                );
                ui.add_space(12.0);

                let submitted = ui
                    .add_sized([form_width, 36.0], egui::Button::new("Masuk"))
                    .clicked()
                    || (password_response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter)));

                if submitted {
                    self.attempt_login();
                }

                if let Some(error) = &self.login_error {
                    ui.add_space(8.0);
                    ui.colored_label(egui::Color32::RED, error);
                }
            });
        });
    }

    fn attempt_login(&mut self) {
        let command = LoginCommand {
            username: self.login_username.clone(),
            password: self.login_password.clone(),
        };

        match self.auth_service.login(command) {
            Ok(result) => {
                self.auth_state = result.auth_state;
                self.login_password.clear();
                self.login_error = None;
                self.mark_data_stale();
            }
            Err(e) => {
                warn!("Login rejected: {}", e);
                self.login_error = Some(e.to_string());
            }
        }
    }
}
