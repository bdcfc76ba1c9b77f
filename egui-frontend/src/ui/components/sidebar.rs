//! Sidebar navigation: app title, tab buttons, session info and logout.

use eframe::egui;
use log::error;

use crate::ui::app_state::{MainTab, WaterMeterApp};

impl WaterMeterApp {
    pub fn draw_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new("WaterMeter").strong());
        });
        ui.add_space(16.0);
        ui.separator();

        self.nav_button(ui, MainTab::Dashboard, "Dashboard");
        self.nav_button(ui, MainTab::MeterInput, "Catat Meteran");
        self.nav_button(ui, MainTab::Residents, "Data Warga");

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.add_space(12.0);
            if ui.button("Logout").clicked() {
                self.logout();
            }
            if let Some(username) = &self.auth_state.username {
                ui.label(egui::RichText::new(username).strong());
                ui.label(egui::RichText::new("Admin").small().weak());
            }
            ui.separator();
        });
    }

    fn nav_button(&mut self, ui: &mut egui::Ui, tab: MainTab, label: &str) {
        let selected = self.current_tab == tab;
        if ui
            .add_sized(
                [ui.available_width(), 36.0],
                egui::SelectableLabel::new(selected, label),
            )
            .clicked()
        {
            self.current_tab = tab;
            self.mark_data_stale();
        }
    }

    fn logout(&mut self) {
        if let Err(e) = self.auth_service.logout() {
            error!("Failed to clear session: {}", e);
        }
        self.auth_state = shared::AuthState::default();
        self.login_username.clear();
        self.login_password.clear();
        self.login_error = None;
    }
}
