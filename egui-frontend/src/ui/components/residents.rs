//! Resident view: master list of registered units plus the add-resident
//! form.

use eframe::egui;
use log::warn;

use watermeter_backend::domain::commands::residents::AddResidentCommand;

use crate::ui::app_state::WaterMeterApp;

const CARDS_PER_ROW: usize = 3;

impl WaterMeterApp {
    pub fn draw_residents(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Daftar Warga");
        ui.label(egui::RichText::new("Master data penduduk dan unit rumah").weak());
        ui.add_space(16.0);

        self.draw_add_resident_form(ui);
        ui.add_space(20.0);
        self.draw_resident_cards(ui);
    }

    fn draw_add_resident_form(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong("Tambah Warga Baru");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Blok Rumah");
                ui.add(
                    egui::TextEdit::singleline(&mut self.new_house_number)
                        .hint_text("B29")
                        .desired_width(80.0),
                );
                ui.add_space(12.0);

                ui.label("Nama");
                ui.add(
                    egui::TextEdit::singleline(&mut self.new_resident_name)
                        .hint_text("Nama warga")
                        .desired_width(200.0),
                );
                ui.add_space(12.0);

                if ui.button("Tambah").clicked() {
                    self.submit_resident();
                }
            });

            if let Some(error) = &self.resident_form_error {
                ui.add_space(6.0);
                ui.colored_label(egui::Color32::RED, error);
            }
        });
    }

    fn submit_resident(&mut self) {
        self.resident_form_error = None;

        let command = AddResidentCommand {
            house_number: self.new_house_number.clone(),
            name: self.new_resident_name.clone(),
        };

        match self.resident_service.add_resident(command) {
            Ok(result) => {
                self.new_house_number.clear();
                self.new_resident_name.clear();
                self.show_success(format!("Warga {} terdaftar.", result.resident.name));
                self.mark_data_stale();
            }
            Err(e) => {
                warn!("Add resident rejected: {}", e);
                self.resident_form_error = Some(e.to_string());
            }
        }
    }

    fn draw_resident_cards(&self, ui: &mut egui::Ui) {
        if let Some((message, _)) = &self.success_message {
            ui.colored_label(egui::Color32::from_rgb(16, 150, 80), message);
            ui.add_space(8.0);
        }

        for chunk in self.residents.chunks(CARDS_PER_ROW) {
            ui.columns(CARDS_PER_ROW, |columns| {
                for (resident, column) in chunk.iter().zip(columns.iter_mut()) {
                    egui::Frame::group(column.style()).show(column, |ui| {
                        ui.set_width(ui.available_width());
                        ui.strong(&resident.name);
                        ui.label(
                            egui::RichText::new(format!("Blok Rumah: {}", resident.house_number))
                                .small()
                                .weak(),
                        );
                    });
                }
            });
            ui.add_space(4.0);
        }
    }
}
