//! Meter input view: the reading entry form plus the searchable
//! per-resident history table for the selected period.
//!
//! The table renders three states per resident distinctly: not recorded,
//! recorded with a baseline, and recorded without a baseline ("tanpa
//! acuan") so a genuine zero-usage month never masquerades as missing
//! data.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::warn;

use shared::MONTHS;
use watermeter_backend::domain::commands::readings::{DeleteReadingCommand, UpsertReadingCommand};
use watermeter_backend::domain::models::usage::ResidentUsageRow;

use super::dashboard::format_rupiah;
use crate::ui::app_state::WaterMeterApp;

/// Years selectable in the entry form.
const YEARS: std::ops::RangeInclusive<i32> = 2024..=2030;

impl WaterMeterApp {
    pub fn draw_meter_input(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Input Data Meteran Air");
        ui.label(egui::RichText::new("Masukkan data penggunaan air untuk setiap warga").weak());
        ui.add_space(16.0);

        self.draw_entry_form(ui);
        ui.add_space(24.0);
        self.draw_history_table(ui);
    }

    fn draw_entry_form(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("reading_form")
                .num_columns(2)
                .spacing([24.0, 12.0])
                .show(ui, |ui| {
                    ui.label("Warga");
                    self.resident_selector(ui);
                    ui.end_row();

                    ui.label("Bulan");
                    self.month_selector(ui);
                    ui.end_row();

                    ui.label("Tahun");
                    self.year_selector(ui);
                    ui.end_row();

                    ui.label("Nilai Meteran (m³)");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.meter_value_input)
                            .hint_text("Masukkan nilai meteran")
                            .desired_width(220.0),
                    );
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Simpan Data").clicked() {
                    self.submit_reading();
                }

                if let Some(error) = &self.input_error {
                    ui.colored_label(egui::Color32::RED, error);
                } else if let Some((message, _)) = &self.success_message {
                    ui.colored_label(egui::Color32::from_rgb(16, 150, 80), message);
                }
            });
        });
    }

    fn resident_selector(&mut self, ui: &mut egui::Ui) {
        let selected_label = self
            .residents
            .iter()
            .find(|r| r.id == self.selected_resident_id)
            .map(|r| format!("{} - {}", r.house_number, r.name))
            .unwrap_or_else(|| "Pilih warga".to_string());

        egui::ComboBox::from_id_source("resident_selector")
            .selected_text(selected_label)
            .width(220.0)
            .show_ui(ui, |ui| {
                for resident in &self.residents {
                    let label = format!("{} - {}", resident.house_number, resident.name);
                    ui.selectable_value(&mut self.selected_resident_id, resident.id.clone(), label);
                }
            });
    }

    fn month_selector(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        egui::ComboBox::from_id_source("month_selector")
            .selected_text(MONTHS[self.selected_month as usize])
            .width(220.0)
            .show_ui(ui, |ui| {
                for (index, name) in MONTHS.iter().enumerate() {
                    if ui
                        .selectable_value(&mut self.selected_month, index as u32, *name)
                        .changed()
                    {
                        changed = true;
                    }
                }
            });

        if changed {
            self.mark_data_stale();
        }
    }

    fn year_selector(&mut self, ui: &mut egui::Ui) {
        let mut changed = false;
        egui::ComboBox::from_id_source("year_selector")
            .selected_text(self.selected_year.to_string())
            .width(220.0)
            .show_ui(ui, |ui| {
                for year in YEARS {
                    if ui
                        .selectable_value(&mut self.selected_year, year, year.to_string())
                        .changed()
                    {
                        changed = true;
                    }
                }
            });

        if changed {
            self.mark_data_stale();
        }
    }

    fn submit_reading(&mut self) {
        self.input_error = None;

        if self.selected_resident_id.is_empty() {
            self.input_error = Some("Pilih warga terlebih dahulu".to_string());
            return;
        }

        let value = match self.meter_value_input.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                self.input_error = Some("Nilai meteran harus berupa angka".to_string());
                return;
            }
        };

        let command = UpsertReadingCommand {
            resident_id: self.selected_resident_id.clone(),
            month: self.selected_month,
            year: self.selected_year,
            value,
        };

        match self.reading_service.upsert_reading(command) {
            Ok(_) => {
                self.meter_value_input.clear();
                self.show_success("Data meteran berhasil disimpan!");
                self.mark_data_stale();
            }
            Err(e) => {
                warn!("Reading rejected: {}", e);
                self.input_error = Some(e.to_string());
            }
        }
    }

    fn draw_history_table(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong(format!(
                "Data Terinput: {} {}",
                MONTHS[self.selected_month as usize],
                self.selected_year
            ));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.search_query)
                        .hint_text("Cari warga...")
                        .desired_width(200.0),
                );
            });
        });
        ui.add_space(8.0);

        let query = self.search_query.to_lowercase();
        let rows: Vec<ResidentUsageRow> = self
            .resident_rows
            .iter()
            .filter(|row| {
                query.is_empty()
                    || row.resident.name.to_lowercase().contains(&query)
                    || row.resident.house_number.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();

        if rows.is_empty() {
            ui.label(egui::RichText::new("Tidak ada data ditemukan.").weak());
            return;
        }

        let mut delete_request: Option<String> = None;

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(70.0))
            .column(Column::remainder().at_least(140.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::auto().at_least(130.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::auto().at_least(60.0))
            .header(24.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Rumah");
                });
                header.col(|ui| {
                    ui.strong("Nama Warga");
                });
                header.col(|ui| {
                    ui.strong("Kumulatif Ini");
                });
                header.col(|ui| {
                    ui.strong("Pemakaian");
                });
                header.col(|ui| {
                    ui.strong("Tagihan");
                });
                header.col(|_ui| {});
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(24.0, |mut table_row| {
                        table_row.col(|ui| {
                            ui.strong(&row.resident.house_number);
                        });
                        table_row.col(|ui| {
                            ui.label(&row.resident.name);
                        });
                        table_row.col(|ui| match row.record.current {
                            Some(value) => {
                                ui.monospace(format!("{:.1} m³", value));
                            }
                            None => {
                                ui.label(egui::RichText::new("Belum input").weak().italics());
                            }
                        });
                        table_row.col(|ui| {
                            if !row.record.recorded() {
                                ui.label("-");
                            } else if row.record.no_baseline {
                                ui.label(egui::RichText::new("Tanpa acuan").weak());
                            } else {
                                ui.label(format!("{:.1} m³", row.record.usage));
                            }
                        });
                        table_row.col(|ui| {
                            if !row.record.recorded() || row.record.no_baseline {
                                ui.label("-");
                            } else {
                                ui.label(format_rupiah(row.record.bill));
                            }
                        });
                        table_row.col(|ui| {
                            if let Some(reading_id) = &row.reading_id {
                                if ui.small_button("Hapus").clicked() {
                                    delete_request = Some(reading_id.clone());
                                }
                            }
                        });
                    });
                }
            });

        if let Some(reading_id) = delete_request {
            self.delete_reading(reading_id);
        }
    }

    fn delete_reading(&mut self, reading_id: String) {
        match self
            .reading_service
            .delete_reading(DeleteReadingCommand { reading_id })
        {
            Ok(result) => {
                if result.deleted {
                    self.show_success("Data meteran dihapus.");
                }
                self.mark_data_stale();
            }
            Err(e) => {
                self.input_error = Some(format!("Gagal menghapus data: {}", e));
            }
        }
    }
}
