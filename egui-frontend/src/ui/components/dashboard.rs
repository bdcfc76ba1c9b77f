//! Dashboard view: stat cards, the 12-month usage and revenue charts and
//! the top-consumers panel. Everything shown here comes from a single
//! `UsageLedger::dashboard` query.

use eframe::egui;
use egui_plot::{Bar, BarChart, CoordinatesFormatter, Corner, Line, Plot, PlotPoints};

use shared::MONTHS;
use watermeter_backend::domain::models::usage::DashboardSummary;

use crate::ui::app_state::WaterMeterApp;

/// Format a rupiah amount with thousand separators, e.g. "Rp 90.000".
pub(crate) fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

impl WaterMeterApp {
    pub fn draw_dashboard(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Dashboard Statistik");
        ui.label(egui::RichText::new("Ringkasan penggunaan air warga").weak());
        ui.add_space(16.0);

        let Some(dashboard) = self.dashboard.clone() else {
            ui.label("Memuat data...");
            return;
        };

        self.draw_stat_cards(ui, &dashboard);
        ui.add_space(20.0);

        ui.columns(2, |columns| {
            draw_usage_chart(&mut columns[0], &dashboard);
            draw_revenue_chart(&mut columns[1], &dashboard);
        });

        ui.add_space(20.0);
        self.draw_top_consumers(ui, &dashboard);
    }

    fn draw_stat_cards(&self, ui: &mut egui::Ui, dashboard: &DashboardSummary) {
        ui.columns(4, |columns| {
            stat_card(
                &mut columns[0],
                "Total Penggunaan",
                &format!("{:.1} m³", dashboard.current.usage),
                "Bulan ini",
            );
            stat_card(
                &mut columns[1],
                "Estimasi Pendapatan",
                &format_rupiah(dashboard.current.revenue),
                "Berdasarkan Rp 3.000/m³",
            );
            stat_card(
                &mut columns[2],
                "Warga Terdaftar",
                &dashboard.resident_count.to_string(),
                "Total Unit",
            );
            stat_card(
                &mut columns[3],
                "Rata-rata/Warga",
                &format!("{:.1} m³", dashboard.average_usage),
                "Bulan ini",
            );
        });
    }

    fn draw_top_consumers(&self, ui: &mut egui::Ui, dashboard: &DashboardSummary) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong(format!(
                "Pemakaian Tertinggi - {}",
                dashboard.current.period.label()
            ));
            ui.add_space(8.0);

            if dashboard.top_consumers.is_empty() {
                ui.label(egui::RichText::new("Belum ada data bulan ini.").weak());
                return;
            }

            for (rank, entry) in dashboard.top_consumers.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!("{}.", rank + 1));
                    ui.strong(&entry.resident.house_number);
                    ui.label(&entry.resident.name);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{:.1} m³", entry.usage));
                    });
                });
            }
        });
    }
}

fn stat_card(ui: &mut egui::Ui, title: &str, value: &str, caption: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(title).small().weak());
        ui.strong(egui::RichText::new(value).size(22.0));
        ui.label(egui::RichText::new(caption).small().weak());
    });
}

fn month_label(month: u32) -> &'static str {
    &MONTHS[month as usize][..3]
}

fn draw_usage_chart(ui: &mut egui::Ui, dashboard: &DashboardSummary) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.strong("Tren Penggunaan Air (m³)");
        ui.add_space(8.0);

        let points: PlotPoints = dashboard
            .monthly
            .iter()
            .enumerate()
            .map(|(i, summary)| [i as f64, summary.usage])
            .collect();

        let line = Line::new(points)
            .color(egui::Color32::from_rgb(59, 130, 246))
            .stroke(egui::Stroke::new(2.5, egui::Color32::from_rgb(59, 130, 246)));

        let labels: Vec<(u32, i32)> = dashboard
            .monthly
            .iter()
            .map(|s| (s.period.month, s.period.year))
            .collect();

        Plot::new("usage_chart")
            .height(240.0)
            .include_y(0.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_background(false)
            .coordinates_formatter(
                Corner::LeftBottom,
                CoordinatesFormatter::new(move |point, _bounds| {
                    let index = point.x.round() as isize;
                    match labels.get(index.max(0) as usize) {
                        Some((month, year)) => {
                            format!("{} {}: {:.1} m³", month_label(*month), year, point.y)
                        }
                        None => format!("{:.1} m³", point.y),
                    }
                }),
            )
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    });
}

fn draw_revenue_chart(ui: &mut egui::Ui, dashboard: &DashboardSummary) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.strong("Estimasi Pendapatan (IDR)");
        ui.add_space(8.0);

        let bars: Vec<Bar> = dashboard
            .monthly
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                Bar::new(i as f64, summary.revenue)
                    .fill(egui::Color32::from_rgb(16, 185, 129))
                    .width(0.6)
            })
            .collect();

        let labels: Vec<(u32, i32)> = dashboard
            .monthly
            .iter()
            .map(|s| (s.period.month, s.period.year))
            .collect();

        Plot::new("revenue_chart")
            .height(240.0)
            .include_y(0.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_background(false)
            .coordinates_formatter(
                Corner::LeftBottom,
                CoordinatesFormatter::new(move |point, _bounds| {
                    let index = point.x.round() as isize;
                    match labels.get(index.max(0) as usize) {
                        Some((month, year)) => {
                            format!("{} {}: {}", month_label(*month), year, format_rupiah(point.y))
                        }
                        None => format_rupiah(point.y),
                    }
                }),
            )
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah_groups_thousands() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(3000.0), "Rp 3.000");
        assert_eq!(format_rupiah(90_000.0), "Rp 90.000");
        assert_eq!(format_rupiah(1_234_567.0), "Rp 1.234.567");
    }

    #[test]
    fn test_month_label_truncates_display_name() {
        assert_eq!(month_label(0), "Jan");
        assert_eq!(month_label(7), "Agu");
    }
}
