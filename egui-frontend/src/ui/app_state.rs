//! Application state for the WaterMeter egui app.
//!
//! The app holds the backend services and per-view form state. Query
//! results are cached between frames and refreshed through
//! `mark_data_stale()` after every write or period change; all figures
//! come from the usage ledger, the UI never derives usage itself.

use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use shared::{AuthState, Resident};
use watermeter_backend::domain::models::usage::{DashboardSummary, ResidentUsageRow};
use watermeter_backend::domain::{AuthService, Period, ReadingService, ResidentService, UsageLedger};
use watermeter_backend::storage::JsonConnection;

/// How many residents the dashboard ranking shows.
pub const TOP_CONSUMERS_K: usize = 5;

/// How long success banners stay visible.
const SUCCESS_MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// Navigation tabs in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainTab {
    Dashboard,
    MeterInput,
    Residents,
}

/// Main application struct for the egui water meter tracker.
pub struct WaterMeterApp {
    // Backend services
    pub resident_service: ResidentService,
    pub reading_service: ReadingService,
    pub usage_ledger: UsageLedger,
    pub auth_service: AuthService,

    pub auth_state: AuthState,
    pub current_tab: MainTab,

    // Login form
    pub login_username: String,
    pub login_password: String,
    pub login_error: Option<String>,

    // Meter input form
    pub selected_resident_id: String,
    pub selected_month: u32,
    pub selected_year: i32,
    pub meter_value_input: String,
    pub search_query: String,
    pub input_error: Option<String>,

    // Add-resident form
    pub new_house_number: String,
    pub new_resident_name: String,
    pub resident_form_error: Option<String>,

    pub success_message: Option<(String, Instant)>,

    // Cached query results, refreshed when marked stale
    pub residents: Vec<Resident>,
    pub dashboard: Option<DashboardSummary>,
    pub resident_rows: Vec<ResidentUsageRow>,
    pub load_error: Option<String>,
    data_stale: bool,
}

impl WaterMeterApp {
    pub fn new() -> Result<Self> {
        let connection = Arc::new(JsonConnection::new_default()?);

        let auth_service = AuthService::new(connection.clone());
        let auth_state = auth_service.current_session()?;

        let now = Period::current();
        info!("Opening ledger at period {}", now.label());

        Ok(Self {
            resident_service: ResidentService::new(connection.clone()),
            reading_service: ReadingService::new(connection.clone()),
            usage_ledger: UsageLedger::new(connection.clone()),
            auth_service,
            auth_state,
            current_tab: MainTab::Dashboard,
            login_username: String::new(),
            login_password: String::new(),
            login_error: None,
            selected_resident_id: String::new(),
            selected_month: now.month,
            selected_year: now.year,
            meter_value_input: String::new(),
            search_query: String::new(),
            input_error: None,
            new_house_number: String::new(),
            new_resident_name: String::new(),
            resident_form_error: None,
            success_message: None,
            residents: Vec::new(),
            dashboard: None,
            resident_rows: Vec::new(),
            load_error: None,
            data_stale: true,
        })
    }

    /// The period currently selected in the meter input view.
    pub fn selected_period(&self) -> Period {
        Period::new(self.selected_month, self.selected_year)
    }

    /// Flag the cached query results for refresh on the next frame.
    pub fn mark_data_stale(&mut self) {
        self.data_stale = true;
    }

    /// Show a success banner for a few seconds.
    pub fn show_success(&mut self, message: impl Into<String>) {
        self.success_message = Some((message.into(), Instant::now()));
    }

    /// Refresh the cached query results from the backend.
    fn reload_data(&mut self) {
        let result = self
            .resident_service
            .list_residents()
            .and_then(|residents| {
                let dashboard = self.usage_ledger.dashboard(Period::current(), TOP_CONSUMERS_K)?;
                let rows = self.usage_ledger.resident_rows(self.selected_period())?;
                Ok((residents.residents, dashboard, rows))
            });

        match result {
            Ok((residents, dashboard, rows)) => {
                self.residents = residents;
                self.dashboard = Some(dashboard);
                self.resident_rows = rows;
                self.load_error = None;
            }
            Err(e) => {
                error!("Failed to load data: {}", e);
                self.load_error = Some(format!("Gagal memuat data: {}", e));
            }
        }

        self.data_stale = false;
    }

    fn expire_success_message(&mut self) {
        if let Some((_, shown_at)) = self.success_message {
            if shown_at.elapsed() > SUCCESS_MESSAGE_DURATION {
                self.success_message = None;
            }
        }
    }
}

impl eframe::App for WaterMeterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.expire_success_message();

        if !self.auth_state.is_authenticated {
            egui::CentralPanel::default().show(ctx, |ui| {
                self.draw_login_screen(ui);
            });
            return;
        }

        if self.data_stale {
            self.reload_data();
        }

        egui::SidePanel::left("sidebar")
            .exact_width(220.0)
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_sidebar(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = self.load_error.clone() {
                ui.colored_label(egui::Color32::RED, error);
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| match self.current_tab {
                MainTab::Dashboard => self.draw_dashboard(ui),
                MainTab::MeterInput => self.draw_meter_input(ui),
                MainTab::Residents => self.draw_residents(ui),
            });
        });
    }
}
