use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::export::export_csv;
use crate::data::filter::{filter_provinces, poverty_bounds, FilterSelection};
use crate::data::loader::{LoadCache, LoadError};
use crate::data::model::{Dataset, Table};
use crate::data::summary::{summarize, Summary};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    PovertyMap,
    Unemployment,
    LaborParticipation,
    Poverty,
    Boxplot,
    SchoolParticipation,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::PovertyMap,
        Tab::Unemployment,
        Tab::LaborParticipation,
        Tab::Poverty,
        Tab::Boxplot,
        Tab::SchoolParticipation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::PovertyMap => "Poverty map",
            Tab::Unemployment => "Open unemployment rate (%)",
            Tab::LaborParticipation => "Labour participation",
            Tab::Poverty => "Poverty",
            Tab::Boxplot => "Boxplot",
            Tab::SchoolParticipation => "School participation",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Workbook currently shown.
    pub source_path: PathBuf,

    /// Memoized loads, one per path ever opened.
    cache: LoadCache,

    /// Loaded dataset (None when the load failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Why the current source could not be loaded.
    pub load_error: Option<LoadError>,

    /// Side-panel selection.
    pub selection: FilterSelection,

    /// Province table after applying `selection` (cached).
    pub filtered: Table,

    /// Headline metrics of `filtered` (cached).
    pub summary: Summary,

    pub active_tab: Tab,

    /// Province picked in the regency drill-down.
    pub regency_province: Option<String>,

    /// Province picked in the school-participation tab.
    pub school_province: Option<String>,

    /// Status / error message of the last user action (export etc.).
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and load the configured workbook.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self {
            source_path: config.source_path.clone(),
            config,
            cache: LoadCache::default(),
            dataset: None,
            load_error: None,
            selection: FilterSelection::default(),
            filtered: Table::new("", Vec::new()),
            summary: Summary::default(),
            active_tab: Tab::default(),
            regency_province: None,
            school_province: None,
            status_message: None,
        };
        state.load_source();
        state
    }

    /// Load `source_path` through the cache and reset the view state.
    pub fn load_source(&mut self) {
        match self.cache.get_or_load(&self.source_path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                self.dataset = None;
                self.filtered = Table::new("", Vec::new());
                self.summary = Summary::default();
                self.load_error = Some(e);
            }
        }
    }

    /// Switch to another workbook.
    pub fn open(&mut self, path: PathBuf) {
        self.source_path = path;
        self.status_message = None;
        self.load_source();
    }

    /// Drop the cached outcome for the current path and read it again.
    pub fn reload(&mut self) {
        self.cache.invalidate(&self.source_path);
        self.load_source();
    }

    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::initial(&dataset.provinces, &dataset.province_columns);
        self.regency_province = None;
        self.school_province = None;
        self.load_error = None;
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute `filtered` and `summary` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filtered = filter_provinces(&ds.provinces, &ds.province_columns, &self.selection);
            self.summary = summarize(&self.filtered, &ds.province_columns);
        }
    }

    /// Toggle one province in the multi-select.
    pub fn toggle_province(&mut self, name: &str) {
        let selected = &mut self.selection.selected_provinces;
        if !selected.remove(name) {
            selected.insert(name.to_string());
        }
        self.refilter();
    }

    pub fn select_all_provinces(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.selected_provinces = ds.province_names().into_iter().collect();
            self.refilter();
        }
    }

    /// Clearing the multi-select removes the province filter altogether.
    pub fn select_no_provinces(&mut self) {
        self.selection.selected_provinces.clear();
        self.refilter();
    }

    /// Set the poverty range, keeping `low <= high`.
    pub fn set_poverty_range(&mut self, low: f64, high: f64) {
        let range = if low <= high { (low, high) } else { (high, low) };
        self.selection.poverty_range = Some(range);
        self.refilter();
    }

    /// Min/max of the poverty measure over the unfiltered table.
    pub fn poverty_bounds(&self) -> Option<(f64, f64)> {
        let ds = self.dataset.as_ref()?;
        poverty_bounds(&ds.provinces, &ds.province_columns)
    }

    /// Write the filtered table to `path`, reporting the outcome in the
    /// status line.
    pub fn export_filtered(&mut self, path: &Path) {
        match export_csv(&self.filtered, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} rows to {}",
                    self.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
