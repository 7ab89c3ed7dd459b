//! Interactive viewer state: the loaded dataset and the week on screen.

use std::path::PathBuf;

use crate::config::PlotConfig;
use crate::dataset::Dataset;
use crate::palette::Palette;
use crate::render::{self, RenderOptions};
use crate::week::WeekView;

/// Band counts reachable with `+`/`-`.
pub const MIN_BANDS: usize = 1;
pub const MAX_BANDS: usize = 9;

/// Outcome of the last user action, shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// TUI application state.
pub struct App {
    dataset: Dataset,
    palette: Palette,
    render_opts: RenderOptions,
    label: String,
    out_dir: PathBuf,
    /// Week currently displayed.
    pub view: WeekView,
    /// Last action result.
    pub status: Option<Status>,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Creates the viewer around an already-built week.
    pub fn new(dataset: Dataset, view: WeekView, cfg: &PlotConfig) -> Self {
        Self {
            dataset,
            palette: cfg.palette(),
            render_opts: cfg.render_options(),
            label: cfg.data.label.clone(),
            out_dir: cfg.plot.output_dir.clone(),
            view,
            status: None,
            quit: false,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Shows the following week, stopping at the last one.
    pub fn next_week(&mut self) {
        let week = self.view.week_number();
        if week < self.view.total_weeks() {
            self.rebuild(week + 1, self.view.layout.bands());
        }
    }

    /// Shows the preceding week, stopping at week 1.
    pub fn prev_week(&mut self) {
        let week = self.view.week_number();
        if week > 1 {
            self.rebuild(week - 1, self.view.layout.bands());
        }
    }

    pub fn more_bands(&mut self) {
        let bands = self.view.layout.bands();
        if bands < MAX_BANDS {
            self.rebuild(self.view.week_number(), bands + 1);
        }
    }

    pub fn fewer_bands(&mut self) {
        let bands = self.view.layout.bands();
        if bands > MIN_BANDS {
            self.rebuild(self.view.week_number(), bands - 1);
        }
    }

    /// Writes the PNG of the current week to the output directory.
    pub fn save(&mut self) {
        let result = render::save_png(
            &self.view,
            &self.palette,
            &self.render_opts,
            &self.label,
            &self.out_dir,
        );
        self.status = Some(match result {
            Ok(path) => Status::Info(format!("Gràfic guardat a: {}", path.display())),
            Err(e) => Status::Error(e.to_string()),
        });
    }

    fn rebuild(&mut self, week: usize, bands: usize) {
        let week = i64::try_from(week).unwrap_or(i64::MAX);
        match WeekView::build(&self.dataset, week, bands) {
            Ok(view) => {
                self.view = view;
                self.status = None;
            }
            Err(e) => self.status = Some(Status::Error(e.to_string())),
        }
    }
}
