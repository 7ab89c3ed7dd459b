//! PNG rendering: one horizon strip per day, stacked top to bottom.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::bands::Polarity;
use crate::error::{HorizonError, Result};
use crate::palette::{Palette, Rgb};
use crate::report::format_thousands;
use crate::week::{DaySeries, WeekView};

/// Last hour on the x axis.
const X_MAX_HOUR: f64 = 23.0;
/// Tick count on the hour axis (every two hours).
const HOUR_TICKS: usize = 12;
/// Horizon line color.
const HORIZON_GRAY: RGBColor = RGBColor(0x77, 0x77, 0x77);

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Figure geometry in inches at a given resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub dpi: u32,
    pub width_in: f64,
    /// Height of one day strip.
    pub row_height_in: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            width_in: 12.0,
            row_height_in: 1.8,
        }
    }
}

impl RenderOptions {
    fn px(&self, inches: f64) -> u32 {
        (inches * f64::from(self.dpi)).round().max(1.0) as u32
    }

    /// Points to pixels at this resolution.
    fn font_px(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    fn title_px(&self) -> u32 {
        self.px(0.7)
    }

    fn axis_px(&self) -> u32 {
        self.px(0.55)
    }

    fn label_px(&self) -> u32 {
        self.px(1.1)
    }

    /// Pixel size of a figure with `rows` day strips.
    pub fn figure_size(&self, rows: usize) -> (u32, u32) {
        let rows = rows.max(1) as u32;
        let width = self.px(self.width_in);
        let height = self.title_px() + rows * self.px(self.row_height_in) + self.axis_px();
        (width, height)
    }
}

/// File name for a saved week: `horizon_week_<NN>_<label>_<first>_to_<last>.png`.
pub fn output_file_name(view: &WeekView, label: &str) -> String {
    format!(
        "horizon_week_{:02}_{label}_{}_to_{}.png",
        view.week_number(),
        view.selection.first_date(),
        view.selection.last_date()
    )
}

/// Renders `view` into `out_dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`HorizonError::Io`] if the directory cannot be created and
/// [`HorizonError::Render`] if drawing or encoding fails.
pub fn save_png(
    view: &WeekView,
    palette: &Palette,
    opts: &RenderOptions,
    label: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|e| HorizonError::io(out_dir, e))?;
    let path = out_dir.join(output_file_name(view, label));
    render_png(view, palette, opts, &path)?;
    info!(path = %path.display(), "saved horizon graph");
    Ok(path)
}

/// Renders `view` as a PNG at `path`.
///
/// # Errors
///
/// Returns [`HorizonError::Render`] if drawing or encoding fails.
pub fn render_png(view: &WeekView, palette: &Palette, opts: &RenderOptions, path: &Path) -> Result<()> {
    let (w, h) = opts.figure_size(view.days.len());
    debug!(width = w, height = h, rows = view.days.len(), "rendering figure");
    let root = BitMapBackend::new(path, (w, h)).into_drawing_area();
    draw_figure(&root, view, palette, opts).map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

fn render_err<E: std::fmt::Display>(e: E) -> HorizonError {
    HorizonError::Render(e.to_string())
}

/// Draws the title and every day strip onto `root`.
fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &WeekView,
    palette: &Palette,
    opts: &RenderOptions,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let title_font = ("sans-serif", opts.font_px(12.0));
    let body = root.titled(
        &format!(
            "Horizon Graph – Setmana {} – Consum en MW:",
            view.week_number()
        ),
        title_font,
    )?;
    let body = body.titled(
        &format!(
            "Horitzó (mitja de consum)= {} MW",
            format_thousands(view.horizon)
        ),
        title_font,
    )?;

    let rows = view.days.len();
    let (_, body_h) = body.dim_in_pixel();
    let axis_px = opts.axis_px();
    let row_px = (body_h.saturating_sub(axis_px) / rows.max(1) as u32).max(1);

    let mut rest = body;
    for (i, day) in view.days.iter().enumerate() {
        if i + 1 == rows {
            // last strip takes the remainder, including the hour axis
            draw_day(&rest, day, view, palette, opts, true)?;
            break;
        }
        let (row, tail) = rest.split_vertically(row_px);
        draw_day(&row, day, view, palette, opts, false)?;
        rest = tail;
    }
    Ok(())
}

/// Draws one strip: date label, folded band areas and the horizon line.
fn draw_day<DB: DrawingBackend>(
    row: &DrawingArea<DB, Shift>,
    day: &DaySeries,
    view: &WeekView,
    palette: &Palette,
    opts: &RenderOptions,
    last: bool,
) -> DrawResult<DB> {
    let axis_px = if last { opts.axis_px() } else { 0 };
    let (label_area, plot_area) = row.split_horizontally(opts.label_px());

    let (label_w, label_h) = label_area.dim_in_pixel();
    let label_style = TextStyle::from(("sans-serif", opts.font_px(10.0)).into_font())
        .pos(Pos::new(HPos::Right, VPos::Center));
    let label_pos = (
        label_w as i32 - opts.px(0.1) as i32,
        (label_h.saturating_sub(axis_px) / 2) as i32,
    );
    label_area.draw(&Text::new(day.date.to_string(), label_pos, label_style))?;

    let layout = &view.layout;
    let band_size = layout.band_size();
    let mut chart = ChartBuilder::on(&plot_area)
        .margin_top(opts.px(0.04))
        .margin_right(opts.px(0.3))
        .x_label_area_size(axis_px)
        .y_label_area_size(0)
        .build_cartesian_2d(0.0_f64..X_MAX_HOUR, 0.0_f64..band_size)?;

    let hour_fmt = |h: &f64| format!("{h:.0}");
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .disable_y_axis()
        .x_labels(HOUR_TICKS)
        .x_label_formatter(&hour_fmt)
        .x_label_style(("sans-serif", opts.font_px(9.0)));
    if last {
        mesh.x_desc("Hora del dia");
    } else {
        mesh.disable_x_axis();
    }
    mesh.draw()?;

    for polarity in Polarity::BOTH {
        let colors = palette.colors(polarity, layout.bands());
        for (heights, color) in day.band_heights(layout, polarity).into_iter().zip(colors) {
            chart.draw_series(AreaSeries::new(heights, 0.0, to_plotters(color).filled()))?;
        }
    }

    let stroke = (opts.dpi / 100).max(1);
    chart.draw_series(dash_segments(0.0, X_MAX_HOUR, 0.35, 0.2).into_iter().map(
        |(a, b)| PathElement::new(vec![(a, 0.0), (b, 0.0)], HORIZON_GRAY.stroke_width(stroke)),
    ))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.0, 0.0), (X_MAX_HOUR, band_size)],
        BLACK.mix(0.6).stroke_width(1),
    )))?;
    Ok(())
}

fn to_plotters(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Splits `[x0, x1]` into dash segments of length `dash` separated by `gap`.
pub fn dash_segments(x0: f64, x1: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let mut segments = Vec::new();
    if dash <= 0.0 || gap < 0.0 || x1 <= x0 {
        return segments;
    }
    let mut start = x0;
    while start < x1 {
        segments.push((start, (start + dash).min(x1)));
        start += dash + gap;
    }
    segments
}
