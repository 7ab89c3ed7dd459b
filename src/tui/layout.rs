//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use super::runtime::{App, Status};
use super::style;
use crate::bands::BandLayout;
use crate::palette::Palette;
use crate::report::format_thousands;
use crate::week::DaySeries;

/// Width of the date label column.
const LABEL_WIDTH: u16 = 12;
const HOURS: u16 = 24;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(7),    // strips
            Constraint::Length(1), // status
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_strips(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, chunks[3]);
}

/// Header bar: week, date span, horizon, bands.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let v = &app.view;
    let header = Line::from(vec![
        Span::styled(
            " HORIZON ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("Setmana {}/{}", v.week_number(), v.total_weeks()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ {} – {} │ horitzó {} MW │ {} bandes × {} MW ",
            v.selection.first_date(),
            v.selection.last_date(),
            format_thousands(v.horizon),
            v.layout.bands(),
            format_thousands(v.layout.band_size()),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// One strip per day plus an hour axis.
fn render_strips(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Consum en MW ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let days = &app.view.days;
    if days.is_empty() || inner.height < 2 {
        return;
    }

    let mut constraints: Vec<Constraint> = days
        .iter()
        .map(|_| Constraint::Ratio(1, days.len() as u32))
        .collect();
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (day, row) in days.iter().zip(rows.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(HOURS)])
            .split(*row);
        let label_y = cols[0].y + cols[0].height.saturating_sub(1) / 2;
        let label_area = Rect::new(cols[0].x, label_y, cols[0].width, 1.min(cols[0].height));
        frame.render_widget(Paragraph::new(day.date.to_string()), label_area);
        frame.render_widget(
            HorizonStrip {
                day,
                layout: &app.view.layout,
                palette: app.palette(),
            },
            cols[1],
        );
    }

    if let Some(axis) = rows.last() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(HOURS)])
            .split(*axis);
        frame.render_widget(Paragraph::new(hour_axis(cols[1].width)), cols[1]);
    }
}

/// Hour tick labels every two hours for a strip `width` cells wide.
pub fn hour_axis(width: u16) -> String {
    let cell = (width / HOURS).max(1) as usize;
    let mut line = vec![' '; cell * HOURS as usize];
    for hour in (0..HOURS as usize).step_by(2) {
        for (i, ch) in hour.to_string().chars().enumerate() {
            if let Some(slot) = line.get_mut(hour * cell + i) {
                *slot = ch;
            }
        }
    }
    line.into_iter().collect()
}

/// A day's horizon strip drawn with block glyphs, one column group per hour.
struct HorizonStrip<'a> {
    day: &'a DaySeries,
    layout: &'a BandLayout,
    palette: &'a Palette,
}

impl Widget for HorizonStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let cell_w = (area.width / HOURS).max(1);
        for point in &self.day.points {
            let Ok(hour) = u16::try_from(point.hour) else {
                continue;
            };
            for row in 0..area.height {
                let cell = style::strip_cell(point.deviation, self.layout, self.palette, area.height, row);
                let y = area.bottom() - 1 - row;
                for dx in 0..cell_w {
                    let x = area.x + hour * cell_w + dx;
                    if x >= area.right() {
                        break;
                    }
                    if let Some(target) = buf.cell_mut((x, y)) {
                        target.set_char(cell.glyph);
                        target.set_fg(cell.fg.map_or(style::HORIZON_FG, style::to_color));
                        if let Some(bg) = cell.bg {
                            target.set_bg(style::to_color(bg));
                        }
                    }
                }
            }
        }
    }
}

/// Status line: last save path or error.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(Status::Info(msg)) => Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(style::STATUS_OK),
        )),
        Some(Status::Error(msg)) => Line::from(Span::styled(
            format!(" {msg}"),
            Style::default()
                .fg(style::STATUS_ERR)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  ←/→:Week  +/-:Bands  s:Save PNG",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_axis_marks_even_hours() {
        let axis = hour_axis(48);
        assert_eq!(axis.chars().count(), 48);
        assert!(axis.starts_with("0   2   4"));
        assert_eq!(axis.chars().nth(44), Some('2'));
        assert_eq!(axis.chars().nth(45), Some('2'));
    }

    #[test]
    fn narrow_axis_still_has_every_hour_slot() {
        let axis = hour_axis(10);
        assert_eq!(axis.chars().count(), 24);
    }
}
