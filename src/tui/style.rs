//! Color constants and the glyph math that folds a band height into cells.

use ratatui::style::Color;

use crate::bands::{BandLayout, Polarity};
use crate::palette::{Palette, Rgb};

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Status line color for errors.
pub const STATUS_ERR: Color = Color::Red;
/// Status line color for confirmations.
pub const STATUS_OK: Color = Color::Green;
/// Horizon baseline color.
pub const HORIZON_FG: Color = Color::Gray;

/// Lower block elements, indexed by eighths filled (0 = blank).
const BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One rendered terminal cell of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripCell {
    pub glyph: char,
    /// Color of the filled (lower) part.
    pub fg: Option<Rgb>,
    /// Color above the fill: the next band down, or none.
    pub bg: Option<Rgb>,
}

impl StripCell {
    const BLANK: Self = Self {
        glyph: ' ',
        fg: None,
        bg: None,
    };
}

pub fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// The cell at `row` (0 = bottom) of a strip `rows` tall for one deviation.
///
/// The outermost band reached is drawn as a partial block over the previous
/// band's color, mirroring how the stacked PNG areas overlap.
pub fn strip_cell(
    deviation: f64,
    layout: &BandLayout,
    palette: &Palette,
    rows: u16,
    row: u16,
) -> StripCell {
    let Some(polarity) = Polarity::BOTH
        .into_iter()
        .find(|p| p.magnitude(deviation) > 0.0)
    else {
        return StripCell::BLANK;
    };
    let magnitude = polarity.magnitude(deviation);
    let bands = layout.bands();
    let size = layout.band_size();

    let top = ((magnitude / size).ceil() as usize).clamp(1, bands) - 1;
    let frac = layout.band(top).fold(magnitude) / size;
    let colors = palette.colors(polarity, bands);
    let fg = colors[top];
    let bg = top.checked_sub(1).map(|i| colors[i]);

    let total_eighths = (frac * f64::from(rows) * 8.0).round() as i64;
    let here = (total_eighths - i64::from(row) * 8).clamp(0, 8) as usize;
    StripCell {
        glyph: BLOCKS[here],
        fg: Some(fg),
        bg,
    }
}
