use ratatui::{
    style::{Color, Style},
    text::Span,
};

const BARS: [&str; 8] = ["█", "▉", "▊", "▋", "▌", "▍", "▎", "▏"];

/// A horizontal bar proportional to `value / max`
#[derive(Clone, Copy, Debug, Default)]
pub struct Bar {
    pub value: f64,
    pub max: f64,
}

impl Bar {
    pub fn new(value: f64, max: f64) -> Self {
        Self { value, max }
    }

    /// Number of eighths of a character covered by the bar when drawn in
    /// `length` characters
    fn eighths(&self, length: u16) -> usize {
        if self.max <= 0.0 || self.value <= 0.0 {
            return 0;
        }

        let fraction = (self.value / self.max).min(1.0);
        (fraction * length as f64 * 8.0) as usize
    }

    /// Renders the bar using whole and partial block characters; the result
    /// is at most `length` characters wide
    pub fn to_span<'a>(self, length: u16, color: Color) -> Span<'a> {
        let eighths = self.eighths(length);

        let mut bar = BARS[0].repeat(eighths / 8);
        let remainder = eighths % 8;
        if remainder > 0 {
            bar.push_str(BARS[8 - remainder]);
        }

        Span::styled(bar, Style::default().fg(color))
    }
}
