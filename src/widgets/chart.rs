use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    text::{Line, Span},
    widgets::Widget,
};

use super::bar::Bar;

/// Length of the longest bar
const BAR_WIDTH: u16 = 60;

/// Horizontal bar chart comparing one value per label
#[derive(Clone, Debug, Default)]
pub struct BarChart {
    unit: String,
    rows: Vec<(String, f64)>,
}

impl BarChart {
    /// Creates a chart with rows sorted by descending value
    pub fn new<I>(unit: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut rows = rows.into_iter().collect::<Vec<_>>();
        rows.sort_by(|(a_label, a), (b_label, b)| {
            b.total_cmp(a).then_with(|| a_label.cmp(b_label))
        });

        Self {
            unit: unit.to_string(),
            rows,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let max = self.rows.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();

        self.rows
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::raw(format!("{:<width$}: ", label, width = label_width)),
                    Bar::new(*value, max).to_span(BAR_WIDTH, Color::Cyan),
                    Span::raw(format!(" {:.2} {}", value, self.unit)),
                ])
            })
            .collect()
    }

    pub fn width(&self) -> u16 {
        self.lines()
            .iter()
            .map(|line| line.width())
            .max()
            .unwrap_or_default() as u16
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }
}

impl Widget for &BarChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (line, y) in self.lines().iter().zip(area.top()..area.bottom()) {
            buf.set_line(area.left(), y, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(chart: &BarChart) -> Vec<String> {
        let area = Rect::new(0, 0, chart.width(), chart.height());
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_bar_chart() {
        let chart = BarChart::new(
            "Hours",
            vec![("bob".to_string(), 1.0), ("alice".to_string(), 2.0)],
        );

        assert_eq!(chart.height(), 2);
        assert_eq!(
            render(&chart),
            vec![
                format!("alice: {} 2.00 Hours", "█".repeat(60)),
                format!("bob  : {} 1.00 Hours", "█".repeat(30)),
            ]
        );
    }

    #[test]
    fn test_bar_chart_ties_and_zero() {
        let chart = BarChart::new(
            "GPU Hours",
            vec![
                ("b".to_string(), 0.0),
                ("c".to_string(), 0.0),
                ("a".to_string(), 0.0),
            ],
        );

        assert_eq!(
            render(&chart),
            vec![
                "a:  0.00 GPU Hours",
                "b:  0.00 GPU Hours",
                "c:  0.00 GPU Hours"
            ]
        );
    }
}
