use std::fmt;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Row, Table, Widget},
};

use crate::slurm::{NodeCapability, NodeLoad};

use super::misc::COLUMN_SPACING;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Column {
    GPUs,
    Memory,
    CPUs,
    Node,
}

impl Column {
    const ALL: [Column; 4] = [Column::GPUs, Column::Memory, Column::CPUs, Column::Node];
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Column::GPUs => "GPUs",
            Column::Memory => "MEMORY",
            Column::CPUs => "CPUs",
            Column::Node => "NODE",
        };

        f.write_str(label)
    }
}

/// A single node shown in a [`NodeTable`]
#[derive(Clone, Debug)]
pub struct NodeRow<'a> {
    pub name: &'a str,
    pub load: &'a NodeLoad,
    pub capability: Option<&'a NodeCapability>,
    pub color: Color,
    /// Free VRAM if this is the best node
    pub best: Option<i64>,
}

impl NodeRow<'_> {
    fn text<'a>(&self, column: Column) -> Line<'a> {
        let mut style = Style::default().fg(self.color);
        if self.best.is_some() {
            style = style.add_modifier(Modifier::BOLD);
        }

        match column {
            Column::GPUs => {
                let default = NodeCapability::default();
                let capability = self.capability.unwrap_or(&default);
                Line::styled(
                    format!(
                        "{}×{}({}G)",
                        self.load.free.gpus, capability.gpu_model, capability.gpu_mem
                    ),
                    style,
                )
            }
            Column::Memory => Line::styled(format!("{}G", self.load.free.mem), style),
            Column::CPUs => Line::styled(self.load.free.cpu.to_string(), style),
            Column::Node => {
                let mut spans = vec![Span::styled(self.name.to_string(), style)];
                if let Some(vram) = self.best {
                    spans.push(Span::raw(format!("  ⟵ Best Node ({}G VRAM)", vram)));
                }

                Line::from(spans)
            }
        }
    }
}

/// Table of nodes and their free resources
#[derive(Clone, Debug, Default)]
pub struct NodeTable<'a> {
    rows: Vec<NodeRow<'a>>,
}

impl<'a> NodeTable<'a> {
    pub fn new(rows: Vec<NodeRow<'a>>) -> Self {
        Self { rows }
    }

    /// Width of each column, fitting both header and values
    fn widths(&self) -> Vec<u16> {
        Column::ALL
            .iter()
            .map(|&column| {
                self.rows
                    .iter()
                    .map(|row| row.text(column).width())
                    .fold(column.to_string().chars().count(), usize::max) as u16
            })
            .collect()
    }

    pub fn width(&self) -> u16 {
        let widths = self.widths();
        let spacing = widths.len().saturating_sub(1) as u16 * COLUMN_SPACING;

        widths.iter().sum::<u16>() + spacing
    }

    /// Number of rows including the header
    pub fn height(&self) -> u16 {
        self.rows.len() as u16 + 1
    }
}

impl Widget for &NodeTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let constraints = self
            .widths()
            .into_iter()
            .map(Constraint::Length)
            .collect::<Vec<_>>();

        let rows = self
            .rows
            .iter()
            .map(|row| Row::new(Column::ALL.iter().map(|&column| row.text(column))));
        let header = Row::new(Column::ALL.iter().map(|column| column.to_string()));

        Table::new(rows, constraints)
            .column_spacing(COLUMN_SPACING)
            .header(header)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slurm::Tres;

    fn render(table: &NodeTable) -> Vec<String> {
        let area = Rect::new(0, 0, table.width(), table.height());
        let mut buf = Buffer::empty(area);
        table.render(area, &mut buf);

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
    fn test_node_table() {
        let load = NodeLoad {
            total: Tres::default(),
            free: Tres {
                cpu: 12,
                mem: 128,
                gpus: 2,
            },
            state: vec!["MIXED".into()],
        };
        let capability = NodeCapability {
            gpu_model: "A100".into(),
            gpu_mem: 80,
        };

        let table = NodeTable::new(vec![
            NodeRow {
                name: "gpu01",
                load: &load,
                capability: Some(&capability),
                color: Color::Yellow,
                best: Some(160),
            },
            NodeRow {
                name: "cpu01",
                load: &load,
                capability: None,
                color: Color::Yellow,
                best: None,
            },
        ]);

        assert_eq!(table.height(), 3);
        assert_eq!(
            render(&table),
            vec![
                "GPUs         MEMORY  CPUs  NODE",
                "2×A100(80G)  128G    12    gpu01  ⟵ Best Node (160G VRAM)",
                "2×(0G)       128G    12    cpu01",
            ]
        );
    }
}
