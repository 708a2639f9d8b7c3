use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::slurm::{BestNode, NodeCapabilities, NodeGroups, NodeLoads, SlurmError, UserUsage};
use crate::widgets::{print_buffer, print_title, BarChart, NodeRow, NodeTable};

/// Indentation of tables and charts relative to section titles
const INDENT: u16 = 4;

/// Node availability as shown by the `load` report
#[derive(Clone, Debug)]
pub struct NodeReport {
    pub loads: NodeLoads,
    pub capabilities: NodeCapabilities,
    pub groups: NodeGroups,
    pub best: BestNode,
}

impl NodeReport {
    pub fn new(loads: NodeLoads, capabilities: NodeCapabilities) -> Result<Self, SlurmError> {
        let groups = NodeGroups::classify(&loads);
        let best = BestNode::select(&loads, &capabilities)?;

        Ok(Self {
            loads,
            capabilities,
            groups,
            best,
        })
    }

    /// Prints every node, grouped by availability
    pub fn print<W: Write>(&self, out: &mut W, color: bool) -> io::Result<()> {
        // The best node is not highlighted among nodes without free GPUs
        let sections = [
            ("🔥 Unused Nodes", &self.groups.idle, Color::Green, true),
            ("✨ Free GPUs", &self.groups.gpu_available, Color::Yellow, true),
            ("💀 No GPUs", &self.groups.no_gpu, Color::Red, false),
        ];

        for (idx, (title, names, row_color, best)) in sections.into_iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }

            let table = NodeTable::new(self.rows(names, row_color, best));

            print_title(out, title, color)?;
            print_widget(out, &table, table.width(), table.height(), color)?;
        }

        Ok(())
    }

    /// Prints only the best node, colored by the group it belongs to
    pub fn print_best<W: Write>(&self, out: &mut W, color: bool) -> io::Result<()> {
        let name = &self.best.name;
        let row_color = if self.groups.no_gpu.contains(name) {
            Color::Red
        } else if self.groups.gpu_available.contains(name) {
            Color::Yellow
        } else {
            Color::Green
        };

        let names = BTreeSet::from([name.clone()]);
        let table = NodeTable::new(self.rows(&names, row_color, true));

        print_widget(out, &table, table.width(), table.height(), color)
    }

    fn rows<'a>(
        &'a self,
        names: &'a BTreeSet<String>,
        color: Color,
        best: bool,
    ) -> Vec<NodeRow<'a>> {
        names
            .iter()
            .filter_map(|name| {
                let load = self.loads.get(name)?;

                Some(NodeRow {
                    name,
                    load,
                    capability: self.capabilities.get(name),
                    color,
                    best: (best && *name == self.best.name).then_some(self.best.vram),
                })
            })
            .collect()
    }
}

/// Per-user resource consumption as shown by the `blame` report
#[derive(Clone, Debug)]
pub struct UsageReport {
    /// Length of the reporting window in days
    pub days: u32,
    pub users: BTreeMap<String, UserUsage>,
}

impl UsageReport {
    pub fn print<W: Write>(&self, out: &mut W, color: bool) -> io::Result<()> {
        let charts: [(&str, &str, fn(&UserUsage) -> Duration); 4] = [
            ("Compute Time:", "Hours", |u| u.elapsed),
            ("CPU Time:", "CPU Hours", |u| u.cpu_time),
            ("GPU Time:", "GPU Hours", |u| u.gpu_time),
            ("VRAM Time:", "Gb.Hours", |u| u.vram_time),
        ];

        writeln!(out, "Cluster usage in the last {} days:", self.days)?;
        for (idx, (title, unit, metric)) in charts.into_iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }

            let chart = BarChart::new(
                unit,
                self.users
                    .iter()
                    .map(|(user, usage)| (user.clone(), hours(metric(usage)))),
            );

            print_title(out, title, color)?;
            print_widget(out, &chart, chart.width(), chart.height(), color)?;
        }

        Ok(())
    }
}

fn hours(duration: Duration) -> f64 {
    duration.as_secs_f64() / 3600.0
}

/// Renders `widget` off-screen and prints the result
fn print_widget<W, T>(
    out: &mut W,
    widget: T,
    width: u16,
    height: u16,
    color: bool,
) -> io::Result<()>
where
    W: Write,
    T: Widget,
{
    let mut buffer = Buffer::empty(Rect::new(0, 0, width + INDENT, height));
    widget.render(Rect::new(INDENT, 0, width, height), &mut buffer);

    print_buffer(out, &buffer, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slurm::{NodeCapability, NodeLoad, PastJob, Tres};

    fn report() -> NodeReport {
        let mut loads = NodeLoads::new();
        let mut capabilities = NodeCapabilities::new();
        for (name, gpus, mem, state) in [
            ("gpu01", 4, 256, "IDLE"),
            ("gpu02", 1, 64, "MIXED"),
            ("gpu03", 0, 32, "ALLOCATED"),
        ] {
            loads.insert(
                name.to_string(),
                NodeLoad {
                    total: Tres::default(),
                    free: Tres { cpu: 8, mem, gpus },
                    state: vec![state.to_string()],
                },
            );
            capabilities.insert(
                name.to_string(),
                NodeCapability {
                    gpu_model: "A100".into(),
                    gpu_mem: 40,
                },
            );
        }

        NodeReport::new(loads, capabilities).unwrap()
    }

    fn print(f: impl Fn(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_node_report() {
        let report = report();
        assert_eq!(report.best.name, "gpu01");
        assert_eq!(report.best.vram, 160);

        let output = print(|out| report.print(out, false));
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "🔥 Unused Nodes");
        assert!(lines[2].contains("4×A100(40G)"));
        assert!(lines[2].ends_with("gpu01  ⟵ Best Node (160G VRAM)"));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "✨ Free GPUs");
        assert!(lines[6].ends_with("gpu02"));
        assert_eq!(lines[8], "💀 No GPUs");
        assert!(lines[10].contains("0×A100(40G)"));
        assert_eq!(lines.len(), 11);
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_best_node_report() {
        let output = print(|out| report().print_best(out, false));
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("GPUs"));
        assert!(lines[1].ends_with("gpu01  ⟵ Best Node (160G VRAM)"));
    }

    #[test]
    fn test_usage_report() {
        let hour = Duration::from_secs(3600);
        let jobs = [
            PastJob {
                user: "alice".into(),
                elapsed: 2 * hour,
                cpus: 4,
                ..Default::default()
            },
            PastJob {
                user: "bob".into(),
                elapsed: hour,
                cpus: 2,
                gpus: 1,
                gpu: NodeCapability {
                    gpu_model: "A100".into(),
                    gpu_mem: 40,
                },
                ..Default::default()
            },
        ];

        let report = UsageReport {
            days: 7,
            users: UserUsage::aggregate(&jobs),
        };

        let output = print(|out| report.print(out, false));
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Cluster usage in the last 7 days:");
        assert_eq!(lines[1], "Compute Time:");
        assert!(lines[2].trim_start().starts_with("alice:"));
        assert!(lines[2].ends_with(" 2.00 Hours"));
        assert!(lines[3].ends_with(" 1.00 Hours"));
        assert_eq!(lines[5], "CPU Time:");
        assert!(lines[6].ends_with(" 8.00 CPU Hours"));
        assert_eq!(lines[9], "GPU Time:");
        assert!(lines[10].trim_start().starts_with("bob  :"));
        assert_eq!(lines[13], "VRAM Time:");
        assert!(lines[14].ends_with(" 40.00 Gb.Hours"));
    }
}
