mod bar;
mod chart;
mod misc;
mod table;

pub use bar::Bar;
pub use chart::BarChart;
pub use misc::{print_buffer, print_title};
pub use table::{NodeRow, NodeTable};
