use std::io::{self, Write};

use crossterm::{
    queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier},
};

pub const COLUMN_SPACING: u16 = 2;

/// Writes the contents of `buffer` line by line, omitting trailing blanks.
/// Styling is only emitted if `color` is set.
pub fn print_buffer<W: Write>(out: &mut W, buffer: &Buffer, color: bool) -> io::Result<()> {
    let area = buffer.area;

    for y in area.top()..area.bottom() {
        let end = (area.left()..area.right())
            .rev()
            .find(|&x| buffer[(x, y)].symbol() != " ")
            .map_or(area.left(), |x| x + 1);

        let mut last = None;
        for x in area.left()..end {
            let cell = &buffer[(x, y)];

            if color && last != Some((cell.fg, cell.modifier)) {
                queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                if cell.fg != Color::Reset {
                    queue!(out, SetForegroundColor(to_crossterm(cell.fg)))?;
                }
                if cell.modifier.contains(Modifier::BOLD) {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }

                last = Some((cell.fg, cell.modifier));
            }

            queue!(out, Print(cell.symbol()))?;
        }

        if color && last.is_some() {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        queue!(out, Print("\n"))?;
    }

    out.flush()
}

/// Writes a (bold) section title
pub fn print_title<W: Write>(out: &mut W, title: &str, color: bool) -> io::Result<()> {
    if color {
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(title),
            SetAttribute(Attribute::Reset),
            Print("\n")
        )?;
    } else {
        queue!(out, Print(title), Print("\n"))?;
    }

    out.flush()
}

fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Reset => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::Gray => style::Color::Grey,
        Color::DarkGray => style::Color::DarkGrey,
        Color::LightRed => style::Color::Red,
        Color::LightGreen => style::Color::Green,
        Color::LightYellow => style::Color::Yellow,
        Color::LightBlue => style::Color::Blue,
        Color::LightMagenta => style::Color::Magenta,
        Color::LightCyan => style::Color::Cyan,
        Color::White => style::Color::White,
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
        Color::Indexed(i) => style::Color::AnsiValue(i),
    }
}
