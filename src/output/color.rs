use std::io::{self, Write};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Buffered writer that applies ANSI colors unless disabled by flag or the
/// NO_COLOR convention.
pub struct ColorWriter {
    buffer: Buffer,
    no_color: bool,
}

impl ColorWriter {
    pub fn new(no_color: bool) -> Self {
        let colors_enabled = !no_color && std::env::var("NO_COLOR").is_err();

        Self {
            buffer: Buffer::ansi(),
            no_color: !colors_enabled,
        }
    }

    pub fn into_string(self) -> Result<String, io::Error> {
        String::from_utf8(self.buffer.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn print_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if !self.no_color {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(color));
            self.buffer.set_color(&spec)?;
        }
        write!(self.buffer, "{}", text)?;
        if !self.no_color {
            self.buffer.reset()?;
        }
        Ok(())
    }

    /// Bold cyan section header on its own line.
    pub fn print_header(&mut self, text: &str) -> io::Result<()> {
        if !self.no_color {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Cyan)).set_bold(true);
            self.buffer.set_color(&spec)?;
        }
        writeln!(self.buffer, "{}", text)?;
        if !self.no_color {
            self.buffer.reset()?;
        }
        Ok(())
    }

    pub fn print_field(&mut self, label: &str, value: &str) -> io::Result<()> {
        self.print_colored(label, Color::Blue)?;
        write!(self.buffer, ": ")?;
        writeln!(self.buffer, "{}", value)?;
        Ok(())
    }

    pub fn print_separator(&mut self) -> io::Result<()> {
        self.print_colored(&"─".repeat(80), Color::White)?;
        writeln!(self.buffer)?;
        Ok(())
    }

    pub fn write(&mut self, text: &str) -> io::Result<()> {
        write!(self.buffer, "{}", text)
    }

    pub fn writeln(&mut self) -> io::Result<()> {
        writeln!(self.buffer)
    }
}
