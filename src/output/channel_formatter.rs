use crate::output::color::ColorWriter;
use crate::store::models::StoredChannel;
use std::io::Result;
use termcolor::Color;

pub fn format_channels_list(channels: &[StoredChannel], writer: &mut ColorWriter) -> Result<()> {
    writer.print_header(&format!("Channels ({})", channels.len()))?;
    writer.print_separator()?;

    for channel in channels {
        writer.print_colored(&format!("#{}", channel.name), Color::Cyan)?;
        writer.write(" ")?;
        writer.print_colored(&format!("({})", channel.slack_id), Color::Yellow)?;

        if channel.is_general {
            writer.write(" ")?;
            writer.print_colored("general", Color::Green)?;
        }
        if channel.is_archived {
            writer.write(" ")?;
            writer.print_colored("archived", Color::White)?;
        }

        writer.writeln()?;
    }

    Ok(())
}
