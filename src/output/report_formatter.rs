use crate::import::ImportReport;
use crate::output::color::ColorWriter;
use std::io::Result;
use termcolor::Color;

pub fn format_import_report(report: &ImportReport, writer: &mut ColorWriter) -> Result<()> {
    writer.print_header(&format!(
        "Imported '{}' as workspace {}",
        report.workspace_name, report.workspace_id
    ))?;
    writer.print_separator()?;

    writer.print_field("Users", &report.users.to_string())?;
    writer.print_field("Channels", &report.channels.to_string())?;
    writer.print_field("Messages", &report.messages.to_string())?;

    if report.skipped_entries > 0 {
        writer.print_colored(
            &format!("{} message files skipped (invalid JSON)", report.skipped_entries),
            Color::Yellow,
        )?;
        writer.writeln()?;
    }

    match report.assets_cached {
        Some(cached) => {
            writer.print_field(
                "Assets cached",
                &format!("{}/{}", cached, report.assets_discovered),
            )?;
        }
        None => {
            writer.print_field(
                "Assets discovered",
                &format!("{} (caching skipped)", report.assets_discovered),
            )?;
        }
    }

    Ok(())
}
