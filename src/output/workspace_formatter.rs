use crate::output::color::ColorWriter;
use crate::store::models::StoredWorkspace;
use std::io::Result;
use termcolor::Color;

pub fn format_workspaces_list(
    workspaces: &[StoredWorkspace],
    writer: &mut ColorWriter,
) -> Result<()> {
    writer.print_header(&format!("Workspaces ({})", workspaces.len()))?;
    writer.print_separator()?;

    for workspace in workspaces {
        writer.print_colored(&format!("[{}] ", workspace.id), Color::Yellow)?;
        writer.print_colored(&workspace.name, Color::Cyan)?;
        writer.write(&format!(
            "  imported {}",
            workspace.imported_at.format("%Y-%m-%d %H:%M:%S")
        ))?;
        writer.writeln()?;
    }

    Ok(())
}
