use crate::output::color::ColorWriter;
use crate::store::models::StoredUser;
use std::io::Result;
use termcolor::Color;

pub fn format_users_list(users: &[StoredUser], writer: &mut ColorWriter) -> Result<()> {
    writer.print_header(&format!("Users ({})", users.len()))?;
    writer.print_separator()?;

    for user in users {
        writer.print_colored(&user.name, Color::Cyan)?;
        writer.write(" ")?;
        writer.print_colored(&format!("({})", user.slack_id), Color::Yellow)?;

        if let Some(real_name) = &user.real_name {
            if !real_name.is_empty() {
                writer.write(&format!(" {}", real_name))?;
            }
        }
        if user.is_bot {
            writer.write(" ")?;
            writer.print_colored("bot", Color::Magenta)?;
        }
        if user.deleted {
            writer.write(" ")?;
            writer.print_colored("deactivated", Color::Red)?;
        }

        writer.writeln()?;
    }

    Ok(())
}
