use std::collections::HashMap;
use std::io::Result;

use termcolor::Color;

use crate::output::color::ColorWriter;
use crate::store::models::{StoredChannel, StoredMessage, StoredUser};

pub fn format_messages(
    messages: &[StoredMessage],
    channel: &StoredChannel,
    user_map: &HashMap<String, StoredUser>,
    writer: &mut ColorWriter,
) -> Result<()> {
    writer.print_header(&format!("#{} ({} messages)", channel.name, messages.len()))?;
    writer.print_separator()?;

    for message in messages {
        writer.print_colored(&format_ts(&message.ts), Color::Green)?;
        writer.write("  ")?;

        let author = author_name(message, user_map);
        writer.print_colored(&author, Color::Cyan)?;

        if message.thread_ts.as_deref().is_some_and(|t| t != message.ts) {
            writer.write(" ")?;
            writer.print_colored("(thread reply)", Color::Yellow)?;
        }

        writer.writeln()?;
        if let Some(text) = &message.text {
            if !text.is_empty() {
                writer.write(&format!("  {}", text))?;
                writer.writeln()?;
            }
        }
        if let Some(subtype) = &message.subtype {
            writer.write("  ")?;
            writer.print_colored(&format!("[{}]", subtype), Color::White)?;
            writer.writeln()?;
        }
    }

    Ok(())
}

/// Resolve the author display name: user lookup by origin id first, then the
/// bot username, then the raw id.
fn author_name(message: &StoredMessage, user_map: &HashMap<String, StoredUser>) -> String {
    if let Some(user_id) = &message.user_id {
        if let Some(user) = user_map.get(user_id) {
            return user.name.clone();
        }
        return user_id.clone();
    }
    if let Some(username) = &message.username {
        return username.clone();
    }
    if let Some(bot_id) = &message.bot_id {
        return bot_id.clone();
    }
    "(unknown)".to_string()
}

/// Render the `<seconds>.<microseconds>` timestamp as a wall-clock time,
/// falling back to the raw string if it does not parse.
fn format_ts(ts: &str) -> String {
    ts.split('.')
        .next()
        .and_then(|seconds| seconds.parse::<i64>().ok())
        .and_then(|seconds| chrono::DateTime::from_timestamp(seconds, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
