use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::ImportError;

const USERS_FILE: &str = "users.json";
const CHANNELS_FILE: &str = "channels.json";

/// A Slack export zip opened for reading.
///
/// Exports are sometimes wrapped in a single top-level folder; the directory
/// prefix of the entry ending in `users.json` is taken as the root prefix and
/// stripped from all subsequent lookups. Entry contents are decompressed on
/// read, not up front, since archives can be large.
#[derive(Debug)]
pub struct ExportArchive {
    zip: ZipArchive<Cursor<Vec<u8>>>,
    root_prefix: String,
}

/// A `<channel-dir>/<file>.json` entry holding one day of channel messages.
#[derive(Debug, Clone)]
pub struct MessageDayEntry {
    /// Full entry name inside the archive, root prefix included.
    pub entry_name: String,
    /// Directory segment after root stripping; matched against channel names.
    pub channel_dir: String,
}

impl ExportArchive {
    /// Open an export archive from an in-memory buffer, locating the root
    /// prefix and verifying both required top-level files are present.
    pub fn open(bytes: Vec<u8>) -> Result<Self, ImportError> {
        let zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ImportError::MalformedArchive(format!("not a readable zip archive: {e}")))?;

        let users_entry = zip
            .file_names()
            .find(|name| !name.ends_with('/') && name.ends_with(USERS_FILE))
            .ok_or_else(|| ImportError::MalformedArchive(format!("missing {USERS_FILE}")))?;

        let root_prefix = users_entry[..users_entry.len() - USERS_FILE.len()].to_string();

        let channels_entry = format!("{root_prefix}{CHANNELS_FILE}");
        if !zip.file_names().any(|name| name == channels_entry) {
            return Err(ImportError::MalformedArchive(format!("missing {CHANNELS_FILE}")));
        }

        Ok(Self { zip, root_prefix })
    }

    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    pub fn read_users(&mut self) -> Result<String, ImportError> {
        let name = format!("{}{USERS_FILE}", self.root_prefix);
        self.read_entry(&name)
    }

    pub fn read_channels(&mut self) -> Result<String, ImportError> {
        let name = format!("{}{CHANNELS_FILE}", self.root_prefix);
        self.read_entry(&name)
    }

    /// Decompress one named entry to a string.
    pub fn read_entry(&mut self, name: &str) -> Result<String, ImportError> {
        let mut entry = self
            .zip
            .by_name(name)
            .map_err(|e| ImportError::MalformedArchive(format!("cannot open entry {name}: {e}")))?;
        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Every `.json` file entry whose root-stripped path is exactly
    /// `<channel-dir>/<file>`, tolerating `/` and `\` separators.
    /// Anything else (top-level files, nested attachments dirs) is ignored.
    pub fn message_day_entries(&self) -> Vec<MessageDayEntry> {
        self.zip
            .file_names()
            .filter_map(|name| {
                if name.ends_with('/') || !name.ends_with(".json") {
                    return None;
                }
                let stripped = name.strip_prefix(&self.root_prefix).unwrap_or(name);
                let parts: Vec<&str> = stripped.split(['/', '\\']).collect();
                if parts.len() != 2 {
                    return None;
                }
                Some(MessageDayEntry {
                    entry_name: name.to_string(),
                    channel_dir: parts[0].to_string(),
                })
            })
            .collect()
    }
}
