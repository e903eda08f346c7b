pub mod channel_formatter;
pub mod color;
pub mod message_formatter;
pub mod report_formatter;
pub mod user_formatter;
pub mod workspace_formatter;
