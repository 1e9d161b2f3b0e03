//! Wire protocol text
//!
//! The protocol is plain text with no framing: every read chunk is one unit.
//! These helpers produce every string the relay ever writes to a client.

/// Sent to every client immediately on connect
pub const PROMPT: &str = "Please enter your user name\n";

/// Sent when the requested name is already taken, right before the connection closes
pub const NAME_COLLISION: &str = "There can't be two swords in a sheath. Please try again";

/// Announcement broadcast to the others when `name` joins
pub fn join_announcement(name: &str) -> String {
    format!("------ {} joined the server ------\n", name)
}

/// Announcement broadcast to the others when `name` leaves (only if enabled)
pub fn leave_announcement(name: &str) -> String {
    format!("------ {} left the server ------\n", name)
}

/// Frame a chat message with its sender's name
pub fn chat_payload(sender: &str, text: &str) -> String {
    format!("\n{} sent: {}\n", sender, text)
}

/// Decode a read chunk and strip its trailing line ending
///
/// Invalid UTF-8 is replaced rather than rejected. Every trailing `\n` is removed first,
/// then every trailing `\r`.
pub fn trim_line_ending(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.trim_end_matches('\n').trim_end_matches('\r').to_string()
}
