/// Decoded inbound chat event, independent of the transport it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_id: String,
    pub sender_name: String,
    pub channel_id: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender_id: &str, sender_name: &str, channel_id: &str, text: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            channel_id: channel_id.to_string(),
            text: text.to_string(),
        }
    }
}
