pub mod chat_message;
pub mod occurrence;
