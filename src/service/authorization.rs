use std::collections::HashSet;

use crate::models::chat_message::ChatMessage;

pub trait AuthorizationPolicy: Send + Sync {
    fn is_authorized(&self, message: &ChatMessage) -> bool;
}

/// Organisers allowed to create occurrences, matched by sender id or name (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    admins: HashSet<String>,
}

impl AdminList {
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let admins = admins
            .into_iter()
            .map(|admin| admin.as_ref().trim().to_lowercase())
            .filter(|admin| !admin.is_empty())
            .collect();
        Self { admins }
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

impl AuthorizationPolicy for AdminList {
    fn is_authorized(&self, message: &ChatMessage) -> bool {
        self.admins.contains(&message.sender_id.to_lowercase())
            || self.admins.contains(&message.sender_name.to_lowercase())
    }
}
