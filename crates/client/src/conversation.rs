//! Conversation-related types.

use serde::Serialize;

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model, always the first message if present.
    System,
    /// Text typed by the user.
    User,
    /// Text generated by the model.
    Assistant,
}

/// A single entry in the transcript.
///
/// Messages are immutable once created, there are only accessors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    #[inline]
    pub(crate) fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the role of the author.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of the message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// The ordered list of messages sent to the model on every call.
///
/// A transcript contains at most one system message, and it's always the
/// first one. Only [`Transcript::reset`] can put a system message in.
#[derive(Clone, Default, Debug)]
pub(crate) struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Drops every message, and seeds the transcript with the given system
    /// prompt if any.
    pub fn reset(&mut self, system_prompt: Option<&str>) {
        self.messages.clear();
        if let Some(prompt) = system_prompt {
            self.messages.push(Message::new(Role::System, prompt));
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    #[inline]
    pub fn push_user(&mut self, content: &str) {
        self.messages.push(Message::new(Role::User, content));
    }

    #[inline]
    pub fn push_assistant(&mut self, content: String) {
        self.messages.push(Message::new(Role::Assistant, content));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reset_with_system_prompt() {
        let mut transcript = Transcript::default();
        transcript.push_user("Hi");
        transcript.push_assistant("Hello".to_owned());

        transcript.reset(Some("Be brief."));
        let roles: Vec<_> =
            transcript.messages().iter().map(Message::role).collect();
        assert_eq!(roles, [Role::System]);
        assert_eq!(transcript.messages()[0].content(), "Be brief.");
    }

    #[test]
    fn test_reset_without_system_prompt() {
        let mut transcript = Transcript::default();
        transcript.reset(Some("Be brief."));
        transcript.push_user("Hi");

        transcript.reset(None);
        assert!(transcript.is_empty());

        transcript.push_user("Hi");
        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_serialize_message() {
        let message = Message::new(Role::Assistant, "Hello");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "role": "assistant", "content": "Hello" })
        );
    }
}
