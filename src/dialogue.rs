/// Text shown once every message has been read.
pub const SETTLED_TEXT: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueStep {
    /// Index of the message now on screen.
    Message(usize),
    /// The sequence just settled; reveal the heart and the summary.
    Settled,
    /// Already settled, nothing changes.
    Ignored,
}

/// Steps through a fixed list of lines, one per tap. The first line is on
/// screen from the start.
#[derive(Debug, Clone)]
pub struct DialogueSequencer {
    messages: Vec<String>,
    index: usize,
    settled: bool,
}

impl DialogueSequencer {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            messages,
            index: 0,
            settled: false,
        }
    }

    pub fn advance(&mut self) -> DialogueStep {
        if self.settled {
            return DialogueStep::Ignored;
        }

        if self.index + 1 < self.messages.len() {
            self.index += 1;
            DialogueStep::Message(self.index)
        } else {
            self.settled = true;
            DialogueStep::Settled
        }
    }

    pub fn current_text(&self) -> &str {
        if self.settled {
            return SETTLED_TEXT;
        }
        self.messages
            .get(self.index)
            .map(String::as_str)
            .unwrap_or(SETTLED_TEXT)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_dialogue;

    #[test]
    fn test_messages_shown_in_order_then_settle_once() {
        let messages = default_dialogue();
        let mut dialogue = DialogueSequencer::new(messages.clone());

        let mut shown = vec![dialogue.current_text().to_string()];
        for expected in 1..messages.len() {
            assert_eq!(dialogue.advance(), DialogueStep::Message(expected));
            shown.push(dialogue.current_text().to_string());
        }
        assert_eq!(shown, messages);

        assert_eq!(dialogue.advance(), DialogueStep::Settled);
        assert_eq!(dialogue.current_text(), SETTLED_TEXT);
        assert!(dialogue.is_settled());

        assert_eq!(dialogue.advance(), DialogueStep::Ignored);
        assert_eq!(dialogue.advance(), DialogueStep::Ignored);
        assert_eq!(dialogue.index(), messages.len() - 1);
    }

    #[test]
    fn test_single_message_settles_on_first_tap() {
        let mut dialogue = DialogueSequencer::new(vec!["oi".to_string()]);
        assert_eq!(dialogue.current_text(), "oi");
        assert_eq!(dialogue.advance(), DialogueStep::Settled);
    }

    #[test]
    fn test_empty_dialogue_settles_immediately() {
        let mut dialogue = DialogueSequencer::new(Vec::new());
        assert_eq!(dialogue.current_text(), SETTLED_TEXT);
        assert_eq!(dialogue.advance(), DialogueStep::Settled);
    }
}
