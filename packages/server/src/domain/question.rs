//! Quiz questions.

/// An emoji puzzle and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub emoji: String,
    pub answer: String,
}

impl Question {
    pub fn new(emoji: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            answer: answer.into(),
        }
    }
}

/// The fixed question catalog.
pub fn default_catalog() -> Vec<Question> {
    [
        ("🐍🎮", "snake game"),
        ("🐸", "frog"),
        ("🚗💨", "fast car"),
        ("🛸👽", "ufo"),
        ("🏹🐗", "hunting"),
        ("🎯🔥", "target practice"),
        ("🧠🗯️", "mind reading"),
        ("🍕🍔🍟", "fast food"),
        ("🎶👂", "music listening"),
        ("📸🖼️", "photography"),
    ]
    .into_iter()
    .map(|(emoji, answer)| Question::new(emoji, answer))
    .collect()
}

/// Chooses the question of each new round.
#[cfg_attr(test, mockall::automock)]
pub trait QuestionPicker: Send + Sync {
    fn pick(&mut self) -> Question;
}
