use std::cell::{Cell, RefCell};

/// Blocking user notices and yes/no confirmations.
pub trait Prompter {
    fn notify(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Prompter that records every notice and answers confirmations with a
/// preset reply. Used where no interactive user exists.
#[derive(Debug, Default)]
pub struct RecordingPrompter {
    notices: RefCell<Vec<String>>,
    questions: RefCell<Vec<String>>,
    answer: Cell<bool>,
}

impl RecordingPrompter {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Cell::new(answer),
            ..Self::default()
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.set(answer);
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Prompter for RecordingPrompter {
    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.questions.borrow_mut().push(message.to_string());
        self.answer.get()
    }
}
