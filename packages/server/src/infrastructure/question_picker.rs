//! `QuestionPicker` implementations.

use rand::Rng;

use crate::domain::{Question, QuestionPicker, default_catalog};

fn non_empty(catalog: Vec<Question>) -> Vec<Question> {
    if catalog.is_empty() {
        tracing::warn!("Empty question catalog given, using the default catalog");
        return default_catalog();
    }
    catalog
}

/// Uniform random pick from a catalog.
#[derive(Debug, Clone)]
pub struct RandomQuestionPicker {
    catalog: Vec<Question>,
}

impl RandomQuestionPicker {
    pub fn new(catalog: Vec<Question>) -> Self {
        Self {
            catalog: non_empty(catalog),
        }
    }
}

impl Default for RandomQuestionPicker {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

impl QuestionPicker for RandomQuestionPicker {
    fn pick(&mut self) -> Question {
        let index = rand::rng().random_range(0..self.catalog.len());
        self.catalog[index].clone()
    }
}

/// Walks a catalog in order, wrapping around. Deterministic, for tests and demos.
#[derive(Debug, Clone)]
pub struct FixedQuestionPicker {
    catalog: Vec<Question>,
    next: usize,
}

impl FixedQuestionPicker {
    pub fn new(catalog: Vec<Question>) -> Self {
        Self {
            catalog: non_empty(catalog),
            next: 0,
        }
    }
}

impl QuestionPicker for FixedQuestionPicker {
    fn pick(&mut self) -> Question {
        let question = self.catalog[self.next].clone();
        self.next = (self.next + 1) % self.catalog.len();
        question
    }
}
