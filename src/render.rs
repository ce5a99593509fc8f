//! HTML pages for the sleep assistant and the bedtime journal.

use crate::dispatch::ProgressSettings;
use crate::error::Error;
use crate::journal::{JournalSession, JournalStep, Mood, QUESTIONS};
use crate::response::AnalyzeResponse;
use askama::Template;

pub const PRESETS: [&str; 4] = [
    "I have been sleeping less than 5 hours a night lately.",
    "I wake up around 3am and can't fall back asleep.",
    "My mind keeps racing when I lie down at night.",
    "I feel tired all day even after a full night in bed.",
];

#[derive(Template)]
#[template(path = "assistant.html")]
pub struct AssistantView<'a> {
    pub input: &'a str,
    pub warning: Option<String>,
    pub outcome: Option<&'a AnalyzeResponse>,
    pub progress: ProgressSettings,
}

impl AssistantView<'_> {
    fn presets(&self) -> &'static [&'static str] {
        &PRESETS
    }
}

pub fn assistant_page(view: &AssistantView<'_>) -> Result<String, Error> {
    Ok(view.render()?)
}

struct QuestionView {
    number: usize,
    total: usize,
    text: &'static str,
}

struct EntryView<'a> {
    question: &'static str,
    answer: &'a str,
}

struct RecommendationView {
    image: &'static str,
    text: &'static str,
}

#[derive(Template)]
#[template(path = "journal.html")]
struct JournalView<'a> {
    question: Option<QuestionView>,
    choosing_mood: bool,
    moods: [Mood; 5],
    entries: Vec<EntryView<'a>>,
    recommendation: Option<RecommendationView>,
    warning: Option<&'a str>,
    can_go_back: bool,
}

pub fn journal_page(journal: &JournalSession, warning: Option<&str>) -> Result<String, Error> {
    let step = journal.step();
    let question = journal.current_question().map(|text| QuestionView {
        number: journal.entries().count() + 1,
        total: QUESTIONS.len(),
        text,
    });
    let recommendation = journal.mood().map(|mood| RecommendationView {
        image: mood.image(),
        text: mood.recommendation(),
    });

    let view = JournalView {
        question,
        choosing_mood: step == JournalStep::Mood,
        moods: Mood::ALL,
        entries: journal
            .entries()
            .map(|(question, answer)| EntryView { question, answer })
            .collect(),
        recommendation,
        warning,
        can_go_back: step != JournalStep::Question(0),
    };

    Ok(view.render()?)
}
