//! Bedtime journal wizard: four questions, a mood pick, then a suggested
//! track from a fixed list.

use crate::error::Error;
use std::str::FromStr;

pub const QUESTIONS: [&str; 4] = [
    "How did your day go?",
    "What is on your mind as you get ready for bed?",
    "What is one thing you are grateful for today?",
    "What would you like to let go of before you sleep?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Calm,
    Anxious,
    Tired,
    Happy,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Calm, Mood::Anxious, Mood::Tired, Mood::Happy, Mood::Sad];

    pub fn keyword(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Anxious => "anxious",
            Mood::Tired => "tired",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
        }
    }

    pub fn image(self) -> &'static str {
        match self {
            Mood::Calm => "🌙",
            Mood::Anxious => "🌪️",
            Mood::Tired => "🥱",
            Mood::Happy => "🌻",
            Mood::Sad => "🌧️",
        }
    }

    /// Mock recommendation; there is no real catalogue behind it.
    pub fn recommendation(self) -> &'static str {
        match self {
            Mood::Calm => "Soft piano with gentle rain",
            Mood::Anxious => "Guided slow breathing over ocean waves",
            Mood::Tired => "Low delta-wave drone for falling asleep fast",
            Mood::Happy => "Warm acoustic lullaby",
            Mood::Sad => "Comforting cello with distant thunder",
        }
    }
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.keyword() == keyword)
            .ok_or_else(|| Error::UnknownMood(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalStep {
    /// Index into [`QUESTIONS`].
    Question(usize),
    Mood,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSession {
    answers: Vec<String>,
    mood: Option<Mood>,
}

impl Default for JournalSession {
    fn default() -> Self {
        Self {
            answers: Vec::with_capacity(QUESTIONS.len()),
            mood: None,
        }
    }
}

impl JournalSession {
    pub fn step(&self) -> JournalStep {
        if self.answers.len() < QUESTIONS.len() {
            JournalStep::Question(self.answers.len())
        } else if self.mood.is_none() {
            JournalStep::Mood
        } else {
            JournalStep::Complete
        }
    }

    pub fn current_question(&self) -> Option<&'static str> {
        match self.step() {
            JournalStep::Question(index) => Some(QUESTIONS[index]),
            _ => None,
        }
    }

    pub fn answer(&mut self, text: &str) -> Result<(), Error> {
        if !matches!(self.step(), JournalStep::Question(_)) {
            return Err(Error::OutOfStep("an answer"));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        self.answers.push(text.to_owned());
        Ok(())
    }

    pub fn choose_mood(&mut self, mood: Mood) -> Result<&'static str, Error> {
        if self.step() != JournalStep::Mood {
            return Err(Error::OutOfStep("a mood"));
        }

        self.mood = Some(mood);
        Ok(mood.recommendation())
    }

    /// Steps back one page, forgetting what was entered there.
    pub fn back(&mut self) {
        if self.mood.take().is_none() {
            self.answers.pop();
        }
    }

    pub fn reset(&mut self) {
        self.answers.clear();
        self.mood = None;
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn recommendation(&self) -> Option<&'static str> {
        self.mood.map(Mood::recommendation)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        QUESTIONS
            .iter()
            .copied()
            .zip(self.answers.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered() -> JournalSession {
        let mut session = JournalSession::default();
        for answer in ["Busy", "Work", "My cat", "Deadlines"] {
            session.answer(answer).unwrap();
        }
        session
    }

    #[test]
    fn walks_through_the_questions_in_order() {
        let mut session = JournalSession::default();

        for (index, question) in QUESTIONS.iter().enumerate() {
            assert_eq!(session.step(), JournalStep::Question(index));
            assert_eq!(session.current_question(), Some(*question));
            session.answer("  something  ").unwrap();
        }

        assert_eq!(session.step(), JournalStep::Mood);
        assert_eq!(session.current_question(), None);
        assert!(session.entries().all(|(_, answer)| answer == "something"));
    }

    #[test]
    fn blank_answers_do_not_advance() {
        let mut session = JournalSession::default();

        assert!(matches!(session.answer("   "), Err(Error::EmptyInput)));
        assert_eq!(session.step(), JournalStep::Question(0));
    }

    #[test]
    fn mood_completes_the_journal() {
        let mut session = answered();

        let recommendation = session.choose_mood(Mood::Anxious).unwrap();

        assert_eq!(recommendation, "Guided slow breathing over ocean waves");
        assert_eq!(session.step(), JournalStep::Complete);
        assert_eq!(session.recommendation(), Some(recommendation));
    }

    #[test]
    fn actions_out_of_step_are_rejected() {
        let mut session = JournalSession::default();
        assert!(matches!(
            session.choose_mood(Mood::Calm),
            Err(Error::OutOfStep(_))
        ));

        let mut session = answered();
        assert!(matches!(session.answer("more"), Err(Error::OutOfStep(_))));
    }

    #[test]
    fn back_forgets_the_revisited_page() {
        let mut session = answered();
        session.choose_mood(Mood::Happy).unwrap();

        session.back();
        assert_eq!(session.step(), JournalStep::Mood);

        session.back();
        assert_eq!(session.step(), JournalStep::Question(3));
        assert_eq!(session.entries().count(), 3);

        let mut fresh = JournalSession::default();
        fresh.back();
        assert_eq!(fresh.step(), JournalStep::Question(0));
    }

    #[test]
    fn reset_starts_over() {
        let mut session = answered();
        session.choose_mood(Mood::Sad).unwrap();

        session.reset();

        assert_eq!(session, JournalSession::default());
    }

    #[test]
    fn every_mood_has_its_own_recommendation() {
        let mut seen: Vec<_> = Mood::ALL.iter().map(|m| m.recommendation()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn parses_mood_keywords() {
        assert_eq!(" Calm ".parse::<Mood>().unwrap(), Mood::Calm);
        assert_eq!("tired".parse::<Mood>().unwrap(), Mood::Tired);
        assert!(matches!("grumpy".parse::<Mood>(), Err(Error::UnknownMood(_))));
    }
}
