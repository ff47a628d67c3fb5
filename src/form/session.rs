use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use log::{debug, error};
use rand::Rng;
use uuid::Uuid;

use super::questions::{
    CONFIRM_PROMPT, QUESTIONS, SUBMIT_ERROR_MESSAGE, THANK_YOU_MESSAGE, confirmed_summary,
    edit_prompt,
};
use super::record::LeadRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Bot,
    User,
}

/// One chat bubble. The transcript is append-only except for the removal of
/// the standing confirmation prompt when an edit cycle starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// Where the conversation currently is. `Asking(i)` indexes into
/// [`QUESTIONS`]; `Reviewing` is the summary card; `ConfirmingEdit(i)` is the
/// destructive-edit dialog for field `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Asking(usize),
    Reviewing,
    ConfirmingEdit(usize),
    Submitting,
    Done,
}

/// Discrete inputs fed to the session. Keystroke-level editing of the input
/// line goes through [`Session::push_input`]/[`Session::pop_input`] instead;
/// only completed actions are events.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    InputSubmitted,
    TypingElapsed,
    EditRequested(usize),
    EditCancelled,
    EditConfirmed,
    ConfirmAll,
    SubmissionCompleted(Result<(), String>),
}

/// Side effect requested by a transition. The runtime owns timers and the
/// network; the session only says what it needs.
#[derive(Debug)]
pub enum Effect {
    None,
    ScheduleTyping(Duration),
    Submit(LeadRecord),
}

/// What the pending typing delay will reveal once it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Typing {
    FirstPrompt,
    Advance,
    ThankYou,
}

/// Typing-indicator delays. The reply delay carries jitter so consecutive
/// bot replies don't land with metronome regularity.
#[derive(Debug, Clone, Copy)]
pub struct TypingTiming {
    pub initial: Duration,
    pub reply: Duration,
    pub jitter: Duration,
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(1000),
            reply: Duration::from_millis(1200),
            jitter: Duration::from_millis(400),
        }
    }
}

impl TypingTiming {
    fn reply_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        self.reply + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// The questionnaire state machine. All conversational state lives here and
/// changes only through [`Session::apply`]; the TUI layer renders it and
/// executes the returned effects.
pub struct Session {
    phase: Phase,
    answers: HashMap<&'static str, String>,
    transcript: Vec<Message>,
    input: String,
    typing: Option<Typing>,
    is_editing: bool,
    submitted: bool,
    session_id: Uuid,
    timing: TypingTiming,
}

impl Session {
    pub fn new(timing: TypingTiming) -> Self {
        Self {
            phase: Phase::Asking(0),
            answers: HashMap::new(),
            transcript: Vec::new(),
            input: String::new(),
            typing: None,
            is_editing: false,
            submitted: false,
            session_id: Uuid::new_v4(),
            timing,
        }
    }

    pub fn apply(&mut self, event: SessionEvent) -> Effect {
        debug!("session event: {:?} (phase {:?})", event, self.phase);
        match event {
            SessionEvent::Started => self.on_started(),
            SessionEvent::InputSubmitted => self.on_input_submitted(),
            SessionEvent::TypingElapsed => self.on_typing_elapsed(),
            SessionEvent::EditRequested(index) => self.on_edit_requested(index),
            SessionEvent::EditCancelled => self.on_edit_cancelled(),
            SessionEvent::EditConfirmed => self.on_edit_confirmed(),
            SessionEvent::ConfirmAll => self.on_confirm_all(),
            SessionEvent::SubmissionCompleted(result) => self.on_submission_completed(result),
        }
    }

    fn on_started(&mut self) -> Effect {
        if !self.transcript.is_empty() || self.typing.is_some() {
            return Effect::None;
        }
        self.typing = Some(Typing::FirstPrompt);
        Effect::ScheduleTyping(self.timing.initial)
    }

    fn on_input_submitted(&mut self) -> Effect {
        let Phase::Asking(index) = self.phase else {
            return Effect::None;
        };
        if self.typing.is_some() || self.input.trim().is_empty() {
            return Effect::None;
        }

        let answer = std::mem::take(&mut self.input);
        self.push_user(answer.clone());
        self.answers.insert(QUESTIONS[index].key, answer);
        self.typing = Some(Typing::Advance);
        Effect::ScheduleTyping(self.timing.reply_delay())
    }

    fn on_typing_elapsed(&mut self) -> Effect {
        let Some(typing) = self.typing.take() else {
            return Effect::None;
        };
        match typing {
            Typing::FirstPrompt => self.push_bot(QUESTIONS[0].prompt),
            Typing::Advance => {
                let Phase::Asking(index) = self.phase else {
                    return Effect::None;
                };
                if self.is_editing {
                    // An edit answers exactly one field and returns to the
                    // summary, regardless of which step it was.
                    self.is_editing = false;
                    self.phase = Phase::Reviewing;
                    self.push_bot(CONFIRM_PROMPT);
                } else if index + 1 < QUESTIONS.len() {
                    self.phase = Phase::Asking(index + 1);
                    self.push_bot(QUESTIONS[index + 1].prompt);
                } else {
                    self.phase = Phase::Reviewing;
                    self.push_bot(CONFIRM_PROMPT);
                }
            }
            Typing::ThankYou => {
                self.push_bot(THANK_YOU_MESSAGE);
                self.phase = Phase::Done;
            }
        }
        Effect::None
    }

    fn on_edit_requested(&mut self, index: usize) -> Effect {
        if index >= QUESTIONS.len() {
            return Effect::None;
        }
        match self.phase {
            // A second edit request while a dialog is already open retargets
            // the dialog instead of stacking.
            Phase::Reviewing | Phase::ConfirmingEdit(_) => {
                self.phase = Phase::ConfirmingEdit(index);
            }
            _ => {}
        }
        Effect::None
    }

    fn on_edit_cancelled(&mut self) -> Effect {
        if let Phase::ConfirmingEdit(_) = self.phase {
            self.phase = Phase::Reviewing;
        }
        Effect::None
    }

    fn on_edit_confirmed(&mut self) -> Effect {
        let Phase::ConfirmingEdit(index) = self.phase else {
            return Effect::None;
        };
        let question = &QUESTIONS[index];

        // Drop the standing confirmation prompt; it comes back after the
        // corrected answer is submitted. Relative order of everything else
        // is preserved.
        self.transcript.retain(|m| m.text != CONFIRM_PROMPT);
        self.push_bot(edit_prompt(question));
        self.input = self.answer(question.key).unwrap_or_default().to_string();
        self.is_editing = true;
        self.phase = Phase::Asking(index);
        Effect::None
    }

    fn on_confirm_all(&mut self) -> Effect {
        if self.phase != Phase::Reviewing {
            return Effect::None;
        }
        self.submitted = true;
        self.phase = Phase::Submitting;
        Effect::Submit(self.record())
    }

    fn on_submission_completed(&mut self, result: Result<(), String>) -> Effect {
        if self.phase != Phase::Submitting {
            return Effect::None;
        }
        match result {
            Ok(()) => {
                let answers = &self.answers;
                let summary =
                    confirmed_summary(|key| answers.get(key).cloned().unwrap_or_default());
                self.push_bot(summary);
                self.typing = Some(Typing::ThankYou);
                Effect::ScheduleTyping(self.timing.initial)
            }
            Err(error) => {
                error!("webhook submission failed: {error}");
                self.push_bot(SUBMIT_ERROR_MESSAGE);
                self.submitted = false;
                self.phase = Phase::Reviewing;
                Effect::None
            }
        }
    }

    /// Snapshot of the collected answers as the webhook body.
    pub fn record(&self) -> LeadRecord {
        LeadRecord {
            store_name: self.answer("storeName").unwrap_or_default().to_string(),
            contact_name: self.answer("contactName").unwrap_or_default().to_string(),
            phone: self.answer("phone").unwrap_or_default().to_string(),
            email: self.answer("email").unwrap_or_default().to_string(),
            session_id: self.session_id,
            submitted_at: Utc::now(),
        }
    }

    // Input line editing. Allowed while the bot is "typing"; only submission
    // is gated on the indicator.
    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn can_submit_input(&self) -> bool {
        matches!(self.phase, Phase::Asking(_))
            && self.typing.is_none()
            && !self.input.trim().is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current question while asking, if any.
    pub fn current_question(&self) -> Option<&'static super::questions::Question> {
        match self.phase {
            Phase::Asking(index) => QUESTIONS.get(index),
            _ => None,
        }
    }

    fn push_bot(&mut self, text: impl Into<String>) {
        self.transcript.push(Message {
            sender: Sender::Bot,
            text: text.into(),
        });
    }

    fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(Message {
            sender: Sender::User,
            text: text.into(),
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TypingTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_answer(session: &mut Session, text: &str) {
        for c in text.chars() {
            session.push_input(c);
        }
    }

    /// Answer the current question and let the typing delay elapse.
    fn answer_step(session: &mut Session, text: &str) {
        type_answer(session, text);
        session.apply(SessionEvent::InputSubmitted);
        session.apply(SessionEvent::TypingElapsed);
    }

    fn reviewing_session() -> Session {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        session.apply(SessionEvent::TypingElapsed);
        answer_step(&mut session, "Corner Books");
        answer_step(&mut session, "Ana Souza");
        answer_step(&mut session, "11 99999-0000");
        answer_step(&mut session, "ana@cornerbooks.com");
        assert_eq!(session.phase(), Phase::Reviewing);
        session
    }

    #[test]
    fn started_shows_first_prompt_after_delay() {
        let mut session = Session::default();
        let effect = session.apply(SessionEvent::Started);
        assert!(matches!(effect, Effect::ScheduleTyping(_)));
        assert!(session.is_typing());
        assert!(session.transcript().is_empty());

        session.apply(SessionEvent::TypingElapsed);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].text, QUESTIONS[0].prompt);
        assert_eq!(session.phase(), Phase::Asking(0));
    }

    #[test]
    fn started_twice_is_a_noop() {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        session.apply(SessionEvent::TypingElapsed);
        let effect = session.apply(SessionEvent::Started);
        assert!(matches!(effect, Effect::None));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn whitespace_input_is_rejected() {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        session.apply(SessionEvent::TypingElapsed);

        type_answer(&mut session, "   ");
        assert!(!session.can_submit_input());
        let effect = session.apply(SessionEvent::InputSubmitted);
        assert!(matches!(effect, Effect::None));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.phase(), Phase::Asking(0));
        // The draft stays in the input box untouched.
        assert_eq!(session.input(), "   ");
    }

    #[test]
    fn submit_is_gated_while_typing() {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        // Indicator still active: typing characters is fine, submitting is not.
        type_answer(&mut session, "Corner Books");
        assert!(!session.can_submit_input());
        let effect = session.apply(SessionEvent::InputSubmitted);
        assert!(matches!(effect, Effect::None));
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn answer_advances_to_next_prompt() {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        session.apply(SessionEvent::TypingElapsed);

        type_answer(&mut session, "Corner Books");
        let effect = session.apply(SessionEvent::InputSubmitted);
        assert!(matches!(effect, Effect::ScheduleTyping(_)));
        assert_eq!(session.answer("storeName"), Some("Corner Books"));
        assert_eq!(session.input(), "");
        // User bubble lands immediately; the next prompt waits for the delay.
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[1].sender, Sender::User);

        session.apply(SessionEvent::TypingElapsed);
        assert_eq!(session.phase(), Phase::Asking(1));
        assert_eq!(
            session.transcript().last().map(|m| m.text.as_str()),
            Some(QUESTIONS[1].prompt)
        );
    }

    #[test]
    fn final_answer_enters_review() {
        let session = reviewing_session();
        assert_eq!(
            session.transcript().last().map(|m| m.text.as_str()),
            Some(CONFIRM_PROMPT)
        );
    }

    #[test]
    fn edit_cycle_updates_single_field() {
        let mut session = reviewing_session();

        session.apply(SessionEvent::EditRequested(2));
        assert_eq!(session.phase(), Phase::ConfirmingEdit(2));

        session.apply(SessionEvent::EditConfirmed);
        assert_eq!(session.phase(), Phase::Asking(2));
        assert!(session.is_editing());
        // Input is prefilled with the existing answer.
        assert_eq!(session.input(), "11 99999-0000");
        // The standing confirmation prompt is gone.
        assert!(session.transcript().iter().all(|m| m.text != CONFIRM_PROMPT));

        session.pop_input();
        session.push_input('1');
        session.apply(SessionEvent::InputSubmitted);
        session.apply(SessionEvent::TypingElapsed);

        // Back to review, only the edited field changed.
        assert_eq!(session.phase(), Phase::Reviewing);
        assert!(!session.is_editing());
        assert_eq!(session.answer("phone"), Some("11 99999-0001"));
        assert_eq!(session.answer("storeName"), Some("Corner Books"));
        assert_eq!(session.answer("contactName"), Some("Ana Souza"));
        assert_eq!(session.answer("email"), Some("ana@cornerbooks.com"));
        assert_eq!(
            session.transcript().last().map(|m| m.text.as_str()),
            Some(CONFIRM_PROMPT)
        );
    }

    #[test]
    fn edit_cancel_returns_to_review() {
        let mut session = reviewing_session();
        session.apply(SessionEvent::EditRequested(0));
        session.apply(SessionEvent::EditCancelled);
        assert_eq!(session.phase(), Phase::Reviewing);
    }

    #[test]
    fn second_edit_request_retargets_dialog() {
        let mut session = reviewing_session();
        session.apply(SessionEvent::EditRequested(0));
        session.apply(SessionEvent::EditRequested(3));
        assert_eq!(session.phase(), Phase::ConfirmingEdit(3));
    }

    #[test]
    fn confirm_emits_submit_effect() {
        let mut session = reviewing_session();
        let effect = session.apply(SessionEvent::ConfirmAll);
        let Effect::Submit(record) = effect else {
            panic!("expected submit effect");
        };
        assert_eq!(record.store_name, "Corner Books");
        assert_eq!(record.email, "ana@cornerbooks.com");
        assert_eq!(session.phase(), Phase::Submitting);
        assert!(session.submitted());
    }

    #[test]
    fn successful_submission_ends_with_thank_you() {
        let mut session = reviewing_session();
        session.apply(SessionEvent::ConfirmAll);
        let effect = session.apply(SessionEvent::SubmissionCompleted(Ok(())));
        assert!(matches!(effect, Effect::ScheduleTyping(_)));
        assert!(
            session
                .transcript()
                .last()
                .is_some_and(|m| m.text.starts_with("Details confirmed:"))
        );

        session.apply(SessionEvent::TypingElapsed);
        assert_eq!(session.phase(), Phase::Done);
        assert!(session.submitted());
        assert_eq!(
            session.transcript().last().map(|m| m.text.as_str()),
            Some(THANK_YOU_MESSAGE)
        );
    }

    #[test]
    fn failed_submission_allows_retry() {
        let mut session = reviewing_session();
        session.apply(SessionEvent::ConfirmAll);
        session.apply(SessionEvent::SubmissionCompleted(Err(
            "status 500".to_string()
        )));

        assert_eq!(session.phase(), Phase::Reviewing);
        assert!(!session.submitted());
        assert_eq!(
            session.transcript().last().map(|m| m.text.as_str()),
            Some(SUBMIT_ERROR_MESSAGE)
        );
        assert_eq!(session.answer("storeName"), Some("Corner Books"));

        // Confirm is clickable again.
        let effect = session.apply(SessionEvent::ConfirmAll);
        assert!(matches!(effect, Effect::Submit(_)));
    }

    #[test]
    fn stale_submission_result_is_ignored() {
        let mut session = reviewing_session();
        let effect = session.apply(SessionEvent::SubmissionCompleted(Ok(())));
        assert!(matches!(effect, Effect::None));
        assert_eq!(session.phase(), Phase::Reviewing);
    }
}
