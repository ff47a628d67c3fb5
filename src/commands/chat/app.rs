use std::time::Instant;

use log::debug;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::form::{Effect, LeadRecord, QUESTIONS, Session, SessionEvent};
use crate::webhook::WebhookClient;

/// TUI-side state wrapped around the session reducer: the typing deadline,
/// the in-flight submission channel, and the summary-card selection.
pub struct ChatApp {
    pub session: Session,
    pub branding_title: String,
    /// Selected row on the summary card; `QUESTIONS.len()` is the confirm row.
    pub review_selection: usize,
    pub quit: bool,
    client: WebhookClient,
    typing_deadline: Option<Instant>,
    submission_task: Option<tokio::task::JoinHandle<()>>,
    submission_receiver: Option<oneshot::Receiver<Result<(), String>>>,
}

impl ChatApp {
    pub fn new(config: &Config, client: WebhookClient) -> Self {
        Self {
            session: Session::new(config.typing_timing()),
            branding_title: config.branding_title.clone(),
            review_selection: 0,
            quit: false,
            client,
            typing_deadline: None,
            submission_task: None,
            submission_receiver: None,
        }
    }

    pub fn start(&mut self) {
        self.dispatch(SessionEvent::Started);
    }

    /// Feed one event through the reducer and execute whatever it asks for.
    pub fn dispatch(&mut self, event: SessionEvent) {
        let effect = self.session.apply(event);
        match effect {
            Effect::None => {}
            Effect::ScheduleTyping(delay) => {
                self.typing_deadline = Some(Instant::now() + delay);
            }
            Effect::Submit(record) => self.start_submission_task(record),
        }
    }

    /// Poll the fire-once timer and the submission channel. Called every
    /// iteration of the event loop between draws.
    pub fn tick(&mut self) {
        if let Some(deadline) = self.typing_deadline {
            if Instant::now() >= deadline {
                self.typing_deadline = None;
                self.dispatch(SessionEvent::TypingElapsed);
            }
        }

        if let Some(result) = self.check_submission_result() {
            self.dispatch(SessionEvent::SubmissionCompleted(result));
        }
    }

    fn start_submission_task(&mut self, record: LeadRecord) {
        debug!("Starting submission task for session {}", record.session_id);
        let client = self.client.clone();
        let (sender, receiver) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result = client.submit(&record).await.map_err(|e| e.to_string());
            let _ = sender.send(result);
        });

        self.submission_task = Some(task);
        self.submission_receiver = Some(receiver);
    }

    fn check_submission_result(&mut self) -> Option<Result<(), String>> {
        if let Some(receiver) = &mut self.submission_receiver {
            match receiver.try_recv() {
                Ok(result) => {
                    self.submission_receiver = None;
                    self.submission_task = None;
                    Some(result)
                }
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.submission_receiver = None;
                    self.submission_task = None;
                    Some(Err("Submission task was cancelled".to_string()))
                }
            }
        } else {
            None
        }
    }

    pub fn select_next(&mut self) {
        self.review_selection = (self.review_selection + 1) % (QUESTIONS.len() + 1);
    }

    pub fn select_previous(&mut self) {
        if self.review_selection == 0 {
            self.review_selection = QUESTIONS.len();
        } else {
            self.review_selection -= 1;
        }
    }

    /// Enter on the summary card: edit the selected field, or confirm on the
    /// last row.
    pub fn activate_selection(&mut self) {
        if self.review_selection < QUESTIONS.len() {
            self.dispatch(SessionEvent::EditRequested(self.review_selection));
        } else {
            self.dispatch(SessionEvent::ConfirmAll);
        }
    }
}
