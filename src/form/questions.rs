/// Display hint for the answer input. Purely cosmetic: answers are only
/// checked for being non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Tel,
    Email,
}

/// A single step of the conversational form. The order of [`QUESTIONS`]
/// drives the step index.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    /// Key used for the field in the webhook JSON body.
    pub key: &'static str,
    /// Chat prompt shown when the question is asked.
    pub prompt: &'static str,
    /// Short label used on the summary card and in edit prompts.
    pub label: &'static str,
    pub input_kind: InputKind,
}

pub const QUESTIONS: &[Question] = &[
    Question {
        key: "storeName",
        prompt: "Hi! To get started, what is the name of your store?",
        label: "Store Name",
        input_kind: InputKind::Text,
    },
    Question {
        key: "contactName",
        prompt: "Great! And what is the name of the person who will receive the leads?",
        label: "Contact Name",
        input_kind: InputKind::Text,
    },
    Question {
        key: "phone",
        prompt: "What phone number (with area code) should we use to reach them?",
        label: "Phone",
        input_kind: InputKind::Tel,
    },
    Question {
        key: "email",
        prompt: "Lastly, what is the email of the person who will receive the leads?",
        label: "Email",
        input_kind: InputKind::Email,
    },
];

/// The standing "please confirm" prompt. An edit cycle removes this exact
/// line from the transcript before re-inserting it, so it must stay a single
/// fixed string.
pub const CONFIRM_PROMPT: &str = "Perfect! Please confirm that the details below are correct:";

pub const THANK_YOU_MESSAGE: &str =
    "Thank you! Your details have been received. We will be in touch soon.";

pub const SUBMIT_ERROR_MESSAGE: &str =
    "Oops! Something went wrong while sending. Please try confirming again.";

pub const INPUT_PLACEHOLDER: &str = "Type here...";

pub fn edit_prompt(question: &Question) -> String {
    format!(
        "Sure, let's fix \"{}\". What is the correct value?",
        question.label
    )
}

/// Bot message listing the confirmed answers, one bullet per question.
pub fn confirmed_summary(answer_for: impl Fn(&str) -> String) -> String {
    let lines: Vec<String> = QUESTIONS
        .iter()
        .map(|q| format!("\u{2022} {}: {}", q.label, answer_for(q.key)))
        .collect();
    format!("Details confirmed:\n{}", lines.join("\n"))
}

impl InputKind {
    pub fn placeholder(self) -> &'static str {
        match self {
            InputKind::Text => INPUT_PLACEHOLDER,
            InputKind::Tel => "Type the phone number...",
            InputKind::Email => "Type the email address...",
        }
    }
}
