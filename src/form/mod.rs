pub mod questions;
pub mod record;
pub mod session;

pub use questions::{InputKind, QUESTIONS, Question};
pub use record::LeadRecord;
pub use session::{Effect, Message, Phase, Sender, Session, SessionEvent, TypingTiming};
