//! SMS adapters: Twilio for real delivery, a JSONL outbox for dry runs.

pub mod outbox;
pub mod twilio;

pub use outbox::OutboxSmsAdapter;
pub use twilio::TwilioSmsAdapter;
