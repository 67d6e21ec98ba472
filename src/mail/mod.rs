pub mod types;

pub use types::{EmailPayload, SummaryStyle, Tone, UnknownOption};
