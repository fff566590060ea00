pub mod client;
pub mod completion;
pub mod models;
pub mod response;
pub mod streaming;

pub use client::OpenAiClient;
pub use completion::{CompletionClient, CompletionOptions, FragmentStream, DEFAULT_TEMPERATURE};
pub use models::RequestBody;
