pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_STREAM_TIMEOUT: u64 = 30;
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";
pub const DEFAULT_SYSTEM_PROMPT_FILE: &str = "system_prompt.txt";
pub const API_KEY_PLACEHOLDER: &str = "<Your API KEY>";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a bot that writes summaries of PDF documents.
The input is raw text extracted from a PDF; turn it into a clean, well-formed document.
Then condense the key points into the following items, each explained in 50 characters or fewer:

[Purpose]
[Year]
[Technologies used]
[Conclusion]
[Datasets used]
[Genre] (service, mining, tuning, etc.)
";

pub fn default_stream() -> bool {
    true
}
