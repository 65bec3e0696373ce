use thiserror::Error;

/// Which public call produced a failure. The two paths word the same
/// failure differently, and the wording is what callers get to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPath {
    Diagnosis,
    Chat,
}

impl CallPath {
    pub fn blocked_label(&self) -> &'static str {
        match self {
            CallPath::Diagnosis => "Diagnosis blocked",
            CallPath::Chat => "AI blocked config",
        }
    }

    pub fn stopped_label(&self) -> &'static str {
        match self {
            CallPath::Diagnosis => "Diagnosis stopped",
            CallPath::Chat => "AI generation stopped",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            CallPath::Diagnosis => {
                "AI could not generate a diagnosis. Please try again with more details."
            }
            CallPath::Chat => "AI returned an empty response without clear error details.",
        }
    }
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("AI Configuration Missing: Please add GEMINI_API_KEY to your .env file.")]
    ConfigurationMissing,

    /// Connection-level failure. The URL is stripped since it carries the key.
    #[error("{0}")]
    Transport(reqwest::Error),

    /// Non-2xx reply. `message` is the provider's `error.message` when it sent one.
    #[error("{}", api_message(.status, .message))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("{}: {reason}", .path.blocked_label())]
    ContentBlocked { path: CallPath, reason: String },

    #[error("{}: {reason}", .path.stopped_label())]
    GenerationStopped { path: CallPath, reason: String },

    #[error("{}", .path.empty_message())]
    EmptyResponse { path: CallPath },

    #[error("{0}")]
    MalformedResult(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn api_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("API Error: {status}"),
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Transport(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
