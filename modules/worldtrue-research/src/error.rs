use ai_client::AiError;
use thiserror::Error;

/// Why a research call produced no usable events.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResearchError {
    #[error("Research backend misconfigured: {0}")]
    Config(String),

    #[error("Research request failed: {0}")]
    Transport(String),

    #[error("Research service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed research response: {0}")]
    Malformed(String),

    #[error("Research response failed validation: {0}")]
    Invalid(String),
}

impl From<AiError> for ResearchError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Config(msg) => ResearchError::Config(msg),
            AiError::Network(msg) => ResearchError::Transport(msg),
            AiError::Api { status, body } => ResearchError::Status { status, body },
            AiError::Parse(msg) => ResearchError::Malformed(msg),
            AiError::MissingOutput => {
                ResearchError::Malformed("no structured output in response".to_string())
            }
        }
    }
}

impl From<reqwest::Error> for ResearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ResearchError::Malformed(e.to_string())
        } else {
            ResearchError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_errors_map_onto_research_taxonomy() {
        assert_eq!(
            ResearchError::from(AiError::Api { status: 529, body: "overloaded".into() }),
            ResearchError::Status { status: 529, body: "overloaded".into() }
        );
        assert!(matches!(
            ResearchError::from(AiError::MissingOutput),
            ResearchError::Malformed(_)
        ));
        assert!(matches!(
            ResearchError::from(AiError::Network("reset".into())),
            ResearchError::Transport(_)
        ));
    }
}
