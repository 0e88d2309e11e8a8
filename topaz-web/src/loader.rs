//! Fetch-based quiz definition loader.

use gloo_net::http::Request;
use topaz_quiz::{QuizDefinition, QuizModality};

/// Why a quiz definition could not be produced. Every variant routes to the
/// "Not Available" placeholder; no session is created.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("quiz file unavailable: HTTP {0}")]
    Http(u16),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz definition `{0}` is empty")]
    Empty(String),
}

/// Fetch and parse one definition file. Awaited before any session state is
/// created.
///
/// # Errors
///
/// Returns an error when the request fails, the server answers anything but
/// 200, the body is not the expected JSON array, or the array is empty.
pub async fn fetch_definition(
    quiz_file: &str,
    modality: QuizModality,
) -> Result<QuizDefinition, FetchError> {
    let response = Request::get(quiz_file)
        .send()
        .await
        .map_err(|err| FetchError::Network(err.to_string()))?;
    if response.status() != 200 {
        return Err(FetchError::Http(response.status()));
    }
    let body = response
        .text()
        .await
        .map_err(|err| FetchError::Network(err.to_string()))?;
    let definition = QuizDefinition::from_json(modality, &body)?;
    if definition.is_empty() {
        return Err(FetchError::Empty(quiz_file.to_string()));
    }
    Ok(definition)
}
