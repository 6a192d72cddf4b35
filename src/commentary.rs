//! Game-over commentary
//!
//! After a run ends the presentation layer asks a text generation service for
//! a sassy one-liner in Granny's voice. Nothing here touches the simulation;
//! every failure degrades to a canned line.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::CommentarySettings;

/// Shown while the request is in flight
pub const LOADING_LINE: &str = "Granny is thinking of a witty insult...";
/// The service answered with nothing usable
pub const EMPTY_LINE: &str = "I've seen better moves at the bingo hall!";
/// The request failed
pub const FALLBACK_LINE: &str = "Where are my dentures?";

#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("commentary is disabled")]
    Disabled,
    #[error("no API key configured")]
    MissingApiKey,
    #[error("commentary service unavailable on this platform")]
    Unavailable,
    #[error("request failed: {0}")]
    Request(String),
    #[error("service returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Prompt describing the run that just ended
pub fn prompt_for(score: u32) -> String {
    format!(
        "The player just lost a 'Granny Runner' game (similar to the Chrome Dino game) with a score of {score}. \
         The character is a spunky old woman who jumps over trash cans and ducks under flying cats. \
         Write a short, sassy, or witty one-liner comment from the perspective of this granny. \
         Keep it under 15 words. Examples: \"In my day, we dodged boulders!\", \
         \"My hip hurts just looking at that crash.\""
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// `generateContent` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn for_score(score: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt_for(score),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

/// `generateContent` response body (only the fields we read)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Full request URL for the configured model
pub fn request_url(settings: &CommentarySettings) -> Result<String, CommentaryError> {
    if !settings.enabled {
        return Err(CommentaryError::Disabled);
    }
    let key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(CommentaryError::MissingApiKey)?;
    Ok(format!(
        "{}/{}:generateContent?key={}",
        settings.endpoint.trim_end_matches('/'),
        settings.model,
        key
    ))
}

/// First non-empty text of the first candidate, or the empty-answer quip
pub fn extract_line(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>()
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| EMPTY_LINE.to_string())
}

/// Parse a raw response body into a line
pub fn parse_response(body: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    Ok(extract_line(&response))
}

/// Collapse a fetch result into something displayable
pub fn line_or_fallback(result: Result<String, CommentaryError>) -> String {
    match result {
        Ok(line) => line,
        Err(CommentaryError::Disabled) => FALLBACK_LINE.to_string(),
        Err(e) => {
            log::warn!("Commentary failed: {}", e);
            FALLBACK_LINE.to_string()
        }
    }
}

/// Ask the service for a line about `score`
#[cfg(target_arch = "wasm32")]
pub async fn fetch_line(settings: &CommentarySettings, score: u32) -> Result<String, CommentaryError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    fn js_error(e: JsValue) -> CommentaryError {
        CommentaryError::Request(format!("{:?}", e))
    }

    let url = request_url(settings)?;
    let body = serde_json::to_string(&GenerateRequest::for_score(score))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let window = web_sys::window().ok_or(CommentaryError::Unavailable)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    if !response.ok() {
        return Err(CommentaryError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| CommentaryError::Request("response body is not text".to_string()))?;
    parse_response(&text)
}

/// Native builds have no HTTP client; callers get the fallback line
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_line(settings: &CommentarySettings, _score: u32) -> Result<String, CommentaryError> {
    request_url(settings)?;
    Err(CommentaryError::Unavailable)
}

/// Fetch and collapse in one step
pub async fn commentary_for(settings: &CommentarySettings, score: u32) -> String {
    line_or_fallback(fetch_line(settings, score).await)
}
