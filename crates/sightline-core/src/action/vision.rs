//! Prompt-based [`VisionModel`] over a text-answering image analyser.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use sightline_protocols::{Located, Screenshot, Verification, VisionError, VisionModel};
use tracing::debug;

/// Anything that answers a text prompt about one or more images.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, images: &[&Screenshot], prompt: &str) -> Result<String, VisionError>;
}

/// Confidence assigned to coordinates recovered from free text.
const TEXT_CONFIDENCE: f32 = 0.8;

pub struct PromptVision<A> {
    analyzer: A,
}

impl<A: ImageAnalyzer> PromptVision<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }
}

fn locate_prompt(description: &str) -> String {
    format!(
        r#"Find the element described as "{description}" in this screenshot.
Return the center coordinates of the element in JSON format:
{{"x": <number>, "y": <number>, "confidence": <0.0-1.0>}}

If you cannot find the element, respond with:
{{"error": "Element not found", "reason": "<explanation>"}}

Only respond with the JSON, no other text."#
    )
}

fn verify_prompt(expectation: &str) -> String {
    format!(
        r#"The first screenshot was taken before an action, the second after it.
Expected change: {expectation}

Did the expected change happen? Respond in JSON format:
{{"changed": <true|false>, "reason": "<short explanation>"}}

Only respond with the JSON, no other text."#
    )
}

#[async_trait]
impl<A: ImageAnalyzer> VisionModel for PromptVision<A> {
    async fn locate(
        &self,
        screenshot: &Screenshot,
        description: &str,
    ) -> Result<Option<Located>, VisionError> {
        let response = self
            .analyzer
            .analyze(&[screenshot], &locate_prompt(description))
            .await?;
        debug!(response = %response, "Vision locate response");

        if response.contains("\"error\"") {
            return Ok(None);
        }
        parse_coordinates(&response).map(Some)
    }

    async fn verify(
        &self,
        before: &Screenshot,
        after: &Screenshot,
        expectation: &str,
    ) -> Result<Verification, VisionError> {
        let response = self
            .analyzer
            .analyze(&[before, after], &verify_prompt(expectation))
            .await?;
        debug!(response = %response, "Vision verify response");
        parse_verification(&response)
    }
}

#[derive(Deserialize)]
struct JsonCoordinates {
    x: f64,
    y: f64,
    #[serde(default = "default_confidence")]
    confidence: f32,
}

fn default_confidence() -> f32 {
    TEXT_CONFIDENCE
}

static COORDINATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"x[:\s]*(\d+)[,\s]+y[:\s]*(\d+)",
        r"\((\d+)[,\s]+(\d+)\)",
        r"coordinates[:\s]*(\d+)[,\s]+(\d+)",
        r"position[:\s]*(\d+)[,\s]+(\d+)",
        r"(\d+)[,\s]+(\d+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Parse a location from a vision answer: JSON first, then common text shapes.
pub fn parse_coordinates(response: &str) -> Result<Located, VisionError> {
    if let Some(coords) = embedded_json::<JsonCoordinates>(response) {
        return Ok(Located {
            x: coords.x.round() as i32,
            y: coords.y.round() as i32,
            confidence: coords.confidence,
        });
    }

    for re in COORDINATE_PATTERNS.iter() {
        let Some(caps) = re.captures(response) else {
            continue;
        };
        let x = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let y = caps.get(2).and_then(|m| m.as_str().parse().ok());
        if let (Some(x), Some(y)) = (x, y) {
            return Ok(Located {
                x,
                y,
                confidence: TEXT_CONFIDENCE,
            });
        }
    }

    Err(VisionError::InvalidResponse(format!(
        "could not parse coordinates from response: {response}"
    )))
}

/// Parse a before/after verdict.
pub fn parse_verification(response: &str) -> Result<Verification, VisionError> {
    if let Some(verdict) = embedded_json::<Verification>(response) {
        return Ok(verdict);
    }
    Err(VisionError::InvalidResponse(format!(
        "could not parse verification from response: {response}"
    )))
}

/// Deserialize the whole response, or the outermost `{...}` inside it.
fn embedded_json<T: for<'de> Deserialize<'de>>(response: &str) -> Option<T> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

#[cfg(test)]
#[path = "vision_tests.rs"]
mod tests;
