use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::generation::Generator;
use super::prompts::{build_eval_prompt, EVAL_SYSTEM_INSTRUCTION};
use crate::error::Result;

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^```(?:json)?").unwrap());
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```$").unwrap());

const EXCERPT_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Pass,
    Fail,
    Error,
}

impl Verdict {
    /// Case-insensitive; anything unrecognised counts as a failure.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "pass" => Self::Pass,
            "error" => Self::Error,
            _ => Self::Fail,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Error => "Error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub score: i64,
    pub verdict: Verdict,
    pub reasoning: String,
}

impl Evaluation {
    fn unparseable(raw: &str) -> Self {
        let excerpt: String = raw.chars().take(EXCERPT_CHARS).collect();
        Self {
            score: 0,
            verdict: Verdict::Error,
            reasoning: format!("Could not parse evaluator response: {excerpt}"),
        }
    }
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = FENCE_OPEN.find(trimmed).map_or(trimmed, |m| &trimmed[m.end()..]);
    let without_close = FENCE_CLOSE
        .find(without_open)
        .map_or(without_open, |m| &without_open[..m.start()]);
    without_close.trim()
}

fn score_of(value: Option<&JsonValue>) -> Option<i64> {
    match value {
        None | Some(JsonValue::Null) => Some(0),
        Some(JsonValue::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        Some(_) => None,
    }
}

fn text_of(value: Option<&JsonValue>) -> Option<String> {
    match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Turn raw evaluator output into an [`Evaluation`]. Malformed output yields
/// an `Error` verdict instead of failing.
pub fn parse_evaluation(raw: &str) -> Evaluation {
    let cleaned = strip_fences(raw);

    let object = match serde_json::from_str::<JsonValue>(cleaned) {
        Ok(JsonValue::Object(map)) => map,
        _ => {
            tracing::error!("Failed to parse evaluation JSON: {}", raw.chars().take(200).collect::<String>());
            return Evaluation::unparseable(raw);
        }
    };

    let Some(score) = score_of(object.get("score")) else {
        tracing::error!("Evaluation score is not numeric: {:?}", object.get("score"));
        return Evaluation::unparseable(raw);
    };

    let verdict = text_of(object.get("verdict"))
        .map(|v| Verdict::from_label(&v))
        .unwrap_or(Verdict::Fail);
    let reasoning = text_of(object.get("reasoning")).unwrap_or_default();

    Evaluation {
        score,
        verdict,
        reasoning,
    }
}

/// Audit `answer` against the query and the context it was generated from.
pub async fn evaluate(
    generator: &dyn Generator,
    query: &str,
    context: &str,
    answer: &str,
) -> Result<Evaluation> {
    let prompt = build_eval_prompt(query, context, answer);

    let raw = generator
        .generate(EVAL_SYSTEM_INSTRUCTION, &prompt)
        .await
        .map_err(|e| {
            tracing::error!("Evaluation model call failed: {}", e);
            e
        })?;

    let evaluation = parse_evaluation(&raw);
    tracing::info!(
        "Evaluation complete - score: {}, verdict: {}",
        evaluation.score,
        evaluation.verdict
    );
    Ok(evaluation)
}
