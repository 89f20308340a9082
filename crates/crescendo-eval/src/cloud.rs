//! Cloud evaluation backend
//!
//! Looks a position up in a cloud evaluation service keyed by FEN. The
//! reply schema is the service's own: a `pvs` array whose entries carry
//! either a centipawn score (`cp`) or a forced-mate distance (`mate`).

use async_trait::async_trait;
use crescendo_core::EvalScore;
use serde::Deserialize;
use tracing::debug;

use crate::error::{EvalError, EvalResult};
use crate::Evaluator;

/// Client for a cloud evaluation HTTP endpoint
#[derive(Debug, Clone)]
pub struct CloudEvalClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudReply {
    #[serde(default)]
    pvs: Vec<CloudPv>,
}

#[derive(Debug, Deserialize)]
struct CloudPv {
    cp: Option<i32>,
    mate: Option<i32>,
}

impl CloudEvalClient {
    /// `base_url` is the service root, e.g. `https://lichess.org`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn score_from_reply(reply: CloudReply) -> EvalResult<EvalScore> {
        let pv = reply.pvs.first().ok_or_else(|| EvalError::MalformedReply {
            message: "reply carried no principal variations".into(),
        })?;
        match (pv.cp, pv.mate) {
            (Some(cp), _) => Ok(EvalScore::Centipawns(cp)),
            (None, Some(mate)) => Ok(EvalScore::MateIn(mate)),
            (None, None) => Err(EvalError::MalformedReply {
                message: "principal variation carried neither cp nor mate".into(),
            }),
        }
    }
}

#[async_trait]
impl Evaluator for CloudEvalClient {
    async fn evaluate(&self, fen: &str) -> EvalResult<EvalScore> {
        let url = format!("{}/api/cloud-eval", self.base_url);
        let reply: CloudReply = self
            .http
            .get(&url)
            .query(&[("fen", fen), ("multiPv", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let score = Self::score_from_reply(reply)?;
        debug!(%fen, %score, "cloud evaluation received");
        Ok(score)
    }

    fn name(&self) -> &'static str {
        "cloud"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> EvalResult<EvalScore> {
        let reply: CloudReply = serde_json::from_str(body).unwrap();
        CloudEvalClient::score_from_reply(reply)
    }

    #[test]
    fn test_centipawn_reply() {
        let score = parse(r#"{"fen":"x","pvs":[{"cp":36,"moves":"e2e4"}]}"#).unwrap();
        assert_eq!(score, EvalScore::Centipawns(36));
    }

    #[test]
    fn test_mate_reply() {
        let score = parse(r#"{"pvs":[{"mate":-3,"moves":"h5f7"}]}"#).unwrap();
        assert_eq!(score, EvalScore::MateIn(-3));
    }

    #[test]
    fn test_cp_wins_when_both_present() {
        let score = parse(r#"{"pvs":[{"cp":120,"mate":9}]}"#).unwrap();
        assert_eq!(score, EvalScore::Centipawns(120));
    }

    #[test]
    fn test_empty_pvs_is_malformed() {
        let err = parse(r#"{"pvs":[]}"#).unwrap_err();
        assert!(matches!(err, EvalError::MalformedReply { .. }));
    }

    #[test]
    fn test_scoreless_pv_is_malformed() {
        let err = parse(r#"{"pvs":[{"moves":"e2e4"}]}"#).unwrap_err();
        assert!(matches!(err, EvalError::MalformedReply { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CloudEvalClient::new("https://example.test/");
        assert_eq!(client.base_url, "https://example.test");
    }
}
