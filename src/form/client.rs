use serde_json::Value;
use tracing::instrument;

use super::outcome::SubmissionOutcome;
use super::state::FormState;
use crate::error::{FlowBuilderError, Result};
use crate::server::FLOWS_PATH;

/// 将表单提交到 flow builder 服务端，一次请求，不重试
#[derive(Clone)]
pub struct FormClient {
    client: reqwest::Client,
    endpoint: String,
}

impl FormClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), FLOWS_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, form), fields(endpoint = %self.endpoint))]
    pub async fn submit(&self, form: &FormState) -> Result<SubmissionOutcome> {
        form.validate()?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&form.to_submission())
            .send()
            .await
            .map_err(|e| FlowBuilderError::Http(format!("failed to reach server: {e}")))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| FlowBuilderError::Http(format!("failed to read response: {e}")))?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(SubmissionOutcome::from_response(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_flows_path() {
        assert_eq!(
            FormClient::new("http://127.0.0.1:3000/").endpoint(),
            "http://127.0.0.1:3000/api/flows"
        );
        assert_eq!(
            FormClient::new("http://localhost:8080").endpoint(),
            "http://localhost:8080/api/flows"
        );
    }
}
