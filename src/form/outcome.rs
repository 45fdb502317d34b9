use serde_json::Value;

/// 服务端响应的展示结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success {
        flow_id: Option<String>,
        flow_name: Option<String>,
    },
    Failure {
        status: u16,
        message: String,
        details: Option<Value>,
    },
}

impl SubmissionOutcome {
    /// 成功响应形如 `{ data: { data: { id, attributes: { name } } } }`
    pub fn from_response(status: u16, body: &Value) -> Self {
        if (200..300).contains(&status) {
            let flow = &body["data"]["data"];
            return Self::Success {
                flow_id: flow["id"].as_str().map(str::to_string),
                flow_name: flow["attributes"]["name"].as_str().map(str::to_string),
            };
        }

        let message = body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {status}."));
        let details = body.get("details").filter(|d| !d.is_null()).cloned();
        Self::Failure {
            status,
            message,
            details,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn render(&self) -> String {
        match self {
            Self::Success { flow_id, flow_name } => format!(
                "Flow created.\n  ID:   {}\n  Name: {}",
                flow_id.as_deref().unwrap_or("(unknown)"),
                flow_name.as_deref().unwrap_or("(unknown)")
            ),
            Self::Failure {
                status,
                message,
                details,
            } => {
                let mut text = format!("Error ({status}): {message}");
                if let Some(details) = details {
                    let pretty =
                        serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string());
                    text.push_str("\n\nDetails:\n");
                    text.push_str(&pretty);
                }
                text
            }
        }
    }
}
