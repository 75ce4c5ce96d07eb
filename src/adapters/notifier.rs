use crate::domain::model::ServiceReport;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct AttachmentPayload<'a> {
    filename: &'a str,
    content_type: &'a str,
    content: String,
}

/// 透過 HTTP 寄信 API 送出服務報告
pub struct HttpEmailNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

impl HttpEmailNotifier {
    pub fn new(endpoint: &str, api_key: &str, sender: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for HttpEmailNotifier {
    async fn send(&self, report: &ServiceReport) -> Result<bool> {
        let attachments = report
            .attachment
            .iter()
            .map(|attachment| AttachmentPayload {
                filename: &attachment.filename,
                content_type: &attachment.content_type,
                content: base64::engine::general_purpose::STANDARD.encode(&attachment.data),
            })
            .collect();

        let payload = EmailPayload {
            from: &self.sender,
            to: &report.recipient,
            subject: &report.subject,
            text: &report.body,
            attachments,
        };

        tracing::debug!("Sending '{}' to {}", report.subject, report.recipient);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("Email failed: {} {}", status, detail);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Attachment;
    use httpmock::prelude::*;

    fn report(attachment: Option<Attachment>) -> ServiceReport {
        ServiceReport {
            recipient: "owner@example.com".to_string(),
            subject: "Bayco Pools Service Report: Owner".to_string(),
            body: "Hi Owner".to_string(),
            attachment,
        }
    }

    fn notifier(server: &MockServer) -> HttpEmailNotifier {
        HttpEmailNotifier::new(
            &server.url("/emails"),
            "mail-key",
            "crew@baycopools.example",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_with_attachment() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("Authorization", "Bearer mail-key")
                .json_body(serde_json::json!({
                    "from": "crew@baycopools.example",
                    "to": "owner@example.com",
                    "subject": "Bayco Pools Service Report: Owner",
                    "text": "Hi Owner",
                    "attachments": [{
                        "filename": "pool.jpg",
                        "content_type": "image/jpeg",
                        "content": "AQID"
                    }]
                }));
            then.status(202);
        });

        let sent = notifier(&server)
            .send(&report(Some(Attachment {
                filename: "pool.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                data: vec![1, 2, 3],
            })))
            .await
            .unwrap();

        mock.assert();
        assert!(sent);
    }

    #[tokio::test]
    async fn test_rejected_send_returns_false() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).body("invalid recipient");
        });

        let sent = notifier(&server).send(&report(None)).await.unwrap();

        mock.assert();
        assert!(!sent);
    }
}
