use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use super::{Backend, BackendError, ChatReply};
use crate::attachment::Attachment;

/// HTTP client for the analysis backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for `base_url` with an optional request timeout.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or the client can't be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).with_context(|| format!("Invalid backend URL '{base_url}'"))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn transport(err: &reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

async fn status_failure(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.ok().filter(|body| !body.is_empty());
    warn!(status, "backend returned an error status");
    BackendError::Status { status, body }
}

impl Backend for HttpBackend {
    async fn upload(&self, attachment: &Attachment) -> Result<(), BackendError> {
        let bytes = attachment
            .load_bytes()
            .await
            .map_err(|err| BackendError::Transport(format!("{err:#}")))?;
        debug!(
            file = %attachment.file_name,
            size = bytes.len(),
            "uploading attachment"
        );

        let length = bytes.len() as u64;
        let part = Part::stream_with_length(bytes, length).file_name(attachment.file_name.clone());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport(&err))?;

        if !response.status().is_success() {
            return Err(status_failure(response).await);
        }
        debug!(status = response.status().as_u16(), "upload accepted");
        Ok(())
    }

    async fn chat(&self, query: &str) -> Result<ChatReply, BackendError> {
        debug!(len = query.len(), "sending chat query");
        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|err| transport(&err))?;

        if !response.status().is_success() {
            return Err(status_failure(response).await);
        }

        let body = response.text().await.map_err(|err| transport(&err))?;
        Ok(ChatReply::from_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header_regex, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;
    use crate::attachment::{AttachmentId, FileCandidate};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn attachment(name: &str, bytes: &'static [u8]) -> Attachment {
        Attachment::new(AttachmentId(0), FileCandidate::in_memory(name, bytes))
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(HttpBackend::new("not a url", None).is_err());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8080/", None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(backend.endpoint("chat"), "http://localhost:8080/chat");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(|req: &Request| {
                let body = String::from_utf8_lossy(&req.body);
                if body.contains(r#"name="file""#)
                    && body.contains(r#"filename="energy.csv""#)
                    && body.contains("room,kwh")
                {
                    ResponseTemplate::new(200).set_body_string("{}")
                } else {
                    ResponseTemplate::new(400).set_body_string("missing file part")
                }
            })
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri(), None).unwrap();
        let result = backend
            .upload(&attachment("energy.csv", b"room,kwh\nA,1\n"))
            .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_upload_failure_keeps_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Failed to parse form\n"))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri(), None).unwrap();
        let err = backend.upload(&attachment("a.csv", b"x")).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Status {
                status: 400,
                body: Some("Failed to parse form\n".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_chat_posts_query_json() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(serde_json::json!({ "query": "What is the average?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "42"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = HttpBackend::new(&server.uri(), None).unwrap();
        let reply = backend.chat("What is the average?").await.unwrap();
        assert_eq!(reply, ChatReply::answer("42"));
    }

    #[tokio::test]
    async fn test_chat_connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let Ok(listener) = std::net::TcpListener::bind("127.0.0.1:0") else {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        };
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(&format!("http://{addr}"), None).unwrap();
        let err = backend.chat("x").await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}
