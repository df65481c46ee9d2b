// SPDX-License-Identifier: GPL-3.0-only

//! HTTP client for the recap service
//!
//! Submissions are multipart POSTs carrying the code as a JSON metadata part
//! and the captured frame as a JPEG part. The response body is expected to be
//! JSON with a `message` field; anything else falls back to a generic text.

use crate::constants::{net, scan};
use crate::errors::SubmitError;
use crate::scanner::DetectedCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for submitting scans to the recap endpoint
#[derive(Debug, Clone)]
pub struct RecapClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RecapClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a detected code with its captured frame.
    ///
    /// Returns the service message on success (HTTP 2xx), falling back to a
    /// generic text when the response carries no usable `message` field.
    pub async fn submit(&self, code: &DetectedCode, jpeg: Vec<u8>) -> Result<String, SubmitError> {
        debug!(endpoint = %self.endpoint, code = %code, "Submitting scan");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(net::REQUEST_TIMEOUT_SECS))
            .multipart(build_form(code, jpeg)?)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Recap service returned an error status");
            return Err(SubmitError::Network(format!(
                "Service responded with {}",
                status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SubmitError::ResponseFormat(e.to_string()))?;

        let message = extract_message(&body);
        info!(message = %message, "Scan submitted");
        Ok(message)
    }
}

/// The JSON metadata part accompanying the image
fn metadata_json(code: &DetectedCode) -> String {
    serde_json::json!({ "code": code.as_str() }).to_string()
}

/// Build the multipart form: a `metadata` text part with the code JSON and
/// an `image` part carrying the JPEG as `frame.jpg`
fn build_form(
    code: &DetectedCode,
    jpeg: Vec<u8>,
) -> Result<reqwest::multipart::Form, SubmitError> {
    let image_part = reqwest::multipart::Part::bytes(jpeg)
        .file_name(net::IMAGE_FILENAME)
        .mime_str("image/jpeg")
        .map_err(|e| SubmitError::Network(e.to_string()))?;

    Ok(reqwest::multipart::Form::new()
        .text(net::METADATA_FIELD, metadata_json(code))
        .part(net::IMAGE_FIELD, image_part))
}

/// Pull the display message out of a service response body
fn extract_message(body: &serde_json::Value) -> String {
    match body.get("message").and_then(|m| m.as_str()) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => scan::RESPONSE_FALLBACK_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};

    const CODE: &str = "036000291452";

    fn code() -> DetectedCode {
        DetectedCode::parse(CODE).expect("valid UPC-A")
    }

    #[test]
    fn test_metadata_json_shape() {
        assert_eq!(metadata_json(&code()), r#"{"code":"036000291452"}"#);
    }

    #[test]
    fn test_build_form_succeeds() {
        // The form boundary changes per call; the part layout is asserted
        // over the wire in test_submit_sends_multipart_contract
        assert!(build_form(&code(), vec![0xFF, 0xD8, 0xFF, 0xD9]).is_ok());
    }

    /// Accept one HTTP request, return its raw bytes, and answer with the
    /// given JSON body
    fn serve_one_request(
        listener: std::net::TcpListener,
        response_json: &'static str,
    ) -> std::thread::JoinHandle<Vec<u8>> {
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("client connects");
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];

            // Read headers, then the declared body length
            let (headers_end, content_length) = loop {
                let n = stream.read(&mut chunk).expect("read request");
                request.extend_from_slice(&chunk[..n]);
                if let Some(pos) = request
                    .windows(4)
                    .position(|window| window == b"\r\n\r\n")
                {
                    let headers = String::from_utf8_lossy(&request[..pos]).to_string();
                    let length = headers
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .expect("request has content-length");
                    break (pos + 4, length);
                }
            };
            while request.len() < headers_end + content_length {
                let n = stream.read(&mut chunk).expect("read body");
                request.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response_json.len(),
                response_json
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response");
            request
        })
    }

    #[tokio::test]
    async fn test_submit_sends_multipart_contract() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = serve_one_request(listener, r#"{"message":"Scan recorded"}"#);

        let client = RecapClient::new(format!("http://{}/recap", addr));
        let jpeg = vec![0xFF, 0xD8, 0xAA, 0xBB, 0xFF, 0xD9];
        let message = client.submit(&code(), jpeg).await.expect("submit succeeds");
        assert_eq!(message, "Scan recorded");

        let request = server.join().expect("server thread");
        let text = String::from_utf8_lossy(&request).to_lowercase();

        assert!(text.starts_with("post /recap"));
        assert!(text.contains("content-type: multipart/form-data"));
        // Metadata part: field name and the code JSON
        assert!(text.contains(r#"name="metadata""#));
        assert!(text.contains(r#"{"code":"036000291452"}"#));
        // Image part: field name, filename, and MIME type
        assert!(text.contains(r#"name="image""#));
        assert!(text.contains(r#"filename="frame.jpg""#));
        assert!(text.contains("content-type: image/jpeg"));
        // The JPEG bytes travel unmodified
        assert!(
            request
                .windows(6)
                .any(|window| window == [0xFF, 0xD8, 0xAA, 0xBB, 0xFF, 0xD9])
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_error_status() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("client connects");
            let mut chunk = [0u8; 4096];
            // Drain what arrived, then answer with a failure status
            let _ = stream.read(&mut chunk);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        });

        let client = RecapClient::new(format!("http://{}/recap", addr));
        let result = client.submit(&code(), vec![0xFF, 0xD8]).await;
        assert!(matches!(result, Err(SubmitError::Network(_))));
        let _ = server.join();
    }

    #[test]
    fn test_extract_message_from_body() {
        let body = json!({ "message": "Scan recorded" });
        assert_eq!(extract_message(&body), "Scan recorded");
    }

    #[test]
    fn test_extract_message_falls_back_when_missing() {
        assert_eq!(extract_message(&json!({})), scan::RESPONSE_FALLBACK_TEXT);
        assert_eq!(
            extract_message(&json!({ "status": "ok" })),
            scan::RESPONSE_FALLBACK_TEXT
        );
    }

    #[test]
    fn test_extract_message_falls_back_on_non_string() {
        assert_eq!(
            extract_message(&json!({ "message": 42 })),
            scan::RESPONSE_FALLBACK_TEXT
        );
        assert_eq!(
            extract_message(&json!({ "message": "" })),
            scan::RESPONSE_FALLBACK_TEXT
        );
        assert_eq!(
            extract_message(&json!({ "message": null })),
            scan::RESPONSE_FALLBACK_TEXT
        );
    }

    #[test]
    fn test_client_keeps_configured_endpoint() {
        let client = RecapClient::new("http://localhost:5000/recap");
        assert_eq!(client.endpoint(), "http://localhost:5000/recap");
    }
}
