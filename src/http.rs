// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// HTTP response with status and fully buffered body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One field of a multipart/form-data request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text(String),
    File {
        filename: String,
        media_type: String,
        bytes: Vec<u8>,
    },
}

/// Ordered multipart/form-data body.
///
/// Kept as plain data so that request contents can be inspected in tests;
/// [`ReqwestClient`] converts it into a `reqwest::multipart::Form` when sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    parts: Vec<(String, FormPart)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts
            .push((name.to_string(), FormPart::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, filename: &str, media_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push((
            name.to_string(),
            FormPart::File {
                filename: filename.to_string(),
                media_type: media_type.to_string(),
                bytes,
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    /// Value of the first text field with the given name
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::Text(value) if n == name => Some(value.as_str()),
            _ => None,
        })
    }
}

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch the entire response body as bytes, along with the status
    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error>;

    /// Send a multipart/form-data POST and return the response status
    async fn post_multipart(&self, url: &str, body: MultipartBody) -> Result<u16, reqwest::Error>;

    /// Send a DELETE and return the response status
    async fn delete(&self, url: &str) -> Result<u16, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestClient with a custom reqwest::Client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn to_form(body: MultipartBody) -> Result<reqwest::multipart::Form, reqwest::Error> {
    let mut form = reqwest::multipart::Form::new();

    for (name, part) in body.parts {
        form = match part {
            FormPart::Text(value) => form.text(name, value),
            FormPart::File {
                filename,
                media_type,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str(&media_type)?;
                form.part(name, part)
            }
        };
    }

    Ok(form)
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }

    async fn post_multipart(&self, url: &str, body: MultipartBody) -> Result<u16, reqwest::Error> {
        let form = to_form(body)?;
        let response = self.client.post(url).multipart(form).send().await?;
        Ok(response.status().as_u16())
    }

    async fn delete(&self, url: &str) -> Result<u16, reqwest::Error> {
        let response = self.client.delete(url).send().await?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        (**self).get(url).await
    }

    async fn post_multipart(&self, url: &str, body: MultipartBody) -> Result<u16, reqwest::Error> {
        (**self).post_multipart(url, body).await
    }

    async fn delete(&self, url: &str) -> Result<u16, reqwest::Error> {
        (**self).delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reqwest_client_can_be_created() {
        let _client = ReqwestClient::new();
        let _client_default = ReqwestClient::default();
    }

    #[test]
    fn multipart_body_keeps_field_order() {
        let body = MultipartBody::new()
            .text("title", "Pilot")
            .file("audio_file", "pilot.mp3", "audio/mpeg", vec![1, 2, 3])
            .text("season", "");

        let names: Vec<_> = body.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["title", "audio_file", "season"]);
        assert_eq!(body.text_field("title"), Some("Pilot"));
        assert_eq!(body.text_field("season"), Some(""));
        assert_eq!(body.text_field("audio_file"), None);
    }

    #[test]
    fn multipart_body_converts_to_reqwest_form() {
        let body = MultipartBody::new()
            .text("title", "Pilot")
            .file("audio_file", "pilot.mp3", "audio/mpeg", vec![0; 4]);

        assert!(to_form(body).is_ok());
    }

    #[test]
    fn response_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: Bytes::new(),
        };
        let failed = HttpResponse {
            status: 500,
            body: Bytes::new(),
        };
        assert!(ok.is_success());
        assert!(!failed.is_success());
    }
}
