// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use crate::environment::Environment;
use crate::errors::Error;
use bytes::Bytes;
use http::StatusCode;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{Client as ReqwestClient, RequestBuilder};
use std::time::Duration;

/// Characters escaped in attribute keys, so a key is always a single path
/// segment.
const ATTRIBUTE_KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A client for GCP Compute Engine Metadata Service (MDS).
#[derive(Clone, Debug)]
pub(crate) struct Client {
    endpoint: String,
    inner: ReqwestClient,
    /// True if the endpoint was NOT overridden by env var or constructor arg.
    pub(crate) is_default_endpoint: bool,
}

impl Client {
    /// Creates a new client for the Metadata Service.
    pub(crate) fn new(
        env: &dyn Environment,
        endpoint_override: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let (endpoint, is_default_endpoint) = Self::resolve_endpoint(env, endpoint_override);
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let inner = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::wrap("cannot create HTTP client for the metadata service", e))?;

        Ok(Self {
            endpoint,
            inner,
            is_default_endpoint,
        })
    }

    /// Determine the endpoint and whether it was overridden
    fn resolve_endpoint(
        env: &dyn Environment,
        endpoint_override: Option<String>,
    ) -> (String, bool) {
        if let Some(host) = env
            .var(super::GCE_METADATA_HOST_ENV_VAR)
            .filter(|h| !h.is_empty())
        {
            (format!("http://{host}"), false)
        } else if let Some(e) = endpoint_override {
            (e, false)
        } else {
            (super::METADATA_ROOT.to_string(), true)
        }
    }

    /// Creates a GET request to the MDS service with the correct headers.
    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!(
            "{}{}/{}",
            self.endpoint,
            super::METADATA_PREFIX,
            path.trim_start_matches('/')
        );
        self.inner
            .get(url)
            .header(super::METADATA_FLAVOR, super::METADATA_FLAVOR_VALUE)
    }

    /// Fetches `path`, relative to `/computeMetadata/v1/`.
    pub(crate) async fn get(&self, path: &str) -> Result<Bytes> {
        tracing::debug!(endpoint = %self.endpoint, path, "querying metadata service");
        let response = self
            .request(path)
            .send()
            .await
            .map_err(|e| Error::wrap(format!("failed to send request. path={path}"), e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::wrap(format!("failed to read response body. path={path}"), e))?;
        if status != StatusCode::OK {
            return Err(Error::unexpected(format!(
                "metadata server response is {}:{}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }
        Ok(body)
    }

    /// Fetches `path` as UTF-8 text.
    pub(crate) async fn get_text(&self, path: &str) -> Result<String> {
        Self::decode(path, self.get(path).await?)
    }

    /// Fetches `path` from the instance metadata, relative to
    /// `/computeMetadata/v1/instance/`.
    pub(crate) async fn instance(&self, path: &str) -> Result<Bytes> {
        self.get(&format!("instance/{}", path.trim_start_matches('/')))
            .await
    }

    /// Fetches `path` from the instance metadata as UTF-8 text.
    pub(crate) async fn instance_text(&self, path: &str) -> Result<String> {
        Self::decode(path, self.instance(path).await?)
    }

    fn decode(path: &str, body: Bytes) -> Result<String> {
        String::from_utf8(body.to_vec())
            .map_err(|e| Error::wrap(format!("response is not valid UTF-8. path={path}"), e))
    }

    pub(crate) async fn project_id(&self) -> Result<String> {
        let id = self.get_text(super::PROJECT_ID_PATH).await?;
        Ok(id.trim().to_string())
    }

    pub(crate) async fn instance_attribute(&self, key: &str) -> Result<String> {
        let key = utf8_percent_encode(key, ATTRIBUTE_KEY_ENCODE_SET);
        self.instance_text(&format!("attributes/{key}")).await
    }

    pub(crate) async fn project_attribute(&self, key: &str) -> Result<String> {
        let key = utf8_percent_encode(key, ATTRIBUTE_KEY_ENCODE_SET);
        self.get_text(&format!("project/attributes/{key}")).await
    }

    /// Returns true if the endpoint responds like a metadata service.
    pub(crate) async fn ping(&self) -> bool {
        let response = self
            .inner
            .get(format!("{}/", self.endpoint))
            .header(super::METADATA_FLAVOR, super::METADATA_FLAVOR_VALUE)
            .send()
            .await;
        match response {
            Ok(r) => r
                .headers()
                .get(super::METADATA_FLAVOR)
                .is_some_and(|v| v == super::METADATA_FLAVOR_VALUE),
            Err(e) => {
                tracing::debug!("metadata service ping failed: {e}");
                false
            }
        }
    }
}
