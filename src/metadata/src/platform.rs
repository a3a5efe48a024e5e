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

//! Detect if the application is running on Google Cloud.
//!
//! Google Cloud environments such as [Google Compute Engine (GCE)][gce-link],
//! [Google Kubernetes Engine (GKE)][gke-link], [App Engine], or [Cloud Run]
//! provide a [Metadata Service]. The [Resolver][crate::resolver::Resolver]
//! uses a [PlatformDetector] to decide whether to query that service or fall
//! back to environment variables.
//!
//! [App Engine]: https://cloud.google.com/appengine
//! [Cloud Run]: https://cloud.google.com/run
//! [gce-link]: https://cloud.google.com/products/compute
//! [gke-link]: https://cloud.google.com/kubernetes-engine
//! [Metadata Service]: https://cloud.google.com/compute/docs/metadata/overview

use crate::environment::Environment;
use crate::mds::client::Client;
use crate::mds::{GCE_METADATA_HOST_ENV_VAR, METADATA_HOST};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Answers whether the application is running on Google Cloud.
///
/// The [Resolver][crate::resolver::Resolver] calls this on every request and
/// does not remember the answer. Implementations should be cheap to call
/// repeatedly.
#[async_trait::async_trait]
pub trait PlatformDetector: std::fmt::Debug + Send + Sync {
    /// Returns `true` when running on Google Cloud.
    async fn on_gcp(&self) -> bool;
}

/// A [PlatformDetector] returning a fixed answer.
///
/// Useful in tests, and in applications that know where they are deployed.
///
/// ```
/// # use google_cloud_metadata::platform::{FixedPlatform, PlatformDetector};
/// # tokio_test::block_on(async {
/// assert!(FixedPlatform::gcp().on_gcp().await);
/// assert!(!FixedPlatform::local().on_gcp().await);
/// # });
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPlatform(bool);

impl FixedPlatform {
    /// Always report running on Google Cloud.
    pub fn gcp() -> Self {
        Self(true)
    }

    /// Always report running outside Google Cloud.
    pub fn local() -> Self {
        Self(false)
    }
}

#[async_trait::async_trait]
impl PlatformDetector for FixedPlatform {
    async fn on_gcp(&self) -> bool {
        self.0
    }
}

/// Detects Google Cloud by probing the metadata service.
///
/// If the `GCE_METADATA_HOST` environment variable is set the application is
/// assumed to run on Google Cloud. Otherwise the detector sends a request to
/// the metadata service and, when using the default endpoint, resolves
/// `metadata.google.internal`. Either succeeding means running on Google
/// Cloud.
///
/// Detection runs at most once per detector, the result is shared by all
/// clones.
#[derive(Clone, Debug)]
pub struct MetadataServerDetector {
    inner: Arc<DetectorInner>,
}

#[derive(Debug)]
struct DetectorInner {
    client: Client,
    timeout: Duration,
    env: Arc<dyn Environment>,
    result: OnceCell<bool>,
}

impl MetadataServerDetector {
    pub(crate) fn new(client: Client, timeout: Duration, env: Arc<dyn Environment>) -> Self {
        Self {
            inner: Arc::new(DetectorInner {
                client,
                timeout,
                env,
                result: OnceCell::new(),
            }),
        }
    }

    async fn detect(&self) -> bool {
        if self
            .inner
            .env
            .var(GCE_METADATA_HOST_ENV_VAR)
            .is_some_and(|h| !h.is_empty())
        {
            tracing::debug!("{GCE_METADATA_HOST_ENV_VAR} is set, assuming Google Cloud");
            return true;
        }
        let timeout = self.inner.timeout;
        let ping = async {
            tokio::time::timeout(timeout, self.inner.client.ping())
                .await
                .unwrap_or(false)
        };
        let lookup = async {
            if !self.inner.client.is_default_endpoint {
                return false;
            }
            tokio::time::timeout(timeout, tokio::net::lookup_host((METADATA_HOST, 80)))
                .await
                .is_ok_and(|r| r.is_ok_and(|mut addrs| addrs.next().is_some()))
        };
        let (ping, lookup) = tokio::join!(ping, lookup);
        let on_gcp = ping || lookup;
        tracing::debug!(ping, lookup, on_gcp, "metadata service detection");
        on_gcp
    }
}

#[async_trait::async_trait]
impl PlatformDetector for MetadataServerDetector {
    async fn on_gcp(&self) -> bool {
        *self.inner.result.get_or_init(|| self.detect()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use std::collections::HashMap;

    // Used by tests in other modules.
    mockall::mock! {
        #[derive(Debug)]
        pub PlatformDetector { }

        #[async_trait::async_trait]
        impl PlatformDetector for PlatformDetector {
            async fn on_gcp(&self) -> bool;
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn detector(env: HashMap<String, String>, endpoint: Option<String>) -> MetadataServerDetector {
        let client = Client::new(&env, endpoint, TIMEOUT).unwrap();
        MetadataServerDetector::new(client, TIMEOUT, Arc::new(env))
    }

    #[tokio::test]
    async fn fixed() {
        assert!(FixedPlatform::gcp().on_gcp().await);
        assert!(!FixedPlatform::local().on_gcp().await);
    }

    #[tokio::test]
    async fn env_var_means_gcp() {
        let env = HashMap::from([(
            GCE_METADATA_HOST_ENV_VAR.to_string(),
            "127.0.0.1:1".to_string(),
        )]);
        assert!(detector(env, None).on_gcp().await);
    }

    #[tokio::test]
    async fn empty_env_var_is_ignored() {
        let env = HashMap::from([(GCE_METADATA_HOST_ENV_VAR.to_string(), String::new())]);
        // Nothing listens on this port.
        let detector = detector(env, Some("http://127.0.0.1:1".to_string()));
        assert!(!detector.on_gcp().await);
    }

    #[tokio::test]
    async fn ping_success() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::path("/"))
                .times(1)
                .respond_with(status_code(200).insert_header("Metadata-Flavor", "Google")),
        );

        let detector = detector(HashMap::new(), Some(format!("http://{}", server.addr())));
        assert!(detector.on_gcp().await);
        // The result is memoized, the server only sees one request.
        assert!(detector.clone().on_gcp().await);
    }

    #[tokio::test]
    async fn ping_not_metadata_server() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::path("/"))
                .respond_with(status_code(200).body("some other server")),
        );

        let detector = detector(HashMap::new(), Some(format!("http://{}", server.addr())));
        assert!(!detector.on_gcp().await);
    }

    #[tokio::test]
    async fn ping_unreachable() {
        let detector = detector(HashMap::new(), Some("http://127.0.0.1:1".to_string()));
        assert!(!detector.on_gcp().await);
    }
}
