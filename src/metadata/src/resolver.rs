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

//! Resolve runtime metadata on and off Google Cloud.
//!
//! On Google Cloud the [Resolver] queries the [Metadata Service]. Elsewhere,
//! typically during local development and in tests, it reads environment
//! variables instead:
//!
//! | Value | Environment variable(s) |
//! |-------|-------------------------|
//! | [project_id](Resolver::project_id) | `GOOGLE_CLOUD_PROJECT`, then `GCLOUD_PROJECT` |
//! | [service_account_email](Resolver::service_account_email) | `GCLOUD_SERVICE_ACCOUNT` |
//! | [region](Resolver::region) | `INSTANCE_REGION` |
//! | [zone](Resolver::zone) | `INSTANCE_ZONE` |
//! | [instance_attribute](Resolver::instance_attribute) | `INSTANCE_{key}` |
//! | [project_attribute](Resolver::project_attribute) | `PROJECT_{key}` |
//!
//! Only the project id is required, the other values default to the empty
//! string when the variable is not set.
//!
//! Example usage:
//!
//! ```no_run
//! # use google_cloud_metadata::resolver::Builder;
//! # tokio_test::block_on(async {
//! let resolver = Builder::default().build()?;
//! let project_id = resolver.project_id().await?;
//! let region = resolver.region().await?;
//! println!("running in {project_id} at {region}");
//! # Ok::<(), google_cloud_metadata::errors::Error>(())
//! # });
//! ```
//!
//! [Metadata Service]: https://cloud.google.com/compute/docs/metadata/overview

use crate::Result;
use crate::app_engine;
use crate::environment::{Environment, ProcessEnvironment, first_non_empty, var_or_empty};
use crate::errors::Error;
use crate::mds::client::Client;
use crate::mds::{SERVICE_ACCOUNT_EMAIL_PATH, ZONE_PATH};
use crate::platform::{MetadataServerDetector, PlatformDetector};
use crate::zone::{extract_region, extract_zone};
use std::sync::Arc;
use std::time::Duration;

/// The project id variables, in priority order.
pub const PROJECT_ID_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];
pub const SERVICE_ACCOUNT_VAR: &str = "GCLOUD_SERVICE_ACCOUNT";
pub const REGION_VAR: &str = "INSTANCE_REGION";
pub const ZONE_VAR: &str = "INSTANCE_ZONE";
pub const INSTANCE_ATTRIBUTE_PREFIX: &str = "INSTANCE_";
pub const PROJECT_ATTRIBUTE_PREFIX: &str = "PROJECT_";

/// The metadata service is local to the VM, requests should complete in a
/// few milliseconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Creates [Resolver] instances.
///
/// The defaults query `http://metadata.google.internal` with a
/// [DEFAULT_TIMEOUT], detect Google Cloud with a [MetadataServerDetector], and
/// read the process environment. The `GCE_METADATA_HOST` environment
/// variable, if set, overrides the endpoint.
///
/// ```
/// # use google_cloud_metadata::resolver::Builder;
/// # use google_cloud_metadata::platform::FixedPlatform;
/// # use std::collections::HashMap;
/// # tokio_test::block_on(async {
/// let env = HashMap::from([("GCLOUD_PROJECT".to_string(), "my-project".to_string())]);
/// let resolver = Builder::default()
///     .with_detector(FixedPlatform::local())
///     .with_environment(env)
///     .build()?;
/// assert_eq!(resolver.project_id().await?, "my-project");
/// # Ok::<(), google_cloud_metadata::errors::Error>(())
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    detector: Option<Arc<dyn PlatformDetector>>,
    env: Option<Arc<dyn Environment>>,
}

impl Builder {
    /// Sets the metadata service endpoint.
    ///
    /// If not set, the resolver uses `http://metadata.google.internal`.
    /// The `GCE_METADATA_HOST` environment variable takes precedence over
    /// this value.
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the timeout for each request to the metadata service.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the default [MetadataServerDetector].
    pub fn with_detector<D: PlatformDetector + 'static>(mut self, detector: D) -> Self {
        self.detector = Some(Arc::new(detector));
        self
    }

    /// Replaces the process environment as the source of environment
    /// variables.
    pub fn with_environment<E: Environment + 'static>(mut self, env: E) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    /// Returns a [Resolver] with the configured settings.
    pub fn build(self) -> Result<Resolver> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let env = self
            .env
            .unwrap_or_else(|| Arc::new(ProcessEnvironment) as Arc<dyn Environment>);
        let client = Client::new(env.as_ref(), self.endpoint, timeout)?;
        let detector = match self.detector {
            Some(d) => d,
            None => Arc::new(MetadataServerDetector::new(
                client.clone(),
                timeout,
                env.clone(),
            )),
        };
        Ok(Resolver {
            client,
            detector,
            env,
        })
    }
}

/// Resolves project, service account, and placement information.
///
/// Every call consults the [PlatformDetector] and reads its source again,
/// nothing is cached.
#[derive(Clone, Debug)]
pub struct Resolver {
    client: Client,
    detector: Arc<dyn PlatformDetector>,
    env: Arc<dyn Environment>,
}

impl Resolver {
    /// Creates a resolver with the default settings.
    pub fn new() -> Result<Self> {
        Builder::default().build()
    }

    /// Returns `true` when running on Google Cloud.
    pub async fn on_gcp(&self) -> bool {
        self.detector.on_gcp().await
    }

    /// Returns the current project id.
    ///
    /// Off Google Cloud, returns the first non-empty value of
    /// `GOOGLE_CLOUD_PROJECT` and `GCLOUD_PROJECT`. An empty project id is
    /// always a [NotFound][crate::errors::ErrorKind::NotFound] error.
    pub async fn project_id(&self) -> Result<String> {
        if !self.on_gcp().await {
            tracing::debug!("not on Google Cloud, reading project id from the environment");
            return first_non_empty(self.env.as_ref(), &PROJECT_ID_VARS).ok_or_else(|| {
                Error::not_found(format!(
                    "project id is not found. plz set ${}",
                    PROJECT_ID_VARS[0]
                ))
            });
        }
        let id = self.client.project_id().await?;
        if id.is_empty() {
            return Err(Error::not_found(
                "the metadata service returned an empty project id",
            ));
        }
        Ok(id)
    }

    /// Returns the email of the default service account.
    ///
    /// Off Google Cloud, returns `GCLOUD_SERVICE_ACCOUNT`, possibly empty.
    pub async fn service_account_email(&self) -> Result<String> {
        if !self.on_gcp().await {
            return Ok(var_or_empty(self.env.as_ref(), SERVICE_ACCOUNT_VAR));
        }
        self.client
            .instance_text(SERVICE_ACCOUNT_EMAIL_PATH)
            .await
            .map_err(|e| e.context("failed to fetch service account email"))
    }

    /// Returns the region, for example `us-central1`.
    ///
    /// Off Google Cloud, returns `INSTANCE_REGION`, possibly empty.
    pub async fn region(&self) -> Result<String> {
        if !self.on_gcp().await {
            return Ok(var_or_empty(self.env.as_ref(), REGION_VAR));
        }
        let zone = self.client.instance_text(ZONE_PATH).await?;
        extract_region(&zone)
    }

    /// Returns the zone, for example `us-central1-a`.
    ///
    /// Off Google Cloud, returns `INSTANCE_ZONE`, possibly empty.
    pub async fn zone(&self) -> Result<String> {
        if !self.on_gcp().await {
            return Ok(var_or_empty(self.env.as_ref(), ZONE_VAR));
        }
        let zone = self.client.instance_text(ZONE_PATH).await?;
        extract_zone(&zone)
    }

    /// Returns the [custom instance metadata] value for `key`.
    ///
    /// Off Google Cloud, returns `INSTANCE_{key}`, possibly empty.
    ///
    /// [custom instance metadata]: https://cloud.google.com/compute/docs/metadata/setting-custom-metadata
    pub async fn instance_attribute(&self, key: &str) -> Result<String> {
        if !self.on_gcp().await {
            let name = format!("{INSTANCE_ATTRIBUTE_PREFIX}{key}");
            return Ok(var_or_empty(self.env.as_ref(), &name));
        }
        self.client.instance_attribute(key).await
    }

    /// Returns the [custom project metadata] value for `key`.
    ///
    /// Off Google Cloud, returns `PROJECT_{key}`, possibly empty.
    ///
    /// [custom project metadata]: https://cloud.google.com/compute/docs/metadata/setting-custom-metadata
    pub async fn project_attribute(&self, key: &str) -> Result<String> {
        if !self.on_gcp().await {
            let name = format!("{PROJECT_ATTRIBUTE_PREFIX}{key}");
            return Ok(var_or_empty(self.env.as_ref(), &name));
        }
        self.client.project_attribute(key).await
    }

    /// Returns the App Engine service id, from `GAE_SERVICE`.
    pub fn app_engine_service(&self) -> Result<String> {
        app_engine::lookup(self.env.as_ref(), app_engine::SERVICE, "Service id")
    }

    /// Returns the App Engine version id, from `GAE_VERSION`.
    pub fn app_engine_version(&self) -> Result<String> {
        app_engine::lookup(self.env.as_ref(), app_engine::VERSION, "Version id")
    }

    /// Returns the App Engine instance id, from `GAE_INSTANCE`.
    pub fn app_engine_instance(&self) -> Result<String> {
        app_engine::lookup(self.env.as_ref(), app_engine::INSTANCE, "Instance id")
    }

    /// Returns the App Engine runtime, from `GAE_RUNTIME`.
    pub fn app_engine_runtime(&self) -> Result<String> {
        app_engine::lookup(self.env.as_ref(), app_engine::RUNTIME, "Runtime")
    }

    /// Returns the memory available to the application in MB, from
    /// `GAE_MEMORY_MB`.
    pub fn app_engine_memory_mb(&self) -> Result<String> {
        app_engine::lookup(self.env.as_ref(), app_engine::MEMORY_MB, "MemoryMB")
    }

    /// Returns the App Engine deployment id, from `GAE_DEPLOYMENT_ID`.
    pub fn app_engine_deployment_id(&self) -> Result<String> {
        app_engine::lookup(
            self.env.as_ref(),
            app_engine::DEPLOYMENT_ID,
            "Deployment id",
        )
    }

    /// Returns the App Engine environment, from `GAE_ENV`.
    pub fn app_engine_env(&self) -> Result<String> {
        app_engine::lookup(self.env.as_ref(), app_engine::ENV, "Env")
    }
}
