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

//! Google Cloud Client Libraries for Rust - Runtime Metadata
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. We welcome feedback about the
//! APIs, documentation, missing features, bugs, etc.
//!
//! This crate returns the project id, service account, region, zone, and
//! other facts about the environment where an application runs. On Google
//! Cloud the values come from the [Metadata Service]. During local
//! development and in tests the same values are read from environment
//! variables, see [resolver] for the variable names.
//!
//! The functions at the top-level of this crate use a process-wide
//! [Resolver][resolver::Resolver] with the default settings. Use
//! [resolver::Builder] to change the endpoint, the timeout, or to inject a
//! [PlatformDetector][platform::PlatformDetector] and an
//! [Environment][environment::Environment].
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! let project_id = google_cloud_metadata::project_id().await?;
//! let zone = google_cloud_metadata::zone().await?;
//! println!("running in {project_id} at {zone}");
//! # Ok::<(), google_cloud_metadata::errors::Error>(())
//! # });
//! ```
//!
//! [Metadata Service]: https://cloud.google.com/compute/docs/metadata/overview

pub mod app_engine;
pub mod environment;
pub mod errors;
pub mod platform;
pub mod resolver;
pub mod zone;

pub(crate) mod mds;

/// A `Result` alias where the `Err` case is
/// `google_cloud_metadata::errors::Error`.
pub type Result<T> = std::result::Result<T, crate::errors::Error>;

use resolver::Resolver;
use std::sync::OnceLock;

static DEFAULT_RESOLVER: OnceLock<Resolver> = OnceLock::new();

fn default_resolver() -> Result<&'static Resolver> {
    if let Some(r) = DEFAULT_RESOLVER.get() {
        return Ok(r);
    }
    let resolver = Resolver::new()?;
    Ok(DEFAULT_RESOLVER.get_or_init(|| resolver))
}

/// Returns `true` when running on Google Cloud.
pub async fn on_gcp() -> bool {
    match default_resolver() {
        Ok(r) => r.on_gcp().await,
        Err(e) => {
            tracing::debug!("cannot create default resolver: {e}");
            false
        }
    }
}

/// Returns the current project id. See [Resolver::project_id].
pub async fn project_id() -> Result<String> {
    default_resolver()?.project_id().await
}

/// Returns the default service account email. See
/// [Resolver::service_account_email].
pub async fn service_account_email() -> Result<String> {
    default_resolver()?.service_account_email().await
}

/// Returns the current region. See [Resolver::region].
pub async fn region() -> Result<String> {
    default_resolver()?.region().await
}

/// Returns the current zone. See [Resolver::zone].
pub async fn zone() -> Result<String> {
    default_resolver()?.zone().await
}

/// Returns an instance attribute. See [Resolver::instance_attribute].
pub async fn instance_attribute(key: &str) -> Result<String> {
    default_resolver()?.instance_attribute(key).await
}

/// Returns a project attribute. See [Resolver::project_attribute].
pub async fn project_attribute(key: &str) -> Result<String> {
    default_resolver()?.project_attribute(key).await
}

/// Returns the App Engine service id. See [Resolver::app_engine_service].
pub fn app_engine_service() -> Result<String> {
    default_resolver()?.app_engine_service()
}

/// Returns the App Engine version id. See [Resolver::app_engine_version].
pub fn app_engine_version() -> Result<String> {
    default_resolver()?.app_engine_version()
}

/// Returns the App Engine instance id. See [Resolver::app_engine_instance].
pub fn app_engine_instance() -> Result<String> {
    default_resolver()?.app_engine_instance()
}

/// Returns the App Engine runtime. See [Resolver::app_engine_runtime].
pub fn app_engine_runtime() -> Result<String> {
    default_resolver()?.app_engine_runtime()
}

/// Returns the memory available to the App Engine application in MB. See
/// [Resolver::app_engine_memory_mb].
pub fn app_engine_memory_mb() -> Result<String> {
    default_resolver()?.app_engine_memory_mb()
}

/// Returns the App Engine deployment id. See
/// [Resolver::app_engine_deployment_id].
pub fn app_engine_deployment_id() -> Result<String> {
    default_resolver()?.app_engine_deployment_id()
}

/// Returns the App Engine environment. See [Resolver::app_engine_env].
pub fn app_engine_env() -> Result<String> {
    default_resolver()?.app_engine_env()
}
