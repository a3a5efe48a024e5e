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

//! [App Engine environment variables].
//!
//! The App Engine runtime describes the running deployment through a fixed set
//! of environment variables. These values are always read from the
//! environment, the metadata service is never consulted.
//!
//! [App Engine environment variables]: https://cloud.google.com/appengine/docs/standard/go/runtime#environment_variables

use crate::Result;
use crate::environment::Environment;
use crate::errors::Error;

/// The service name specified in your `app.yaml` file, `default` if unset.
pub const SERVICE: &str = "GAE_SERVICE";
/// The current version label of your service.
pub const VERSION: &str = "GAE_VERSION";
/// The ID of the instance on which your service is currently running.
pub const INSTANCE: &str = "GAE_INSTANCE";
/// The runtime specified in your `app.yaml` file.
pub const RUNTIME: &str = "GAE_RUNTIME";
/// The amount of memory available to the application process, in MB.
pub const MEMORY_MB: &str = "GAE_MEMORY_MB";
/// The ID of the current deployment.
pub const DEPLOYMENT_ID: &str = "GAE_DEPLOYMENT_ID";
/// The App Engine environment, set to `standard`.
pub const ENV: &str = "GAE_ENV";

/// Reads a required App Engine variable. Unset and empty are both errors.
pub(crate) fn lookup(env: &dyn Environment, name: &str, description: &str) -> Result<String> {
    match env.var(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::not_found(format!(
            "AppEngine {description} environment variable is not found. plz set ${name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    #[test_case(SERVICE)]
    #[test_case(VERSION)]
    #[test_case(INSTANCE)]
    #[test_case(RUNTIME)]
    #[test_case(MEMORY_MB)]
    #[test_case(DEPLOYMENT_ID)]
    #[test_case(ENV)]
    fn found(name: &str) -> anyhow::Result<()> {
        let env = HashMap::from([(name.to_string(), "test-value".to_string())]);
        assert_eq!(lookup(&env, name, "test")?, "test-value");
        Ok(())
    }

    #[test_case(None)]
    #[test_case(Some(""))]
    fn missing(value: Option<&str>) {
        let env: HashMap<String, String> = value
            .map(|v| (SERVICE.to_string(), v.to_string()))
            .into_iter()
            .collect();
        let err = lookup(&env, SERVICE, "Service id").unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
        let msg = err.to_string();
        assert!(msg.contains("Service id"), "{msg}");
        assert!(msg.contains("$GAE_SERVICE"), "{msg}");
    }
}
