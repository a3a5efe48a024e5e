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

//! Access to environment variables.
//!
//! Outside Google Cloud the [Resolver][crate::resolver::Resolver] reads values
//! from environment variables. The lookup goes through the [Environment]
//! trait, so tests can supply a fixed set of variables instead of mutating the
//! process environment.
//!
//! ```
//! # use google_cloud_metadata::environment::Environment;
//! # use std::collections::HashMap;
//! let env = HashMap::from([("GOOGLE_CLOUD_PROJECT".to_string(), "my-project".to_string())]);
//! assert_eq!(env.var("GOOGLE_CLOUD_PROJECT").as_deref(), Some("my-project"));
//! assert_eq!(env.var("GCLOUD_PROJECT"), None);
//! ```

use std::collections::HashMap;

/// A read-only view of environment variables.
pub trait Environment: std::fmt::Debug + Send + Sync {
    /// Returns the value of the variable `name`, or `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the environment of the current process.
#[derive(Clone, Debug, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        // Variables with non-unicode values are treated as unset.
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Returns the value of `name`, using the empty string when it is not set.
pub(crate) fn var_or_empty(env: &dyn Environment, name: &str) -> String {
    env.var(name).unwrap_or_default()
}

/// Returns the first non-empty value among `names`, checked in order.
pub(crate) fn first_non_empty(env: &dyn Environment, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env.var(name))
        .find(|v| !v.is_empty())
}
