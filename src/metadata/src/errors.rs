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

//! Errors returned by this crate.

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned by all the functions in this crate.
///
/// Only two conditions are classified: a value with no source
/// ([ErrorKind::NotFound]) and a malformed input
/// ([ErrorKind::InvalidArgument]). Everything else, including transport
/// failures and unexpected responses from the metadata service, is reported as
/// [ErrorKind::Unknown]. Use [source][std::error::Error::source] to
/// investigate those.
///
/// # Example
/// ```
/// use google_cloud_metadata::errors::{Error, ErrorKind};
/// match example_function() {
///     Err(e) if e.kind() == ErrorKind::NotFound => { println!("use a default value"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(v) => { println!("found {v}"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # Err(Error::not_found("GOOGLE_CLOUD_PROJECT is not set"))
/// }
/// ```
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

/// The classification of an [Error].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An opaque failure, typically talking to the metadata service.
    Unknown,
    /// The value has no source, neither the metadata service nor the
    /// environment produced a (non-empty) value.
    NotFound,
    /// The input does not have the expected format.
    InvalidArgument,
}

impl Error {
    /// Creates an error representing a missing value.
    ///
    /// # Example
    /// ```
    /// use google_cloud_metadata::errors::Error;
    /// let error = Error::not_found("plz set $GAE_SERVICE");
    /// assert!(error.is_not_found());
    /// ```
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error representing an input that does not match the
    /// `expected` format.
    ///
    /// # Example
    /// ```
    /// use google_cloud_metadata::errors::Error;
    /// let error = Error::invalid_argument("projects/{projectNumber}/zones/{zone}", "");
    /// assert!(error.is_invalid_argument());
    /// ```
    pub fn invalid_argument<E: AsRef<str>, A: AsRef<str>>(expected: E, argument: A) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            message: format!(
                "invalid argument. expected is {}, argument is = {}",
                expected.as_ref(),
                argument.as_ref()
            ),
            source: None,
        }
    }

    pub(crate) fn unexpected<T: Into<String>>(message: T) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn wrap<T: Into<String>, S: Into<BoxError>>(message: T, source: S) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Adds context to an error without changing its classification.
    ///
    /// The original error becomes the source, its message is not repeated.
    pub(crate) fn context<T: Into<String>>(self, message: T) -> Self {
        let kind = self.kind;
        Self {
            kind,
            message: message.into(),
            source: Some(self.into()),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The requested value was not found.
    ///
    /// # Troubleshooting
    ///
    /// When running outside Google Cloud the values are read from environment
    /// variables. The error message names the variable to set.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    /// The input, possibly returned by the metadata service, does not have the
    /// expected format.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument)
    }
}
