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

//! Parse the `zone` value returned by the metadata service.
//!
//! The metadata service returns the zone of a VM as
//! `projects/{projectNumber}/zones/{zone}`, for example
//! `projects/123456789012/zones/us-central1-a`.

use crate::Result;
use crate::errors::Error;

const EXPECTED_FORMAT: &str = "projects/{projectNumber}/zones/{zone}";

// Zone names are `{region}-{letter}`.
const ZONE_SUFFIX_LEN: usize = 2;

/// Returns the region in a zone path.
///
/// The region is the zone name without its last two characters. Zone names
/// with longer suffixes are not detected and produce the wrong region.
///
/// # Example
/// ```
/// # use google_cloud_metadata::zone::extract_region;
/// let region = extract_region("projects/123456789012/zones/asia-northeast1-a")?;
/// assert_eq!(region, "asia-northeast1");
/// # Ok::<(), google_cloud_metadata::errors::Error>(())
/// ```
pub fn extract_region(zone_path: &str) -> Result<String> {
    let zone = last_segment(zone_path)?;
    if zone.chars().count() <= ZONE_SUFFIX_LEN {
        return Err(Error::invalid_argument(EXPECTED_FORMAT, zone_path));
    }
    let end = zone
        .char_indices()
        .rev()
        .nth(ZONE_SUFFIX_LEN - 1)
        .map(|(i, _)| i)
        .unwrap_or_default();
    Ok(zone[..end].to_string())
}

/// Returns the zone name in a zone path.
///
/// Only the empty string is rejected, any other input returns its last
/// `/`-separated segment as-is.
///
/// # Example
/// ```
/// # use google_cloud_metadata::zone::extract_zone;
/// let zone = extract_zone("projects/123456789012/zones/asia-northeast1-a")?;
/// assert_eq!(zone, "asia-northeast1-a");
/// # Ok::<(), google_cloud_metadata::errors::Error>(())
/// ```
pub fn extract_zone(zone_path: &str) -> Result<String> {
    last_segment(zone_path).map(str::to_string)
}

fn last_segment(zone_path: &str) -> Result<&str> {
    if zone_path.is_empty() {
        return Err(Error::invalid_argument(EXPECTED_FORMAT, zone_path));
    }
    Ok(zone_path.rsplit('/').next().unwrap_or(zone_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use test_case::test_case;

    #[test_case("projects/999999999999/zones/asia-northeast1-1", "asia-northeast1")]
    #[test_case("projects/999999999999/zones/asia-northeast1-a", "asia-northeast1")]
    #[test_case("projects/123/zones/us-central1-f", "us-central1")]
    #[test_case("europe-west4-b", "europe-west4")]
    #[test_case("abc", "a")]
    // Only the last two characters are removed.
    #[test_case("projects/123/zones/us-east1-ai", "us-east1-")]
    #[test_case("projects/123/zones/ zône-é", " zône")]
    fn region(input: &str, want: &str) -> anyhow::Result<()> {
        let got = extract_region(input)?;
        assert_eq!(got, want);
        Ok(())
    }

    #[test_case("")]
    #[test_case("1")]
    #[test_case("////")]
    #[test_case("projects/123/zones/ab")]
    #[test_case("projects/123/zones/")]
    fn region_invalid(input: &str) {
        let err = extract_region(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{err:?}");
        assert!(err.to_string().contains(EXPECTED_FORMAT), "{err}");
    }

    #[test_case("projects/999999999999/zones/asia-northeast1-a", "asia-northeast1-a")]
    #[test_case("projects/999999999999/zones/asia-northeast1-1", "asia-northeast1-1")]
    #[test_case("us-central1-c", "us-central1-c")]
    #[test_case("1", "1")]
    #[test_case("////", "")]
    #[test_case("projects/123/zones/", "")]
    fn zone(input: &str, want: &str) -> anyhow::Result<()> {
        let got = extract_zone(input)?;
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn zone_empty() {
        let err = extract_zone("").unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");
        assert!(err.to_string().contains(EXPECTED_FORMAT), "{err}");
    }

    #[test]
    fn region_and_zone_agree() -> anyhow::Result<()> {
        for region in ["us-central1", "asia-northeast1", "me-west1"] {
            for suffix in ["-a", "-b", "-c", "-1"] {
                let zone_name = format!("{region}{suffix}");
                let path = format!("projects/999999999999/zones/{zone_name}");
                assert_eq!(extract_region(&path)?, region);
                assert_eq!(extract_zone(&path)?, zone_name);
            }
        }
        Ok(())
    }
}
