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

// The process-wide resolver is created once, so this file has a single test.

#[cfg(test)]
mod tests {
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use scoped_env::ScopedEnv;

    #[tokio::test]
    async fn top_level_functions() -> anyhow::Result<()> {
        let server = Server::run();
        let expect = |path: &str, body: &'static str| {
            server.expect(
                Expectation::matching(all_of![
                    request::method("GET"),
                    request::path(format!("/computeMetadata/v1/{path}")),
                    request::headers(contains(("metadata-flavor", "Google"))),
                ])
                .respond_with(status_code(200).body(body)),
            )
        };
        expect("project/project-id", "test-project");
        expect(
            "instance/service-accounts/default/email",
            "sa@test-project.iam.gserviceaccount.com",
        );
        expect("instance/attributes/instance-key", "instance-value");
        expect("project/attributes/project-key", "project-value");
        server.expect(
            Expectation::matching(request::path("/computeMetadata/v1/instance/zone"))
                .times(2)
                .respond_with(status_code(200).body("projects/999999999999/zones/us-central1-f")),
        );

        let addr = server.addr().to_string();
        let _e = ScopedEnv::set("GCE_METADATA_HOST", addr.as_str());
        assert!(google_cloud_metadata::on_gcp().await);
        assert_eq!(google_cloud_metadata::project_id().await?, "test-project");
        assert_eq!(
            google_cloud_metadata::service_account_email().await?,
            "sa@test-project.iam.gserviceaccount.com"
        );
        assert_eq!(google_cloud_metadata::region().await?, "us-central1");
        assert_eq!(google_cloud_metadata::zone().await?, "us-central1-f");
        assert_eq!(
            google_cloud_metadata::instance_attribute("instance-key").await?,
            "instance-value"
        );
        assert_eq!(
            google_cloud_metadata::project_attribute("project-key").await?,
            "project-value"
        );

        let _e1 = ScopedEnv::set("GAE_SERVICE", "default");
        let _e2 = ScopedEnv::set("GAE_VERSION", "20250101t000000");
        let _e3 = ScopedEnv::set("GAE_INSTANCE", "00c61b117c");
        let _e4 = ScopedEnv::set("GAE_RUNTIME", "go122");
        let _e5 = ScopedEnv::set("GAE_MEMORY_MB", "512");
        let _e6 = ScopedEnv::set("GAE_DEPLOYMENT_ID", "123456789");
        let _e7 = ScopedEnv::remove("GAE_ENV");
        assert_eq!(google_cloud_metadata::app_engine_service()?, "default");
        assert_eq!(
            google_cloud_metadata::app_engine_version()?,
            "20250101t000000"
        );
        assert_eq!(google_cloud_metadata::app_engine_instance()?, "00c61b117c");
        assert_eq!(google_cloud_metadata::app_engine_runtime()?, "go122");
        assert_eq!(google_cloud_metadata::app_engine_memory_mb()?, "512");
        assert_eq!(
            google_cloud_metadata::app_engine_deployment_id()?,
            "123456789"
        );
        let err = google_cloud_metadata::app_engine_env().unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
        assert!(err.to_string().contains("GAE_ENV"), "{err}");
        Ok(())
    }
}
