// Copyright 2025, Horizen Labs, Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User-agent strings for requests sent to the backend.

use serde::{Deserialize, Serialize};

/// Identity reported in user-agent strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentConfig {
    /// Product name, e.g. `Vault`.
    pub product: String,
    /// Project home page.
    pub project_url: String,
    /// Runtime description, e.g. `rustc 1.86.0`.
    pub runtime: String,
    /// Product version.
    pub version: String,
}

/// Version information handed to a plugin by its host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEnvironment {
    /// Host version number.
    pub version: String,
    /// Pre-release tag, empty for releases.
    #[serde(default)]
    pub version_prerelease: String,
    /// Build metadata, empty when absent.
    #[serde(default)]
    pub version_metadata: String,
}

impl PluginEnvironment {
    /// Full version: `version[-prerelease][+metadata]`.
    pub fn full_version(&self) -> String {
        let mut version = self.version.clone();
        if !self.version_prerelease.is_empty() {
            version.push('-');
            version.push_str(&self.version_prerelease);
        }
        if !self.version_metadata.is_empty() {
            version.push('+');
            version.push_str(&self.version_metadata);
        }
        version
    }
}

impl UserAgentConfig {
    /// `<product>/<version> (+<url>; <runtime>; <comments...>)`
    pub fn user_agent(&self, comments: &[&str]) -> String {
        let mut parts = vec![format!("+{}", self.project_url), self.runtime.clone()];
        parts.extend(comments.iter().map(|c| c.to_string()));
        self.format(&self.version, &parts)
    }

    /// User agent of a plugin running inside `env`.
    ///
    /// Empty when there is no environment. The host version replaces the
    /// configured one, and a non-empty `plugin_name` is listed right after the
    /// project url.
    pub fn plugin_user_agent(
        &self,
        env: Option<&PluginEnvironment>,
        plugin_name: &str,
        comments: &[&str],
    ) -> String {
        let Some(env) = env else {
            return String::new();
        };
        let mut parts = vec![format!("+{}", self.project_url)];
        if !plugin_name.is_empty() {
            parts.push(plugin_name.to_string());
        }
        parts.push(self.runtime.clone());
        parts.extend(comments.iter().map(|c| c.to_string()));
        self.format(&env.full_version(), &parts)
    }

    fn format(&self, version: &str, parts: &[String]) -> String {
        format!("{}/{} ({})", self.product, version, parts.join("; "))
    }
}

#[cfg(test)]
mod should {
    use super::{PluginEnvironment, UserAgentConfig};
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> UserAgentConfig {
        UserAgentConfig {
            product: "Vault".into(),
            project_url: "https://vault-test.com".into(),
            runtime: "go5.0".into(),
            version: "1.2.3".into(),
        }
    }

    #[rstest]
    #[case::bare(&[], "Vault/1.2.3 (+https://vault-test.com; go5.0)")]
    #[case::comments(&["pki", "test"], "Vault/1.2.3 (+https://vault-test.com; go5.0; pki; test)")]
    fn describe_the_product(
        config: UserAgentConfig,
        #[case] comments: &[&str],
        #[case] expected: &str,
    ) {
        assert_eq!(config.user_agent(comments), expected);
    }

    #[rstest]
    fn stay_empty_without_environment(config: UserAgentConfig) {
        assert_eq!(config.plugin_user_agent(None, "azure-auth", &["x"]), "");
    }

    #[rstest]
    #[case::release("", "", "azure-auth", "Vault/1.2.3 (+https://vault-test.com; azure-auth; go5.0)")]
    #[case::prerelease("beta1", "", "azure-auth", "Vault/1.2.3-beta1 (+https://vault-test.com; azure-auth; go5.0)")]
    #[case::metadata("beta1", "ent", "azure-auth", "Vault/1.2.3-beta1+ent (+https://vault-test.com; azure-auth; go5.0)")]
    #[case::metadata_only("", "ent", "azure-auth", "Vault/1.2.3+ent (+https://vault-test.com; azure-auth; go5.0)")]
    #[case::no_plugin_name("", "", "", "Vault/1.2.3 (+https://vault-test.com; go5.0)")]
    fn describe_the_plugin_host(
        config: UserAgentConfig,
        #[case] prerelease: &str,
        #[case] metadata: &str,
        #[case] plugin_name: &str,
        #[case] expected: &str,
    ) {
        let env = PluginEnvironment {
            version: "1.2.3".into(),
            version_prerelease: prerelease.into(),
            version_metadata: metadata.into(),
        };
        assert_eq!(config.plugin_user_agent(Some(&env), plugin_name, &[]), expected);
    }

    #[rstest]
    fn append_plugin_comments_after_runtime(config: UserAgentConfig) {
        let env = PluginEnvironment {
            version: "1.9.0".into(),
            ..Default::default()
        };
        assert_eq!(
            config.plugin_user_agent(Some(&env), "pki", &["a", "b"]),
            "Vault/1.9.0 (+https://vault-test.com; pki; go5.0; a; b)"
        );
    }

    #[test]
    fn read_host_environment_from_json() {
        let env: PluginEnvironment = serde_json::from_str(r#"{"version": "1.14.0"}"#).unwrap();
        assert_eq!(env.full_version(), "1.14.0");
    }
}
