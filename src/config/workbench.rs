//! Runtime configuration handed to the editor front end.
//!
//! The value is built once at startup, never mutated, and serialized fresh
//! into every rendered document. Endpoint paths are relative to the
//! document's base path so the page keeps working behind any host or port.

use serde::{Deserialize, Serialize};

/// Root of the configuration blob injected as `WORKBENCH_WEB_CONFIGURATION`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkbenchConfiguration {
    pub remote_authority: String,
    pub webview_endpoint: String,
    pub user_data_path: String,
    pub is_enabled_file_downloads: bool,
    pub is_enabled_coder_getting_started: bool,
    pub development_options: DevelopmentOptions,
    pub enable_workspace_trust: bool,
    pub product_configuration: ProductConfiguration,
    pub callback_route: String,
}

impl Default for WorkbenchConfiguration {
    fn default() -> Self {
        Self {
            remote_authority: "remote".to_string(),
            webview_endpoint: "./stc1119af9e0workbench/contrib/webview/browser/pre".to_string(),
            user_data_path: "/home/dosgo/.local/share/code-server".to_string(),
            is_enabled_file_downloads: true,
            is_enabled_coder_getting_started: true,
            development_options: DevelopmentOptions::default(),
            enable_workspace_trust: true,
            product_configuration: ProductConfiguration::default(),
            callback_route: "/stable-b3e4e68a0bc097f0ae7907b217c1119af9e03435/callback"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevelopmentOptions {
    pub log_level: i32,
}

impl Default for DevelopmentOptions {
    fn default() -> Self {
        Self { log_level: 3 }
    }
}

/// Product-level settings: version, endpoints, telemetry and gallery.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductConfiguration {
    pub code_server_version: String,
    pub root_endpoint: String,
    pub update_endpoint: String,
    pub logout_endpoint: String,
    /// Declared for the front end; no route serves it.
    pub proxy_endpoint_template: String,
    pub service_worker: ServiceWorker,
    pub enable_telemetry: bool,
    pub embedder_identifier: String,
    pub extensions_gallery: ExtensionsGallery,
}

impl Default for ProductConfiguration {
    fn default() -> Self {
        Self {
            code_server_version: "4.13.0".to_string(),
            root_endpoint: ".".to_string(),
            update_endpoint: "./update/check".to_string(),
            logout_endpoint: "./logout".to_string(),
            proxy_endpoint_template: "./proxy/{{port}}/".to_string(),
            service_worker: ServiceWorker::default(),
            enable_telemetry: true,
            embedder_identifier: "server-distro".to_string(),
            extensions_gallery: ExtensionsGallery::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceWorker {
    pub scope: String,
    pub path: String,
}

impl Default for ServiceWorker {
    fn default() -> Self {
        Self {
            scope: "./".to_string(),
            path: "./_static/out/browser/serviceWorker.js".to_string(),
        }
    }
}

/// Extension marketplace endpoints. Empty strings disable a feature.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionsGallery {
    pub service_url: String,
    pub item_url: String,
    pub resource_url_template: String,
    pub control_url: String,
    pub recommendations_url: String,
}

impl Default for ExtensionsGallery {
    fn default() -> Self {
        Self {
            service_url: "https://open-vsx.org/vscode/gallery".to_string(),
            item_url: "https://open-vsx.org/vscode/item".to_string(),
            resource_url_template: "https://open-vsx.org/vscode/asset/{publisher}/{name}/{version}/Microsoft.VisualStudio.Code.WebResources/{path}".to_string(),
            control_url: String::new(),
            recommendations_url: String::new(),
        }
    }
}

impl WorkbenchConfiguration {
    /// Serialize to pretty JSON that is safe to embed in an HTML document.
    ///
    /// `<`, `>` and `&` only ever occur inside JSON strings, so replacing them
    /// with `\u` escapes keeps the value valid JSON while ruling out
    /// `</script>` and comment sequences.
    pub fn to_embeddable_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(escape_for_script(&json))
    }
}

/// Escape `<`, `>`, `&`, U+2028 and U+2029 as `\u` sequences.
///
/// Only valid on JSON text, where those characters can only appear inside
/// strings.
pub fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = WorkbenchConfiguration::default().to_embeddable_json().unwrap();
        assert!(json.contains(r#""codeServerVersion": "4.13.0""#));
        assert!(json.contains(r#""proxyEndpointTemplate": "./proxy/{{port}}/""#));
        assert!(json.contains(r#""logLevel": 3"#));
        assert!(json.contains(r#""recommendationsUrl": """#));
    }

    #[test]
    fn key_order_follows_declaration() {
        let json = WorkbenchConfiguration::default().to_embeddable_json().unwrap();
        let authority = json.find("remoteAuthority").unwrap();
        let product = json.find("productConfiguration").unwrap();
        let callback = json.find("callbackRoute").unwrap();
        assert!(authority < product && product < callback);
    }

    #[test]
    fn script_breaking_sequences_are_escaped() {
        let mut config = WorkbenchConfiguration::default();
        config.remote_authority = "</script><script>alert(1)</script>".into();
        config.user_data_path = "a & b\u{2028}".into();

        let json = config.to_embeddable_json().unwrap();
        assert!(!json.contains("</script"));
        assert!(!json.contains('<'));
        assert!(!json.contains('&'));

        let round: WorkbenchConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(round, config);
    }
}
