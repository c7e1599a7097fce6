//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;
use workbench_host::config::ServerConfig;
use workbench_host::http::HttpServer;
use workbench_host::lifecycle::Shutdown;
use workbench_host::net::ChannelTracker;

/// Host page in the shape the editor ships: every binding is referenced.
pub const WORKBENCH_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
	<head>
		<meta charset="utf-8" />
		<base href="{{BASE}}/">
		<link rel="canonical" href="{{WORKBENCH_WEB_BASE_URL}}">
		<meta id="vscode-workbench-auth-session" data-settings="{{WORKBENCH_AUTH_SESSION}}">
	</head>
	<body aria-label="">
		<script>
			self.webPackagePaths = {};
			const config = {{WORKBENCH_WEB_CONFIGURATION}};
			const nls = {{ NLS_CONFIGURATION }};
		</script>
		<script src="{{VS_BASE}}/out/vs/loader.js"></script>
	</body>
</html>
"#;

/// A running server with its asset roots and template on disk.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub channels: ChannelTracker,
    pub dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Wait until the live channel count reaches `expected`.
    pub async fn wait_for_channels(&self, expected: u64) {
        for _ in 0..200 {
            if self.channels.active_count() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} live channels, found {}",
            expected,
            self.channels.active_count()
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Lay out `out/`, `extensions/` and the template under a fresh directory.
pub fn fixture() -> (TempDir, ServerConfig) {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let extensions = dir.path().join("extensions");
    std::fs::create_dir_all(out.join("vs/code/browser/workbench")).unwrap();
    std::fs::create_dir_all(extensions.join("git/dist")).unwrap();

    std::fs::write(out.join("vs/code.js"), "define('vs/code', [], {});\n").unwrap();
    std::fs::write(extensions.join("git/package.json"), r#"{"name":"git"}"#).unwrap();
    std::fs::write(extensions.join("git/dist/main.js"), [0u8, 159, 146, 150]).unwrap();

    let template = out.join("vs/code/browser/workbench/workbench.html");
    std::fs::write(&template, WORKBENCH_TEMPLATE).unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.assets.out_root = out.to_string_lossy().into_owned();
    config.assets.extensions_root = extensions.to_string_lossy().into_owned();
    config.template.path = template.to_string_lossy().into_owned();
    (dir, config)
}

/// Start the server on an ephemeral port.
pub async fn start_server(dir: TempDir, config: ServerConfig) -> TestServer {
    let server = HttpServer::new(config).unwrap();
    let channels = server.channels();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        shutdown,
        channels,
        dir,
    }
}

/// Start the server with the default fixture.
pub async fn start_default() -> TestServer {
    let (dir, config) = fixture();
    start_server(dir, config).await
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
