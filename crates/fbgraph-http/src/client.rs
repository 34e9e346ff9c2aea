//! One-shot HTTP client construction from a resolved [`ConnectionConfig`]

use crate::config::ConnectionConfig;
use fbgraph_core::{GraphError, GraphResult};
use reqwest::{Certificate, Client, ClientBuilder, Proxy};
use std::path::Path;

/// Build a client that opens exactly one connection for one request.
///
/// The idle pool is disabled, so the connection is closed as soon as the
/// response has been read and the client is dropped.
pub async fn build_client(config: &ConnectionConfig) -> GraphResult<Client> {
    let mut builder = Client::builder().pool_max_idle_per_host(0);

    if let Some(open_timeout) = config.open_timeout {
        builder = builder.connect_timeout(open_timeout);
    }
    if let Some(read_timeout) = config.read_timeout {
        builder = builder.read_timeout(read_timeout);
    }

    if let Some(proxy) = &config.proxy {
        let mut reqwest_proxy = Proxy::all(proxy.address()).map_err(|e| {
            GraphError::Configuration(format!("Invalid proxy '{}': {}", proxy.address(), e))
        })?;
        if let Some(user) = &proxy.user {
            reqwest_proxy = reqwest_proxy.basic_auth(user, proxy.pass.as_deref().unwrap_or(""));
        }
        builder = builder.proxy(reqwest_proxy);
    }

    if config.use_ssl {
        builder = apply_ca_trust(builder, config).await?;
    }

    builder
        .build()
        .map_err(|e| GraphError::Transport(format!("Failed to build HTTP client: {}", e)))
}

async fn apply_ca_trust(mut builder: ClientBuilder, config: &ConnectionConfig) -> GraphResult<ClientBuilder> {
    if let Some(ca_file) = &config.ca_file {
        for cert in load_pem_bundle(ca_file).await? {
            builder = builder.add_root_certificate(cert);
        }
    }

    if let Some(ca_path) = &config.ca_path {
        let mut entries = tokio::fs::read_dir(ca_path).await.map_err(|e| {
            GraphError::Transport(format!("Cannot read CA directory '{}': {}", ca_path.display(), e))
        })?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_certificate_file(&path) {
                continue;
            }
            for cert in load_pem_bundle(&path).await? {
                builder = builder.add_root_certificate(cert);
            }
        }
    }

    Ok(builder)
}

async fn load_pem_bundle(path: &Path) -> GraphResult<Vec<Certificate>> {
    let pem = tokio::fs::read(path).await.map_err(|e| {
        GraphError::Transport(format!("Cannot read CA file '{}': {}", path.display(), e))
    })?;
    Certificate::from_pem_bundle(&pem).map_err(|e| {
        GraphError::Transport(format!("Invalid CA certificate in '{}': {}", path.display(), e))
    })
}

fn is_certificate_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("pem") | Some("crt") | Some("cer")
    )
}

/// Convert a transport failure into the crate's error type
pub fn transport_error(err: reqwest::Error) -> GraphError {
    if err.is_timeout() {
        GraphError::Transport(format!("Request timed out: {}", err))
    } else if err.is_connect() {
        GraphError::Transport(format!("Connection failed: {}", err))
    } else {
        GraphError::Transport(err.to_string())
    }
}
