//! IP discovery: public address via HTTP lookup services, local address via
//! the routing table.

use std::net::{IpAddr, UdpSocket};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use ipbot_core::{BotError, Result};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Plain-text services that answer with the caller's public address.
/// Tried in order; the first parseable answer wins.
const DEFAULT_URLS: [&str; 3] = [
    "https://ipinfo.io/ip",
    "https://api.ipify.org",
    "https://icanhazip.com",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpInfo {
    pub local: IpAddr,
    pub public: IpAddr,
}

#[async_trait]
pub trait IpService: Send + Sync {
    fn local_ip(&self) -> Result<IpAddr>;

    async fn public_ip(&self) -> Result<IpAddr>;

    async fn ip_info(&self) -> Result<IpInfo> {
        Ok(IpInfo {
            local: self.local_ip()?,
            public: self.public_ip().await?,
        })
    }
}

pub struct HttpIpService {
    http: reqwest::Client,
    urls: Vec<String>,
}

impl HttpIpService {
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_URLS.iter().map(|u| u.to_string()).collect())
    }

    pub fn with_urls(urls: Vec<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| BotError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { http, urls })
    }

    async fn query(&self, url: &str) -> Result<IpAddr> {
        let body = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BotError::Handler(format!("ip lookup request failed: {e}")))?
            .text()
            .await
            .map_err(|e| BotError::Handler(format!("ip lookup body unreadable: {e}")))?;
        body.trim()
            .parse::<IpAddr>()
            .map_err(|e| BotError::Handler(format!("ip lookup returned garbage: {e}")))
    }
}

#[async_trait]
impl IpService for HttpIpService {
    /// Resolves the outbound interface address by "connecting" a UDP socket
    /// to a public address. No packet is sent.
    fn local_ip(&self) -> Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| BotError::Handler(format!("local ip discovery failed: {e}")))?;
        socket
            .connect("8.8.8.8:80")
            .map_err(|e| BotError::Handler(format!("local ip discovery failed: {e}")))?;
        let addr = socket
            .local_addr()
            .map_err(|e| BotError::Handler(format!("local ip discovery failed: {e}")))?;
        Ok(addr.ip())
    }

    async fn public_ip(&self) -> Result<IpAddr> {
        let mut last_err = None;
        for url in &self.urls {
            match self.query(url).await {
                Ok(ip) => {
                    debug!(%ip, url, "public ip resolved");
                    return Ok(ip);
                }
                Err(err) => {
                    warn!(url, error = %err, "ip lookup service failed, trying next");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| BotError::Handler("no ip lookup services configured".to_string())))
    }
}
