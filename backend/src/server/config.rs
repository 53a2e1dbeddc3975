//! Server settings and the assembled server configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::realtime::InMemoryRealtimeStore;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));

/// Deployment settings loaded via OrthoConfig (`COCO_*` variables).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COCO")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// JSON file with the user directory loaded at startup.
    pub directory_seed: Option<PathBuf>,
}

impl ServerSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }
}

/// Everything `create_server` needs to wire the application.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<InMemoryRealtimeStore>,
}

impl ServerConfig {
    /// Combine validated session settings with the listener address and the
    /// realtime store backing every port.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        store: Arc<InMemoryRealtimeStore>,
    ) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store,
        }
    }
}
