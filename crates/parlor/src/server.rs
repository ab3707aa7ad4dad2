//! `ParlorServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → session → room.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parlor_protocol::{Codec, JsonCodec};
use parlor_room::RegistryConfig;
use parlor_session::Lobby;
use parlor_transport::{DEFAULT_HANDSHAKE_TIMEOUT, Transport, WebSocketTransport};

use crate::ParlorError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) lobby: Arc<Lobby>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn start() -> Result<(), parlor::ParlorError> {
/// let server = parlor::ParlorServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    registry_config: RegistryConfig,
    handshake_timeout: Duration,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            registry_config: RegistryConfig::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the registry configuration.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Sets how long a new client has to complete the WebSocket upgrade.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and prepares an empty lobby.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<ParlorServer<JsonCodec>, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await?
            .with_handshake_timeout(self.handshake_timeout);

        let state = Arc::new(ServerState {
            lobby: Arc::new(Lobby::new(self.registry_config)),
            codec: JsonCodec,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl ParlorServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }
}

impl<C: Codec> ParlorServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The lobby shared by every connection.
    pub fn lobby(&self) -> Arc<Lobby> {
        Arc::clone(&self.state.lobby)
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), ParlorError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// The loop only takes sockets off the listener. Each WebSocket
    /// handshake runs on the connection's own task, so a client that
    /// never finishes upgrading holds up no one else. Connections already
    /// accepted keep being served by their own tasks.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ParlorError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "Parlor server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.transport.shutdown().await?;
                    tracing::info!("Parlor server stopped accepting connections");
                    return Ok(());
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(incoming) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(incoming, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }
    }
}
