use crate::{catalog::Catalog, config::ServerConfig, handlers, types::*};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    net::{TcpListener, TcpSocket, TcpStream},
    task::JoinHandle,
};

/// Bind a listener with `SO_REUSEADDR` and an explicit backlog.
pub fn bind(addr: SocketAddr, backlog: u32) -> std::io::Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

/// The two tasks serving one client.
pub struct Session {
    pub connection: SharedConnection,
    pub inbound: JoinHandle<()>,
    pub outbound: JoinHandle<()>,
}

impl Session {
    pub async fn join(self) {
        let id = self.connection.id();
        for (name, task) in [("inbound", self.inbound), ("outbound", self.outbound)] {
            if let Err(e) = task.await {
                tracing::error!(client = id, "{name} handler panicked: {e}");
            }
        }
    }
}

pub fn spawn_session(
    id: u64,
    socket: TcpStream,
    catalog: Arc<Catalog>,
    config: &ServerConfig,
) -> Session {
    if let Err(e) = socket.set_nodelay(true) {
        tracing::warn!(client = id, "Could not set TCP_NODELAY: {e}");
    }
    let (read_half, write_half) = socket.into_split();
    let connection = Connection::new(id);

    let inbound = tokio::spawn(handlers::inbound(
        connection.clone(),
        read_half,
        config.recv_timeout(),
        config.max_frame_len,
    ));
    let outbound = tokio::spawn(handlers::outbound(connection.clone(), write_half, catalog));

    Session {
        connection,
        inbound,
        outbound,
    }
}

/// Accept clients forever, numbering them from zero.
pub async fn serve(
    listener: TcpListener,
    catalog: Arc<Catalog>,
    config: Arc<ServerConfig>,
) -> anyhow::Result<()> {
    let mut next_client_id: u64 = 0;

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Accept failed: {e}");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        let id = next_client_id;
        next_client_id += 1;
        tracing::info!("Accepted new connection from client ID {id} ({addr})");

        let session = spawn_session(id, socket, catalog.clone(), &config);
        tokio::spawn(async move {
            session.join().await;
            tracing::debug!(client = id, "Session closed");
        });
    }
}
