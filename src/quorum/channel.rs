use crate::quorum::PeerError;
use std::net::SocketAddr;
use tonic::transport::{Channel, Endpoint};

/// Channel that connects on first use. A peer that isn't up yet just fails its calls until it is.
pub(crate) fn lazy_channel(addr: SocketAddr) -> Result<Channel, PeerError> {
    let endpoint =
        Endpoint::from_shared(format!("http://{}", addr)).map_err(|e| PeerError::Connect(e.to_string()))?;

    Ok(endpoint.connect_lazy()?)
}
