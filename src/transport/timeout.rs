use alloy::{
    primitives::ChainId,
    rpc::json_rpc::{RequestPacket, ResponsePacket},
    transports::{Transport, TransportError, TransportErrorKind, TransportFut},
};
use futures::FutureExt;
use std::{
    task::{Context, Poll},
    time::Duration,
};
use tower::{Layer, Service};
use tracing::warn;

/// A [`tower::Layer`] bounding every RPC request of a chain by a timeout.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutLayer {
    timeout: Duration,
    chain_id: ChainId,
}

impl TimeoutLayer {
    /// Creates a new [`TimeoutLayer`].
    pub const fn new(timeout: Duration, chain_id: ChainId) -> Self {
        Self { timeout, chain_id }
    }
}

impl<T> Layer<T> for TimeoutLayer {
    type Service = TimeoutService<T>;

    fn layer(&self, inner: T) -> Self::Service {
        TimeoutService { inner, layer: *self }
    }
}

/// Transport service failing requests that exceed the timeout of its [`TimeoutLayer`].
#[derive(Debug, Clone)]
pub struct TimeoutService<T> {
    inner: T,
    layer: TimeoutLayer,
}

impl<T> Service<RequestPacket> for TimeoutService<T>
where
    T: Transport + Clone,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let method = match &req {
            RequestPacket::Single(req) => req.method().to_string(),
            RequestPacket::Batch(reqs) => format!("batch({})", reqs.len()),
        };
        let TimeoutLayer { timeout, chain_id } = self.layer;
        let fut = self.inner.call(req);

        async move {
            let Ok(result) = tokio::time::timeout(timeout, fut).await else {
                warn!(
                    chain_id,
                    %method,
                    timeout_ms = timeout.as_millis() as u64,
                    "RPC request timed out"
                );
                metrics::counter!(
                    "route_finder_rpc_timeouts_total",
                    "chain_id" => chain_id.to_string()
                )
                .increment(1);
                return Err(TransportErrorKind::custom_str(&format!(
                    "{method} on chain {chain_id} timed out after {timeout:?}"
                )));
            };
            result
        }
        .boxed()
    }
}
