//! Async operations over a pluggable transport.
//!
//! # Design
//! Each operation is one stateless exchange: build the request with
//! [`ClientsApi`], race the transport against the caller's cancellation token,
//! then parse. The only shared mutable state is the transport slot, which
//! `close` empties exactly once. Exchanges already in flight keep their own
//! handle, so the transport is released when the last of them finishes.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::api::ClientsApi;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{Client, ClientSummary, Page, ResourceSet};

/// The client registration operations.
///
/// Pass a token that never fires, such as `CancellationToken::new()`, when
/// no cancellation is wanted.
#[async_trait]
pub trait ClientManager: Send + Sync {
    async fn get_client_summaries(
        &self,
        page: Page,
        cancel: &CancellationToken,
    ) -> Result<ResourceSet<ClientSummary>, ClientError>;

    async fn get_client(&self, client_id: &str, cancel: &CancellationToken) -> Result<Client, ClientError>;

    async fn register_client(&self, client: &Client, cancel: &CancellationToken) -> Result<(), ClientError>;

    /// Replaces the stored client with `client` in full.
    async fn modify_client(&self, client: &Client, cancel: &CancellationToken) -> Result<(), ClientError>;

    async fn unregister_client(&self, client: &Client, cancel: &CancellationToken) -> Result<(), ClientError>;
}

/// Releases the wrapped transport when the last reference goes away.
struct TransportHandle(Box<dyn Transport>);

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// HTTP client for the identity server's clients API.
///
/// Safe to share across tasks. Dropping the client releases its transport;
/// `close` does the same eagerly and may be called any number of times.
pub struct IroncladClient {
    api: ClientsApi,
    transport: Mutex<Option<Arc<TransportHandle>>>,
}

impl IroncladClient {
    /// Bind to `authority` using the default reqwest transport.
    pub fn new(authority: &str) -> Self {
        Self::with_transport(authority, ReqwestTransport::new())
    }

    pub fn with_transport(authority: &str, transport: impl Transport + 'static) -> Self {
        Self {
            api: ClientsApi::new(authority),
            transport: Mutex::new(Some(Arc::new(TransportHandle(Box::new(transport))))),
        }
    }

    pub fn authority(&self) -> &str {
        self.api.authority()
    }

    /// Release the transport. Later calls are no-ops, and operations issued
    /// afterwards fail with [`ClientError::Closed`]. Exchanges already in
    /// flight run to completion before the transport is released.
    pub fn close(&self) {
        let released = self
            .transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(transport) = released {
            tracing::debug!(authority = %self.api.authority(), "releasing transport");
            drop(transport);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    async fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse, ClientError> {
        let transport = self
            .transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ClientError::Closed)?;

        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(%method, %url, "request cancelled");
                return Err(ClientError::Cancelled);
            }
            result = transport.0.send(request) => {
                result.map_err(|source| ClientError::Transport { url: url.clone(), source })?
            }
        };

        tracing::debug!(%method, %url, status = response.status, "received response");
        Ok(response)
    }
}

#[async_trait]
impl ClientManager for IroncladClient {
    async fn get_client_summaries(
        &self,
        page: Page,
        cancel: &CancellationToken,
    ) -> Result<ResourceSet<ClientSummary>, ClientError> {
        let request = self.api.build_list_clients(page);
        let response = self.execute(request.clone(), cancel).await?;
        self.api.parse_list_clients(page, &request, response)
    }

    async fn get_client(&self, client_id: &str, cancel: &CancellationToken) -> Result<Client, ClientError> {
        let request = self.api.build_get_client(client_id);
        let response = self.execute(request.clone(), cancel).await?;
        self.api.parse_get_client(&request, response)
    }

    async fn register_client(&self, client: &Client, cancel: &CancellationToken) -> Result<(), ClientError> {
        let request = self.api.build_register_client(client)?;
        let response = self.execute(request.clone(), cancel).await?;
        self.api.parse_register_client(&request, response)
    }

    async fn modify_client(&self, client: &Client, cancel: &CancellationToken) -> Result<(), ClientError> {
        let request = self.api.build_modify_client(client)?;
        let response = self.execute(request.clone(), cancel).await?;
        self.api.parse_modify_client(&request, response)
    }

    async fn unregister_client(&self, client: &Client, cancel: &CancellationToken) -> Result<(), ClientError> {
        let request = self.api.build_unregister_client(client)?;
        let response = self.execute(request.clone(), cancel).await?;
        self.api.parse_unregister_client(&request, response)
    }
}

impl Drop for IroncladClient {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for IroncladClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IroncladClient")
            .field("authority", &self.api.authority())
            .field("closed", &self.is_closed())
            .finish()
    }
}
