//! Async client for the identity server's client registration API.
//!
//! # Overview
//! Lists, reads, registers, replaces and removes client registrations through
//! `/api/clients` on a fixed authority. Credentials are not handled here;
//! attach them by supplying a configured [`Transport`].
//!
//! # Design
//! - [`ClientsApi`] is sans-IO: `build_*` produces an [`HttpRequest`],
//!   `parse_*` consumes an [`HttpResponse`].
//! - [`IroncladClient`] runs those exchanges over a [`Transport`]
//!   ([`ReqwestTransport`] by default), one attempt per call, with a
//!   cancellation token on every operation.
//! - All bodies go through [`codec`]: snake_case names, enums as names, unset
//!   members omitted.
//! - Failures are [`ClientError`] variants; nothing is retried or logged above
//!   `debug`.

pub mod api;
pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod types;

pub use api::ClientsApi;
pub use client::{ClientManager, IroncladClient};
pub use error::{BoxError, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use tokio_util::sync::CancellationToken;
pub use types::{AccessTokenType, Client, ClientSummary, GrantType, Page, ResourceSet, DEFAULT_PAGE_SIZE};
