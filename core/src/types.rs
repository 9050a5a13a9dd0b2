//! Resource model for the `/api/clients` endpoints.
//!
//! # Design
//! The wire names are fixed at compile time through serde attributes: every
//! struct and enum uses snake_case, optional members are skipped when unset,
//! and enums travel as their symbolic names. Members the server sends that are
//! not modelled here land in `extensions` and are written back unchanged, so a
//! get-then-modify cycle never drops configuration this crate does not know.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size used when a list request asks for zero items.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// How access tokens issued to a client are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenType {
    /// Self-contained JSON Web Token.
    Jwt,
    /// Opaque handle resolved through introspection.
    Reference,
}

/// OAuth grant types a client may be allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Implicit,
    Hybrid,
    AuthorizationCode,
    ClientCredentials,
    Password,
    DeviceCode,
}

/// A registered application, as managed through the clients API.
///
/// `id` is the only member this crate relies on. Everything else is
/// configuration forwarded to and from the server without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Client {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_cors_origins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_type: Option<AccessTokenType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_grant_types: Option<Vec<GrantType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_access_tokens_via_browser: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_offline_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_pkce: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_consent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Server-side members without a typed field above.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Client {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Listing projection of a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// One page of a server-side collection.
///
/// A snapshot taken when the response arrived. `items` keeps the server's
/// order and never holds more than `size` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResourceSet<T> {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub size: usize,
    #[serde(alias = "total")]
    pub total_size: usize,
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T> ResourceSet<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for ResourceSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResourceSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Window requested from the list endpoint.
///
/// `size == 0` stands for [`DEFAULT_PAGE_SIZE`], so `Page::default()` asks for
/// the first twenty clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub size: usize,
}

impl Page {
    pub fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    pub fn effective_size(&self) -> usize {
        if self.size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        }
    }
}
