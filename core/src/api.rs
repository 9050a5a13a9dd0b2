//! Stateless request builder and response parser for `/api/clients`.
//!
//! # Design
//! `ClientsApi` holds only the authority and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes the matching
//! `HttpResponse`. `IroncladClient` drives the round-trip in between; tests can
//! exercise both halves without a network.

use crate::codec::{self, CONTENT_TYPE};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Client, ClientSummary, Page, ResourceSet};

const CLIENTS_PATH: &str = "/api/clients";

#[derive(Debug, Clone)]
pub struct ClientsApi {
    authority: String,
}

impl ClientsApi {
    pub fn new(authority: &str) -> Self {
        Self {
            authority: authority.trim_end_matches('/').to_string(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn build_list_clients(&self, page: Page) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}{CLIENTS_PATH}?skip={}&take={}",
                self.authority,
                page.start,
                page.effective_size()
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_client(&self, client_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.client_url(client_id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_register_client(&self, client: &Client) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{CLIENTS_PATH}", self.authority),
            headers: json_headers(),
            body: Some(codec::encode(client)?),
        })
    }

    pub fn build_modify_client(&self, client: &Client) -> Result<HttpRequest, ClientError> {
        require_id(client)?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.client_url(&client.id),
            headers: json_headers(),
            body: Some(codec::encode(client)?),
        })
    }

    pub fn build_unregister_client(&self, client: &Client) -> Result<HttpRequest, ClientError> {
        require_id(client)?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.client_url(&client.id),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Decode a listing. The returned set reports the window that was
    /// requested, whatever the server echoed back.
    pub fn parse_list_clients(
        &self,
        page: Page,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<ResourceSet<ClientSummary>, ClientError> {
        check_status(request, &response, false)?;
        let mut set: ResourceSet<ClientSummary> = codec::decode(&response.body)?;
        let size = page.effective_size();
        if set.items.len() > size {
            return Err(ClientError::Serialization(format!(
                "server returned {} clients for a page of {size}",
                set.items.len()
            )));
        }
        set.start = page.start;
        set.size = size;
        Ok(set)
    }

    pub fn parse_get_client(&self, request: &HttpRequest, response: HttpResponse) -> Result<Client, ClientError> {
        check_status(request, &response, false)?;
        codec::decode(&response.body)
    }

    pub fn parse_register_client(&self, request: &HttpRequest, response: HttpResponse) -> Result<(), ClientError> {
        check_status(request, &response, false)
    }

    /// Failures keep the response body, which carries the server's
    /// validation messages.
    pub fn parse_modify_client(&self, request: &HttpRequest, response: HttpResponse) -> Result<(), ClientError> {
        check_status(request, &response, true)
    }

    pub fn parse_unregister_client(&self, request: &HttpRequest, response: HttpResponse) -> Result<(), ClientError> {
        check_status(request, &response, false)
    }

    fn client_url(&self, client_id: &str) -> String {
        format!("{}{CLIENTS_PATH}/{}", self.authority, urlencoding::encode(client_id))
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), CONTENT_TYPE.to_string())]
}

fn require_id(client: &Client) -> Result<(), ClientError> {
    if client.id.is_empty() {
        return Err(ClientError::MissingClientId);
    }
    Ok(())
}

/// Map any non-2xx status to `ClientError::Request`.
fn check_status(request: &HttpRequest, response: &HttpResponse, keep_body: bool) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ClientError::Request {
        url: request.url.clone(),
        status: response.status,
        reason: response.reason.clone(),
        body: keep_body.then(|| response.body.clone()),
    })
}
