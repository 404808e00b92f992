//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response goes through the single `parse_response`
//! because all endpoints share one decoding policy. The photo builders are
//! the only ones that do I/O: they read the file before returning, so an
//! unreadable photo fails before anything reaches the network.

use std::path::Path;

use url::form_urlencoded;
use urlencoding::encode;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{encode_with_photo, MultipartBody};
use crate::response::{ApiResponse, ResponseBody};
use crate::types::{AuthKey, PetDetails, PetFilter};

/// Header carrying the credential on every authenticated call.
pub const AUTH_HEADER: &str = "auth_key";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request builder and response parser for the PetFriends API.
#[derive(Debug, Clone)]
pub struct PetClient {
    base_url: String,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_api_key(&self, email: &str, password: &str) -> Result<HttpRequest> {
        if email.is_empty() {
            return Err(ApiError::EmptyCredential("email"));
        }
        if password.is_empty() {
            return Err(ApiError::EmptyCredential("password"));
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.url("api/key"),
            headers: vec![
                ("email".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ],
            query: Vec::new(),
            body: None,
        })
    }

    pub fn build_list_pets(&self, auth_key: &AuthKey, filter: &PetFilter) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url("api/pets"),
            headers: auth_headers(auth_key),
            query: vec![("filter".to_string(), filter.as_str().to_string())],
            body: None,
        }
    }

    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        details: &PetDetails,
        pet_photo: &Path,
    ) -> Result<HttpRequest> {
        let body = encode_with_photo(&details.fields(), pet_photo)?;
        Ok(self.multipart_request(auth_key, self.url("api/pets"), body))
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.pet_url("api/pets", pet_id),
            headers: auth_headers(auth_key),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn build_update_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        details: &PetDetails,
    ) -> HttpRequest {
        self.form_request(
            HttpMethod::Put,
            auth_key,
            self.pet_url("api/pets", pet_id),
            details,
        )
    }

    pub fn build_create_pet_simple(&self, auth_key: &AuthKey, details: &PetDetails) -> HttpRequest {
        self.form_request(
            HttpMethod::Post,
            auth_key,
            self.url("api/create_pet_simple"),
            details,
        )
    }

    pub fn build_set_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        pet_photo: &Path,
    ) -> Result<HttpRequest> {
        let body = encode_with_photo(&[], pet_photo)?;
        Ok(self.multipart_request(
            auth_key,
            self.pet_url("api/pets/set_photo", pet_id),
            body,
        ))
    }

    /// Normalize any response into `(status, body)`.
    ///
    /// Never fails: the status passes through untouched and a body that is
    /// not JSON is returned as text.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::decode(response.body),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// `pet_id` is a single path segment, so reserved characters are escaped.
    fn pet_url(&self, path: &str, pet_id: &str) -> String {
        self.url(&format!("{path}/{}", encode(pet_id)))
    }

    fn form_request(
        &self,
        method: HttpMethod,
        auth_key: &AuthKey,
        url: String,
        details: &PetDetails,
    ) -> HttpRequest {
        let mut form = form_urlencoded::Serializer::new(String::new());
        for (name, value) in details.fields() {
            form.append_pair(name, value);
        }
        let body = form.finish();
        let mut headers = auth_headers(auth_key);
        headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        HttpRequest {
            method,
            url,
            headers,
            query: Vec::new(),
            body: Some(body.into_bytes()),
        }
    }

    fn multipart_request(
        &self,
        auth_key: &AuthKey,
        url: String,
        body: MultipartBody,
    ) -> HttpRequest {
        let mut headers = auth_headers(auth_key);
        headers.push(("content-type".to_string(), body.content_type));
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            query: Vec::new(),
            body: Some(body.data),
        }
    }
}

fn auth_headers(auth_key: &AuthKey) -> Vec<(String, String)> {
    vec![(AUTH_HEADER.to_string(), auth_key.key.clone())]
}
