//! Blocking PetFriends client: one method per remote operation.
//!
//! # Design
//! `ApiClient` pairs the I/O-free `PetClient` with a `Transport`. Every
//! operation is `build_* -> Transport::execute -> parse_response`, one HTTP
//! request per call with no retries and no status-based branching. Nothing
//! is mutated after construction, so a client can be shared between threads
//! whenever its transport can.

use std::path::Path;

use tracing::{debug, warn};

use crate::client::PetClient;
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::Result;
use crate::http::HttpRequest;
use crate::response::ApiResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthKey, PetDetails, PetFilter};

/// Client for the PetFriends REST API.
#[derive(Clone)]
pub struct ApiClient<T = UreqTransport> {
    client: PetClient,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client for `base_url` over ureq with default settings.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_transport(
            PetClient::new(&config.base_url),
            UreqTransport::with_timeout(config.timeout()),
        ))
    }

    /// Client for the public deployment.
    pub fn public() -> Self {
        Self::with_transport(PetClient::new(DEFAULT_BASE_URL), UreqTransport::new())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(client: PetClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PetClient {
        &self.client
    }

    /// Exchange an email and password for an auth key.
    ///
    /// On success the body is JSON with a `key` field; see
    /// `ApiResponse::auth_key`.
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse> {
        let request = self.client.build_get_api_key(email, password)?;
        self.send("get_api_key", request)
    }

    /// List all pets, or only the caller's with `PetFilter::MyPets`.
    pub fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: impl Into<PetFilter>,
    ) -> Result<ApiResponse> {
        let request = self.client.build_list_pets(auth_key, &filter.into());
        self.send("get_list_of_pets", request)
    }

    /// Create a pet with a photo.
    ///
    /// The photo is read before the request is sent; an unreadable file
    /// returns `ApiError::Photo` and nothing goes over the network.
    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        details: &PetDetails,
        pet_photo: impl AsRef<Path>,
    ) -> Result<ApiResponse> {
        let request = self
            .client
            .build_add_new_pet(auth_key, details, pet_photo.as_ref())?;
        self.send("add_new_pet", request)
    }

    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse> {
        let request = self.client.build_delete_pet(auth_key, pet_id);
        self.send("delete_pet", request)
    }

    pub fn update_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        details: &PetDetails,
    ) -> Result<ApiResponse> {
        let request = self.client.build_update_pet(auth_key, pet_id, details);
        self.send("update_pet", request)
    }

    /// Create a pet without a photo.
    pub fn create_pet_simple(&self, auth_key: &AuthKey, details: &PetDetails) -> Result<ApiResponse> {
        let request = self.client.build_create_pet_simple(auth_key, details);
        self.send("create_pet_simple", request)
    }

    /// Replace the photo of an existing pet.
    pub fn set_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        pet_photo: impl AsRef<Path>,
    ) -> Result<ApiResponse> {
        let request = self
            .client
            .build_set_photo(auth_key, pet_id, pet_photo.as_ref())?;
        self.send("set_photo", request)
    }

    fn send(&self, operation: &'static str, request: HttpRequest) -> Result<ApiResponse> {
        debug!(operation, method = %request.method, url = %request.url, "sending request");
        let response = match self.transport.execute(request) {
            Ok(response) => response,
            Err(err) => {
                warn!(operation, error = %err, "request failed");
                return Err(err);
            }
        };
        let parsed = self.client.parse_response(response);
        debug!(
            operation,
            status = parsed.status,
            json = parsed.body.is_json(),
            "received response"
        );
        Ok(parsed)
    }
}
