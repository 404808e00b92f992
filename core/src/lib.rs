//! Synchronous client for the PetFriends pet-management REST API.
//!
//! # Overview
//! `ApiClient` exposes one blocking method per remote operation: obtain an
//! auth key, list pets, add a pet with a photo, create a pet without one,
//! update, delete and set a photo. Each call issues exactly one HTTP
//! request and returns an `ApiResponse` holding the status code and the
//! body, decoded as JSON when possible and kept as raw text (or bytes) otherwise.
//!
//! # Design
//! - `PetClient` is stateless and I/O-free apart from reading photo files:
//!   `build_*` methods produce `HttpRequest` values and `parse_response`
//!   normalizes `HttpResponse` values (host-does-IO pattern).
//! - `Transport` is the network seam; `UreqTransport` is the default.
//! - HTTP status codes are never turned into errors. `ApiError` only covers
//!   empty credentials, unreadable photos, transport failures, bad
//!   configuration and explicit typed deserialization.
//!
//! ```no_run
//! use petfriends_core::{ApiClient, PetDetails, PetFilter};
//!
//! # fn main() -> Result<(), petfriends_core::ApiError> {
//! let api = ApiClient::new("https://petfriends.skillfactory.ru/")?;
//! let key = api
//!     .get_api_key("me@example.com", "secret")?
//!     .auth_key()
//!     .expect("valid credentials");
//! let created = api.create_pet_simple(&key, &PetDetails::new("Barsik", "cat", "3"))?;
//! println!("{} {:?}", created.status, created.body);
//! let mine = api.get_list_of_pets(&key, PetFilter::MyPets)?;
//! println!("{:?}", mine.body);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod response;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::{PetClient, AUTH_HEADER};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{ApiResponse, ResponseBody};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthKey, Pet, PetDetails, PetFilter, PetList};
