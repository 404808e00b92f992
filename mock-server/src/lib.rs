//! In-memory stand-in for the PetFriends REST API.
//!
//! Mirrors the public server closely enough to exercise the client: a stable
//! key per registered account, an `auth_key` header on every other route,
//! HTML error pages for rejected requests and JSON bodies on success.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyResponse {
    pub key: String,
}

/// Text fields accepted by create, add and update. Missing fields are empty.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animal_type: String,
    #[serde(default)]
    pub age: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

/// Credentials the server accepts on `GET /api/key`.
#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

struct Member {
    email: String,
    password: String,
    key: String,
    user_id: String,
}

/// Accounts and pets. Pets are kept oldest first.
pub struct Registry {
    members: Vec<Member>,
    pets: Vec<Pet>,
}

impl Registry {
    pub fn new(accounts: Vec<Account>) -> Self {
        let members = accounts
            .into_iter()
            .map(|account| Member {
                email: account.email,
                password: account.password,
                key: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
                user_id: Uuid::new_v4().simple().to_string(),
            })
            .collect();
        Self {
            members,
            pets: Vec::new(),
        }
    }

    /// User id of the member owning the request's `auth_key` header.
    fn caller(&self, headers: &HeaderMap) -> Option<String> {
        let key = header_str(headers, "auth_key")?;
        self.members
            .iter()
            .find(|member| member.key == key)
            .map(|member| member.user_id.clone())
    }
}

pub type Db = Arc<RwLock<Registry>>;

pub fn app(accounts: Vec<Account>) -> Router {
    let db: Db = Arc::new(RwLock::new(Registry::new(accounts)));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(add_new_pet))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .with_state(db)
}

pub async fn run(listener: TcpListener, accounts: Vec<Account>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(accounts)).await
}

const FORBIDDEN_PAGE: &str = "<!doctype html>\n<html lang=en>\n<title>403 Forbidden</title>\n\
<h1>Forbidden</h1>\n<p>This user wasn&#39;t found in database</p>\n";

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Html(FORBIDDEN_PAGE)).into_response()
}

fn bad_request(reason: &str) -> Response {
    let page = format!(
        "<!doctype html>\n<html lang=en>\n<title>400 Bad Request</title>\n\
<h1>Bad Request</h1>\n<p>{reason}</p>\n"
    );
    (StatusCode::BAD_REQUEST, Html(page)).into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub fn valid_age(age: &str) -> bool {
    age.trim()
        .parse::<f64>()
        .map(|age| age.is_finite() && age >= 0.0)
        .unwrap_or(false)
}

fn validate(form: &PetForm) -> Result<(), Response> {
    if form.name.trim().is_empty() {
        return Err(bad_request("name is required"));
    }
    if form.animal_type.trim().is_empty() {
        return Err(bad_request("animal_type is required"));
    }
    if !valid_age(&form.age) {
        return Err(bad_request("age must be a number"));
    }
    Ok(())
}

fn now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
        .to_string()
}

fn new_pet(form: PetForm, user_id: String, pet_photo: String) -> Pet {
    Pet {
        id: Uuid::new_v4().simple().to_string(),
        name: form.name,
        animal_type: form.animal_type,
        age: form.age,
        pet_photo,
        user_id,
        created_at: now(),
    }
}

struct Photo {
    content_type: String,
    data: Vec<u8>,
}

impl Photo {
    fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}

#[derive(Default)]
struct Upload {
    form: PetForm,
    photo: Option<Photo>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, MultipartError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await?.to_vec();
            upload.photo = Some(Photo { content_type, data });
            continue;
        }
        let value = field.text().await?;
        match name.as_str() {
            "name" => upload.form.name = value,
            "animal_type" => upload.form.animal_type = value,
            "age" => upload.form.age = value,
            _ => {}
        }
    }
    Ok(upload)
}

/// Require an image part named `pet_photo`.
fn image(photo: Option<Photo>) -> Result<Photo, Response> {
    match photo {
        Some(photo) if photo.content_type.starts_with("image/") => Ok(photo),
        Some(photo) => Err(bad_request(&format!(
            "unsupported photo type {}",
            photo.content_type
        ))),
        None => Err(bad_request("pet_photo is required")),
    }
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let email = header_str(&headers, "email");
    let password = header_str(&headers, "password");
    let registry = db.read().await;
    let member = registry.members.iter().find(|member| {
        Some(member.email.as_str()) == email && Some(member.password.as_str()) == password
    });
    match member {
        Some(member) => Json(KeyResponse {
            key: member.key.clone(),
        })
        .into_response(),
        None => {
            warn!("rejected credentials");
            forbidden()
        }
    }
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    let registry = db.read().await;
    let Some(user_id) = registry.caller(&headers) else {
        return forbidden();
    };
    let newest_first = registry.pets.iter().rev();
    let pets: Vec<Pet> = match query.filter.as_str() {
        "" => newest_first.cloned().collect(),
        "my_pets" => newest_first
            .filter(|pet| pet.user_id == user_id)
            .cloned()
            .collect(),
        other => return bad_request(&format!("Filter value is incorrect: {other}")),
    };
    Json(PetList { pets }).into_response()
}

async fn add_new_pet(State(db): State<Db>, headers: HeaderMap, multipart: Multipart) -> Response {
    let Some(user_id) = db.read().await.caller(&headers) else {
        return forbidden();
    };
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(err) => return err.into_response(),
    };
    if let Err(response) = validate(&upload.form) {
        return response;
    }
    let photo = match image(upload.photo) {
        Ok(photo) => photo,
        Err(response) => return response,
    };

    let pet = new_pet(upload.form, user_id, photo.data_uri());
    info!(pet_id = %pet.id, "pet created with photo");
    db.write().await.pets.push(pet.clone());
    Json(pet).into_response()
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Response {
    let mut registry = db.write().await;
    let Some(user_id) = registry.caller(&headers) else {
        return forbidden();
    };
    if let Err(response) = validate(&form) {
        return response;
    }
    let pet = new_pet(form, user_id, String::new());
    info!(pet_id = %pet.id, "pet created");
    registry.pets.push(pet.clone());
    Json(pet).into_response()
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<PetForm>,
) -> Response {
    let mut registry = db.write().await;
    let Some(user_id) = registry.caller(&headers) else {
        return forbidden();
    };
    if !form.age.is_empty() && !valid_age(&form.age) {
        return bad_request("age must be a number");
    }
    let Some(pet) = registry.pets.iter_mut().find(|pet| pet.id == id) else {
        return bad_request(&format!("Pet with id {id} does not exist"));
    };
    if pet.user_id != user_id {
        return forbidden();
    }
    if !form.name.is_empty() {
        pet.name = form.name;
    }
    if !form.animal_type.is_empty() {
        pet.animal_type = form.animal_type;
    }
    if !form.age.is_empty() {
        pet.age = form.age;
    }
    info!(pet_id = %pet.id, "pet updated");
    Json(pet.clone()).into_response()
}

async fn delete_pet(State(db): State<Db>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut registry = db.write().await;
    let Some(user_id) = registry.caller(&headers) else {
        return forbidden();
    };
    let Some(index) = registry.pets.iter().position(|pet| pet.id == id) else {
        return bad_request(&format!("Pet with id {id} does not exist"));
    };
    if registry.pets[index].user_id != user_id {
        return forbidden();
    }
    registry.pets.remove(index);
    info!(pet_id = %id, "pet deleted");
    StatusCode::OK.into_response()
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let Some(user_id) = db.read().await.caller(&headers) else {
        return forbidden();
    };
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(err) => return err.into_response(),
    };
    let photo = match image(upload.photo) {
        Ok(photo) => photo,
        Err(response) => return response,
    };

    let mut registry = db.write().await;
    let Some(pet) = registry.pets.iter_mut().find(|pet| pet.id == id) else {
        return bad_request(&format!("Pet with id {id} does not exist"));
    };
    if pet.user_id != user_id {
        return forbidden();
    }
    pet.pet_photo = photo.data_uri();
    info!(pet_id = %pet.id, "pet photo replaced");
    Json(pet.clone()).into_response()
}
