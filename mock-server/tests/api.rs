use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use petfriends_mock::{app, Account, KeyResponse, Pet, PetList};
use tower::ServiceExt;

const EMAIL: &str = "owner@example.com";
const PASSWORD: &str = "hunter2";

fn test_app() -> Router {
    app(vec![
        Account::new(EMAIL, PASSWORD),
        Account::new("other@example.com", "other"),
    ])
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let resp = send(
        app,
        Request::builder()
            .uri("/api/key")
            .header("email", email)
            .header("password", password)
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json::<KeyResponse>(resp).await.key
}

fn list_request(key: &str, filter: &str) -> Request<String> {
    Request::builder()
        .uri(format!("/api/pets?filter={filter}"))
        .header("auth_key", key)
        .body(String::new())
        .unwrap()
}

fn form_request(method: &str, uri: &str, key: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("auth_key", key)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

fn multipart_request(uri: &str, key: &str, fields: &[(&str, &str)], photo: Option<&str>) -> Request<String> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--BOUNDARY\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some(content_type) = photo {
        body.push_str(&format!(
            "--BOUNDARY\r\nContent-Disposition: form-data; name=\"pet_photo\"; filename=\"cat.jpg\"\r\nContent-Type: {content_type}\r\n\r\nJPEGDATA\r\n"
        ));
    }
    body.push_str("--BOUNDARY--\r\n");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("auth_key", key)
        .header(
            http::header::CONTENT_TYPE,
            "multipart/form-data; boundary=BOUNDARY",
        )
        .body(body)
        .unwrap()
}

async fn create(app: &Router, key: &str, name: &str) -> Pet {
    let resp = send(
        app,
        form_request(
            "POST",
            "/api/create_pet_simple",
            key,
            &format!("name={name}&animal_type=cat&age=2"),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- key ---

#[tokio::test]
async fn get_api_key_is_stable_per_account() {
    let app = test_app();
    let first = login(&app, EMAIL, PASSWORD).await;
    let second = login(&app, EMAIL, PASSWORD).await;
    assert_eq!(first, second);
    assert_ne!(first, login(&app, "other@example.com", "other").await);
}

#[tokio::test]
async fn get_api_key_wrong_password_returns_html_403() {
    let app = test_app();
    let resp = send(
        &app,
        Request::builder()
            .uri("/api/key")
            .header("email", EMAIL)
            .header("password", "wrong")
            .body(String::new())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_bytes(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("<h1>Forbidden</h1>"));
}

// --- list ---

#[tokio::test]
async fn list_pets_requires_auth_key() {
    let app = test_app();
    let resp = send(&app, list_request("bogus", "")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_pets_empty() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let resp = send(&app, list_request(&key, "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: PetList = body_json(resp).await;
    assert!(list.pets.is_empty());
}

#[tokio::test]
async fn list_pets_without_filter_param_lists_all() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    create(&app, &key, "Barsik").await;
    let resp = send(
        &app,
        Request::builder()
            .uri("/api/pets")
            .header("auth_key", &key)
            .body(String::new())
            .unwrap(),
    )
    .await;
    let list: PetList = body_json(resp).await;
    assert_eq!(list.pets.len(), 1);
}

#[tokio::test]
async fn list_pets_my_pets_only_shows_own() {
    let app = test_app();
    let mine = login(&app, EMAIL, PASSWORD).await;
    let theirs = login(&app, "other@example.com", "other").await;
    create(&app, &mine, "Barsik").await;
    create(&app, &theirs, "Murka").await;

    let all: PetList = body_json(send(&app, list_request(&mine, "")).await).await;
    assert_eq!(all.pets.len(), 2);
    assert_eq!(all.pets[0].name, "Murka"); // newest first

    let own: PetList = body_json(send(&app, list_request(&mine, "my_pets")).await).await;
    assert_eq!(own.pets.len(), 1);
    assert_eq!(own.pets[0].name, "Barsik");
}

#[tokio::test]
async fn list_pets_unknown_filter_returns_400() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let resp = send(&app, list_request(&key, "dogs")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_pet_simple_returns_pet() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let pet = create(&app, &key, "Barsik").await;
    assert_eq!(pet.name, "Barsik");
    assert_eq!(pet.animal_type, "cat");
    assert_eq!(pet.age, "2");
    assert!(pet.pet_photo.is_empty());
}

#[tokio::test]
async fn create_pet_simple_non_numeric_age_returns_400() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let resp = send(
        &app,
        form_request(
            "POST",
            "/api/create_pet_simple",
            &key,
            "name=Rex&animal_type=dog&age=old",
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_new_pet_stores_photo_as_data_uri() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let resp = send(
        &app,
        multipart_request(
            "/api/pets",
            &key,
            &[("name", "Barsik"), ("animal_type", "cat"), ("age", "3")],
            Some("image/jpeg"),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pet: Pet = body_json(resp).await;
    assert_eq!(pet.name, "Barsik");
    assert_eq!(pet.pet_photo, "data:image/jpeg;base64,SlBFR0RBVEE=");
}

#[tokio::test]
async fn add_new_pet_without_photo_returns_400() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let resp = send(
        &app,
        multipart_request(
            "/api/pets",
            &key,
            &[("name", "Barsik"), ("animal_type", "cat"), ("age", "3")],
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_pet_not_found_returns_400() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let resp = send(
        &app,
        form_request("PUT", "/api/pets/missing", &key, "name=Nope&animal_type=x&age=1"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_someone_elses_pet_is_forbidden() {
    let app = test_app();
    let mine = login(&app, EMAIL, PASSWORD).await;
    let theirs = login(&app, "other@example.com", "other").await;
    let pet = create(&app, &theirs, "Murka").await;

    let resp = send(
        &app,
        form_request("PUT", &format!("/api/pets/{}", pet.id), &mine, "name=Stolen"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- set_photo ---

#[tokio::test]
async fn set_photo_rejects_non_image() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;
    let pet = create(&app, &key, "Barsik").await;
    let resp = send(
        &app,
        multipart_request(
            &format!("/api/pets/set_photo/{}", pet.id),
            &key,
            &[],
            Some("text/plain"),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full lifecycle ---

#[tokio::test]
async fn pet_lifecycle() {
    let app = test_app();
    let key = login(&app, EMAIL, PASSWORD).await;

    // create
    let created = create(&app, &key, "Barsik").await;
    let id = created.id.clone();

    // update
    let resp = send(
        &app,
        form_request(
            "PUT",
            &format!("/api/pets/{id}"),
            &key,
            "name=Tom&animal_type=kitten&age=4",
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Pet = body_json(resp).await;
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Tom");
    assert_eq!(updated.animal_type, "kitten");
    assert_eq!(updated.age, "4");

    // set photo
    let resp = send(
        &app,
        multipart_request(
            &format!("/api/pets/set_photo/{id}"),
            &key,
            &[],
            Some("image/png"),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let with_photo: Pet = body_json(resp).await;
    assert!(with_photo.pet_photo.starts_with("data:image/png;base64,"));

    // delete: empty 200
    let resp = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/pets/{id}"))
            .header("auth_key", &key)
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    // delete again: 400
    let resp = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/pets/{id}"))
            .header("auth_key", &key)
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // list after delete: empty
    let list: PetList = body_json(send(&app, list_request(&key, "")).await).await;
    assert!(list.pets.is_empty());
}
