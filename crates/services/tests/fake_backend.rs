use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post, put},
};
use backon::ExponentialBuilder;
use models::{
    access::{CreateRole, Permission, Role},
    farm::CreateFarm,
    fish::CreateFish,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use services::services::{
    access::{AccessService, PermissionChange},
    api_client::{ApiClient, ApiError},
    auth::{AuthError, MemoryTokenStore, TokenStore, connect},
    dashboard::DashboardService,
    resources::{Farms, Feeds, Fishes, ResourceService, Roles},
};

const TOKEN: &str = "tok-1";

#[derive(Default)]
struct Backend {
    farms: Vec<Value>,
    roles: Vec<Value>,
    fish_gets: usize,
    fish_creates: usize,
    writes: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Backend>>;

fn authorized(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(header::AUTHORIZATION) {
        Some(v) if v.to_str().ok() == Some(expected.as_str()) => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["email"] == "ops@example.org" && body["password"] == "secret" {
        Ok(Json(json!({ "token": TOKEN })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn list_farms(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    Ok(Json(Value::Array(state.lock().unwrap().farms.clone())))
}

async fn create_farm(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let mut backend = state.lock().unwrap();
    body["_id"] = json!(format!("f{}", backend.farms.len() + 1));
    backend.farms.push(body.clone());
    Ok(Json(body))
}

async fn update_farm(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let mut backend = state.lock().unwrap();
    let farm = backend
        .farms
        .iter_mut()
        .find(|f| f["_id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    body["_id"] = json!(id);
    *farm = body.clone();
    Ok(Json(body))
}

async fn list_fish(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let mut backend = state.lock().unwrap();
    backend.fish_gets += 1;
    if backend.fish_gets == 1 {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!([{ "_id": "s1", "name": "Tilapia" }])))
}

async fn create_fish(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    state.lock().unwrap().fish_creates += 1;
    Err(StatusCode::SERVICE_UNAVAILABLE)
}

async fn list_roles(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    Ok(Json(Value::Array(state.lock().unwrap().roles.clone())))
}

async fn get_role(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    state
        .lock()
        .unwrap()
        .roles
        .iter()
        .find(|r| r["_id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_role(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let mut backend = state.lock().unwrap();
    let before = backend.roles.len();
    backend.roles.retain(|r| r["_id"] != id.as_str());
    if backend.roles.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "deleted" })))
}

async fn record_write(
    State(state): State<Shared>,
    headers: HeaderMap,
    uri: axum::http::Uri,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    state
        .lock()
        .unwrap()
        .writes
        .push((uri.path().to_string(), body));
    Ok(Json(json!({ "message": "ok" })))
}

async fn empty_list(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    Ok(Json(json!([])))
}

async fn broken_feeds(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    Ok(Json(json!({ "feeds": "not a list" })))
}

async fn spawn_backend(state: Shared) -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/farm/all", get(list_farms))
        .route("/api/farm/create", post(create_farm))
        .route("/api/farm/{id}", put(update_farm))
        .route("/api/fish/all", get(list_fish))
        .route("/api/fish/create", post(create_fish))
        .route("/api/pond/all", get(empty_list))
        .route("/api/culture-cycle/all", get(empty_list))
        .route("/api/feeds", get(broken_feeds))
        .route("/api/access/roles/all", get(list_roles))
        .route("/api/access/roles/{id}", get(get_role).delete(delete_role))
        .route("/api/access/roles/assign-permissions", post(record_write))
        .route("/api/access/roles/revoke-permissions", post(record_write))
        .route("/api/access/assign-role", post(record_write))
        .route("/api/users", get(empty_list))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake backend");
    });
    addr
}

fn seeded() -> Shared {
    Arc::new(Mutex::new(Backend {
        farms: vec![json!({ "_id": "f1", "name": "North", "area_size": "12.5" })],
        roles: vec![json!({
            "_id": "r1",
            "name": "farm_manager",
            "permissions": [{ "_id": "x1", "name": "farm.write" }]
        })],
        ..Default::default()
    }))
}

fn fast_retry() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
        .with_max_times(3)
}

async fn session(state: Shared) -> ApiClient {
    let addr = spawn_backend(state).await;
    ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5))
        .expect("client")
        .with_retry(fast_retry())
        .with_token(SecretString::from(TOKEN.to_string()))
}

#[tokio::test]
async fn login_stores_token_and_opens_guard() {
    let addr = spawn_backend(seeded()).await;
    let store = Arc::new(MemoryTokenStore::default());
    let auth = connect(&format!("http://{addr}"), Duration::from_secs(5), store.clone())
        .expect("connect");

    let wrong = SecretString::from("nope".to_string());
    match auth.login("ops@example.org", &wrong).await {
        Err(AuthError::InvalidCredentials) => {}
        other => panic!("expected rejected credentials, got {other:?}"),
    }
    assert!(matches!(auth.session(), Err(AuthError::NotAuthenticated)));

    let right = SecretString::from("secret".to_string());
    auth.login("ops@example.org", &right).await.expect("login");
    assert!(store.load().unwrap().is_some());

    let client = auth.session().expect("session");
    let farms = ResourceService::list::<Farms>(&client).await.expect("farms");
    assert_eq!(farms.len(), 1);
    assert_eq!(farms[0].area_size, Some(12.5));
}

#[tokio::test]
async fn stale_token_is_unauthorized() {
    let addr = spawn_backend(seeded()).await;
    let client = ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5))
        .unwrap()
        .with_token(SecretString::from("stale".to_string()));
    assert!(matches!(
        ResourceService::list::<Farms>(&client).await,
        Err(ApiError::Unauthorized(401))
    ));
}

#[tokio::test]
async fn writes_refetch_the_collection() {
    let client = session(seeded()).await;

    let payload = CreateFarm {
        name: "South".to_string(),
        location: "Coast".to_string(),
        area_size: 3.0,
        number_of_pond: 2,
        production_capacity: 100.0,
    };
    let farms = ResourceService::create::<Farms>(&client, &payload)
        .await
        .expect("create");
    assert_eq!(farms.len(), 2);
    assert_eq!(farms[1].name, "South");
    assert_eq!(farms[1].number_of_pond, Some(2));

    let renamed = CreateFarm {
        name: "South Bay".to_string(),
        ..payload
    };
    let farms = ResourceService::update::<Farms>(&client, "f2", &renamed)
        .await
        .expect("update");
    assert_eq!(farms[1].name, "South Bay");

    let missing = ResourceService::update::<Farms>(&client, "f404", &renamed).await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn reads_retry_but_writes_do_not() {
    let state = seeded();
    let client = session(state.clone()).await;

    let fish = ResourceService::list::<Fishes>(&client).await.expect("retried");
    assert_eq!(fish[0].name, "Tilapia");
    assert_eq!(state.lock().unwrap().fish_gets, 2);

    let payload = CreateFish {
        name: "Rohu".to_string(),
        scientific_name: "Labeo rohita".to_string(),
    };
    match ResourceService::create::<Fishes>(&client, &payload).await {
        Err(ApiError::Http { status: 503, .. }) => {}
        other => panic!("expected 503, got {other:?}"),
    }
    assert_eq!(state.lock().unwrap().fish_creates, 1);
}

#[tokio::test]
async fn malformed_body_is_a_serde_error() {
    let client = session(seeded()).await;
    assert!(matches!(
        ResourceService::list::<Feeds>(&client).await,
        Err(ApiError::Serde(_))
    ));
}

#[tokio::test]
async fn toggle_permission_revokes_then_assigns() {
    let state = seeded();
    let client = session(state.clone()).await;

    let role = ResourceService::get_role(&client, "r1").await.expect("role");
    let permission = Permission {
        id: "x1".to_string(),
        name: "farm.write".to_string(),
    };

    let outcome = AccessService::toggle_permission(&client, &role, &permission)
        .await
        .expect("revoke");
    assert_eq!(outcome.change, PermissionChange::Revoked);
    assert!(outcome.permission_ids.is_empty());

    let bare = Role {
        permissions: Vec::new(),
        ..role
    };
    let outcome = AccessService::toggle_permission(&client, &bare, &permission)
        .await
        .expect("assign");
    assert_eq!(outcome.change, PermissionChange::Assigned);
    assert_eq!(outcome.permission_ids, vec!["x1"]);

    let writes = state.lock().unwrap().writes.clone();
    assert_eq!(
        writes,
        vec![
            (
                "/api/access/roles/revoke-permissions".to_string(),
                json!({ "roleId": "r1", "permissionsIds": ["x1"] })
            ),
            (
                "/api/access/roles/assign-permissions".to_string(),
                json!({ "roleId": "r1", "permissionsIds": ["x1"] })
            ),
        ]
    );
}

#[tokio::test]
async fn assign_roles_posts_user_and_role_ids() {
    let state = seeded();
    let client = session(state.clone()).await;

    let users = AccessService::assign_roles(&client, "u1", vec!["r1".to_string()])
        .await
        .expect("assign");
    assert!(users.is_empty());
    assert_eq!(
        state.lock().unwrap().writes[0],
        (
            "/api/access/assign-role".to_string(),
            json!({ "userId": "u1", "roles": ["r1"] })
        )
    );
}

#[tokio::test]
async fn role_lookup_and_delete() {
    let client = session(seeded()).await;

    assert!(matches!(
        ResourceService::get_role(&client, "missing").await,
        Err(ApiError::NotFound(_))
    ));

    let found = ResourceService::find::<Roles>(&client, "r1").await.expect("find");
    assert_eq!(found.display_name(), "farm manager");

    let remaining = ResourceService::delete::<Roles>(&client, "r1")
        .await
        .expect("delete");
    assert!(remaining.is_empty());

    // creating is not routed by the fake, which answers 405
    let created = ResourceService::create::<Roles>(
        &client,
        &CreateRole {
            name: "viewer".to_string(),
            permissions: vec![],
        },
    )
    .await;
    assert!(matches!(created, Err(ApiError::Http { status: 405, .. })));
}

#[tokio::test]
async fn dashboard_fetches_all_collections() {
    let client = session(seeded()).await;
    let stats = DashboardService::fetch(&client).await.expect("dashboard");
    assert_eq!(stats.totals.farms, 1);
    assert_eq!(stats.totals.fish_species, 1);
    assert_eq!(stats.ponds_per_farm[0].farm, "North");
    assert_eq!(stats.ponds_per_farm[0].ponds, 0);
}
