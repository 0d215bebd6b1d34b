//! List/create/update/delete endpoints for each backend resource.
//!
//! Every write is followed by a fresh list fetch, so callers always render
//! what the backend holds after the change.

use models::{
    Record,
    access::{CreateRole, Permission, Role},
    culture_cycle::{CreateCultureCycle, CultureCycle},
    farm::{CreateFarm, Farm},
    feed::{CreateFeedStock, Feed, FeedStock},
    fish::{CreateFish, Fish},
    pond::{CreatePond, Pond},
    user::User,
};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use super::api_client::{ApiClient, ApiError};

/// A listable backend collection.
pub trait Resource {
    type Record: DeserializeOwned + Record;
    const NAME: &'static str;
    const LIST_PATH: &'static str;
}

/// Collections that accept creates and full-record updates.
pub trait Writable: Resource {
    type Payload: Serialize + Sync;
    const CREATE_PATH: &'static str;

    fn update_path(id: &str) -> String;
}

pub trait Deletable: Resource {
    fn delete_path(id: &str) -> String;
}

macro_rules! resource {
    ($marker:ident, $record:ty, $name:literal, $list:literal) => {
        pub struct $marker;

        impl Resource for $marker {
            type Record = $record;
            const NAME: &'static str = $name;
            const LIST_PATH: &'static str = $list;
        }
    };
    ($marker:ident, $record:ty, $name:literal, $list:literal, $payload:ty, $create:literal, $item:literal) => {
        resource!($marker, $record, $name, $list);

        impl Writable for $marker {
            type Payload = $payload;
            const CREATE_PATH: &'static str = $create;

            fn update_path(id: &str) -> String {
                format!(concat!($item, "/{}"), id)
            }
        }
    };
}

resource!(Farms, Farm, "farm", "/api/farm/all", CreateFarm, "/api/farm/create", "/api/farm");
resource!(Ponds, Pond, "pond", "/api/pond/all", CreatePond, "/api/pond/create", "/api/pond");
resource!(Fishes, Fish, "fish", "/api/fish/all", CreateFish, "/api/fish/create", "/api/fish");
resource!(
    CultureCycles,
    CultureCycle,
    "culture cycle",
    "/api/culture-cycle/all",
    CreateCultureCycle,
    "/api/culture-cycle/create",
    "/api/culture-cycle"
);
resource!(Feeds, Feed, "feed", "/api/feeds");
resource!(
    FeedStocks,
    FeedStock,
    "feed stock",
    "/api/feed-stocks",
    CreateFeedStock,
    "/api/feed-stocks",
    "/api/feed-stocks"
);
resource!(
    Roles,
    Role,
    "role",
    "/api/access/roles/all",
    CreateRole,
    "/api/access/roles/create",
    "/api/access/roles"
);
resource!(Permissions, Permission, "permission", "/api/access/permissions");
resource!(Users, User, "user", "/api/users");

impl Deletable for Roles {
    fn delete_path(id: &str) -> String {
        Self::update_path(id)
    }
}

pub struct ResourceService;

impl ResourceService {
    pub async fn list<R: Resource>(client: &ApiClient) -> Result<Vec<R::Record>, ApiError> {
        client.require_auth()?;
        client.get(R::LIST_PATH).await
    }

    /// Look a record up by id in the full listing. The backend has no
    /// single-record GET for most resources.
    pub async fn find<R: Resource>(client: &ApiClient, id: &str) -> Result<R::Record, ApiError> {
        Self::list::<R>(client)
            .await?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| ApiError::NotFound(format!("{} {id}", R::NAME)))
    }

    pub async fn create<R: Writable>(
        client: &ApiClient,
        payload: &R::Payload,
    ) -> Result<Vec<R::Record>, ApiError> {
        client.require_auth()?;
        client
            .send(Method::POST, R::CREATE_PATH, Some(payload))
            .await?;
        info!(resource = R::NAME, "Created record");
        Self::list::<R>(client).await
    }

    pub async fn update<R: Writable>(
        client: &ApiClient,
        id: &str,
        payload: &R::Payload,
    ) -> Result<Vec<R::Record>, ApiError> {
        client.require_auth()?;
        client
            .send(Method::PUT, &R::update_path(id), Some(payload))
            .await?;
        info!(resource = R::NAME, record_id = %id, "Updated record");
        Self::list::<R>(client).await
    }

    pub async fn delete<R: Deletable>(
        client: &ApiClient,
        id: &str,
    ) -> Result<Vec<R::Record>, ApiError> {
        client.require_auth()?;
        client.delete(&R::delete_path(id)).await?;
        info!(resource = R::NAME, record_id = %id, "Deleted record");
        Self::list::<R>(client).await
    }

    /// Role with its permissions populated.
    pub async fn get_role(client: &ApiClient, id: &str) -> Result<Role, ApiError> {
        client.require_auth()?;
        client.get(&Roles::update_path(id)).await
    }
}
