//! Catalog dictionaries (category, brand, size, color, gender, type).
//!
//! All six share the same shape and the same CRUD endpoints, so one service
//! covers them, selected by [`CatalogKind`].

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;
use vitrina_core::validation::validate_name;
use vitrina_core::{CatalogEntry, ValidationError};

use super::{segment, Listing};
use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Category,
    Brand,
    Size,
    Color,
    Gender,
    Type,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 6] = [
        CatalogKind::Category,
        CatalogKind::Brand,
        CatalogKind::Size,
        CatalogKind::Color,
        CatalogKind::Gender,
        CatalogKind::Type,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Category => "category",
            CatalogKind::Brand => "brand",
            CatalogKind::Size => "size",
            CatalogKind::Color => "color",
            CatalogKind::Gender => "gender",
            CatalogKind::Type => "type",
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_suffix('s').unwrap_or(&wanted);
        CatalogKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted || (wanted == "categorie" && *kind == CatalogKind::Category))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "kind".to_string(),
                reason: format!("unknown catalog '{}'", s.trim()),
            })
    }
}

#[derive(Serialize)]
struct NameBody<'b> {
    name: &'b str,
}

pub struct CatalogService<'a> {
    client: &'a ApiClient,
}

impl<'a> CatalogService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        CatalogService { client }
    }

    pub async fn list(&self, kind: CatalogKind) -> ApiResult<Vec<CatalogEntry>> {
        let listing: Listing<CatalogEntry> = self.client.get(&kind.path(), &[]).await?;
        Ok(listing.into_page().data)
    }

    pub async fn create(&self, kind: CatalogKind, name: &str) -> ApiResult<CatalogEntry> {
        validate_name("name", name)?;
        let entry: CatalogEntry = self
            .client
            .post(&kind.path(), &NameBody { name: name.trim() })
            .await?;
        info!(kind = %kind, id = %entry.id, name = %entry.name, "Catalog entry created");
        Ok(entry)
    }

    pub async fn update(&self, kind: CatalogKind, id: &str, name: &str) -> ApiResult<CatalogEntry> {
        validate_name("name", name)?;
        self.client
            .patch(
                &format!("{}/{}", kind.path(), segment(id)),
                &NameBody { name: name.trim() },
            )
            .await
    }

    pub async fn delete(&self, kind: CatalogKind, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("{}/{}", kind.path(), segment(id)))
            .await?;
        info!(kind = %kind, id = %id, "Catalog entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("category".parse::<CatalogKind>().unwrap(), CatalogKind::Category);
        assert_eq!("Categories".parse::<CatalogKind>().unwrap(), CatalogKind::Category);
        assert_eq!("brands".parse::<CatalogKind>().unwrap(), CatalogKind::Brand);
        assert_eq!("type".parse::<CatalogKind>().unwrap(), CatalogKind::Type);
        assert!("supplier".parse::<CatalogKind>().is_err());
        assert_eq!(CatalogKind::Gender.path(), "/gender");
    }

    #[tokio::test]
    async fn test_list_and_create() {
        let (client, transport, _) = client(true);
        transport.push_json(200, json!([{ "id": "b1", "name": "Nike" }]));
        transport.push_json(201, json!({ "id": "b2", "name": "Adidas" }));

        let brands = client.catalog().list(CatalogKind::Brand).await.unwrap();
        let created = client.catalog().create(CatalogKind::Brand, " Adidas ").await.unwrap();

        assert_eq!(brands[0].name, "Nike");
        assert_eq!(created.id, "b2");
        let requests = transport.requests();
        assert_eq!(requests[0].url.path(), "/api/brand");
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].json(), Some(&json!({ "name": "Adidas" })));
    }

    #[tokio::test]
    async fn test_delete_path() {
        let (client, transport, _) = client(true);
        transport.push_raw(200, "");

        client.catalog().delete(CatalogKind::Size, "s9").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.url.path(), "/api/size/s9");
    }
}
