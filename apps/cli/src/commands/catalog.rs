//! Catalog entries: categories, brands, sizes, colors, genders and types.

use vitrina_api::services::CatalogKind;
use vitrina_core::CatalogEntry;

use super::require_session;
use crate::error::CliResult;
use crate::render::Message;
use crate::state::AppContext;

pub async fn list(ctx: &AppContext, kind: CatalogKind) -> CliResult<Vec<CatalogEntry>> {
    require_session(ctx).await?;
    Ok(ctx.client.catalog().list(kind).await?)
}

pub async fn create(ctx: &AppContext, kind: CatalogKind, name: &str) -> CliResult<CatalogEntry> {
    require_session(ctx).await?;
    Ok(ctx.client.catalog().create(kind, name).await?)
}

pub async fn rename(ctx: &AppContext, kind: CatalogKind, id: &str, name: &str) -> CliResult<CatalogEntry> {
    require_session(ctx).await?;
    Ok(ctx.client.catalog().update(kind, id, name).await?)
}

pub async fn delete(ctx: &AppContext, kind: CatalogKind, id: &str) -> CliResult<Message> {
    require_session(ctx).await?;
    ctx.client.catalog().delete(kind, id).await?;
    Ok(Message::new(format!("Deleted {} {}.", kind, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use crate::render::Render;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_brands() {
        let (ctx, transport) = context(true).await;
        transport.push_json(200, json!([{ "id": "b1", "name": "Nike" }]));

        let brands = list(&ctx, CatalogKind::Brand).await.unwrap();

        assert_eq!(brands[0].name, "Nike");
        assert!(brands.render().contains("Nike"));
        assert_eq!(transport.requests()[0].url.path(), "/api/brand");
    }

    #[tokio::test]
    async fn test_blank_name_rejected_locally() {
        let (ctx, transport) = context(true).await;

        let err = create(&ctx, CatalogKind::Category, "  ").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(transport.request_count(), 0);
    }
}
