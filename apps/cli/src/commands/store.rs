//! Public store information.

use tracing::warn;
use vitrina_core::StoreInfo;

use crate::error::CliResult;
use crate::state::AppContext;

pub async fn info(ctx: &AppContext) -> CliResult<StoreInfo> {
    let subdomain = ctx.config.require_subdomain()?;
    Ok(ctx.client.public().store(&subdomain).await?)
}

/// Store info for decorations (free-shipping bar, payment flag).
///
/// A failure is logged and treated as "no info"; the command goes on.
pub(crate) async fn info_or_none(ctx: &AppContext) -> Option<StoreInfo> {
    let subdomain = ctx.config.subdomain()?.to_string();
    match ctx.client.public().store(&subdomain).await {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(subdomain = %subdomain, error = %e, "Store info unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::render::Render;
    use serde_json::json;

    #[tokio::test]
    async fn test_info_renders() {
        let (ctx, transport) = context(false).await;
        transport.push_json(
            200,
            json!({ "name": "Tienda Sol", "subdomain": "sol", "freeShippingMin": 200 }),
        );

        let store = info(&ctx).await.unwrap();
        let text = store.render();

        assert!(text.starts_with("Tienda Sol (sol)"));
        assert!(text.contains("Free shipping from $200.00"));
    }

    #[tokio::test]
    async fn test_info_or_none_degrades() {
        let (ctx, transport) = context(false).await;
        transport.push_json(500, json!({ "message": "boom" }));

        assert!(info_or_none(&ctx).await.is_none());
    }
}
