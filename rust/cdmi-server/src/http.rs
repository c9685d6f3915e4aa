use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, RawQuery, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use cdmi_model::ObjectId;
use cdmi_store::ResourceStores;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{CdmiError, Resolved, ResourceResolver, fields_from_query};

/// Version of the CDMI wire contract this endpoint speaks, attached to
/// every response
pub const SPECIFICATION_VERSION: &str = "1.1.1";

/// Shared state for the axum handlers
#[derive(Clone)]
pub struct AppState<S>
where
    S: ResourceStores,
{
    resolver: Arc<ResourceResolver<S>>,
}

/// Build the HTTP surface over the given resolver.
///
/// The domain and capability trees get their dedicated read surfaces; the
/// object id surface resolves through the read fallback order; everything
/// else lands on the generic path surface for reads, writes and deletes.
pub fn router<S>(resolver: ResourceResolver<S>) -> Router
where
    S: ResourceStores,
{
    let state = AppState {
        resolver: Arc::new(resolver),
    };

    Router::new()
        .route("/", get(get_by_path::<S>))
        .route("/cdmi_objectid/{id}", get(get_by_id::<S>))
        .route(
            "/cdmi_domains",
            get(get_domain::<S>)
                .put(put_by_path::<S>)
                .delete(delete_by_path::<S>),
        )
        .route(
            "/cdmi_domains/{*path}",
            get(get_domain::<S>)
                .put(put_by_path::<S>)
                .delete(delete_by_path::<S>),
        )
        .route("/cdmi_capabilities", get(get_capability::<S>))
        .route("/cdmi_capabilities/{*path}", get(get_capability::<S>))
        .route(
            "/{*path}",
            get(get_by_path::<S>)
                .put(put_by_path::<S>)
                .delete(delete_by_path::<S>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-cdmi-specification-version"),
                    HeaderValue::from_static(SPECIFICATION_VERSION),
                )),
        )
        .with_state(state)
}

async fn get_by_path<S>(
    State(state): State<AppState<S>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, CdmiError>
where
    S: ResourceStores,
{
    let fields = fields_from_query(query.as_deref());
    let resolved = state
        .resolver
        .read_by_path(uri.path(), range_directive(&headers), fields.as_deref())
        .await?;

    Ok(resolved_response(StatusCode::OK, resolved))
}

async fn get_by_id<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, CdmiError>
where
    S: ResourceStores,
{
    let fields = fields_from_query(query.as_deref());
    let resolved = state
        .resolver
        .read_by_id(
            &ObjectId::from(id),
            range_directive(&headers),
            fields.as_deref(),
        )
        .await?;

    Ok(resolved_response(StatusCode::OK, resolved))
}

async fn get_domain<S>(
    State(state): State<AppState<S>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> Result<Response, CdmiError>
where
    S: ResourceStores,
{
    let fields = fields_from_query(query.as_deref());
    let resolved = state
        .resolver
        .read_domain(uri.path(), fields.as_deref())
        .await?;

    Ok(resolved_response(StatusCode::OK, resolved))
}

async fn get_capability<S>(
    State(state): State<AppState<S>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> Result<Response, CdmiError>
where
    S: ResourceStores,
{
    let fields = fields_from_query(query.as_deref());
    let resolved = state
        .resolver
        .read_capability(uri.path(), fields.as_deref())
        .await?;

    Ok(resolved_response(StatusCode::OK, resolved))
}

async fn put_by_path<S>(
    State(state): State<AppState<S>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Response, CdmiError>
where
    S: ResourceStores,
{
    let declared_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or(CdmiError::BadContentType)?;

    let fields = fields_from_query(query.as_deref());
    let resolved = state
        .resolver
        .write(uri.path(), declared_type, &body, fields.as_deref())
        .await?;

    Ok(resolved_response(StatusCode::CREATED, resolved))
}

async fn delete_by_path<S>(
    State(state): State<AppState<S>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, CdmiError>
where
    S: ResourceStores,
{
    state.resolver.delete(uri.path()).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

fn range_directive(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
}

fn resolved_response(status: StatusCode, resolved: Resolved) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(resolved.kind.media_type()),
        )],
        Json(Value::Object(resolved.representation)),
    )
        .into_response()
}
