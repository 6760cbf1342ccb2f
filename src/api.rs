use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::certificate::{
    self, compositor,
    id::{download_filename, format_certificate_id},
    layout,
    surface::RasterSurface,
    template, CertError,
};
use crate::pledge::{self, PledgeError, PLEDGE_CONDITIONS};
use crate::share;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(get, path = "/health", tag = "dfk", responses((status=200, body=HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

#[utoipa::path(
    get,
    path = "/pledge/conditions",
    tag = "dfk",
    responses((status=200, body=[String]))
)]
pub async fn pledge_conditions() -> impl IntoResponse {
    Json(PLEDGE_CONDITIONS)
}

/// Mirrors the pledge form's checkbox state; every condition must be
/// accepted before the pledge is forwarded upstream.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PledgeConditionsAccepted {
    pub aware: bool,
    pub commit: bool,
    pub discourage: bool,
    pub report: bool,
    pub support: bool,
}

impl PledgeConditionsAccepted {
    pub fn all_accepted(&self) -> bool {
        self.aware && self.commit && self.discourage && self.report && self.support
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PledgeRequest {
    pub name: String,
    pub email: String,
    pub conditions: PledgeConditionsAccepted,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PledgeResponse {
    pub id: u64,
    pub certificate_id: String,
    /// True when this email already pledged; the upstream record is returned
    /// unchanged in that case.
    pub is_error: bool,
}

#[utoipa::path(
    post,
    path = "/pledge",
    tag = "dfk",
    request_body = PledgeRequest,
    responses(
        (status=200, body=PledgeResponse),
        (status=400, description="Missing fields or unaccepted conditions"),
        (status=500, description="Upstream pledge API failure")
    )
)]
pub async fn submit_pledge(
    State(st): State<Arc<AppState>>,
    Json(req): Json<PledgeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name and email are required".into()));
    }
    if !req.conditions.all_accepted() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please accept all pledge conditions before submitting".into(),
        ));
    }

    let record = pledge::create_pledge(&st.http, req.name.trim(), req.email.trim())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let certificate_id = format_certificate_id(&record.id.to_string());
    info!(id = record.id, duplicate = record.is_error, "pledge registered");

    Ok(Json(PledgeResponse {
        id: record.id,
        certificate_id,
        is_error: record.is_error,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LookupQuery {
    /// Email the pledge was registered with.
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LookupResponse {
    pub id: u64,
    pub certificate_id: String,
}

#[utoipa::path(
    get,
    path = "/certificate/lookup",
    tag = "dfk",
    params(LookupQuery),
    responses(
        (status=200, body=LookupResponse),
        (status=404, description="No pledge registered for this email"),
        (status=500, description="Upstream pledge API failure")
    )
)]
pub async fn lookup_certificate(
    State(st): State<Arc<AppState>>,
    Query(q): Query<LookupQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match pledge::lookup_by_email(&st.http, &q.email).await {
        Ok(record) => {
            let certificate_id = format_certificate_id(&record.id.to_string());
            Ok(Json(LookupResponse {
                id: record.id,
                certificate_id,
            }))
        }
        Err(PledgeError::NotFound(msg)) => Err((StatusCode::NOT_FOUND, msg)),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenderRequest {
    pub name: String,
    /// Raw or already-formatted certificate identifier; normalized before
    /// rendering.
    pub certificate_id: String,
}

#[utoipa::path(
    post,
    path = "/certificate/render",
    tag = "dfk",
    request_body = RenderRequest,
    responses(
        (status=200, description="Certificate PNG", content_type="image/png"),
        (status=400, description="Bad request"),
        (status=500, description="Template, font or encoding failure")
    )
)]
pub async fn render(
    State(st): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let formatted = format_certificate_id(&req.certificate_id);

    let font = certificate::load_font_cached(layout::FONT_BOLD)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let mut surface = RasterSurface::new(font);
    let overlays = layout::certificate_overlays(&req.name, &formatted);

    compositor::render_certificate(&st.http, &template::template_path(), &mut surface, &overlays)
        .await
        .map_err(|e| match e {
            CertError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    let png = surface
        .into_png()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(certificate_id = %formatted, bytes = png.len(), "certificate rendered");

    let disposition = format!("attachment; filename=\"{}\"", download_filename(&formatted));
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    ))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShareQuery {
    /// Page URL embedded in each share link.
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/certificate/share",
    tag = "dfk",
    params(ShareQuery),
    responses((status=200, body=share::ShareLinks))
)]
pub async fn share_links(Query(q): Query<ShareQuery>) -> impl IntoResponse {
    Json(share::share_links(&q.url))
}
