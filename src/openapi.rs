use utoipa::OpenApi;

use crate::{api, share};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::pledge_conditions,
        api::submit_pledge,
        api::lookup_certificate,
        api::render,
        api::share_links,
    ),
    components(
        schemas(
            api::HealthResponse,
            api::PledgeRequest,
            api::PledgeConditionsAccepted,
            api::PledgeResponse,
            api::LookupResponse,
            api::RenderRequest,
            share::ShareLinks,
        )
    ),
    tags(
        (name = "dfk", description = "Drug Free Kerala pledge & certificate backend API")
    )
)]
pub struct ApiDoc;
