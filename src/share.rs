//! Social share URL construction.
//!
//! Pure string templating against the known third-party share endpoints.
//! Instagram has no web share endpoint, so it is not represented here; the
//! client falls back to downloading the certificate and sharing manually.

use serde::Serialize;
use utoipa::ToSchema;

/// Caption attached to every share.
pub const SHARE_CAPTION: &str = "I've taken the pledge to support a drug-free Kerala! \
Join me in creating positive change. #StrongerWithoutDrugs #DrugFreeKerala";

const LINKEDIN_TITLE: &str = "Drug Free Kerala Certificate";

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareLinks {
    pub twitter: String,
    pub facebook: String,
    pub linkedin: String,
    pub whatsapp: String,
}

pub fn share_links(page_url: &str) -> ShareLinks {
    let text = urlencoding::encode(SHARE_CAPTION);
    let url = urlencoding::encode(page_url);

    ShareLinks {
        twitter: format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={url}&quote={text}"),
        linkedin: format!(
            "https://www.linkedin.com/shareArticle?mini=true&url={url}&title={}&summary={text}",
            urlencoding::encode(LINKEDIN_TITLE)
        ),
        whatsapp: format!(
            "https://api.whatsapp.com/send?text={}",
            urlencoding::encode(&format!("{SHARE_CAPTION}\n{page_url}"))
        ),
    }
}
