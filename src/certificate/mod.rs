pub mod compositor;
pub mod id;
pub mod layout;
pub mod surface;
pub mod template;

mod font_cache;

pub use font_cache::load_font_cached;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CertError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("template: {0}")]
    Template(String),
    #[error("font: {0}")]
    Font(String),
    #[error("image: {0}")]
    Image(String),
    #[error("internal: {0}")]
    Internal(String),
}
