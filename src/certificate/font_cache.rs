use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use std::{collections::HashMap, path::PathBuf, sync::Arc};

use super::CertError;

static FONT_CACHE: Lazy<Mutex<HashMap<String, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn fonts_dir() -> PathBuf {
    let project_root = std::env::var("PROJECT_ROOT")
        .unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_string());
    PathBuf::from(project_root).join("assets").join("fonts")
}

pub fn load_font_cached(name: &str) -> Result<Arc<Font<'static>>, CertError> {
    if let Some(f) = FONT_CACHE.lock().get(name) {
        return Ok(Arc::clone(f));
    }

    let bytes = std::fs::read(fonts_dir().join(name))
        .map_err(|e| CertError::Font(format!("failed to read font {name}: {e}")))?;
    let f = Font::try_from_vec(bytes)
        .ok_or_else(|| CertError::Font(format!("failed to parse font {name}")))?;

    let f = Arc::new(f);
    FONT_CACHE.lock().insert(name.to_string(), Arc::clone(&f));
    Ok(f)
}
