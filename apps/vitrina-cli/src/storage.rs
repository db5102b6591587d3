//! Cart file storage.
//!
//! The cart lives in a JSON file between invocations, the way a storefront
//! keeps it in local storage. A missing file is an empty cart.

use std::path::Path;

use tracing::debug;
use vitrina_core::Cart;

use crate::error::CliResult;

/// Reads the cart file. Missing file → empty cart.
pub async fn load_cart(path: &Path) -> CliResult<Cart> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) if contents.trim().is_empty() => Ok(Cart::new()),
        Ok(contents) => Ok(Cart::from_json(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Cart file not found, starting empty");
            Ok(Cart::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Writes the cart file, creating parent directories as needed.
pub async fn save_cart(path: &Path, cart: &Cart) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let contents = serde_json::to_string_pretty(cart)?;
    tokio::fs::write(path, contents).await?;
    debug!(path = %path.display(), lines = cart.line_count(), "Cart saved");
    Ok(())
}
