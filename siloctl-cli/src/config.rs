//! Environment loading

use std::path::PathBuf;

/// Load `./.env` into the process environment.
///
/// Variables already set win over the file. A missing file is normal;
/// a malformed one is reported on stderr since tracing is not up yet.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(err) if err.not_found() => None,
        Err(err) => {
            eprintln!("warning: ignoring .env: {err}");
            None
        }
    }
}
