use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_SITES_PATH: &str = "data/sites.json";

/// The dataset changes at deploy time only; short shared cache is enough.
pub const SITES_CACHE_CONTROL: &str = "public, max-age=300";

pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn sites_path() -> PathBuf {
    std::env::var("CATHAR_SITES_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SITES_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_on_missing_or_invalid_values() {
        temp_env::with_var("PORT", None::<&str>, || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("PORT", Some("not-a-port"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("PORT", Some("0"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("PORT", Some("8080"), || {
            assert_eq!(server_port(), 8080);
        });
    }

    #[test]
    fn sites_path_honors_override() {
        temp_env::with_var("CATHAR_SITES_PATH", None::<&str>, || {
            assert_eq!(sites_path(), PathBuf::from(DEFAULT_SITES_PATH));
        });
        temp_env::with_var("CATHAR_SITES_PATH", Some("   "), || {
            assert_eq!(sites_path(), PathBuf::from(DEFAULT_SITES_PATH));
        });
        temp_env::with_var("CATHAR_SITES_PATH", Some("/srv/sites.json"), || {
            assert_eq!(sites_path(), PathBuf::from("/srv/sites.json"));
        });
    }
}
