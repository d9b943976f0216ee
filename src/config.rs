use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    key: Option<String>,
}

pub(crate) fn load_config(url: Option<String>, key: Option<String>) -> Result<ClientConfig> {
    let mut url = url.or_else(|| std::env::var("LIZARDAPI_URL").ok());
    let mut key = key.or_else(|| std::env::var("LIZARDAPI_KEY").ok());

    let rc_candidates = rc_candidates();

    if url.is_none() || key.is_none() {
        for rc_path in &rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).map_err(|e| {
                    Error::Config(format!(
                        "failed to read configuration file {}: {}",
                        rc_path.display(),
                        e
                    ))
                })?;

                if url.is_none() {
                    url = cfg.url;
                }
                if key.is_none() {
                    key = cfg.key;
                }
                break;
            }
        }
    }

    let url = url.ok_or_else(|| missing("url", "LIZARDAPI_URL", &rc_candidates))?;
    let key = key.ok_or_else(|| missing("key", "LIZARDAPI_KEY", &rc_candidates))?;

    Ok(ClientConfig { url, key })
}

fn missing(field: &str, var: &str, rc_candidates: &[PathBuf]) -> Error {
    Error::Config(format!(
        "missing {field} (set {var} or put `{field}:` in one of: {})",
        rc_candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

fn read_rc(path: &Path) -> std::io::Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            match k.trim() {
                "url" => cfg.url = Some(v.to_string()),
                "key" => cfg.key = Some(v.to_string()),
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // Search order:
    // 1) LIZARDAPI_RC (explicit)
    // 2) ./.lizardrc (current working directory)
    // 3) ~/.lizardrc
    if let Ok(p) = std::env::var("LIZARDAPI_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".lizardrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".lizardrc"));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_rc(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn rc_file_parses_url_and_key() {
        let path = write_rc(
            "lizardapi-rc-basic",
            "# demo instance\nurl: https://demo.lizard.net/api/v4\nkey: secret\n",
        );
        let cfg = read_rc(&path).unwrap();
        assert_eq!(cfg.url.as_deref(), Some("https://demo.lizard.net/api/v4"));
        assert_eq!(cfg.key.as_deref(), Some("secret"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rc_file_values_may_be_quoted() {
        let path = write_rc(
            "lizardapi-rc-quoted",
            "url: 'https://demo.lizard.net/api/v4'\nkey: \"secret\"\nignored: value\n",
        );
        let cfg = read_rc(&path).unwrap();
        assert_eq!(cfg.url.as_deref(), Some("https://demo.lizard.net/api/v4"));
        assert_eq!(cfg.key.as_deref(), Some("secret"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let path = write_rc("lizardapi-rc-blank", "url:\nkey: secret\n");
        let cfg = read_rc(&path).unwrap();
        assert!(cfg.url.is_none());
        assert_eq!(cfg.key.as_deref(), Some("secret"));
        std::fs::remove_file(path).ok();
    }
}
