use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{BackendKind, Config};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body_mb: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub backend: Option<String>,
    pub require_signature: Option<bool>,
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
}

/// Platform config directory path: `<config_dir>/pdftext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdftext").join("config.toml"))
}

/// Load config by cascading CWD `.pdftext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdftext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bs = base.server.unwrap_or_default();
    let os = overlay.server.unwrap_or_default();
    let be = base.extraction.unwrap_or_default();
    let oe = overlay.extraction.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            host: os.host.or(bs.host),
            port: os.port.or(bs.port),
            max_body_mb: os.max_body_mb.or(bs.max_body_mb),
            request_timeout_secs: os.request_timeout_secs.or(bs.request_timeout_secs),
        }),
        extraction: Some(ExtractionConfig {
            backend: oe.backend.or(be.backend),
            require_signature: oe.require_signature.or(be.require_signature),
            header_exclusion: oe.header_exclusion.or(be.header_exclusion),
            footer_exclusion: oe.footer_exclusion.or(be.footer_exclusion),
        }),
    }
}

/// Apply the values present in `file` on top of `config`.
pub fn apply_file(mut config: Config, file: &ConfigFile) -> Config {
    if let Some(server) = &file.server {
        if let Some(host) = &server.host {
            config.host = host.clone();
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(mb) = server.max_body_mb {
            config.max_body_mb = mb;
        }
        if let Some(secs) = server.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
    }

    if let Some(extraction) = &file.extraction {
        if let Some(backend) = &extraction.backend {
            match backend.parse::<BackendKind>() {
                Ok(kind) => config.backend = kind,
                Err(e) => tracing::warn!(error = %e, "ignoring extraction.backend"),
            }
        }
        if let Some(require) = extraction.require_signature {
            config.require_signature = require;
        }
        if let Some(ratio) = extraction.header_exclusion {
            config.header_exclusion = ratio;
        }
        if let Some(ratio) = extraction.footer_exclusion {
            config.footer_exclusion = ratio;
        }
    }

    config
}

/// Apply `PDFTEXT_*` environment overrides, reading variables through `lookup`.
///
/// Unparsable values are logged and skipped.
pub fn apply_env_with<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("PDFTEXT_HOST") {
        config.host = host;
    }
    if let Some(port) = parse_var(&lookup, "PDFTEXT_PORT") {
        config.port = port;
    }
    if let Some(mb) = parse_var(&lookup, "PDFTEXT_MAX_BODY_MB") {
        config.max_body_mb = mb;
    }
    if let Some(secs) = parse_var(&lookup, "PDFTEXT_TIMEOUT_SECS") {
        config.request_timeout_secs = secs;
    }
    if let Some(kind) = parse_var::<BackendKind, _>(&lookup, "PDFTEXT_BACKEND") {
        config.backend = kind;
    }
    if let Some(require) = lookup("PDFTEXT_REQUIRE_SIGNATURE") {
        match parse_flag(&require) {
            Some(flag) => config.require_signature = flag,
            None => tracing::warn!(value = %require, "ignoring PDFTEXT_REQUIRE_SIGNATURE"),
        }
    }
    config
}

/// Defaults, then the TOML cascade, then the process environment.
pub fn resolve_config() -> Config {
    let config = apply_file(Config::default(), &load_config());
    apply_env_with(config, |key| std::env::var(key).ok())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid environment value");
            None
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_toml_parses() {
        let toml_str = "[extraction]\nbackend = \"pdf-extract\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.server.is_none());
        assert_eq!(
            parsed.extraction.unwrap().backend.as_deref(),
            Some("pdf-extract")
        );
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                port: Some(8080),
                host: Some("127.0.0.1".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                port: Some(9090),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).server.unwrap();
        assert_eq!(merged.port, Some(9090));
        assert_eq!(merged.host.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                require_signature: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.extraction.unwrap().require_signature, Some(false));
    }

    #[test]
    fn apply_file_overrides_defaults() {
        let file = ConfigFile {
            server: Some(ServerConfig {
                port: Some(4000),
                request_timeout_secs: Some(0),
                ..Default::default()
            }),
            extraction: Some(ExtractionConfig {
                backend: Some("pdf-extract".into()),
                footer_exclusion: Some(0.05),
                ..Default::default()
            }),
        };
        let config = apply_file(Config::default(), &file);
        assert_eq!(config.port, 4000);
        assert_eq!(config.request_timeout_secs, 0);
        assert_eq!(config.backend, BackendKind::PdfExtract);
        assert_eq!(config.footer_exclusion, 0.05);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.require_signature);
    }

    #[test]
    fn apply_file_skips_unknown_backend() {
        let file = ConfigFile {
            extraction: Some(ExtractionConfig {
                backend: Some("ghostscript".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(apply_file(Config::default(), &file).backend, BackendKind::Mupdf);
    }

    #[test]
    fn env_overrides_file_values() {
        let config = apply_env_with(
            Config::default(),
            env(&[
                ("PDFTEXT_PORT", "8123"),
                ("PDFTEXT_BACKEND", "pdf-extract"),
                ("PDFTEXT_REQUIRE_SIGNATURE", "off"),
                ("PDFTEXT_MAX_BODY_MB", "5"),
            ]),
        );
        assert_eq!(config.port, 8123);
        assert_eq!(config.backend, BackendKind::PdfExtract);
        assert!(!config.require_signature);
        assert_eq!(config.max_body_mb, 5);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let config = apply_env_with(
            Config::default(),
            env(&[
                ("PDFTEXT_PORT", "eighty"),
                ("PDFTEXT_REQUIRE_SIGNATURE", "maybe"),
                ("PDFTEXT_TIMEOUT_SECS", "-1"),
            ]),
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_path_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 5001\n\n[extraction]\nrequire_signature = false\n",
        )
        .unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.server.unwrap().port, Some(5001));
        assert_eq!(loaded.extraction.unwrap().require_signature, Some(false));
    }

    #[test]
    fn load_from_path_missing_or_broken() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[server\nport = ").unwrap();
        assert!(load_from_path(&broken).is_none());
    }
}
