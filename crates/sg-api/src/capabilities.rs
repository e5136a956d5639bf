//! Local platform facts used to rewrite file links in returned records.

use shotgun_json_client::{FieldMap, FieldValue};

/// Operating system family, as named in local storage field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    /// Platform of the running process, if it is one the server knows.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "macos" => Some(Platform::Mac),
            "windows" => Some(Platform::Windows),
            "linux" => Some(Platform::Linux),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }
}

/// What the client knows about where it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCapabilities {
    platform: Option<Platform>,
}

impl ClientCapabilities {
    pub fn detect() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Option<Platform>) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Name of the attachment field holding this platform's local path,
    /// e.g. `local_path_linux`.
    pub fn local_path_field(&self) -> Option<String> {
        self.platform.map(|p| format!("local_path_{}", p.as_str()))
    }

    /// Give every local-file link in `fields` that has a path for this
    /// platform a `local_path` and a `file://` `url`. Recurses into nested
    /// maps and lists.
    pub(crate) fn rewrite_local_paths(&self, fields: &mut FieldMap) {
        let Some(path_field) = self.local_path_field() else {
            return;
        };
        for value in fields.values_mut() {
            rewrite_value(value, &path_field);
        }
    }
}

fn rewrite_value(value: &mut FieldValue, path_field: &str) {
    match value {
        FieldValue::Map(map) => {
            let is_local = matches!(map.get("link_type"), Some(FieldValue::String(t)) if t == "local");
            if is_local {
                let Some(local_path) = map.get(path_field).cloned() else {
                    return;
                };
                let trimmed = local_path.as_str().unwrap_or_default().trim_start_matches(['/', '\\']);
                let url = FieldValue::String(format!("file://{trimmed}"));
                map.insert("local_path".to_string(), local_path);
                map.insert("url".to_string(), url);
            } else {
                for nested in map.values_mut() {
                    rewrite_value(nested, path_field);
                }
            }
        }
        FieldValue::List(items) => {
            for item in items {
                rewrite_value(item, path_field);
            }
        }
        _ => {}
    }
}
