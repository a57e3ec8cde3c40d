//! File-backed message catalog
//!
//! Messages live in `<dir>/messages_<lang>.yml`. Keys are dotted paths into
//! the YAML tree (`messages.no-permission`). A missing file is created from
//! the bundled defaults for that language, or empty when none are bundled.
//! Keys absent from the file are looked up in the bundled defaults before the
//! caller's fallback is used.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::{apply_placeholders, MessageSource};
use crate::error::Result;

const BUNDLED_EN: &str = include_str!("../../resources/messages_en.yml");

fn bundled_defaults(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some(BUNDLED_EN),
        _ => None,
    }
}

/// YAML-backed [`MessageSource`] for one language
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    dir: PathBuf,
    language: String,
    document: Value,
    defaults: Value,
}

impl MessageCatalog {
    /// Open (creating if needed) the catalog for `language` under `dir`
    pub fn open<P: AsRef<Path>>(dir: P, language: &str) -> Result<Self> {
        let mut catalog = Self {
            dir: dir.as_ref().to_path_buf(),
            language: language.to_string(),
            document: Value::Null,
            defaults: Value::Null,
        };
        catalog.load()?;
        Ok(catalog)
    }

    /// Catalog holding only the bundled defaults, without touching disk
    pub fn bundled(language: &str) -> Result<Self> {
        let defaults = match bundled_defaults(language) {
            Some(text) => serde_yaml::from_str(text)?,
            None => Value::Null,
        };
        Ok(Self {
            dir: PathBuf::new(),
            language: language.to_string(),
            document: Value::Null,
            defaults,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Path of the language file backing this catalog
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("messages_{}.yml", self.language))
    }

    fn load(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let bundled = bundled_defaults(&self.language);
        if !path.exists() {
            std::fs::write(&path, bundled.unwrap_or(""))?;
        }

        let content = std::fs::read_to_string(&path)?;
        self.document = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(&content)?
        };
        self.defaults = match bundled {
            Some(text) => serde_yaml::from_str(text)?,
            None => Value::Null,
        };

        tracing::info!("Loaded language file: {}", path.display());
        Ok(())
    }

    /// Re-read the file, switching language when it changed
    pub fn reload(&mut self, language: &str) -> Result<()> {
        if language != self.language {
            self.language = language.to_string();
            self.load()?;
            tracing::info!("Reloaded language file after changing language to: {}", language);
        } else {
            self.load()?;
            tracing::info!("Reloaded language file without changing language");
        }
        Ok(())
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        find(&self.document, key).or_else(|| find(&self.defaults, key))
    }

    /// Whether the key resolves in the file or the bundled defaults
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Message with `{name}` placeholders substituted
    pub fn message_with(&self, key: &str, fallback: &str, placeholders: &[(&str, &str)]) -> String {
        apply_placeholders(&self.message(key, fallback), placeholders)
    }

    /// A list of lines; a scalar value becomes a one-line list
    pub fn message_list(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.lookup(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => default.iter().map(|line| line.to_string()).collect(),
        }
    }

    pub fn message_list_with(
        &self,
        key: &str,
        default: &[&str],
        placeholders: &[(&str, &str)],
    ) -> Vec<String> {
        self.message_list(key, default)
            .iter()
            .map(|line| apply_placeholders(line, placeholders))
            .collect()
    }
}

impl MessageSource for MessageCatalog {
    fn message(&self, key: &str, fallback: &str) -> String {
        self.lookup(key)
            .and_then(scalar_to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Walk a dotted key through nested mappings
fn find<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |node, part| match node {
        Value::Mapping(map) => map.get(part),
        _ => None,
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::defaults;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file_from_bundle() {
        let temp = TempDir::new().unwrap();
        let catalog = MessageCatalog::open(temp.path().join("messages"), "en").unwrap();

        assert!(catalog.path().exists());
        assert_eq!(
            catalog.message(defaults::UNKNOWN_SUBCOMMAND_KEY, "x"),
            defaults::UNKNOWN_SUBCOMMAND
        );
    }

    #[test]
    fn test_file_overrides_bundle() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("messages_en.yml"),
            "messages:\n  no-permission: \"&4Access denied\"\n",
        )
        .unwrap();

        let catalog = MessageCatalog::open(temp.path(), "en").unwrap();
        assert_eq!(catalog.message(defaults::NO_PERMISSION_KEY, "x"), "&4Access denied");
        // Not in the file, still resolved from the bundle
        assert_eq!(
            catalog.message(defaults::INTERNAL_ERROR_KEY, "x"),
            defaults::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_unbundled_language_uses_fallbacks() {
        let temp = TempDir::new().unwrap();
        let catalog = MessageCatalog::open(temp.path(), "pl").unwrap();

        assert!(catalog.path().exists());
        assert_eq!(catalog.message("messages.no-permission", "fallback"), "fallback");
        assert!(!catalog.contains("messages.no-permission"));
    }

    #[test]
    fn test_lists_and_placeholders() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("messages_en.yml"),
            "help:\n  - \"/{label} reload\"\n  - \"/{label} ban <player>\"\nsingle: one\n",
        )
        .unwrap();

        let catalog = MessageCatalog::open(temp.path(), "en").unwrap();
        assert_eq!(
            catalog.message_list_with("help", &[], &[("label", "guard")]),
            vec!["/guard reload".to_string(), "/guard ban <player>".to_string()]
        );
        assert_eq!(catalog.message_list("single", &[]), vec!["one".to_string()]);
        assert_eq!(catalog.message_list("absent", &["a"]), vec!["a".to_string()]);
    }

    #[test]
    fn test_reload_switches_language() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("messages_de.yml"), "greeting: Hallo\n").unwrap();

        let mut catalog = MessageCatalog::open(temp.path(), "en").unwrap();
        assert_eq!(catalog.message("greeting", "Hello"), "Hello");

        catalog.reload("de").unwrap();
        assert_eq!(catalog.language(), "de");
        assert_eq!(catalog.message("greeting", "Hello"), "Hallo");
    }
}
