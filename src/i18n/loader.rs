use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use crate::utils::{GameError, GameResult};
use tracing::{info, warn, debug};

/// Display strings of one language, keyed by message id.
pub type TranslationTable = HashMap<String, String>;

const BUILTIN_EN: &str = include_str!("../../assets/translations/webapp/en.json");
const BUILTIN_RU: &str = include_str!("../../assets/translations/webapp/ru.json");

/// Reads `<dir>/<language>.json` string tables.
pub struct TranslationLoader {
    translations_directory: PathBuf,
}

impl TranslationLoader {
    pub fn new<P: AsRef<Path>>(translations_directory: P) -> Self {
        Self {
            translations_directory: translations_directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.translations_directory
    }

    pub async fn load_language(&self, language: &str) -> GameResult<TranslationTable> {
        let path = self.translations_directory.join(format!("{}.json", language));

        debug!("Loading translations from: {:?}", path);

        if !path.exists() {
            return Err(GameError::translation(format!("Translation file not found: {}", language)));
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| GameError::translation(format!("Failed to read translation file: {}", e)))?;

        let table: TranslationTable = serde_json::from_str(&content)
            .map_err(|e| GameError::translation(format!("Failed to parse translation JSON: {}", e)))?;

        info!("Loaded {} strings for language '{}'", table.len(), language);
        Ok(table)
    }

    pub async fn list_available_languages(&self) -> GameResult<Vec<String>> {
        if !self.translations_directory.exists() {
            warn!("Translations directory does not exist: {:?}", self.translations_directory);
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.translations_directory)
            .await
            .map_err(|e| GameError::translation(format!("Failed to read translations directory: {}", e)))?;

        let mut languages = Vec::new();

        while let Some(entry) = entries.next_entry().await
            .map_err(|e| GameError::translation(format!("Failed to read directory entry: {}", e)))? {

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    languages.push(stem.to_string());
                }
            }
        }

        languages.sort();
        Ok(languages)
    }

    /// Tables compiled into the binary, used when nothing can be read from disk.
    pub fn builtin(language: &str) -> Option<TranslationTable> {
        let source = match language {
            "en" => BUILTIN_EN,
            "ru" => BUILTIN_RU,
            _ => return None,
        };
        serde_json::from_str(source).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_language() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("en.json"), r#"{"game_over": "Game Over!"}"#).unwrap();

        let loader = TranslationLoader::new(temp_dir.path());
        let table = loader.load_language("en").await.unwrap();

        assert_eq!(table.get("game_over").map(String::as_str), Some("Game Over!"));
        assert!(loader.load_language("ru").await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("en.json"), "not json").unwrap();

        let loader = TranslationLoader::new(temp_dir.path());
        let error = loader.load_language("en").await.unwrap_err();
        assert!(matches!(error, GameError::Translation { .. }));
    }

    #[tokio::test]
    async fn test_list_available_languages() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("ru.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("en.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let loader = TranslationLoader::new(temp_dir.path());
        assert_eq!(loader.list_available_languages().await.unwrap(), vec!["en", "ru"]);

        let missing = TranslationLoader::new(temp_dir.path().join("missing"));
        assert!(missing.list_available_languages().await.unwrap().is_empty());
    }

    #[test]
    fn test_builtin_tables_share_keys() {
        let en = TranslationLoader::builtin("en").unwrap();
        let ru = TranslationLoader::builtin("ru").unwrap();

        let mut en_keys: Vec<_> = en.keys().collect();
        let mut ru_keys: Vec<_> = ru.keys().collect();
        en_keys.sort();
        ru_keys.sort();
        assert_eq!(en_keys, ru_keys);
        assert!(TranslationLoader::builtin("de").is_none());
    }
}
