use std::collections::HashMap;
use crate::i18n::loader::{TranslationLoader, TranslationTable};
use crate::utils::{GameError, GameResult};
use tracing::{info, warn, error};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Maps any language tag onto a supported language: `ru*` is Russian,
/// everything else English.
pub fn normalize_language(tag: &str) -> &'static str {
    if tag.trim().to_ascii_lowercase().starts_with("ru") {
        "ru"
    } else {
        DEFAULT_LANGUAGE
    }
}

/// Key/value lookup of display strings with English fallback.
pub struct Translator {
    translations: HashMap<String, TranslationTable>,
    current_language: String,
    loader: Option<TranslationLoader>,
}

impl Translator {
    /// Translator backed by a directory of `<lang>.json` files.
    pub fn new(loader: TranslationLoader) -> Self {
        Self {
            translations: HashMap::new(),
            current_language: DEFAULT_LANGUAGE.to_string(),
            loader: Some(loader),
        }
    }

    /// Translator that only serves the tables compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            translations: HashMap::new(),
            current_language: DEFAULT_LANGUAGE.to_string(),
            loader: None,
        }
    }

    /// Switches language, loading its table on first use. The default
    /// language is always loaded alongside as the fallback table; its built-in
    /// copy is used only when reading it from disk fails.
    pub async fn set_language(&mut self, tag: &str) {
        let language = normalize_language(tag);
        self.current_language = language.to_string();

        let mut default_failed = false;
        if !self.translations.contains_key(language) {
            match self.fetch(language).await {
                Ok(table) => {
                    self.translations.insert(language.to_string(), table);
                }
                Err(e) => {
                    error!("Error loading translations for {}: {}", language, e);
                    default_failed = language == DEFAULT_LANGUAGE;
                }
            }
        }

        if !self.translations.contains_key(DEFAULT_LANGUAGE) {
            let table = if default_failed {
                None
            } else {
                match self.fetch(DEFAULT_LANGUAGE).await {
                    Ok(table) => Some(table),
                    Err(e) => {
                        error!("Error loading translations for {}: {}", DEFAULT_LANGUAGE, e);
                        None
                    }
                }
            };

            let table = table.or_else(|| {
                warn!("Using built-in {} translations", DEFAULT_LANGUAGE);
                TranslationLoader::builtin(DEFAULT_LANGUAGE)
            });
            if let Some(table) = table {
                self.translations.insert(DEFAULT_LANGUAGE.to_string(), table);
            }
        }

        info!("Language set to '{}' (requested '{}')", self.current_language, tag);
    }

    async fn fetch(&self, language: &str) -> GameResult<TranslationTable> {
        match &self.loader {
            Some(loader) => loader.load_language(language).await,
            None => TranslationLoader::builtin(language)
                .ok_or_else(|| GameError::translation(format!("No built-in translations for {}", language))),
        }
    }

    /// Looks `key` up in the current language, then English, then renders a
    /// visible placeholder. Each `(name, value)` replaces the first `%name%`.
    pub fn get_text(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let text = self
            .lookup(&self.current_language, key)
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Missing translation: {}", key));

        replacements.iter().fold(text, |text, (name, value)| {
            text.replacen(&format!("%{}%", name), value, 1)
        })
    }

    pub fn text(&self, key: &str) -> String {
        self.get_text(key, &[])
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.translations
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.translations.contains_key(language)
    }
}
