pub mod loader;
pub mod translator;

pub use loader::{TranslationLoader, TranslationTable};
pub use translator::{normalize_language, Translator, DEFAULT_LANGUAGE};
