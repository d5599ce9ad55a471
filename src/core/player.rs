use serde::{Deserialize, Serialize};

/// Identity of the person launching the game, as supplied by the host shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

impl UserProfile {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn with_username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name<S: Into<String>>(mut self, first_name: S) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_language<S: Into<String>>(mut self, language_code: S) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    /// Username, else first name, else "Guest". Blank values are skipped.
    pub fn display_name(&self) -> &str {
        [self.username.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or("Guest")
    }

    pub fn is_identified(&self) -> bool {
        self.id.is_some()
    }

    pub fn language_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.language_code.as_deref().unwrap_or(fallback)
    }
}
