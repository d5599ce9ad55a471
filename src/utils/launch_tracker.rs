use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::UserProfile;
use crate::utils::{GameError, GameResult};
use tracing::{info, warn, debug};

/// What the registry remembers about one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub record_id: Uuid,
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_premium: bool,
    pub launched_app: bool,
    pub first_seen: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserRegistry {
    users: Vec<UserRecord>,
}

/// Records app launches in a JSON user registry.
///
/// Failures never reach the game: callers either handle the `GameResult`
/// or use [`LaunchTracker::track_in_background`], which only logs them.
pub struct LaunchTracker {
    registry_path: PathBuf,
    write_lock: Mutex<()>,
}

impl LaunchTracker {
    pub fn new<P: AsRef<Path>>(registry_path: P) -> Self {
        Self {
            registry_path: registry_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create_or_update_user(&self, profile: &UserProfile, launched: bool) -> GameResult<UserRecord> {
        let user_id = profile
            .id
            .ok_or_else(|| GameError::analytics("Profile has no user id"))?;

        let _guard = self.write_lock.lock().await;
        let mut registry = self.read_registry().await?;
        let now = Utc::now();

        let record = match registry.users.iter_mut().find(|u| u.user_id == user_id) {
            Some(existing) => {
                existing.username = profile.username.clone().or(existing.username.take());
                existing.first_name = profile.first_name.clone().or(existing.first_name.take());
                existing.last_name = profile.last_name.clone().or(existing.last_name.take());
                existing.language_code = profile.language_code.clone().or(existing.language_code.take());
                existing.is_premium = profile.is_premium;
                existing.launched_app |= launched;
                existing.last_interaction = now;
                debug!("Updated user {}", user_id);
                existing.clone()
            }
            None => {
                let record = UserRecord {
                    record_id: Uuid::new_v4(),
                    user_id,
                    username: profile.username.clone(),
                    first_name: profile.first_name.clone(),
                    last_name: profile.last_name.clone(),
                    language_code: profile.language_code.clone(),
                    is_premium: profile.is_premium,
                    launched_app: launched,
                    first_seen: now,
                    last_interaction: now,
                };
                registry.users.push(record.clone());
                debug!("Registered user {}", user_id);
                record
            }
        };

        self.write_registry(&registry).await?;
        Ok(record)
    }

    /// Flags an already known user as having launched the app.
    /// Returns `false` when the user is unknown.
    pub async fn mark_launched(&self, user_id: i64) -> GameResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut registry = self.read_registry().await?;

        let Some(user) = registry.users.iter_mut().find(|u| u.user_id == user_id) else {
            return Ok(false);
        };
        user.launched_app = true;
        user.last_interaction = Utc::now();

        self.write_registry(&registry).await?;
        Ok(true)
    }

    pub async fn track_launch(&self, profile: &UserProfile) -> GameResult<UserRecord> {
        let record = self.create_or_update_user(profile, true).await?;
        info!("Launch tracked for user {}", record.user_id);
        Ok(record)
    }

    /// Fire-and-forget launch tracking.
    pub fn track_in_background(self: Arc<Self>, profile: UserProfile) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.track_launch(&profile).await {
                warn!("Error tracking launch: {}", e);
            }
        })
    }

    pub async fn get_user(&self, user_id: i64) -> GameResult<Option<UserRecord>> {
        let registry = self.read_registry().await?;
        Ok(registry.users.into_iter().find(|u| u.user_id == user_id))
    }

    pub async fn launched_user_count(&self) -> GameResult<usize> {
        let registry = self.read_registry().await?;
        Ok(registry.users.iter().filter(|u| u.launched_app).count())
    }

    async fn read_registry(&self) -> GameResult<UserRegistry> {
        if !self.registry_path.exists() {
            return Ok(UserRegistry::default());
        }

        let content = fs::read_to_string(&self.registry_path)
            .await
            .map_err(|e| GameError::analytics(format!("Failed to read user registry: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| GameError::analytics(format!("Failed to parse user registry: {}", e)))
    }

    async fn write_registry(&self, registry: &UserRegistry) -> GameResult<()> {
        if let Some(parent) = self.registry_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GameError::analytics(format!("Failed to create registry directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(registry)
            .map_err(|e| GameError::analytics(format!("Failed to serialize user registry: {}", e)))?;

        fs::write(&self.registry_path, json)
            .await
            .map_err(|e| GameError::analytics(format!("Failed to write user registry: {}", e)))?;

        Ok(())
    }
}
