//! Profile store CRUD and selection
//!
//! Every mutation follows the same sequence: validate, back up the store
//! file (best-effort), modify in memory, atomic write. The store never
//! prints and never panics across the public boundary.

use std::path::{Path, PathBuf};

use crate::backup::backup_best_effort;
use crate::error::{CoreError, CoreResult};
use crate::proxy::{ProxyConfig, PROXY_PROFILE_ID, PROXY_PROFILE_NAME};
use crate::slug;
use crate::util::write_atomic;

use super::migrate;
use super::types::{AuthType, Profile, ProfileUpdate, StoreData};

/// Outcome of a successful store mutation
#[derive(Debug, Clone)]
pub struct Mutation {
    /// Id the mutation settled on (new id for renames)
    pub id: String,
    /// Backup written before the mutation, if one was taken
    pub backup_path: Option<PathBuf>,
}

/// The profile store: one JSON document plus its on-disk location
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    data: StoreData,
}

impl ProfileStore {
    /// Open the store, running the one-shot legacy migration if needed
    ///
    /// A missing store file yields an empty store; the file is only created
    /// on the first mutation (or by migration).
    ///
    /// # Errors
    /// Returns an error if an existing store or legacy file cannot be parsed.
    pub fn open(path: &Path, legacy_path: &Path) -> CoreResult<Self> {
        let data = migrate::load_or_migrate(path, legacy_path)?;
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Open without consulting any legacy store (tests, fresh installs)
    ///
    /// # Errors
    /// Returns an error if an existing store file cannot be parsed.
    pub fn open_current_only(path: &Path) -> CoreResult<Self> {
        Self::open(path, Path::new(""))
    }

    /// Id of the currently selected profile; `None` in official mode
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        if self.data.current_profile_id.is_empty() {
            None
        } else {
            Some(&self.data.current_profile_id)
        }
    }

    /// The currently selected profile, if any
    #[must_use]
    pub fn current(&self) -> Option<&Profile> {
        self.current_id().and_then(|id| self.data.profiles.get(id))
    }

    /// Look up a profile by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.data.profiles.get(id)
    }

    /// Resolve a target string to an id, matching id first then display name
    /// (case-insensitive)
    #[must_use]
    pub fn resolve(&self, target: &str) -> Option<String> {
        if self.data.profiles.contains_key(target) {
            return Some(target.to_string());
        }
        self.data
            .profiles
            .iter()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(target))
            .map(|(id, _)| id.clone())
    }

    /// All profiles in id order
    #[must_use]
    pub fn list(&self) -> Vec<(&str, &Profile)> {
        self.data
            .profiles
            .iter()
            .map(|(id, p)| (id.as_str(), p))
            .collect()
    }

    /// Number of stored profiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.profiles.len()
    }

    /// Whether the store holds no profiles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.profiles.is_empty()
    }

    /// Add a new profile; the first profile ever added becomes current
    ///
    /// # Errors
    /// `Validation` for bad shape, `Conflict` when the derived id or the
    /// display name (case-insensitive) already exists, `Io` on write failure.
    pub fn add(&mut self, profile: Profile) -> CoreResult<Mutation> {
        profile.validate()?;
        self.check_name_free(&profile.name, None)?;

        let id = slug::generate(&profile.name);
        if self.data.profiles.contains_key(&id) {
            return Err(CoreError::Conflict {
                name: profile.name,
                existing: id,
            });
        }

        let first = self.data.profiles.is_empty();
        self.data.profiles.insert(id.clone(), profile);
        if first {
            self.data.current_profile_id.clone_from(&id);
        }

        let backup_path = self.save()?;
        log::debug!("added profile '{id}'");
        Ok(Mutation { id, backup_path })
    }

    /// Apply a partial update; a name change recomputes the id
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Conflict` when the recomputed id or the
    /// new name collides with a different entry, `Validation` for bad shape.
    pub fn update(&mut self, id: &str, update: ProfileUpdate) -> CoreResult<Mutation> {
        let mut profile = self
            .data
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(auth_type) = update.auth_type {
            profile.auth_type = auth_type;
        }
        if let Some(credential) = update.credential {
            profile.credential = Some(credential);
        }
        if update.clear_endpoint {
            profile.endpoint = None;
        } else if let Some(endpoint) = update.endpoint {
            profile.endpoint = Some(endpoint);
        }
        profile.validate()?;
        self.check_name_free(&profile.name, Some(id))?;

        // The reserved proxy id is pinned; everything else follows the name.
        let new_id = if id == PROXY_PROFILE_ID {
            id.to_string()
        } else {
            slug::generate(&profile.name)
        };
        if new_id != id && self.data.profiles.contains_key(&new_id) {
            return Err(CoreError::Conflict {
                name: profile.name,
                existing: new_id,
            });
        }

        self.data.profiles.remove(id);
        self.data.profiles.insert(new_id.clone(), profile);
        if self.data.current_profile_id == id {
            self.data.current_profile_id.clone_from(&new_id);
        }

        let backup_path = self.save()?;
        Ok(Mutation {
            id: new_id,
            backup_path,
        })
    }

    /// Delete a profile; repairs the current pointer if it pointed here
    ///
    /// The replacement is the lexicographically smallest remaining id.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `LastProfile` when this is the only
    /// remaining profile.
    pub fn delete(&mut self, id: &str) -> CoreResult<Mutation> {
        if !self.data.profiles.contains_key(id) {
            return Err(CoreError::NotFound(id.to_string()));
        }
        if self.data.profiles.len() == 1 {
            return Err(CoreError::LastProfile);
        }

        self.data.profiles.remove(id);
        self.repair_current(id);

        let backup_path = self.save()?;
        log::debug!("deleted profile '{id}'");
        Ok(Mutation {
            id: id.to_string(),
            backup_path,
        })
    }

    /// Delete several profiles atomically
    ///
    /// Checked up front: fails without deleting anything if any id is
    /// missing or if nothing would remain.
    ///
    /// # Errors
    /// `NotFound`, `LastProfile`, or `Io` on write failure.
    pub fn delete_many(&mut self, ids: &[String]) -> CoreResult<Option<PathBuf>> {
        for id in ids {
            if !self.data.profiles.contains_key(id) {
                return Err(CoreError::NotFound(id.clone()));
            }
        }
        let distinct: std::collections::BTreeSet<&String> = ids.iter().collect();
        if distinct.len() >= self.data.profiles.len() {
            return Err(CoreError::LastProfile);
        }

        for id in &distinct {
            self.data.profiles.remove(id.as_str());
        }
        // Official mode (empty pointer) stays deselected.
        if !self.data.current_profile_id.is_empty()
            && !self
                .data
                .profiles
                .contains_key(&self.data.current_profile_id)
        {
            self.repair_current(&self.data.current_profile_id.clone());
        }

        self.save()
    }

    /// Select a profile; no-op success if already current
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Io` on write failure.
    pub fn switch(&mut self, id: &str) -> CoreResult<Mutation> {
        if !self.data.profiles.contains_key(id) {
            return Err(CoreError::NotFound(id.to_string()));
        }
        if self.data.current_profile_id == id {
            return Ok(Mutation {
                id: id.to_string(),
                backup_path: None,
            });
        }

        self.data.current_profile_id = id.to_string();
        let backup_path = self.save()?;
        Ok(Mutation {
            id: id.to_string(),
            backup_path,
        })
    }

    /// Clear the selection (official mode); always succeeds
    ///
    /// A missing store is treated as already-default and nothing is written.
    ///
    /// # Errors
    /// `Io` on write failure.
    pub fn switch_to_default(&mut self) -> CoreResult<Option<PathBuf>> {
        if self.data.current_profile_id.is_empty() {
            return Ok(None);
        }
        self.data.current_profile_id.clear();
        self.save()
    }

    /// Reconcile the reserved proxy profile against the proxy's own config
    ///
    /// With no proxy config the reserved profile is removed (current pointer
    /// repaired, last-profile rule deliberately not applied: the entry only
    /// mirrors external state). With a config present the profile is created
    /// or overwritten in place; its id is pinned and never renamed.
    ///
    /// # Errors
    /// `Io` on write failure.
    pub fn sync_proxy_profile(&mut self, proxy: Option<&ProxyConfig>) -> CoreResult<Option<PathBuf>> {
        match proxy {
            None => {
                if self.data.profiles.remove(PROXY_PROFILE_ID).is_none() {
                    return Ok(None);
                }
                log::debug!("proxy config gone, removed reserved profile");
                self.repair_current(PROXY_PROFILE_ID);
                self.save()
            }
            Some(config) => {
                let desired = Profile {
                    name: PROXY_PROFILE_NAME.to_string(),
                    auth_type: AuthType::Proxy,
                    credential: Some(config.key().to_string()),
                    endpoint: Some(config.endpoint()),
                };
                if self.data.profiles.get(PROXY_PROFILE_ID) == Some(&desired) {
                    return Ok(None);
                }
                self.data
                    .profiles
                    .insert(PROXY_PROFILE_ID.to_string(), desired);
                self.save()
            }
        }
    }

    /// Raw access to the persisted document (read-only)
    #[must_use]
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    fn check_name_free(&self, name: &str, allow_id: Option<&str>) -> CoreResult<()> {
        for (id, existing) in &self.data.profiles {
            if Some(id.as_str()) == allow_id {
                continue;
            }
            if existing.name.eq_ignore_ascii_case(name) {
                return Err(CoreError::Conflict {
                    name: name.to_string(),
                    existing: id.clone(),
                });
            }
        }
        Ok(())
    }

    fn repair_current(&mut self, deleted_id: &str) {
        if self.data.current_profile_id != deleted_id {
            return;
        }
        self.data.current_profile_id = self
            .data
            .profiles
            .keys()
            .next()
            .cloned()
            .unwrap_or_default();
    }

    fn save(&self) -> CoreResult<Option<PathBuf>> {
        let backup_path = backup_best_effort(&self.path);
        let json = serde_json::to_string_pretty(&self.data)?;
        write_atomic(&self.path, &json)?;
        Ok(backup_path)
    }
}
