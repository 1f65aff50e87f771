//! File-backed subscription store
//!
//! Subscriptions live in a single JSON or TOML file (picked by extension)
//! holding a `subscriptions` list of records. Writes go through a temp file
//! in the same directory and are renamed into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{NewSubscription, Subscription, SubscriptionPatch, SubscriptionRecord};

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Toml,
}

impl StoreFormat {
    /// `.toml` is TOML, anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    subscriptions: Vec<SubscriptionRecord>,
}

/// Subscription list persisted to a file
///
/// Edits work on the stored records, so rows that only degrade for display
/// (unknown cadences, unparseable dates) are written back exactly as read.
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    path: PathBuf,
}

impl SubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        StoreFormat::from_path(&self.path)
    }

    /// Load all subscriptions. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<Subscription>> {
        Ok(self
            .load_records()?
            .into_iter()
            .map(Subscription::from)
            .collect())
    }

    /// Replace the stored list
    pub fn save(&self, subscriptions: &[Subscription]) -> Result<()> {
        let records: Vec<SubscriptionRecord> = subscriptions
            .iter()
            .cloned()
            .map(SubscriptionRecord::from)
            .collect();
        self.save_records(&records)
    }

    /// Store a new subscription under the next free numeric id
    pub fn add(&self, new: NewSubscription) -> Result<Subscription> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Subscription name is required".to_string()));
        }
        validate_price(new.price)?;

        let mut records = self.load_records()?;
        let next_id = records
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        let subscription = Subscription {
            id: next_id.to_string(),
            name: name.to_string(),
            category: new.category.trim().to_string(),
            price: new.price,
            billing_cycle: new.billing_cycle,
            anchor: new.anchor,
            is_active: true,
            link: new.link,
            logo: None,
        };

        records.push(SubscriptionRecord::from(subscription.clone()));
        self.save_records(&records)?;
        Ok(subscription)
    }

    /// Delete by id or name, returning the removed subscription
    pub fn remove(&self, id_or_name: &str) -> Result<Subscription> {
        let mut records = self.load_records()?;
        let index = find_record(&records, id_or_name)?;
        let removed = records.remove(index);
        self.save_records(&records)?;
        Ok(Subscription::from(removed))
    }

    /// Pause (inactive) or resume (active) by id or name
    pub fn set_active(&self, id_or_name: &str, is_active: bool) -> Result<Subscription> {
        self.update(
            id_or_name,
            &SubscriptionPatch {
                is_active: Some(is_active),
                ..SubscriptionPatch::default()
            },
        )
    }

    /// Change the fields named in `patch` on one subscription
    pub fn update(&self, id_or_name: &str, patch: &SubscriptionPatch) -> Result<Subscription> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidData("Subscription name is required".to_string()));
            }
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        let mut records = self.load_records()?;
        let index = find_record(&records, id_or_name)?;
        records[index].apply(patch);
        let updated = Subscription::from(records[index].clone());
        self.save_records(&records)?;
        Ok(updated)
    }

    fn load_records(&self) -> Result<Vec<SubscriptionRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file missing, starting empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: StoreFile = match self.format() {
            StoreFormat::Json => serde_json::from_str(&content)?,
            StoreFormat::Toml => toml::from_str(&content)?,
        };

        for record in &file.subscriptions {
            if !record.price.is_finite() || record.price < 0.0 {
                warn!(
                    id = %record.id,
                    price = record.price,
                    "Stored price is not a non-negative number"
                );
            }
        }

        debug!(
            path = %self.path.display(),
            count = file.subscriptions.len(),
            "Loaded subscriptions"
        );
        Ok(file.subscriptions)
    }

    fn save_records(&self, records: &[SubscriptionRecord]) -> Result<()> {
        let file = StoreFile {
            subscriptions: records.to_vec(),
        };
        let content = match self.format() {
            StoreFormat::Json => serde_json::to_string_pretty(&file)?,
            StoreFormat::Toml => toml::to_string_pretty(&file)?,
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        info!(
            path = %self.path.display(),
            count = records.len(),
            "Saved subscriptions"
        );
        Ok(())
    }
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidData(format!(
            "Price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}

fn find_record(records: &[SubscriptionRecord], id_or_name: &str) -> Result<usize> {
    records
        .iter()
        .position(|r| r.id == id_or_name)
        .or_else(|| {
            records
                .iter()
                .position(|r| r.name.eq_ignore_ascii_case(id_or_name.trim()))
        })
        .ok_or_else(|| Error::NotFound(format!("Subscription not found: {}", id_or_name)))
}

/// Position of a subscription by exact id, else case-insensitive name
pub fn find(subscriptions: &[Subscription], id_or_name: &str) -> Option<usize> {
    subscriptions
        .iter()
        .position(|s| s.id == id_or_name)
        .or_else(|| {
            subscriptions
                .iter()
                .position(|s| s.name.eq_ignore_ascii_case(id_or_name.trim()))
        })
}
