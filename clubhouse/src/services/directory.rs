//! Clubs, halls, users and bookings the access checks are evaluated against.
//!
//! Storage is out of scope for the access layer; the server only needs to look
//! up who owns a booking and which club a hall belongs to. `InMemoryDirectory`
//! is the only backend and can be seeded from a YAML file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubhouse_core::authorization::{ClubId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub type HallId = u64;
pub type BookingId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hall {
    pub id: HallId,
    pub club_id: ClubId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub hall_id: HallId,
    pub seat: String,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Initial directory content
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub clubs: Vec<Club>,
    #[serde(default)]
    pub halls: Vec<Hall>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[async_trait]
pub trait Directory: Send + Sync + std::fmt::Debug {
    async fn club(&self, id: ClubId) -> Option<Club>;
    async fn update_club(&self, id: ClubId, update: ClubUpdate) -> Result<Option<Club>>;
    async fn hall(&self, id: HallId) -> Option<Hall>;
    async fn booking(&self, id: BookingId) -> Option<Booking>;
    async fn user(&self, id: UserId) -> Option<UserProfile>;
    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<Option<UserProfile>>;

    /// Club a booking takes place in, resolved through its hall
    async fn booking_club_id(&self, booking: &Booking) -> Option<ClubId> {
        self.hall(booking.hall_id).await.map(|hall| hall.club_id)
    }
}

#[derive(Debug, Default)]
struct Entries {
    clubs: BTreeMap<ClubId, Club>,
    halls: BTreeMap<HallId, Hall>,
    users: BTreeMap<UserId, UserProfile>,
    bookings: BTreeMap<BookingId, Booking>,
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    entries: RwLock<Entries>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: DirectorySeed) -> Self {
        let entries = Entries {
            clubs: seed.clubs.into_iter().map(|c| (c.id, c)).collect(),
            halls: seed.halls.into_iter().map(|h| (h.id, h)).collect(),
            users: seed.users.into_iter().map(|u| (u.id, u)).collect(),
            bookings: seed.bookings.into_iter().map(|b| (b.id, b)).collect(),
        };

        for hall in entries.halls.values() {
            if !entries.clubs.contains_key(&hall.club_id) {
                warn!(
                    "Hall {} references unknown club {}",
                    hall.id, hall.club_id
                );
            }
        }

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Load a seed file; a missing file yields an empty directory
    pub async fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            warn!("Directory seed not found at {}, starting empty", path);
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .context("Failed to read directory seed")?;
        let seed: DirectorySeed =
            serde_norway::from_str(&content).context("Failed to parse directory seed")?;

        info!(
            "Directory seeded with {} clubs, {} halls, {} users, {} bookings",
            seed.clubs.len(),
            seed.halls.len(),
            seed.users.len(),
            seed.bookings.len()
        );
        Ok(Self::from_seed(seed))
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn club(&self, id: ClubId) -> Option<Club> {
        self.entries.read().await.clubs.get(&id).cloned()
    }

    async fn update_club(&self, id: ClubId, update: ClubUpdate) -> Result<Option<Club>> {
        let mut entries = self.entries.write().await;
        let Some(club) = entries.clubs.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            club.name = name;
        }
        if let Some(description) = update.description {
            club.description = Some(description);
        }
        Ok(Some(club.clone()))
    }

    async fn hall(&self, id: HallId) -> Option<Hall> {
        self.entries.read().await.halls.get(&id).cloned()
    }

    async fn booking(&self, id: BookingId) -> Option<Booking> {
        self.entries.read().await.bookings.get(&id).cloned()
    }

    async fn user(&self, id: UserId) -> Option<UserProfile> {
        self.entries.read().await.users.get(&id).cloned()
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<Option<UserProfile>> {
        let mut entries = self.entries.write().await;
        let Some(user) = entries.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        Ok(Some(user.clone()))
    }
}
