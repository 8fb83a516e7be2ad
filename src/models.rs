//! Data models for scraped news articles, server status and health reports.
//!
//! This module defines the records returned by the API:
//! - [`Article`]: One news teaser scraped from the paginated news listing
//! - [`Region`], [`ServerStatus`], [`ServerEntry`]: Server status per region
//! - [`RegionStatuses`]: Region-ordered mapping serialized as a JSON object
//! - [`HealthReport`]: Composite API / upstream health
//!
//! Everything here lives for a single request; nothing is persisted.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A news article teaser as scraped from one "slot module" block.
///
/// All four fields are required; blocks missing any of them are dropped
/// during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Absolute URL of the full article.
    pub link: String,
    pub title: String,
    pub category: String,
    pub description: String,
}

impl Article {
    /// Trim leading and trailing whitespace on every field, in place.
    pub fn trim_fields(&mut self) {
        for field in [
            &mut self.link,
            &mut self.title,
            &mut self.category,
            &mut self.description,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }
}

/// One of the five server clusters listed on the status page.
///
/// The string form is the `data-regionid` attribute value used upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    WesternAmericas,
    EasternAmericas,
    SouthAmerica,
    Europe,
    JapanOceania,
}

impl Region {
    /// All regions, in the order they are reported.
    pub const ALL: [Region; 5] = [
        Region::WesternAmericas,
        Region::EasternAmericas,
        Region::SouthAmerica,
        Region::Europe,
        Region::JapanOceania,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Region::WesternAmericas => "western-americas",
            Region::EasternAmericas => "eastern-americas",
            Region::SouthAmerica => "south-america",
            Region::Europe => "europe",
            Region::JapanOceania => "japan-oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string is not one of the five region identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.id() == s)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Operational state of a game server, as encoded by its status icon color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ServerStatus {
    Good,
    Busy,
    Full,
    #[serde(rename = "In-Maintenance")]
    InMaintenance,
    Unknown,
}

/// A single server row within a region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerEntry {
    pub name: String,
    pub status: ServerStatus,
}

/// Server entries grouped by region, in [`Region::ALL`] order.
///
/// Serializes as a JSON object keyed by region id. Regions whose container
/// was not found on the page are simply absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegionStatuses(pub Vec<(Region, Vec<ServerEntry>)>);

impl RegionStatuses {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl RegionStatuses {
    pub fn get(&self, region: Region) -> Option<&[ServerEntry]> {
        self.0
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, entries)| entries.as_slice())
    }
}

impl Serialize for RegionStatuses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (region, entries) in &self.0 {
            map.serialize_entry(region.id(), entries)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComponentHealth {
    pub status: HealthState,
    pub message: String,
}

/// Response body of `GET /health`.
///
/// `status` is healthy only when both components are healthy. The API
/// component is always healthy when the process can answer at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthReport {
    pub status: HealthState,
    pub api: ComponentHealth,
    pub throne_and_liberty: ComponentHealth,
}

impl HealthReport {
    pub fn new(api: ComponentHealth, throne_and_liberty: ComponentHealth) -> Self {
        let status = if api.status == HealthState::Healthy
            && throne_and_liberty.status == HealthState::Healthy
        {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };
        Self {
            status,
            api,
            throne_and_liberty,
        }
    }
}
