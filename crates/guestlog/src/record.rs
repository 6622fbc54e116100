//! Core visit types for guestlog.
//!
//! This module defines the persisted [`VisitRecord`] and the [`SignInRequest`]
//! a kiosk submits to create one. Field names on the wire are camelCase and
//! must not change; existing logs depend on them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::normalize::make_key;

/// Why a guest is visiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitReason {
    /// Scheduled meeting with staff.
    Meeting,
    /// Dropping off or picking up a delivery.
    Delivery,
    /// Job interview.
    Interview,
    /// Anything else; requires free-text details.
    Other,
}

impl VisitReason {
    /// Every reason, in the order a sign-in form lists them.
    pub const ALL: [Self; 4] = [Self::Meeting, Self::Delivery, Self::Interview, Self::Other];

    /// The label used on the wire and in exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "Meeting",
            Self::Delivery => "Delivery",
            Self::Interview => "Interview",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for VisitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitReason {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let accepted: Vec<&str> = Self::ALL.into_iter().map(Self::as_str).collect();
                Error::validation(format!(
                    "unknown visit reason '{wanted}'; choose one of {}",
                    accepted.join(", ")
                ))
            })
    }
}

/// Input for a sign-in, as typed at the kiosk.
///
/// Fields are raw; [`SignInRequest::validate`] trims before checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    /// Guest's first name.
    pub first_name: String,
    /// Guest's last name.
    pub last_name: String,
    /// Organization or institution the guest represents.
    pub agency: String,
    /// Reason for the visit.
    pub reason: VisitReason,
    /// Details, required when `reason` is [`VisitReason::Other`].
    pub other_details: String,
}

impl SignInRequest {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(Error::validation("first name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(Error::validation("last name is required"));
        }
        if self.agency.trim().is_empty() {
            return Err(Error::validation("agency or institution is required"));
        }
        if self.reason == VisitReason::Other && self.other_details.trim().is_empty() {
            return Err(Error::validation(
                "please describe the reason for your visit",
            ));
        }
        Ok(())
    }
}

/// One guest visit.
///
/// A record is open while `sign_out_at` is `None`. Closing happens once, either
/// by an explicit sign-out or by the auto-close policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// Unique identifier assigned at creation.
    pub id: String,

    /// First name as entered, trimmed.
    pub first_name: String,

    /// Last name as entered, trimmed.
    pub last_name: String,

    /// Organization or institution.
    pub agency: String,

    /// Reason for the visit.
    pub reason: VisitReason,

    /// Free-text details; empty unless `reason` is `Other`.
    #[serde(default)]
    pub other_details: String,

    /// When the guest signed in.
    pub sign_in_at: DateTime<Utc>,

    /// When the visit was closed. Stored as `""` while open.
    #[serde(default, with = "sign_out_format")]
    pub sign_out_at: Option<DateTime<Utc>>,

    /// Whether the auto-close policy, not the guest, closed this visit.
    #[serde(default)]
    pub auto_signed_out: bool,

    /// Canonical name key used for sign-out matching. Never displayed.
    pub name_key: String,
}

impl VisitRecord {
    /// Build a fresh open record from a sign-in request.
    ///
    /// The request is expected to have passed [`SignInRequest::validate`].
    #[must_use]
    pub fn new(request: &SignInRequest, now: DateTime<Utc>) -> Self {
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let other_details = if request.reason == VisitReason::Other {
            request.other_details.trim().to_string()
        } else {
            String::new()
        };
        let name_key = make_key(&first_name, &last_name);

        Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            agency: request.agency.trim().to_string(),
            reason: request.reason,
            other_details,
            sign_in_at: now,
            sign_out_at: None,
            auto_signed_out: false,
            name_key,
        }
    }

    /// Check if the visit has not been closed yet.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sign_out_at.is_none()
    }

    /// Close the visit at `at`.
    ///
    /// Returns `false` and leaves the record untouched if it was already closed.
    pub fn close(&mut self, at: DateTime<Utc>, automatic: bool) -> bool {
        if !self.is_open() {
            return false;
        }
        self.sign_out_at = Some(at);
        self.auto_signed_out = automatic;
        true
    }

    /// Guest's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match over the displayed fields.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_filter(&self, needle: &str) -> bool {
        let haystack = format!(
            "{} {} {} {} {}",
            self.first_name, self.last_name, self.agency, self.reason, self.other_details
        )
        .to_lowercase();
        haystack.contains(needle)
    }
}

/// Sign-out timestamps: empty string while open, RFC 3339 once closed.
///
/// Loading also tolerates `null` and an absent field.
mod sign_out_format {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => ts.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(de::Error::custom),
        }
    }
}
