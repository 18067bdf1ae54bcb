//! Donor and donation records as exchanged with the remote API.
//!
//! The server owns these records; the types here only mirror what its JSON
//! looks like. Field names follow the wire format through serde renames.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered blood donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Identifier assigned by the store.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Donor name.
    pub name: String,

    /// Blood group token, such as `A+`.
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// City of residence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Donor {
    /// Label used by the donation form's donor selector.
    #[must_use]
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.blood_group)
    }
}

/// Payload for creating a donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonor {
    /// Donor name.
    pub name: String,

    /// Blood group token.
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// City of residence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Denormalized donor details embedded in a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorSummary {
    /// Identifier of the donor, when the server includes it.
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Donor name, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Blood group, when the server includes it.
    #[serde(
        rename = "bloodGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub blood_group: Option<String>,
}

/// How a donation refers to its donor.
///
/// Servers that expand the reference send an object; otherwise the bare id.
/// Anything else is kept as raw JSON so one odd row cannot fail a whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DonorRef {
    /// Expanded donor details.
    Summary(DonorSummary),
    /// Unexpanded donor identifier.
    Id(String),
    /// Unrecognised reference.
    Other(serde_json::Value),
}

/// A single recorded donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Identifier assigned by the store.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// The donor who gave, if the server resolved the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor: Option<DonorRef>,

    /// Units given.
    #[serde(deserialize_with = "wire::quantity")]
    pub quantity: u32,

    /// Day of the donation; `None` when absent or unreadable.
    #[serde(default, deserialize_with = "wire::date")]
    pub date: Option<NaiveDate>,

    /// Where the donation took place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Donation {
    /// Name from the embedded donor summary.
    #[must_use]
    pub fn donor_name(&self) -> Option<&str> {
        match &self.donor {
            Some(DonorRef::Summary(summary)) => summary.name.as_deref(),
            Some(DonorRef::Id(_) | DonorRef::Other(_)) | None => None,
        }
    }
}

/// Payload for recording a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonation {
    /// Identifier of the donor who gave.
    #[serde(rename = "donorId")]
    pub donor_id: String,

    /// Units given, at least 1.
    pub quantity: u32,

    /// Day of the donation, sent as `YYYY-MM-DD`.
    pub date: NaiveDate,

    /// Where the donation took place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of the delete-donor request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDonor {
    /// Identifier of the donor to remove.
    pub id: String,
}

/// Reply to every write operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    /// Server summary of the outcome.
    #[serde(default)]
    pub status: Option<String>,
}

/// Lenient decoders for fields that different backends encode differently.
mod wire {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error as _, Deserialize, Deserializer};
    use tracing::warn;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Number(u32),
        Text(String),
    }

    /// Accept `3` as well as `"3"`; form inputs often post numbers as text.
    pub(super) fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Quantity::deserialize(deserializer)? {
            Quantity::Number(n) => Ok(n),
            Quantity::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid quantity: {s:?}"))),
        }
    }

    /// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp (UTC date is kept).
    ///
    /// Null, non-string and unparseable values decode to `None`.
    pub(super) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) => raw,
            serde_json::Value::Null => return Ok(None),
            other => {
                warn!(value = %other, "ignoring non-text donation date");
                return Ok(None);
            }
        };
        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Ok(Some(ts.naive_utc().date())),
            Err(_) => {
                warn!(value = %raw, "ignoring unreadable donation date");
                Ok(None)
            }
        }
    }
}
