//! Asset creation requests and badge metadata.

use serde::{Deserialize, Serialize};

use crate::{Timestamp, TypesError, WalletAddress};

/// Ledger-assigned asset identifier.
pub type AssetId = u64;

/// Maximum asset name length in bytes.
pub const MAX_NAME_BYTES: usize = 32;
/// Maximum unit name length in bytes.
pub const MAX_UNIT_NAME_BYTES: usize = 8;
/// Maximum metadata URL length in bytes.
pub const MAX_URL_BYTES: usize = 96;

/// Unit name used for every badge asset.
pub const BADGE_UNIT_NAME: &str = "BADGE";
/// Metadata URL used until badges carry pinned metadata.
pub const PLACEHOLDER_METADATA_URL: &str = "ipfs://placeholder";

/// Parameters for creating one badge asset.
///
/// Badges are non-fungible by convention: `total_units == 1` and
/// `decimals == 0`. A request is built fresh per issuance and never
/// mutated after it is handed to the signer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreationRequest {
    pub name: String,
    pub unit_name: String,
    pub total_units: u64,
    pub decimals: u32,
    pub metadata_url: String,
    pub creator: WalletAddress,
}

impl AssetCreationRequest {
    pub fn new(
        name: impl Into<String>,
        unit_name: impl Into<String>,
        metadata_url: impl Into<String>,
        creator: WalletAddress,
    ) -> Self {
        Self {
            name: name.into(),
            unit_name: unit_name.into(),
            total_units: 1,
            decimals: 0,
            metadata_url: metadata_url.into(),
            creator,
        }
    }

    /// The request for an event badge of the given type, e.g. `"Participant"`.
    pub fn badge(event: &str, badge_type: &str, creator: WalletAddress) -> Self {
        Self::new(
            format!("{event} - {badge_type} Badge"),
            BADGE_UNIT_NAME,
            PLACEHOLDER_METADATA_URL,
            creator,
        )
    }

    /// Check the badge invariants and the ledger's field limits.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.total_units != 1 {
            return Err(TypesError::InvalidTotal(self.total_units));
        }
        if self.decimals != 0 {
            return Err(TypesError::InvalidDecimals(self.decimals));
        }
        if self.name.is_empty() {
            return Err(TypesError::Empty("name"));
        }
        if self.unit_name.is_empty() {
            return Err(TypesError::Empty("unit_name"));
        }
        check_len("name", &self.name, MAX_NAME_BYTES)?;
        check_len("unit_name", &self.unit_name, MAX_UNIT_NAME_BYTES)?;
        check_len("metadata_url", &self.metadata_url, MAX_URL_BYTES)?;
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), TypesError> {
    if value.len() > max {
        return Err(TypesError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// Descriptive metadata attached to an issued badge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeMetadata {
    pub name: String,
    pub description: String,
    pub event: String,
    #[serde(rename = "type")]
    pub badge_type: String,
    pub issued: Timestamp,
}

impl BadgeMetadata {
    pub fn new(event: &str, badge_type: &str, issued: Timestamp) -> Self {
        Self {
            name: format!("{event} - {badge_type} Badge"),
            description: format!("Official {badge_type} badge for {event}"),
            event: event.to_string(),
            badge_type: badge_type.to_string(),
            issued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> WalletAddress {
        WalletAddress::new("C".repeat(58))
    }

    #[test]
    fn new_request_is_single_unit() {
        let req = AssetCreationRequest::new("Conf2024-Participant", "BADGE", "", creator());
        assert_eq!(req.total_units, 1);
        assert_eq!(req.decimals, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn badge_naming() {
        let req = AssetCreationRequest::badge("RustConf", "Speaker", creator());
        assert_eq!(req.name, "RustConf - Speaker Badge");
        assert_eq!(req.unit_name, BADGE_UNIT_NAME);
        assert_eq!(req.metadata_url, PLACEHOLDER_METADATA_URL);
    }

    #[test]
    fn fungible_requests_rejected() {
        let mut req = AssetCreationRequest::new("X", "BADGE", "", creator());
        req.total_units = 10;
        assert_eq!(req.validate(), Err(TypesError::InvalidTotal(10)));

        let mut req = AssetCreationRequest::new("X", "BADGE", "", creator());
        req.decimals = 2;
        assert_eq!(req.validate(), Err(TypesError::InvalidDecimals(2)));
    }

    #[test]
    fn long_fields_rejected() {
        let req = AssetCreationRequest::new("N".repeat(33), "BADGE", "", creator());
        assert!(matches!(
            req.validate(),
            Err(TypesError::FieldTooLong { field: "name", .. })
        ));

        let req = AssetCreationRequest::new("ok", "TOOLONGUNIT", "", creator());
        assert!(matches!(
            req.validate(),
            Err(TypesError::FieldTooLong { field: "unit_name", .. })
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let req = AssetCreationRequest::new("", "BADGE", "", creator());
        assert_eq!(req.validate(), Err(TypesError::Empty("name")));
    }

    #[test]
    fn metadata_description() {
        let meta = BadgeMetadata::new("RustConf", "Speaker", Timestamp::new(5));
        assert_eq!(meta.description, "Official Speaker badge for RustConf");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"type\":\"Speaker\""));
    }
}
