use chainbadge_types::AssetId;

/// The shareable link a participant opens to claim a badge.
///
/// `event_id` is inserted verbatim; callers pass URL-safe ids.
pub fn claim_url(base: &str, event_id: &str, asset_id: AssetId) -> String {
    format!(
        "{}/claim?event={event_id}&badge={asset_id}",
        base.trim_end_matches('/')
    )
}
