use chainbadge_store::StoreError;
use chainbadge_types::AssetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("asset {0} is not a simulated badge")]
    NotSimulated(AssetId),

    #[error("simulated badge store error: {0}")]
    Store(#[from] StoreError),
}
