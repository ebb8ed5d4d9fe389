use super::model::DepreciationResponse;
use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of the response's JSON serialization
pub fn schedule_digest(response: &DepreciationResponse) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(response)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
