use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Stateless CSRF tokens: hex(HMAC-SHA256(secret, session id)).
pub struct CsrfService {
    keyed: HmacSha256,
}

impl CsrfService {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let keyed = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|e| AppError::Internal(format!("Invalid CSRF secret: {}", e)))?;
        Ok(Self { keyed })
    }

    fn mac(&self, session_id: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(session_id.as_bytes());
        mac
    }

    pub fn generate_token(&self, session_id: &str) -> String {
        hex::encode(self.mac(session_id).finalize().into_bytes())
    }

    pub fn validate_token(&self, session_id: &str, token: &str) -> bool {
        let Ok(provided) = hex::decode(token) else {
            return false;
        };
        let expected = self.mac(session_id).finalize().into_bytes();
        expected.as_slice().ct_eq(&provided).into()
    }
}
