use {
    crate::domain::error::PaymentError,
    hmac::{Hmac, Mac},
    sha2::Sha256,
};

type HmacSha256 = Hmac<Sha256>;

/// Headers the gateway may carry the signature in, checked in order.
pub const SIGNATURE_HEADERS: [&str; 2] = ["x-chapa-signature", "chapa-signature"];

/// Hex HMAC-SHA256 of `body` keyed by `secret`.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| PaymentError::WebhookSignature(format!("invalid secret: {e}")))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex signature over the raw body.
pub fn verify(secret: &[u8], body: &[u8], signature: &str) -> Result<(), PaymentError> {
    let expected = hex::decode(signature.trim())
        .map_err(|_| PaymentError::WebhookSignature("signature is not valid hex".into()))?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| PaymentError::WebhookSignature(format!("invalid secret: {e}")))?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| PaymentError::WebhookSignature("signature mismatch".into()))
}
