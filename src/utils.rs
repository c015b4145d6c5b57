/// Generates an opaque custom id from 16 random bytes, hex encoded.
#[inline]
pub fn random_custom_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
