//! Key-ladder secure key (KLAD) envelope and unwrap interface
//!
//! A secure key never exposes usable key material to software: it is a chain
//! of up to three encrypted key blobs (`ek1 || ek2 || ek3`) that the hardware
//! key ladder unwraps stage by stage, starting from a hardware root that is
//! selected but never read by software. The final stage yields the 128- or
//! 256-bit session key consumed by the cipher engines.
//!
//! The envelope itself is a plain value type; the unwrap step is abstracted
//! behind [`KeyLadder`] so that sessions work identically against real
//! hardware and against the [`SoftKeyLadder`] model.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, KeyInit};
use aes::Aes128;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};
use crate::otp::{OtpStore, OTP_DEVICE_ROOT_KEY_OFFSET, OTP_MODEL_KEY_OFFSET};

/// Length in bytes of each fixed-size encrypted key blob (`ek1`, `ek2`)
pub const EK_BLOB_LEN: usize = 16;

/// Length in bytes of the flat `ek1 || ek2 || ek3` layout
pub const SECKEY_FLAT_LEN: usize = 64;

/// Key-ladder root key selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySelect {
    /// Model key, shared across devices of one model
    Model,
    /// Device root key, unique per device
    Root,
}

/// Secure key envelope consumed by the key ladder.
///
/// Immutable once constructed; cipher and MAC sessions borrow it for the
/// duration of a `set_seckey` call and never mutate it.
#[derive(Debug, Clone)]
pub struct SecureKey {
    sel: KeySelect,
    ek3_bits: usize,
    ek1: [u8; EK_BLOB_LEN],
    ek2: [u8; EK_BLOB_LEN],
    ek3: [u8; 32],
}

impl SecureKey {
    /// Construct a validated envelope.
    ///
    /// `ek3_bits` must be 128 or 256 and `ek3` must carry exactly
    /// `ek3_bits / 8` bytes; anything else is rejected.
    pub fn new(
        sel: KeySelect,
        ek3_bits: usize,
        ek1: [u8; EK_BLOB_LEN],
        ek2: [u8; EK_BLOB_LEN],
        ek3: &[u8],
    ) -> CryptoResult<Self> {
        if ek3_bits != 128 && ek3_bits != 256 {
            return Err(CryptoError::InvalidKeyLength(ek3_bits));
        }
        if ek3.len() != ek3_bits / 8 {
            return Err(CryptoError::BadInput("ek3 length does not match ek3_bits"));
        }
        let mut ek3_buf = [0u8; 32];
        ek3_buf[..ek3.len()].copy_from_slice(ek3);
        Ok(SecureKey { sel, ek3_bits, ek1, ek2, ek3: ek3_buf })
    }

    /// Selected hardware root
    pub fn select(&self) -> KeySelect {
        self.sel
    }

    /// Length of the final derived key in bits (128 or 256)
    pub fn ek3_bits(&self) -> usize {
        self.ek3_bits
    }

    /// First-stage encrypted key blob
    pub fn ek1(&self) -> &[u8; EK_BLOB_LEN] {
        &self.ek1
    }

    /// Second-stage encrypted key blob
    pub fn ek2(&self) -> &[u8; EK_BLOB_LEN] {
        &self.ek2
    }

    /// Final-stage encrypted key blob (`ek3_bits / 8` bytes)
    pub fn ek3(&self) -> &[u8] {
        &self.ek3[..self.ek3_bits / 8]
    }

    /// Flat `ek1 || ek2 || ek3` view (64 bytes, `ek3` zero-padded to 32)
    pub fn eks(&self) -> [u8; SECKEY_FLAT_LEN] {
        let mut flat = [0u8; SECKEY_FLAT_LEN];
        flat[..16].copy_from_slice(&self.ek1);
        flat[16..32].copy_from_slice(&self.ek2);
        flat[32..].copy_from_slice(&self.ek3);
        flat
    }
}

/// A key produced by a key-ladder unwrap, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LadderKey {
    bytes: [u8; 32],
    len: usize,
}

impl LadderKey {
    /// Wrap raw derived key material (16 or 32 bytes).
    pub fn new(material: &[u8]) -> CryptoResult<Self> {
        if material.len() != 16 && material.len() != 32 {
            return Err(CryptoError::InvalidKeyLength(material.len() * 8));
        }
        let mut bytes = [0u8; 32];
        bytes[..material.len()].copy_from_slice(material);
        Ok(LadderKey { bytes, len: material.len() })
    }

    /// Derived key length in bits
    pub fn bits(&self) -> usize {
        self.len * 8
    }

    /// Derived key material
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The derived key as a 128-bit session key, or `InvalidKeyLength`.
    pub(crate) fn to_key128(&self) -> CryptoResult<[u8; 16]> {
        if self.len != 16 {
            return Err(CryptoError::InvalidKeyLength(self.bits()));
        }
        let mut key = [0u8; 16];
        key.copy_from_slice(&self.bytes[..16]);
        Ok(key)
    }
}

/// Key-ladder unwrap boundary.
///
/// The hardware behind this trait derives `k1` from the selected root and
/// `ek1`, `k2` from `k1` and `ek2`, and the session key from `k2` and `ek3`,
/// without exposing the root or the intermediate keys. A hardware failure
/// surfaces as [`CryptoError::HwAccelFailed`] and must abort the bind that
/// triggered the unwrap.
pub trait KeyLadder {
    /// Unwrap the envelope into a derived session key.
    fn unwrap_key(&self, key: &SecureKey) -> CryptoResult<LadderKey>;
}

/// Software model of the three-stage key ladder.
///
/// Each stage is an AES-128 ECB decryption of the next blob under the key
/// produced by the previous stage. This mirrors the hardware derivation
/// shape closely enough to exercise every secure-key code path and to give
/// deterministic unwrap results in tests.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SoftKeyLadder {
    model_root: [u8; 16],
    device_root: [u8; 16],
}

impl SoftKeyLadder {
    /// Create a ladder from explicit root keys.
    pub fn new(model_root: [u8; 16], device_root: [u8; 16]) -> Self {
        SoftKeyLadder { model_root, device_root }
    }

    /// Create a ladder whose roots are read from the fuse store slots.
    pub fn from_otp<O: OtpStore>(otp: &mut O) -> CryptoResult<Self> {
        let mut model_root = [0u8; 16];
        let mut device_root = [0u8; 16];
        otp.read(OTP_MODEL_KEY_OFFSET, &mut model_root)?;
        otp.read(OTP_DEVICE_ROOT_KEY_OFFSET, &mut device_root)?;
        Ok(SoftKeyLadder { model_root, device_root })
    }

    fn root(&self, sel: KeySelect) -> &[u8; 16] {
        match sel {
            KeySelect::Model => &self.model_root,
            KeySelect::Root => &self.device_root,
        }
    }
}

fn aes128_decrypt_block(key: &[u8; 16], block: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut buf = GenericArray::clone_from_slice(block);
    cipher.decrypt_block(&mut buf);
    let mut out = [0u8; 16];
    out.copy_from_slice(&buf);
    out
}

impl KeyLadder for SoftKeyLadder {
    fn unwrap_key(&self, key: &SecureKey) -> CryptoResult<LadderKey> {
        debug!(sel = ?key.select(), bits = key.ek3_bits(), "unwrapping secure key");

        let mut k1 = aes128_decrypt_block(self.root(key.select()), key.ek1());
        let mut k2 = aes128_decrypt_block(&k1, key.ek2());

        let ek3 = key.ek3();
        let mut derived = [0u8; 32];
        let mut first = [0u8; 16];
        first.copy_from_slice(&ek3[..16]);
        derived[..16].copy_from_slice(&aes128_decrypt_block(&k2, &first));
        if key.ek3_bits() == 256 {
            let mut second = [0u8; 16];
            second.copy_from_slice(&ek3[16..]);
            derived[16..].copy_from_slice(&aes128_decrypt_block(&k2, &second));
        }

        let out = LadderKey::new(&derived[..key.ek3_bits() / 8]);
        k1.zeroize();
        k2.zeroize();
        derived.zeroize();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::ShadowOtp;

    fn sample_envelope(bits: usize) -> SecureKey {
        let ek3 = vec![0x33u8; bits / 8];
        SecureKey::new(KeySelect::Model, bits, [0x11; 16], [0x22; 16], &ek3).unwrap()
    }

    #[test]
    fn test_envelope_rejects_unsupported_ek3_bits() {
        let result = SecureKey::new(KeySelect::Root, 192, [0; 16], [0; 16], &[0u8; 24]);
        assert_eq!(result.unwrap_err(), CryptoError::InvalidKeyLength(192));
    }

    #[test]
    fn test_envelope_rejects_mismatched_ek3_buffer() {
        let result = SecureKey::new(KeySelect::Root, 128, [0; 16], [0; 16], &[0u8; 32]);
        assert_eq!(
            result.unwrap_err(),
            CryptoError::BadInput("ek3 length does not match ek3_bits")
        );
    }

    #[test]
    fn test_flat_layout_concatenates_blobs() {
        let key = sample_envelope(128);
        let flat = key.eks();
        assert_eq!(&flat[..16], &[0x11; 16]);
        assert_eq!(&flat[16..32], &[0x22; 16]);
        assert_eq!(&flat[32..48], &[0x33; 16]);
        // 128-bit ek3 leaves the upper half of the slot unprogrammed
        assert_eq!(&flat[48..], &[0x00; 16]);
    }

    #[test]
    fn test_soft_ladder_is_deterministic() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let key = sample_envelope(128);

        let k1 = ladder.unwrap_key(&key).unwrap();
        let k2 = ladder.unwrap_key(&key).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
        assert_eq!(k1.bits(), 128);
    }

    #[test]
    fn test_roots_produce_different_keys() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let model = sample_envelope(128);
        let root = SecureKey::new(KeySelect::Root, 128, [0x11; 16], [0x22; 16], &[0x33; 16])
            .unwrap();

        let km = ladder.unwrap_key(&model).unwrap();
        let kr = ladder.unwrap_key(&root).unwrap();
        assert_ne!(km.as_bytes(), kr.as_bytes());
    }

    #[test]
    fn test_256_bit_envelope_unwraps_to_256_bits() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let key = sample_envelope(256);

        let derived = ladder.unwrap_key(&key).unwrap();
        assert_eq!(derived.bits(), 256);
        assert_eq!(derived.to_key128().unwrap_err(), CryptoError::InvalidKeyLength(256));
    }

    #[test]
    fn test_ladder_from_otp_slots() {
        let mut otp = ShadowOtp::with_default_layout();
        otp.write(OTP_MODEL_KEY_OFFSET, &[0xA5; 16]).unwrap();
        otp.write(OTP_DEVICE_ROOT_KEY_OFFSET, &[0x5A; 16]).unwrap();

        let from_otp = SoftKeyLadder::from_otp(&mut otp).unwrap();
        let explicit = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);

        let key = sample_envelope(128);
        assert_eq!(
            from_otp.unwrap_key(&key).unwrap().as_bytes(),
            explicit.unwrap_key(&key).unwrap().as_bytes()
        );
    }
}
