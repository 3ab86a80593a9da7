//! Confidentiality session lifecycle
//!
//! A [`CipherSession`] walks `Initialized -> Keyed -> Ready`: bind a key
//! (raw or through the key ladder), arm it with a (count, bearer, dir)
//! nonce tuple, then push the message through in as many `update` calls as
//! the caller likes. `finish` disarms the stream and returns to `Keyed`
//! with the key retained, so the next message only needs a new `starts`.
//!
//! Calls out of order fail with `HwAccelFailed`; argument violations fail
//! with `BadInput` and leave the session state untouched.

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::engine::{CipherAlg, Keystream, SessionState};
use crate::error::{CryptoError, CryptoResult};
use crate::klad::{KeyLadder, SecureKey};

/// A stateful confidentiality session for one algorithm.
pub struct CipherSession {
    alg: CipherAlg,
    state: SessionState,
    key: [u8; 16],
    stream: Option<Keystream>,
}

impl CipherSession {
    /// Create an unkeyed session for `alg`.
    pub fn new(alg: CipherAlg) -> Self {
        CipherSession {
            alg,
            state: SessionState::Initialized,
            key: [0u8; 16],
            stream: None,
        }
    }

    /// The algorithm this session was created for.
    pub fn alg(&self) -> CipherAlg {
        self.alg
    }

    /// Bind a raw 128-bit key. Allowed before the first `starts` and again
    /// between messages; rebinding replaces any previously bound key.
    pub fn set_key(&mut self, key: &[u8; 16]) -> CryptoResult<()> {
        if self.state == SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("set_key while session is armed"));
        }
        self.key.copy_from_slice(key);
        self.state = SessionState::Keyed;
        Ok(())
    }

    /// Bind a secure key by unwrapping it through the key ladder.
    ///
    /// The envelope must derive a 128-bit key; a 256-bit envelope is
    /// rejected with `InvalidKeyLength` before the ladder is invoked, and
    /// any ladder failure leaves the session state unchanged.
    pub fn set_seckey<L: KeyLadder>(&mut self, ladder: &L, key: &SecureKey) -> CryptoResult<()> {
        if self.state == SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("set_seckey while session is armed"));
        }
        if key.ek3_bits() != 128 {
            return Err(CryptoError::InvalidKeyLength(key.ek3_bits()));
        }
        let derived = ladder.unwrap_key(key)?;
        self.key = derived.to_key128()?;
        self.state = SessionState::Keyed;
        debug!(alg = ?self.alg, "cipher session keyed via key ladder");
        Ok(())
    }

    /// Arm the session for one message with its nonce tuple.
    ///
    /// `bearer` is 5 bits and `dir` 1 bit; out-of-range values are rejected
    /// without disturbing an existing armed stream. Calling `starts` on an
    /// already armed session rekeys the stream for a new message.
    pub fn starts(&mut self, count: u32, bearer: u32, dir: u32) -> CryptoResult<()> {
        if self.state == SessionState::Initialized {
            return Err(CryptoError::HwAccelFailed("starts before set_key"));
        }
        if bearer > 0x1F {
            return Err(CryptoError::BadInput("bearer out of range"));
        }
        if dir > 1 {
            return Err(CryptoError::BadInput("dir out of range"));
        }
        self.stream = Some(Keystream::start(self.alg, &self.key, count, bearer, dir));
        self.state = SessionState::Ready;
        trace!(alg = ?self.alg, count, bearer, dir, "cipher session armed");
        Ok(())
    }

    /// Encrypt or decrypt the next chunk of the message.
    ///
    /// `output` must be exactly as long as `input`. A zero-length chunk is
    /// a no-op that preserves the keystream position.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> CryptoResult<()> {
        if self.state != SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("update before starts"));
        }
        if input.len() != output.len() {
            return Err(CryptoError::BadInput("input/output length mismatch"));
        }
        // Armed implies the stream is present
        let stream = self
            .stream
            .as_mut()
            .ok_or(CryptoError::HwAccelFailed("keystream missing"))?;
        stream.xor_into(input, output);
        Ok(())
    }

    /// End the current message. The key stays bound; a new `starts` arms
    /// the next message.
    pub fn finish(&mut self) -> CryptoResult<()> {
        if self.state != SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("finish before starts"));
        }
        self.stream = None;
        self.state = SessionState::Keyed;
        Ok(())
    }

    /// One-shot encryption/decryption with a raw key.
    ///
    /// On error the contents of `output` are unspecified and must be
    /// discarded.
    pub fn crypt(
        alg: CipherAlg,
        key: &[u8; 16],
        count: u32,
        bearer: u32,
        dir: u32,
        input: &[u8],
        output: &mut [u8],
    ) -> CryptoResult<()> {
        let mut session = CipherSession::new(alg);
        session.set_key(key)?;
        session.starts(count, bearer, dir)?;
        session.update(input, output)?;
        session.finish()
    }

    /// One-shot encryption/decryption with a secure key.
    ///
    /// On error the contents of `output` are unspecified and must be
    /// discarded.
    #[allow(clippy::too_many_arguments)]
    pub fn crypt_seckey<L: KeyLadder>(
        alg: CipherAlg,
        ladder: &L,
        key: &SecureKey,
        count: u32,
        bearer: u32,
        dir: u32,
        input: &[u8],
        output: &mut [u8],
    ) -> CryptoResult<()> {
        let mut session = CipherSession::new(alg);
        session.set_seckey(ladder, key)?;
        session.starts(count, bearer, dir)?;
        session.update(input, output)?;
        session.finish()
    }
}

impl Drop for CipherSession {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::klad::{KeySelect, SoftKeyLadder};

    const KEY: [u8; 16] = [
        0x2B, 0xD6, 0x45, 0x9F, 0x82, 0xC5, 0xB3, 0x00,
        0x95, 0x2C, 0x49, 0x10, 0x48, 0x81, 0xFF, 0x48,
    ];

    #[test]
    fn test_lifecycle_round() {
        let msg = b"lifecycle message";
        for alg in [CipherAlg::F8, CipherAlg::Uea2, CipherAlg::Eea3] {
            let mut session = CipherSession::new(alg);
            session.set_key(&KEY).unwrap();
            session.starts(7, 3, 1).unwrap();

            let mut ct = vec![0u8; msg.len()];
            session.update(msg, &mut ct).unwrap();
            session.finish().unwrap();
            assert_ne!(&ct[..], &msg[..]);

            // Key retained: re-arm decrypts without set_key
            session.starts(7, 3, 1).unwrap();
            let mut back = vec![0u8; msg.len()];
            session.update(&ct, &mut back).unwrap();
            session.finish().unwrap();
            assert_eq!(&back[..], &msg[..]);
        }
    }

    #[test]
    fn test_chunked_equals_one_shot() {
        let msg: Vec<u8> = (0u8..41).collect();
        for alg in [CipherAlg::F8, CipherAlg::Uea2, CipherAlg::Eea3] {
            let mut whole = vec![0u8; msg.len()];
            CipherSession::crypt(alg, &KEY, 9, 12, 0, &msg, &mut whole).unwrap();

            let mut session = CipherSession::new(alg);
            session.set_key(&KEY).unwrap();
            session.starts(9, 12, 0).unwrap();
            let mut parts = vec![0u8; msg.len()];
            session.update(&msg[..13], &mut parts[..13]).unwrap();
            session.update(&[], &mut []).unwrap();
            session.update(&msg[13..], &mut parts[13..]).unwrap();
            session.finish().unwrap();

            assert_eq!(parts, whole);
        }
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let mut session = CipherSession::new(CipherAlg::Uea2);

        // No key yet
        assert!(matches!(
            session.starts(0, 0, 0),
            Err(CryptoError::HwAccelFailed(_))
        ));
        let mut out = [0u8; 4];
        assert!(matches!(
            session.update(&[1, 2, 3, 4], &mut out),
            Err(CryptoError::HwAccelFailed(_))
        ));
        assert!(matches!(session.finish(), Err(CryptoError::HwAccelFailed(_))));

        // Update after finish is rejected too
        session.set_key(&KEY).unwrap();
        session.starts(0, 0, 0).unwrap();
        session.finish().unwrap();
        assert!(matches!(
            session.update(&[1, 2, 3, 4], &mut out),
            Err(CryptoError::HwAccelFailed(_))
        ));
    }

    #[test]
    fn test_invalid_nonce_preserves_state() {
        let msg = [0xAAu8; 8];
        let mut session = CipherSession::new(CipherAlg::Eea3);
        session.set_key(&KEY).unwrap();
        session.starts(1, 2, 1).unwrap();

        let mut expected = [0u8; 8];
        CipherSession::crypt(CipherAlg::Eea3, &KEY, 1, 2, 1, &msg, &mut expected).unwrap();

        // A rejected re-arm must leave the armed stream untouched
        assert_eq!(
            session.starts(1, 0x20, 1),
            Err(CryptoError::BadInput("bearer out of range"))
        );
        assert_eq!(
            session.starts(1, 2, 2),
            Err(CryptoError::BadInput("dir out of range"))
        );

        let mut out = [0u8; 8];
        session.update(&msg, &mut out).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut session = CipherSession::new(CipherAlg::F8);
        session.set_key(&KEY).unwrap();
        session.starts(0, 0, 0).unwrap();

        let mut out = [0u8; 3];
        assert_eq!(
            session.update(&[1, 2, 3, 4], &mut out),
            Err(CryptoError::BadInput("input/output length mismatch"))
        );
    }

    #[test]
    fn test_seckey_matches_raw_key() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let envelope =
            SecureKey::new(KeySelect::Model, 128, [0x11; 16], [0x22; 16], &[0x33; 16]).unwrap();
        let raw = ladder.unwrap_key(&envelope).unwrap();
        let mut raw_key = [0u8; 16];
        raw_key.copy_from_slice(raw.as_bytes());

        let msg = b"seckey equivalence";
        let mut via_raw = vec![0u8; msg.len()];
        CipherSession::crypt(CipherAlg::Uea2, &raw_key, 5, 1, 0, msg, &mut via_raw).unwrap();

        let mut via_ladder = vec![0u8; msg.len()];
        CipherSession::crypt_seckey(
            CipherAlg::Uea2, &ladder, &envelope, 5, 1, 0, msg, &mut via_ladder,
        )
        .unwrap();

        assert_eq!(via_raw, via_ladder);
    }

    #[test]
    fn test_256_bit_envelope_rejected_without_state_change() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let envelope =
            SecureKey::new(KeySelect::Root, 256, [0x11; 16], [0x22; 16], &[0x33; 32]).unwrap();

        let mut session = CipherSession::new(CipherAlg::F8);
        assert_eq!(
            session.set_seckey(&ladder, &envelope),
            Err(CryptoError::InvalidKeyLength(256))
        );
        // Still unkeyed: arming must fail
        assert!(matches!(
            session.starts(0, 0, 0),
            Err(CryptoError::HwAccelFailed(_))
        ));
    }

    #[test]
    fn test_rebind_replaces_key() {
        let msg = [0x55u8; 12];
        let other_key = [0x77u8; 16];

        let mut session = CipherSession::new(CipherAlg::Eea3);
        session.set_key(&KEY).unwrap();
        session.set_key(&other_key).unwrap();
        session.starts(3, 3, 0).unwrap();
        let mut out = [0u8; 12];
        session.update(&msg, &mut out).unwrap();
        session.finish().unwrap();

        let mut expected = [0u8; 12];
        CipherSession::crypt(CipherAlg::Eea3, &other_key, 3, 3, 0, &msg, &mut expected).unwrap();
        assert_eq!(out, expected);
    }
}
