//! Integrity session lifecycle
//!
//! A [`MacSession`] mirrors the cipher lifecycle: bind a key, arm with a
//! nonce tuple, feed the message in chunks, then `finish` for the 32-bit
//! MAC. The middle nonce parameter is the 32-bit FRESH value for f9 and
//! UIA2, and the 5-bit BEARER for EIA3 (whose IV has no FRESH field).
//!
//! `finish` returns the session to `Keyed` with the key retained.

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::engine::{MacAlg, MacEngine, SessionState};
use crate::error::{CryptoError, CryptoResult};
use crate::klad::{KeyLadder, SecureKey};

/// A stateful integrity session for one algorithm.
pub struct MacSession {
    alg: MacAlg,
    state: SessionState,
    key: [u8; 16],
    engine: Option<MacEngine>,
}

impl MacSession {
    /// Create an unkeyed session for `alg`.
    pub fn new(alg: MacAlg) -> Self {
        MacSession {
            alg,
            state: SessionState::Initialized,
            key: [0u8; 16],
            engine: None,
        }
    }

    /// The algorithm this session was created for.
    pub fn alg(&self) -> MacAlg {
        self.alg
    }

    /// Bind a raw 128-bit key. Rebinding replaces any previously bound key.
    pub fn set_key(&mut self, key: &[u8; 16]) -> CryptoResult<()> {
        if self.state == SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("set_key while session is armed"));
        }
        self.key.copy_from_slice(key);
        self.state = SessionState::Keyed;
        Ok(())
    }

    /// Bind a secure key by unwrapping it through the key ladder.
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
        debug!(alg = ?self.alg, "mac session keyed via key ladder");
        Ok(())
    }

    /// Arm the session for one message.
    ///
    /// `fresh` is the 32-bit FRESH value for f9/UIA2; for EIA3 it is the
    /// 5-bit BEARER and values above `0x1F` are rejected.
    pub fn starts(&mut self, count: u32, fresh: u32, dir: u32) -> CryptoResult<()> {
        if self.state == SessionState::Initialized {
            return Err(CryptoError::HwAccelFailed("starts before set_key"));
        }
        if dir > 1 {
            return Err(CryptoError::BadInput("dir out of range"));
        }
        if self.alg == MacAlg::Eia3 && fresh > 0x1F {
            return Err(CryptoError::BadInput("bearer out of range"));
        }
        self.engine = Some(MacEngine::start(self.alg, &self.key, count, fresh, dir));
        self.state = SessionState::Ready;
        trace!(alg = ?self.alg, count, dir, "mac session armed");
        Ok(())
    }

    /// Feed the next chunk of the message. Zero-length chunks are no-ops.
    pub fn update(&mut self, input: &[u8]) -> CryptoResult<()> {
        if self.state != SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("update before starts"));
        }
        let engine = self
            .engine
            .as_mut()
            .ok_or(CryptoError::HwAccelFailed("mac engine missing"))?;
        engine.update(input);
        Ok(())
    }

    /// Close the message and return its 32-bit MAC. The key stays bound.
    pub fn finish(&mut self) -> CryptoResult<[u8; 4]> {
        if self.state != SessionState::Ready {
            return Err(CryptoError::HwAccelFailed("finish before starts"));
        }
        let engine = self
            .engine
            .take()
            .ok_or(CryptoError::HwAccelFailed("mac engine missing"))?;
        self.state = SessionState::Keyed;
        Ok(engine.finish())
    }

    /// One-shot MAC with a raw key.
    pub fn mac(
        alg: MacAlg,
        key: &[u8; 16],
        count: u32,
        fresh: u32,
        dir: u32,
        data: &[u8],
    ) -> CryptoResult<[u8; 4]> {
        let mut session = MacSession::new(alg);
        session.set_key(key)?;
        session.starts(count, fresh, dir)?;
        session.update(data)?;
        session.finish()
    }

    /// One-shot MAC with a secure key.
    pub fn mac_seckey<L: KeyLadder>(
        alg: MacAlg,
        ladder: &L,
        key: &SecureKey,
        count: u32,
        fresh: u32,
        dir: u32,
        data: &[u8],
    ) -> CryptoResult<[u8; 4]> {
        let mut session = MacSession::new(alg);
        session.set_seckey(ladder, key)?;
        session.starts(count, fresh, dir)?;
        session.update(data)?;
        session.finish()
    }
}

impl Drop for MacSession {
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
    fn test_chunked_equals_one_shot() {
        let msg: Vec<u8> = (0u8..37).collect();
        for alg in [MacAlg::F9, MacAlg::Uia2, MacAlg::Eia3] {
            let whole = MacSession::mac(alg, &KEY, 9, 12, 0, &msg).unwrap();

            let mut session = MacSession::new(alg);
            session.set_key(&KEY).unwrap();
            session.starts(9, 12, 0).unwrap();
            session.update(&msg[..11]).unwrap();
            session.update(&[]).unwrap();
            session.update(&msg[11..]).unwrap();
            assert_eq!(session.finish().unwrap(), whole);
        }
    }

    #[test]
    fn test_key_retained_across_messages() {
        let mut session = MacSession::new(MacAlg::Uia2);
        session.set_key(&KEY).unwrap();

        session.starts(1, 2, 0).unwrap();
        session.update(b"first").unwrap();
        let first = session.finish().unwrap();

        session.starts(1, 2, 0).unwrap();
        session.update(b"first").unwrap();
        assert_eq!(session.finish().unwrap(), first);
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let mut session = MacSession::new(MacAlg::F9);

        assert!(matches!(
            session.starts(0, 0, 0),
            Err(CryptoError::HwAccelFailed(_))
        ));
        assert!(matches!(
            session.update(b"x"),
            Err(CryptoError::HwAccelFailed(_))
        ));
        assert!(matches!(session.finish(), Err(CryptoError::HwAccelFailed(_))));

        session.set_key(&KEY).unwrap();
        session.starts(0, 0, 0).unwrap();
        session.finish().unwrap();
        // Second finish without re-arming
        assert!(matches!(session.finish(), Err(CryptoError::HwAccelFailed(_))));
    }

    #[test]
    fn test_eia3_bearer_validated() {
        let mut session = MacSession::new(MacAlg::Eia3);
        session.set_key(&KEY).unwrap();
        assert_eq!(
            session.starts(0, 0x20, 0),
            Err(CryptoError::BadInput("bearer out of range"))
        );
        // f9 and UIA2 take a full 32-bit FRESH there
        let mut f9 = MacSession::new(MacAlg::F9);
        f9.set_key(&KEY).unwrap();
        f9.starts(0, 0xDEADBEEF, 0).unwrap();
    }

    #[test]
    fn test_invalid_starts_preserves_armed_message() {
        let mut session = MacSession::new(MacAlg::Eia3);
        session.set_key(&KEY).unwrap();
        session.starts(4, 7, 1).unwrap();
        session.update(b"part one ").unwrap();

        assert!(session.starts(4, 0x3F, 1).is_err());
        session.update(b"part two").unwrap();
        let mac = session.finish().unwrap();

        let whole = MacSession::mac(MacAlg::Eia3, &KEY, 4, 7, 1, b"part one part two").unwrap();
        assert_eq!(mac, whole);
    }

    #[test]
    fn test_empty_message_mac_defined() {
        for alg in [MacAlg::F9, MacAlg::Uia2, MacAlg::Eia3] {
            let mac = MacSession::mac(alg, &KEY, 0, 0, 0, &[]).unwrap();
            let again = MacSession::mac(alg, &KEY, 0, 0, 0, &[]).unwrap();
            assert_eq!(mac, again);
        }
    }

    #[test]
    fn test_seckey_matches_raw_key() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let envelope =
            SecureKey::new(KeySelect::Root, 128, [0x11; 16], [0x22; 16], &[0x33; 16]).unwrap();
        let raw = ladder.unwrap_key(&envelope).unwrap();
        let mut raw_key = [0u8; 16];
        raw_key.copy_from_slice(raw.as_bytes());

        let via_raw = MacSession::mac(MacAlg::F9, &raw_key, 5, 6, 1, b"seckey").unwrap();
        let via_ladder =
            MacSession::mac_seckey(MacAlg::F9, &ladder, &envelope, 5, 6, 1, b"seckey").unwrap();
        assert_eq!(via_raw, via_ladder);
    }

    #[test]
    fn test_256_bit_envelope_rejected() {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let envelope =
            SecureKey::new(KeySelect::Root, 256, [0x11; 16], [0x22; 16], &[0x33; 32]).unwrap();

        let mut session = MacSession::new(MacAlg::Uia2);
        assert_eq!(
            session.set_seckey(&ladder, &envelope),
            Err(CryptoError::InvalidKeyLength(256))
        );
        assert!(matches!(
            session.starts(0, 0, 0),
            Err(CryptoError::HwAccelFailed(_))
        ));
    }
}
