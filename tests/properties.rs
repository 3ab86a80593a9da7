//! Cross-family session properties: chunked processing must agree with
//! one-shot processing for every algorithm, encryption must be an
//! involution, and secure-key binds must match their raw-key equivalents.

use proptest::prelude::*;

use klad_crypto::{
    CipherAlg, CipherSession, KeyLadder, KeySelect, MacAlg, MacSession, SecureKey, SoftKeyLadder,
};

const CIPHER_ALGS: [CipherAlg; 3] = [CipherAlg::F8, CipherAlg::Uea2, CipherAlg::Eea3];
const MAC_ALGS: [MacAlg; 3] = [MacAlg::F9, MacAlg::Uia2, MacAlg::Eia3];

fn cipher_alg_strategy() -> impl Strategy<Value = CipherAlg> {
    prop_oneof![
        Just(CipherAlg::F8),
        Just(CipherAlg::Uea2),
        Just(CipherAlg::Eea3),
    ]
}

fn mac_alg_strategy() -> impl Strategy<Value = MacAlg> {
    prop_oneof![
        Just(MacAlg::F9),
        Just(MacAlg::Uia2),
        Just(MacAlg::Eia3),
    ]
}

/// Split `msg` at arbitrary points into consecutive chunks.
fn chunks_of(msg: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (msg.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for &p in &points {
        chunks.push(msg[start..p].to_vec());
        start = p;
    }
    chunks.push(msg[start..].to_vec());
    chunks
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Encrypting a message in arbitrary chunks equals one-shot encryption.
    #[test]
    fn prop_cipher_chunking_is_transparent(
        alg in cipher_alg_strategy(),
        key in prop::array::uniform16(any::<u8>()),
        count in any::<u32>(),
        bearer in 0u32..=0x1F,
        dir in 0u32..=1,
        msg in prop::collection::vec(any::<u8>(), 0..200),
        cuts in prop::collection::vec(any::<usize>(), 0..5),
    ) {
        let mut whole = vec![0u8; msg.len()];
        CipherSession::crypt(alg, &key, count, bearer, dir, &msg, &mut whole).unwrap();

        let mut session = CipherSession::new(alg);
        session.set_key(&key).unwrap();
        session.starts(count, bearer, dir).unwrap();
        let mut parts = Vec::with_capacity(msg.len());
        for chunk in chunks_of(&msg, &cuts) {
            let mut out = vec![0u8; chunk.len()];
            session.update(&chunk, &mut out).unwrap();
            parts.extend_from_slice(&out);
        }
        session.finish().unwrap();

        prop_assert_eq!(parts, whole);
    }

    /// Encrypting twice with the same nonce tuple restores the plaintext.
    #[test]
    fn prop_cipher_is_involution(
        alg in cipher_alg_strategy(),
        key in prop::array::uniform16(any::<u8>()),
        count in any::<u32>(),
        bearer in 0u32..=0x1F,
        dir in 0u32..=1,
        msg in prop::collection::vec(any::<u8>(), 1..200),
    ) {
        let mut ct = vec![0u8; msg.len()];
        CipherSession::crypt(alg, &key, count, bearer, dir, &msg, &mut ct).unwrap();
        let mut back = vec![0u8; msg.len()];
        CipherSession::crypt(alg, &key, count, bearer, dir, &ct, &mut back).unwrap();
        prop_assert_eq!(back, msg);
    }

    /// Authenticating a message in arbitrary chunks equals the one-shot MAC.
    #[test]
    fn prop_mac_chunking_is_transparent(
        alg in mac_alg_strategy(),
        key in prop::array::uniform16(any::<u8>()),
        count in any::<u32>(),
        fresh in 0u32..=0x1F,
        dir in 0u32..=1,
        msg in prop::collection::vec(any::<u8>(), 0..200),
        cuts in prop::collection::vec(any::<usize>(), 0..5),
    ) {
        let whole = MacSession::mac(alg, &key, count, fresh, dir, &msg).unwrap();

        let mut session = MacSession::new(alg);
        session.set_key(&key).unwrap();
        session.starts(count, fresh, dir).unwrap();
        for chunk in chunks_of(&msg, &cuts) {
            session.update(&chunk).unwrap();
        }
        prop_assert_eq!(session.finish().unwrap(), whole);
    }

    /// A secure-key bind behaves exactly like binding the unwrapped key.
    #[test]
    fn prop_seckey_equals_raw_key(
        alg in cipher_alg_strategy(),
        sel in prop::bool::ANY,
        ek1 in prop::array::uniform16(any::<u8>()),
        ek2 in prop::array::uniform16(any::<u8>()),
        ek3 in prop::array::uniform16(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let ladder = SoftKeyLadder::new([0xA5; 16], [0x5A; 16]);
        let sel = if sel { KeySelect::Model } else { KeySelect::Root };
        let envelope = SecureKey::new(sel, 128, ek1, ek2, &ek3).unwrap();

        let derived = ladder.unwrap_key(&envelope).unwrap();
        let mut raw_key = [0u8; 16];
        raw_key.copy_from_slice(derived.as_bytes());

        let mut via_raw = vec![0u8; msg.len()];
        CipherSession::crypt(alg, &raw_key, 1, 1, 1, &msg, &mut via_raw).unwrap();
        let mut via_ladder = vec![0u8; msg.len()];
        CipherSession::crypt_seckey(alg, &ladder, &envelope, 1, 1, 1, &msg, &mut via_ladder)
            .unwrap();

        prop_assert_eq!(via_raw, via_ladder);
    }
}

#[test]
fn never_keyed_sessions_drop_cleanly() {
    for alg in CIPHER_ALGS {
        drop(CipherSession::new(alg));
    }
    for alg in MAC_ALGS {
        drop(MacSession::new(alg));
    }
}

#[test]
fn self_test_covers_all_families() {
    klad_crypto::self_test().unwrap();
}
