//! Algorithm selectors and per-family engine dispatch
//!
//! Sessions pick one member of the f8/f9 family at construction time; the
//! engines here are closed tagged unions over the three keystream and three
//! MAC cores so the session layer stays algorithm-agnostic.

use crate::error::CryptoResult;
use crate::kasumi::{F8Keystream, F9Mac};
use crate::snow3g::{Uea2Keystream, Uia2Mac};
use crate::zuc::{Eea3Keystream, Eia3Mac};

/// Confidentiality algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlg {
    /// KASUMI f8 (TS 35.201)
    F8,
    /// SNOW3G UEA2 (TS 35.215)
    Uea2,
    /// ZUC 128-EEA3 (TS 35.222)
    Eea3,
}

/// Integrity algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacAlg {
    /// KASUMI f9 (TS 35.201)
    F9,
    /// SNOW3G UIA2 (TS 35.215)
    Uia2,
    /// ZUC 128-EIA3 (TS 35.223)
    Eia3,
}

/// Session lifecycle position, shared by cipher and MAC sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    /// Constructed, no key bound
    Initialized,
    /// Key bound, no nonce armed
    Keyed,
    /// Armed for one message
    Ready,
}

/// Keystream engine for one armed cipher session
pub(crate) enum Keystream {
    F8(F8Keystream),
    Uea2(Uea2Keystream),
    Eea3(Eea3Keystream),
}

impl Keystream {
    pub(crate) fn start(alg: CipherAlg, key: &[u8; 16], count: u32, bearer: u32, dir: u32) -> Self {
        match alg {
            CipherAlg::F8 => Keystream::F8(F8Keystream::new(key, count, bearer, dir)),
            CipherAlg::Uea2 => Keystream::Uea2(Uea2Keystream::new(key, count, bearer, dir)),
            CipherAlg::Eea3 => Keystream::Eea3(Eea3Keystream::new(key, count, bearer, dir)),
        }
    }

    pub(crate) fn xor_into(&mut self, input: &[u8], output: &mut [u8]) {
        match self {
            Keystream::F8(ks) => ks.xor_into(input, output),
            Keystream::Uea2(ks) => ks.xor_into(input, output),
            Keystream::Eea3(ks) => ks.xor_into(input, output),
        }
    }
}

/// MAC engine for one armed integrity session
pub(crate) enum MacEngine {
    F9(F9Mac),
    Uia2(Uia2Mac),
    Eia3(Eia3Mac),
}

impl MacEngine {
    /// Start the engine for one nonce tuple. The middle parameter is FRESH
    /// for f9/UIA2 and the 5-bit BEARER for EIA3.
    pub(crate) fn start(alg: MacAlg, key: &[u8; 16], count: u32, fresh: u32, dir: u32) -> Self {
        match alg {
            MacAlg::F9 => MacEngine::F9(F9Mac::new(key, count, fresh, dir)),
            MacAlg::Uia2 => MacEngine::Uia2(Uia2Mac::new(key, count, fresh, dir)),
            MacAlg::Eia3 => MacEngine::Eia3(Eia3Mac::new(key, count, fresh, dir)),
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            MacEngine::F9(mac) => mac.update(data),
            MacEngine::Uia2(mac) => mac.update(data),
            MacEngine::Eia3(mac) => mac.update(data),
        }
    }

    pub(crate) fn finish(self) -> [u8; 4] {
        match self {
            MacEngine::F9(mac) => mac.finish(),
            MacEngine::Uia2(mac) => mac.finish(),
            MacEngine::Eia3(mac) => mac.finish(),
        }
    }
}

/// Run all engine self-tests in sequence.
pub fn self_test() -> CryptoResult<()> {
    crate::kasumi::self_test()?;
    crate::snow3g::self_test()?;
    crate::zuc::self_test()?;
    Ok(())
}
