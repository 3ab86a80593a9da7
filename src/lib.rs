//! 3GPP f8/f9 confidentiality and integrity provider
//!
//! Implements the three 3GPP stream-cipher families as stateful sessions:
//! - KASUMI f8/f9 (TS 35.201/35.202)
//! - SNOW3G UEA2/UIA2 (TS 35.215/35.216)
//! - ZUC 128-EEA3/128-EIA3 (TS 35.221-35.223)
//!
//! Keys are bound either raw or as key-ladder secure-key envelopes that are
//! unwrapped in hardware (modeled by [`SoftKeyLadder`]) with roots held in
//! OTP fuse storage.

pub mod cipher;
pub mod engine;
pub mod error;
pub mod kasumi;
pub mod klad;
pub mod mac;
pub mod otp;
pub mod snow3g;
pub mod zuc;

pub use cipher::CipherSession;
pub use engine::{self_test, CipherAlg, MacAlg};
pub use error::{CryptoError, CryptoResult};
pub use klad::{KeyLadder, KeySelect, LadderKey, SecureKey, SoftKeyLadder};
pub use mac::MacSession;
pub use otp::{OtpStore, ShadowOtp};
