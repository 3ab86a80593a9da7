//! OTP (one-time-programmable fuse storage) collaborator interface
//!
//! The key ladder derives its root secrets from fuse storage that lives in
//! the secure world and is reached through a pseudo-trusted-application (PTA)
//! command pair: `READ(offset) -> buffer` and `WRITE(offset, buffer)`. This
//! module carries that interface contract plus an in-memory fuse model used
//! by the software key ladder and by tests.
//!
//! The PTA transport itself (parameter marshalling, world switch) is out of
//! scope; only the command-level contract is expressed here.

use tracing::trace;

use crate::error::{CryptoError, CryptoResult};

/// UUID addressing the eFuse PTA in the secure world
pub const PTA_EFUSE_UUID: [u8; 16] = [
    0x16, 0xc8, 0x3a, 0x2b, 0xaa, 0xe3, 0x45, 0x42,
    0x9d, 0xdd, 0x40, 0x46, 0x51, 0xe0, 0x1e, 0xa2,
];

/// PTA command: read a buffer at a fuse offset
pub const PTA_EFUSE_CMD_READ: u32 = 0;

/// PTA command: program a buffer at a fuse offset
pub const PTA_EFUSE_CMD_WRITE: u32 = 1;

/// Offset of the RAM shadow copy of the fuse array
pub const OTP_SHADOW_OFFSET: usize = 256;

/// Fuse offset of the 128-bit model key (key-ladder root, shared per model)
pub const OTP_MODEL_KEY_OFFSET: usize = 0;

/// Fuse offset of the 128-bit device root key (key-ladder root, per device)
pub const OTP_DEVICE_ROOT_KEY_OFFSET: usize = 16;

/// Access to one-time-programmable fuse storage.
///
/// Implementations wrap the PTA command pair above (or a hardware register
/// file, or an in-memory model). Each call is atomic from the caller's point
/// of view: it either fully succeeds or fails with no partial effect the
/// caller can observe.
pub trait OtpStore {
    /// Read `buf.len()` bytes starting at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> CryptoResult<()>;

    /// Program `data` starting at `offset`.
    ///
    /// Fuse semantics apply: bits can only be burned from 0 to 1, never
    /// cleared.
    fn write(&mut self, offset: usize, data: &[u8]) -> CryptoResult<()>;

    /// Enroll the PUF and generate the device root key.
    #[cfg(feature = "puf")]
    fn puf_enroll(&mut self) -> CryptoResult<()>;

    /// Check the physical quality of the PUF cells.
    #[cfg(feature = "puf")]
    fn puf_quality_check(&mut self) -> CryptoResult<()>;

    /// Initial margin read of PUF-backed fuses.
    #[cfg(feature = "puf")]
    fn puf_initial_margin_read(&mut self, offset: usize, buf: &mut [u8]) -> CryptoResult<()>;

    /// Program margin read of PUF-backed fuses.
    #[cfg(feature = "puf")]
    fn puf_pgm_margin_read(&mut self, offset: usize, buf: &mut [u8]) -> CryptoResult<()>;
}

/// In-memory fuse array model with burn-only write semantics.
///
/// Stands in for the PTA-backed store during development and in tests; the
/// layout (shadow region, root key slots) matches the constants above.
#[derive(Debug, Clone)]
pub struct ShadowOtp {
    fuses: Vec<u8>,
}

impl ShadowOtp {
    /// Create a fuse array of `size` bytes, all unprogrammed (zero).
    pub fn new(size: usize) -> Self {
        ShadowOtp { fuses: vec![0u8; size] }
    }

    /// Create a fuse array large enough for the shadow region plus the
    /// root-key slots.
    pub fn with_default_layout() -> Self {
        Self::new(OTP_SHADOW_OFFSET + 256)
    }

    fn check_range(&self, offset: usize, len: usize) -> CryptoResult<()> {
        if offset.checked_add(len).is_none_or(|end| end > self.fuses.len()) {
            return Err(CryptoError::BadInput("otp range out of bounds"));
        }
        Ok(())
    }
}

impl OtpStore for ShadowOtp {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> CryptoResult<()> {
        self.check_range(offset, buf.len())?;
        buf.copy_from_slice(&self.fuses[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> CryptoResult<()> {
        self.check_range(offset, data.len())?;
        trace!(offset, len = data.len(), "programming otp fuses");
        for (fuse, byte) in self.fuses[offset..offset + data.len()].iter_mut().zip(data) {
            // Burn-only: programmed bits stay programmed
            *fuse |= byte;
        }
        Ok(())
    }

    #[cfg(feature = "puf")]
    fn puf_enroll(&mut self) -> CryptoResult<()> {
        Err(CryptoError::HwAccelFailed("puf not present in shadow model"))
    }

    #[cfg(feature = "puf")]
    fn puf_quality_check(&mut self) -> CryptoResult<()> {
        Err(CryptoError::HwAccelFailed("puf not present in shadow model"))
    }

    #[cfg(feature = "puf")]
    fn puf_initial_margin_read(&mut self, offset: usize, buf: &mut [u8]) -> CryptoResult<()> {
        self.read(offset, buf)
    }

    #[cfg(feature = "puf")]
    fn puf_pgm_margin_read(&mut self, offset: usize, buf: &mut [u8]) -> CryptoResult<()> {
        self.read(offset, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_back_written_data() {
        let mut otp = ShadowOtp::with_default_layout();
        otp.write(OTP_MODEL_KEY_OFFSET, &[0xAB; 16]).unwrap();

        let mut buf = [0u8; 16];
        otp.read(OTP_MODEL_KEY_OFFSET, &mut buf).unwrap();
        assert_eq!(buf, [0xAB; 16]);
    }

    #[test]
    fn test_write_is_burn_only() {
        let mut otp = ShadowOtp::new(32);
        otp.write(0, &[0xF0]).unwrap();
        // Attempting to clear bits has no effect; new bits still burn
        otp.write(0, &[0x0F]).unwrap();

        let mut buf = [0u8; 1];
        otp.read(0, &mut buf).unwrap();
        assert_eq!(buf[0], 0xFF);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut otp = ShadowOtp::new(16);
        let mut buf = [0u8; 8];
        assert_eq!(
            otp.read(12, &mut buf),
            Err(CryptoError::BadInput("otp range out of bounds"))
        );
        assert_eq!(
            otp.write(usize::MAX, &[0u8; 2]),
            Err(CryptoError::BadInput("otp range out of bounds"))
        );
    }

    #[test]
    fn test_shadow_region_distinct_from_root_slots() {
        let mut otp = ShadowOtp::with_default_layout();
        otp.write(OTP_SHADOW_OFFSET, &[0x11; 4]).unwrap();

        let mut buf = [0u8; 4];
        otp.read(OTP_MODEL_KEY_OFFSET, &mut buf).unwrap();
        assert_eq!(buf, [0u8; 4]);
    }
}
