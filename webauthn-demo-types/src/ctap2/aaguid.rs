use std::fmt;

/// An Authenticator Attestation GUID is a 128-bit identifier of the authenticator's make and model.
///
/// Software and privacy preserving authenticators report the empty (all zero) AAGUID, which is
/// what [`Aaguid::new_empty`] produces.
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-model>
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Aaguid(pub [u8; Self::LEN]);

impl Aaguid {
    /// Byte length of an AAGUID inside attested credential data.
    pub const LEN: usize = 16;

    /// Generate empty AAGUID
    pub const fn new_empty() -> Self {
        Self([0; Self::LEN])
    }
}

impl From<[u8; 16]> for Aaguid {
    fn from(inner: [u8; 16]) -> Self {
        Aaguid(inner)
    }
}

impl fmt::Display for Aaguid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
