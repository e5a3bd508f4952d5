use bitflags::bitflags;

bitflags! {
    /// The flags byte of authenticator data.
    ///
    /// Bits 1 and 5 are reserved. A flags byte that sets either of them does not parse.
    ///
    /// <https://w3c.github.io/webauthn/#authdata-flags>
    #[repr(transparent)]
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct Flags: u8 {
        /// The user was present, bit 0.
        const UP = 1 << 0;
        /// The user was verified, bit 2.
        const UV = 1 << 2;
        /// The credential may be backed up, bit 3.
        const BE = 1 << 3;
        /// The credential is backed up, bit 4.
        const BS = 1 << 4;
        /// Attested credential data follows the counter, bit 6.
        const AT = 1 << 6;
        /// An extensions map closes the authenticator data, bit 7.
        const ED = 1 << 7;
    }
}
