/// Constants for Ion v1.0
pub mod v1_0 {
    /// Ion Version Marker byte sequence
    pub const IVM: [u8; 4] = [0xE0, 0x01, 0x00, 0xEA];

    /// The first and last bytes of every Ion Version Marker. The two bytes in between are the
    /// major and minor version numbers.
    pub const IVM_START: u8 = 0xE0;
    pub const IVM_END: u8 = 0xEA;

    /// Constants for interpreting the length (`L`) code of binary values
    pub mod length_codes {
        pub const NULL: u8 = 15;
        pub const VAR_UINT: u8 = 14;
        /// For structs only: the fields are sorted by symbol ID and the length follows as a
        /// VarUInt.
        pub const ORDERED_STRUCT: u8 = 1;
    }
}
