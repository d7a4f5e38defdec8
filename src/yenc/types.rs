/// Parameters of the `=ybegin` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YencHeader {
    /// Declared size of the decoded data in bytes
    pub size: u64,
    /// Name, taken verbatim from `name=` to the end of the line
    pub name: String,
    /// Declared line length, when present
    pub line: Option<usize>,
    /// Part number (multi-part posts)
    pub part: Option<u32>,
    /// Total number of parts (multi-part posts)
    pub total: Option<u32>,
}

/// Parameters of the `=yend` line
///
/// Servers that wrap compressed overview data in yEnc often send a bare
/// `=yend`, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YencEnd {
    /// Size repeated in the trailer
    pub size: Option<u64>,
    /// CRC32 of the decoded data
    pub crc32: Option<u32>,
    /// CRC32 of this part only
    pub pcrc32: Option<u32>,
}

/// Decoded yEnc block
#[derive(Debug, Clone)]
pub struct YencDecoded {
    /// Parsed `=ybegin` parameters
    pub header: YencHeader,
    /// Parsed `=yend` parameters
    pub trailer: YencEnd,
    /// Decoded binary data
    pub data: Vec<u8>,
    /// CRC32 of `data`
    pub calculated_crc32: u32,
}

impl YencDecoded {
    /// Compare the calculated CRC32 with the trailer's, `None` if it has none
    pub fn crc32_matches(&self) -> Option<bool> {
        self.trailer
            .pcrc32
            .or(self.trailer.crc32)
            .map(|expected| expected == self.calculated_crc32)
    }
}
