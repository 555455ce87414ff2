//! Value records exchanged between components.

/// A single 8-byte metadata write bound for NVM.
///
/// Records are copied by value across component boundaries; no component
/// shares ownership of another's interior state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    /// Partial-aligned byte address.
    pub addr: u64,
    /// 8-byte payload.
    pub data: u64,
}

impl WriteRecord {
    /// Creates a new write record.
    #[inline(always)]
    pub fn new(addr: u64, data: u64) -> Self {
        Self { addr, data }
    }
}
