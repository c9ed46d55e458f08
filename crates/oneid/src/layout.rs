use core::fmt;
use core::marker::PhantomData;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::id::{OneId, bit_mask};

/// The allocation of an identifier's bits between the tick, server id,
/// process id and sequence fields.
///
/// ```text
///  MSB                                                           LSB
///  +-----------+----------------+------------------+----------------+
///  | tick      | server id      | process id       | sequence       |
///  +-----------+----------------+------------------+----------------+
///              |<------------ ID::TOTAL_BITS ---------------------->|
/// ```
///
/// A layout is immutable once built. Server, process and sequence bits always
/// add up to [`OneId::TOTAL_BITS`]; the tick takes whatever the width has
/// left.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitLayout<ID: OneId> {
    server_bits: u32,
    process_bits: u32,
    sequence_bits: u32,
    _width: PhantomData<fn() -> ID>,
}

impl<ID: OneId> BitLayout<ID> {
    /// Builds a layout from the requested field widths, correcting them
    /// instead of failing.
    ///
    /// - Each width below its minimum is raised to the minimum.
    /// - If the three widths overflow [`OneId::TOTAL_BITS`], all of them are
    ///   replaced by the width defaults.
    /// - If they fall short, the sequence absorbs every remaining bit.
    ///
    /// # Example
    /// ```
    /// use oneid::BitLayout;
    ///
    /// // Vertical scaling: few servers, many processes.
    /// let layout = BitLayout::<u64>::new(1, 6, 0);
    /// assert_eq!(layout.server_bits(), 1);
    /// assert_eq!(layout.process_bits(), 6);
    /// assert_eq!(layout.sequence_bits(), 32);
    /// ```
    pub fn new(server_bits: u32, process_bits: u32, sequence_bits: u32) -> Self {
        let server_bits = server_bits.max(ID::MIN_SERVER_BITS);
        let process_bits = process_bits.max(ID::MIN_PROCESS_BITS);
        let sequence_bits = sequence_bits.max(ID::MIN_SEQUENCE_BITS);

        let requested = u64::from(server_bits) + u64::from(process_bits) + u64::from(sequence_bits);
        let total = u64::from(ID::TOTAL_BITS);

        if requested > total {
            #[cfg(feature = "tracing")]
            debug!(
                width = ID::NAME,
                server_bits,
                process_bits,
                sequence_bits,
                "requested layout overflows {total} bits, using defaults"
            );
            return Self::default();
        }

        let layout = Self::from_parts(
            server_bits,
            process_bits,
            ID::TOTAL_BITS - server_bits - process_bits,
        );

        #[cfg(feature = "tracing")]
        if layout.sequence_bits != sequence_bits {
            debug!(
                width = ID::NAME,
                requested = sequence_bits,
                granted = layout.sequence_bits,
                "sequence widened to fill the layout"
            );
        }

        layout
    }

    const fn from_parts(server_bits: u32, process_bits: u32, sequence_bits: u32) -> Self {
        Self {
            server_bits,
            process_bits,
            sequence_bits,
            _width: PhantomData,
        }
    }

    pub const fn server_bits(&self) -> u32 {
        self.server_bits
    }

    pub const fn process_bits(&self) -> u32 {
        self.process_bits
    }

    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    /// Bits left for the tick above the layout.
    pub const fn timestamp_bits(&self) -> u32 {
        ID::PAYLOAD_BITS - ID::TOTAL_BITS
    }

    pub const fn max_server_id(&self) -> u64 {
        bit_mask(self.server_bits)
    }

    pub const fn max_process_id(&self) -> u64 {
        bit_mask(self.process_bits)
    }

    /// Largest sequence value a single tick can hold.
    pub const fn max_sequence(&self) -> u64 {
        bit_mask(self.sequence_bits)
    }

    /// Largest tick representable before the timestamp field wraps.
    pub const fn max_timestamp(&self) -> u64 {
        bit_mask(self.timestamp_bits())
    }

    const fn process_shift(&self) -> u32 {
        self.sequence_bits
    }

    const fn server_shift(&self) -> u32 {
        self.sequence_bits + self.process_bits
    }

    const fn timestamp_shift(&self) -> u32 {
        ID::TOTAL_BITS
    }

    /// Packs the four fields into an identifier.
    ///
    /// Every field is masked to its width; values that do not fit lose their
    /// high-order bits rather than spilling into the neighbouring field.
    pub fn pack(&self, tick: u64, server_id: u64, process_id: u64, sequence: u64) -> ID {
        let timestamp = (tick & self.max_timestamp()) << self.timestamp_shift();
        let server_id = (server_id & self.max_server_id()) << self.server_shift();
        let process_id = (process_id & self.max_process_id()) << self.process_shift();
        let sequence = sequence & self.max_sequence();
        ID::from_u64(timestamp | server_id | process_id | sequence)
    }

    /// Splits an identifier back into its fields.
    ///
    /// # Example
    /// ```
    /// use oneid::BitLayout;
    ///
    /// let layout = BitLayout::<u32>::default();
    /// let id = layout.pack(3, 17, 9, 100);
    /// let parts = layout.decompose(id);
    /// assert_eq!((parts.timestamp, parts.server_id, parts.process_id, parts.sequence), (3, 17, 9, 100));
    /// ```
    pub fn decompose(&self, id: ID) -> IdParts {
        let raw = id.to_u64();
        IdParts {
            timestamp: (raw >> self.timestamp_shift()) & self.max_timestamp(),
            server_id: (raw >> self.server_shift()) & self.max_server_id(),
            process_id: (raw >> self.process_shift()) & self.max_process_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}

impl<ID: OneId> Default for BitLayout<ID> {
    /// The width's built-in split.
    fn default() -> Self {
        Self::from_parts(
            ID::DEFAULT_SERVER_BITS,
            ID::DEFAULT_PROCESS_BITS,
            ID::DEFAULT_SEQUENCE_BITS,
        )
    }
}

impl<ID: OneId> fmt::Debug for BitLayout<ID> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitLayout")
            .field("width", &ID::NAME)
            .field("timestamp_bits", &self.timestamp_bits())
            .field("server_bits", &self.server_bits)
            .field("process_bits", &self.process_bits)
            .field("sequence_bits", &self.sequence_bits)
            .finish()
    }
}

/// The fields of a packed identifier.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdParts {
    /// Tick at which the id was issued, possibly wrapped.
    pub timestamp: u64,
    pub server_id: u64,
    pub process_id: u64,
    pub sequence: u64,
}

impl fmt::Display for IdParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick={} server={} process={} sequence={}",
            self.timestamp, self.server_id, self.process_id, self.sequence
        )
    }
}
