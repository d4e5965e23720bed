//! Error types for imca-rps.

use thiserror::Error;

/// Errors decoding a neighbor seed string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// A character that is not a decimal digit.
    #[error("neighbor seed: expected a digit at position {position}, got {found:?}")]
    NotADigit {
        /// Character position in the seed string.
        position: usize,
        /// The offending character.
        found: char,
    },
}

/// Errors decoding a neighbor order string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// A character that is not a decimal digit.
    #[error("neighbor order: expected a digit at position {position}, got {found:?}")]
    NotADigit {
        /// Character position in the order string.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// A slot number outside `0..=7`.
    #[error("neighbor order: slot {slot} at position {position} exceeds the 8 neighbors")]
    SlotOutOfRange {
        /// Character position in the order string.
        position: usize,
        /// The slot that was given.
        slot: u32,
    },

    /// The same slot assigned to two directions.
    #[error("neighbor order: slot {slot} at position {position} is already taken")]
    DuplicateSlot {
        /// Character position in the order string.
        position: usize,
        /// The repeated slot.
        slot: u32,
    },

    /// More characters than there are neighbors.
    #[error("neighbor order: {len} entries given, at most 8 allowed")]
    TooLong {
        /// Length of the order string.
        len: usize,
    },
}

/// Invalid run configuration, detected before any sweep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The weapon alphabet is empty.
    #[error("number of weapons must be at least 1")]
    NoWeapons,

    /// More weapons than fit in a cell.
    #[error("number of weapons must be at most 256, got {weapons}")]
    TooManyWeapons {
        /// Requested weapon count.
        weapons: u32,
    },

    /// Weapon range reaching past the alphabet.
    #[error("weapon range ({pre}, {post}) must stay below the {weapons} weapons")]
    RangeOutOfBounds {
        /// Defendable predecessors.
        pre: u32,
        /// Defendable successors.
        post: u32,
        /// Weapon count.
        weapons: u32,
    },

    /// Loss threshold of zero.
    #[error("loss threshold must be positive")]
    ZeroThreshold,

    /// Bad neighbor seed.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// Bad neighbor order.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Errors from a [`FrameStore`](crate::FrameStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failure of the frame format.
    #[error("codec error: {0}")]
    Codec(String),

    /// A frame that exists but cannot be turned into a grid.
    #[error("frame {frame} is malformed: {reason}")]
    Malformed {
        /// Frame number.
        frame: u64,
        /// Why it was rejected.
        reason: String,
    },
}

/// Why a run stopped before sweeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Declined to touch an existing output location.
    ExistingOutput,
    /// Declined to continue a previous run.
    Resume,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::ExistingOutput => write!(f, "output location already exists"),
            AbortReason::Resume => write!(f, "resume declined"),
        }
    }
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration rejected before the run started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Persisting or loading a frame failed.
    #[error("frame store: {0}")]
    Store(#[from] StoreError),

    /// The decision provider aborted the run.
    #[error("run aborted: {0}")]
    Aborted(AbortReason),

    /// Resume requested but no frame could be loaded.
    #[error("no well-formed frame to resume from")]
    NoResumableFrame,

    /// A visitation order that is not a permutation of the grid cells.
    #[error("traversal must visit each of the {cells} cells exactly once")]
    InvalidTraversal {
        /// Number of cells in the grid.
        cells: usize,
    },
}
