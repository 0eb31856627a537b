/// A single UTF-16 code unit; the engine's atomic text element.
/// Surrogate pairs are treated as two independent units.
pub type CodeUnit = u16;

/// A capture-storage slot. Capturing groups are numbered 1..=N in
/// left-to-right open-paren order; slot 0 names the overall match.
pub type StorageIndex = usize;

/// Identifies a lookahead sub-automaton within a compiled package.
pub type LookAheadId = u32;
