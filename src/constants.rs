//! Centralized constants for the datagen library
//!
//! This module contains all hardcoded constants used throughout the codebase.
//! All new constants should be added here rather than scattered throughout the code.
//! Constants are organized by category for easy reference and maintenance.

// ============================================================================
// LAYOUT DECISION CONSTANTS
// ============================================================================

/// Density below which a block is considered for sparse representation
pub const SPARSITY_TURN_POINT: f64 = 0.4;

/// Bytes per cell of a dense block (one f64)
pub const DENSE_CELL_BYTES: f64 = 8.0;

/// Fixed bytes per allocated sparse row (vector header plus bookkeeping)
pub const SPARSE_ROW_OVERHEAD_BYTES: f64 = 48.0;

/// Bytes per stored sparse entry (column index plus f64 value)
pub const SPARSE_ENTRY_BYTES: f64 = 16.0;

/// Fixed bytes for the sparse row table itself, per row (one pointer slot)
pub const SPARSE_ROW_POINTER_BYTES: f64 = 8.0;

// ============================================================================
// PARALLELISM CONSTANTS
// ============================================================================

/// Minimum number of cells before generation is parallelized (512K cells)
pub const PAR_NUMCELL_THRESHOLD: u64 = 512 * 1024;

// ============================================================================
// SEED DERIVATION CONSTANTS
// ============================================================================

/// Number of 32-bit bootstrap integers used to seed the big generator
pub const BOOTSTRAP_SEED_WORDS: usize = 32;

// ============================================================================
// DEFAULT BLOCKING
// ============================================================================

/// Default rows per block
pub const DEFAULT_ROWS_PER_BLOCK: usize = 1000;

/// Default columns per block
pub const DEFAULT_COLS_PER_BLOCK: usize = 1000;

/// Maximum number of blocks per matrix (native 32-bit signed range)
pub const MAX_NUM_BLOCKS: u64 = i32::MAX as u64;
