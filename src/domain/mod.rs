// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types that describe the classifier without
// touching the tensor framework:
//
//   shape.rs - conv/pool output arithmetic and the per-stage
//              shape plan derived from an input size
//   mode.rs  - the explicit train / eval flag handed to
//              every forward pass
//   error.rs - the error type returned by model construction
//              and by the forward pass
//
// Rules for this layer:
//   - NO burn types allowed here
//   - NO clap types (CLI value mapping lives in Layer 1)
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

/// Convolution / pooling shape arithmetic
pub mod shape;

/// Train / eval forward mode
pub mod mode;

/// Model construction and forward-pass errors
pub mod error;
