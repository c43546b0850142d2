// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer builds tensors or modules directly.
//
//   model.rs    - ConvNetConfig and the ConvNet module:
//                 conv → pool → relu → conv → channel dropout
//                 → pool → relu → flatten → linear → relu
//                 → dropout → linear → log-softmax
//
//   dropout.rs  - channel-wise and element-wise dropout driven
//                 by an explicit ForwardMode
//
//   features.rs - flattened feature count of a tensor
//
//   batch.rs    - host pixels → input tensor, output tensor
//                 → host rows
//
//   backend.rs  - backend aliases used by the CLI
//
// Reference: Burn Book §3 (Building Blocks)

/// Classifier configuration and module
pub mod model;

/// Mode-driven dropout modules
pub mod dropout;

/// Tensor flatten helper
pub mod features;

/// Host data in and out of tensors
pub mod batch;

/// Backend selection for the binary
pub mod backend;
