// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File-system concerns that sit outside the model itself:
//
//   config_store.rs - reads and writes ConvNetConfig as
//                     pretty-printed JSON so a model shape
//                     can be recreated from a file
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Model configuration persistence
pub mod config_store;
