// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers for each CLI command.
//
//   model_options.rs   - turns user options (config file,
//                        overrides, input size) into a validated
//                        ConvNetConfig plus an optional ShapePlan
//   summary_use_case.rs - builds the model and reports shapes
//                        and parameter counts
//   forward_use_case.rs - runs one forward pass on a seeded
//                        synthetic batch
//
// Rules for this layer:
//   - No tensor math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Generic over the burn Backend so tests run on NdArray

/// Config resolution from CLI-independent options
pub mod model_options;

/// Shape plan and parameter summary
pub mod summary_use_case;

/// Single forward pass on a synthetic batch
pub mod forward_use_case;
