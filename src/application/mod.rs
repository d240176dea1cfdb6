// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal:
// running an extraction, or inspecting a single parse.
//
// Rules for this layer:
//   - No feature templates or chart logic here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// The extraction workflow
pub mod extract_use_case;

// Single-sentence chart inspection
pub mod inspect_use_case;
