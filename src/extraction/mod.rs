// ============================================================
// Layer 5 - Extraction
// ============================================================
// Everything that turns aligned records into training examples:
//
//   resolver.rs - syntax features and the bounded parent search
//                 over a SyntaxChart
//
//   features.rs - feature templates over a finished Example
//
//   driver.rs   - the streaming loop that groups records by
//                 source phrase, keeps the sentence cursor in
//                 step and hands surviving groups to a sink

/// Span-widening parent search
pub mod resolver;

/// Feature templates for the ranking model
pub mod features;

/// The grouping loop
pub mod driver;
