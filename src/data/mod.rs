// ============================================================
// Layer 4 - Input Streams
// ============================================================
// Readers for the inputs that arrive one line at a time:
//
//   disambiguation stream ─► DisambiguationReader ─► records
//
//   corpus stream ─┐
//                  ├──────► SentenceCursor (lockstep, forward only)
//   parse stream ──┘              │
//                                 ├─► read_factored_line ─► SentenceContext
//                                 └─► ParseChart          ─► SyntaxChart
//
// The cursor never looks ahead: it holds exactly the current
// line of each stream.

/// Iterator over PSD records
pub mod disambiguation;

/// Lockstep corpus/parse reader
pub mod cursor;

/// Factored token splitting
pub mod context;

/// Bracketed parse trees as constituent charts
pub mod parse_chart;
