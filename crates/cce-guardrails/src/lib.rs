//! Guardrail evaluation and deterministic repair
//!
//! The evaluator is a pure function over a draft and the compiled rule
//! set: it returns pass/fail plus an ordered list of violation reasons
//! and has no side effects. The deterministic repair strips banned
//! tokens and substitutes the default disclaimer; it is idempotent and
//! makes no claim of producing compliant output.
//!
//! Compliance violations are ordinary outcomes here, never errors; the
//! only failure mode is an invalid rule set (bad claim regex), which is
//! a fatal configuration error surfaced at compile time of the rules.

mod evaluate;
mod repair;
mod rules;

pub use evaluate::Evaluation;
pub use repair::RepairedFields;
pub use rules::CompiledGuardrails;
