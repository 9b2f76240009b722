pub mod transform;
pub mod condition;

pub use transform::{TransformInvoker, DEFAULT_SYSTEM_INSTRUCTION, INPUT_PLACEHOLDER};
pub use condition::{parse_verdict, ConditionEvaluator, CONDITION_SYSTEM_INSTRUCTION};
