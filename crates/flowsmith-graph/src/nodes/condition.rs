use crate::service::TextGenerator;
use anyhow::{bail, Result};
use flowsmith_types::ConditionParsing;
use std::sync::Arc;

/// Fixed system instruction for condition checks
pub const CONDITION_SYSTEM_INSTRUCTION: &str = "You evaluate whether a condition holds for a piece of text. \
Reply with exactly one word: true or false. Do not explain.";

/// Turns a condition prompt and the current value into a boolean
#[derive(Clone)]
pub struct ConditionEvaluator {
    generator: Arc<dyn TextGenerator>,
    parsing: ConditionParsing,
}

impl ConditionEvaluator {
    pub fn new(generator: Arc<dyn TextGenerator>, parsing: ConditionParsing) -> Self {
        Self { generator, parsing }
    }

    pub fn parsing(&self) -> ConditionParsing {
        self.parsing
    }

    pub async fn evaluate(&self, condition_prompt: &str, input: &str) -> Result<bool> {
        let message = Self::user_message(condition_prompt, input);
        let reply = self
            .generator
            .generate(CONDITION_SYSTEM_INSTRUCTION, &message)
            .await?;
        parse_verdict(&reply, self.parsing)
    }

    pub fn user_message(condition_prompt: &str, input: &str) -> String {
        format!("Condition: {}\n\nText:\n{}", condition_prompt, input)
    }
}

/// Read a verdict from a model reply.
///
/// Lenient mode never fails: a verbose or empty reply counts as `false`.
pub fn parse_verdict(reply: &str, parsing: ConditionParsing) -> Result<bool> {
    let verdict = reply.trim();
    if verdict.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    match parsing {
        ConditionParsing::Lenient => Ok(false),
        ConditionParsing::Strict if verdict.eq_ignore_ascii_case("false") => Ok(false),
        ConditionParsing::Strict => bail!("unrecognized condition verdict: {:?}", reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn test_lenient_parsing() {
        let lenient = ConditionParsing::Lenient;
        assert!(parse_verdict("true", lenient).unwrap());
        assert!(parse_verdict("  TRUE\n", lenient).unwrap());
        assert!(parse_verdict("True", lenient).unwrap());
        assert!(!parse_verdict("false", lenient).unwrap());
        assert!(!parse_verdict("true.", lenient).unwrap());
        assert!(!parse_verdict("Yes, it is true", lenient).unwrap());
        assert!(!parse_verdict("", lenient).unwrap());
    }

    #[test]
    fn test_strict_parsing() {
        let strict = ConditionParsing::Strict;
        assert!(parse_verdict(" true ", strict).unwrap());
        assert!(!parse_verdict("FALSE", strict).unwrap());
        assert!(parse_verdict("maybe", strict).is_err());
        assert!(parse_verdict("", strict).is_err());
    }

    struct Scripted {
        reply: &'static str,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, system: &str, user: &str) -> Result<String> {
            self.seen.lock().unwrap().push((system.to_string(), user.to_string()));
            Ok(self.reply.to_string())
        }
    }

    #[tokio::test]
    async fn test_evaluate_uses_fixed_instruction() {
        let generator = Arc::new(Scripted { reply: "true\n", seen: Mutex::new(Vec::new()) });
        let evaluator = ConditionEvaluator::new(generator.clone(), ConditionParsing::Lenient);

        assert!(evaluator.evaluate("Is it short?", "Short text").await.unwrap());

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen[0].0, CONDITION_SYSTEM_INSTRUCTION);
        assert!(seen[0].1.contains("Is it short?"));
        assert!(seen[0].1.contains("Short text"));
    }
}
