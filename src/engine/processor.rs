use anyhow::Result;
use tracing::{info, warn};

/// Post-acceptance text transformation seam. Discovery and ordering of
/// processors belong to the embedding application; the engine only runs
/// whatever chain it was handed, in order.
pub trait SuggestionProcessor: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this processor wants to transform the given text.
    fn matches(&self, text: &str) -> bool;

    fn process(&self, text: &str) -> Result<String>;
}

/// Runs the chain over the text. A failing processor is logged and skipped,
/// leaving the text as the previous stage produced it.
pub fn apply_chain(processors: &[Box<dyn SuggestionProcessor>], text: String) -> String {
    let mut current = text;
    for processor in processors {
        if !processor.matches(&current) {
            continue;
        }
        match processor.process(&current) {
            Ok(output) => {
                info!(processor = processor.name(), "applied post-processor");
                current = output;
            }
            Err(error) => {
                warn!(
                    processor = processor.name(),
                    "post-processor failed, keeping text unchanged: {error:#}"
                );
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Shout;

    impl SuggestionProcessor for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn matches(&self, text: &str) -> bool {
            text.starts_with('!')
        }

        fn process(&self, text: &str) -> Result<String> {
            Ok(text.trim_start_matches('!').to_uppercase())
        }
    }

    struct Broken;

    impl SuggestionProcessor for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn matches(&self, _text: &str) -> bool {
            true
        }

        fn process(&self, _text: &str) -> Result<String> {
            bail!("out of order")
        }
    }

    #[test]
    fn non_matching_text_passes_through() {
        let chain: Vec<Box<dyn SuggestionProcessor>> = vec![Box::new(Shout)];
        assert_eq!(apply_chain(&chain, "hello".to_owned()), "hello");
    }

    #[test]
    fn matching_processor_transforms() {
        let chain: Vec<Box<dyn SuggestionProcessor>> = vec![Box::new(Shout)];
        assert_eq!(apply_chain(&chain, "!hello".to_owned()), "HELLO");
    }

    #[test]
    fn failing_processor_is_skipped() {
        let chain: Vec<Box<dyn SuggestionProcessor>> = vec![Box::new(Broken), Box::new(Shout)];
        assert_eq!(apply_chain(&chain, "!hello".to_owned()), "HELLO");
    }
}
