//! Semantic cache key extracted from a request

/// Separator used when joining message contents into the index key
pub const CONTEXT_SEPARATOR: &str = " ";

/// Ordered message contents of a single request.
///
/// Order is significant: `["A", "B"]` and `["B", "A"]` are different keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    messages: Vec<String>,
}

impl Context {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A context with no messages carries nothing to index
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Joins all message contents into the string sent to the similarity index
    pub fn joined(&self) -> String {
        self.messages.join(CONTEXT_SEPARATOR)
    }
}

impl From<Vec<String>> for Context {
    fn from(messages: Vec<String>) -> Self {
        Self::new(messages)
    }
}

impl FromIterator<String> for Context {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_preserves_order() {
        let context = Context::from(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(context.joined(), "A B");

        let reversed = Context::from(vec!["B".to_string(), "A".to_string()]);
        assert_ne!(context, reversed);
    }

    #[test]
    fn test_empty_context() {
        assert!(Context::default().is_empty());
        assert!(Context::from(Vec::new()).is_empty());
    }

    #[test]
    fn test_blank_messages_are_not_empty() {
        let context = Context::from(vec!["".to_string(), "  ".to_string()]);

        assert!(!context.is_empty());
        assert_eq!(context.len(), 2);
        assert_eq!(context.joined(), "   ");
    }

    #[test]
    fn test_from_iterator() {
        let context: Context = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(context.len(), 3);
        assert_eq!(context.messages()[2], "z");
    }
}
