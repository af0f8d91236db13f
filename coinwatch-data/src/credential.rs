use crate::error::DataError;

/// Hands out API keys in round-robin order so calls are spread evenly across keys.
///
/// Convention is "return current, then advance": the first call returns the first key.
#[derive(Debug, Clone)]
pub struct CredentialRotator {
    credentials: Vec<String>,
    index: usize,
}

impl CredentialRotator {
    /// Construct a rotator, failing with [`DataError::Configuration`] on an empty key set.
    pub fn new(credentials: impl IntoIterator<Item = String>) -> Result<Self, DataError> {
        let credentials = credentials.into_iter().collect::<Vec<_>>();
        if credentials.is_empty() {
            return Err(DataError::Configuration(
                "credential set is empty, at least one API key is required".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            index: 0,
        })
    }

    /// Next credential in rotation.
    pub fn next(&mut self) -> &str {
        let current = self.index;
        self.index = (self.index + 1) % self.credentials.len();
        &self.credentials[current]
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always `false`: [`CredentialRotator::new`] rejects an empty set. Pairs with `len`.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
