/*
Token Bridge

Reads the Token layer of a CAS and pairs every token's position in the word sequence
handed to the NLP model with its character offsets. Model output refers to tokens only by
index, so this pairing is the single place where indices are turned back into offsets.
*/

use crate::core::platform::container::cas::{covered_text_in, Cas, CasError, TextIndex};
use crate::core::platform::container::prediction::TOKEN_TYPE;
use crate::core::platform::container::type_system::TypeSystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    pub index: usize,
    pub begin: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBridge {
    tokens: Vec<TokenRef>,
}

impl TokenBridge {
    /// Tokens are taken in document order as returned by the selection; no re-sorting
    /// happens here. An empty Token layer produces an empty bridge.
    pub fn from_cas(cas: &Cas, type_system: &TypeSystem) -> Result<Self, CasError> {
        let selected = cas.select(type_system, TOKEN_TYPE)?;
        if selected.is_empty() {
            return Ok(Self::default());
        }

        let index = TextIndex::new(cas.document_text()?);
        let tokens = selected
            .into_iter()
            .enumerate()
            .map(|(i, token)| -> Result<TokenRef, CasError> {
                let text = covered_text_in(&index, token)?;
                let (begin, end) = token.span().unwrap_or_default();
                Ok(TokenRef {
                    index: i,
                    begin,
                    end,
                    text: text.to_string(),
                })
            })
            .collect::<Result<Vec<_>, CasError>>()?;

        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[TokenRef] {
        &self.tokens
    }

    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// Character span covered by tokens [start, end). None for empty or out-of-range
    /// token ranges.
    pub fn span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.tokens.len() {
            return None;
        }
        Some((self.tokens[start].begin, self.tokens[end - 1].end))
    }
}
