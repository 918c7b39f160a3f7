//! The valid-token allow-list.

use std::collections::HashSet;

use parking_lot::RwLock;

use crate::domain::TokenSymbol;

/// Tokens the engine is currently allowed to cycle through. Replaceable at
/// runtime when operations turn a currency on or off.
pub struct AllowList {
    tokens: RwLock<HashSet<TokenSymbol>>,
}

impl AllowList {
    pub fn new(tokens: impl IntoIterator<Item = TokenSymbol>) -> Self {
        Self {
            tokens: RwLock::new(tokens.into_iter().collect()),
        }
    }

    pub fn replace(&self, tokens: impl IntoIterator<Item = TokenSymbol>) {
        *self.tokens.write() = tokens.into_iter().collect();
    }

    pub fn contains(&self, token: &TokenSymbol) -> bool {
        self.tokens.read().contains(token)
    }

    pub fn snapshot(&self) -> HashSet<TokenSymbol> {
        self.tokens.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_the_whole_set() {
        let list = AllowList::new([TokenSymbol::from("ETH")]);
        assert!(list.contains(&TokenSymbol::from("ETH")));

        list.replace([TokenSymbol::from("SOL")]);
        assert!(!list.contains(&TokenSymbol::from("ETH")));
        assert!(list.contains(&TokenSymbol::from("SOL")));
    }
}
