//! Store key layout shared by every cache backend

/// Well-known key of the global ID counter
pub const ID_COUNTER_KEY: &str = "global:nextItemId";

/// Prefix of the key under which each cached response is stored
pub const ITEM_KEY_PREFIX: &str = "item:";

/// Derives the store key for a cached item ID
pub fn item_key(id: i64) -> String {
    format!("{}{}", ITEM_KEY_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_key_is_prefix_plus_decimal_id() {
        assert_eq!(item_key(7), "item:7");
        assert_eq!(item_key(1234567890123), "item:1234567890123");
    }

    #[test]
    fn test_item_keys_never_collide_with_counter() {
        assert_ne!(item_key(0), ID_COUNTER_KEY);
    }
}
