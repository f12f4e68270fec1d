use super::*;

fn names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("config-{}", i)).collect()
}

#[test]
fn test_single_digit_alias() {
    let suffix = trailing_alias("hello __3").unwrap();
    assert_eq!(suffix.number, Some(3));
    assert_eq!(suffix.char_len, 3);
}

#[test]
fn test_multi_digit_alias_takes_longest_run() {
    let suffix = trailing_alias("__12").unwrap();
    assert_eq!(suffix.number, Some(12));
    assert_eq!(suffix.char_len, 4);

    // Extra underscores before the prefix are not part of the match
    let suffix = trailing_alias("x___7").unwrap();
    assert_eq!(suffix.number, Some(7));
    assert_eq!(suffix.char_len, 3);
}

#[test]
fn test_alias_must_be_anchored_at_end() {
    assert!(trailing_alias("__3 ").is_none());
    assert!(trailing_alias("__3a").is_none());
    assert!(trailing_alias("_3").is_none());
    assert!(trailing_alias("__").is_none());
    assert!(trailing_alias("").is_none());
}

#[test]
fn test_later_alias_wins_over_earlier_one() {
    let suffix = trailing_alias("__1 then __25").unwrap();
    assert_eq!(suffix.number, Some(25));
    assert_eq!(suffix.char_len, 4);
}

#[test]
fn test_overflowing_digits_parse_to_none() {
    let buffer = format!("__{}", "9".repeat(40));
    let suffix = trailing_alias(&buffer).unwrap();
    assert_eq!(suffix.number, None);
    assert_eq!(suffix.char_len, 42);
}

#[test]
fn test_resolve_is_one_based_and_bounded() {
    let names = names(5);

    assert_eq!(resolve_alias(&names, 3), Some("config-3"));
    assert_eq!(resolve_alias(&names, 1), Some("config-1"));
    assert_eq!(resolve_alias(&names, 5), Some("config-5"));
    assert_eq!(resolve_alias(&names, 0), None);
    assert_eq!(resolve_alias(&names, 6), None);
    assert_eq!(resolve_alias(&[], 1), None);
}
