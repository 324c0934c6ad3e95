use super::*;

#[test]
fn builtin_has_common_words_and_omits_boast() {
    let t = AbilityWordTable::builtin();
    assert!(t.contains("Heroic"));
    assert!(t.contains("Landfall"));
    assert!(t.contains("Council's dilemma"));
    assert!(!t.contains("Boast"));
    assert!(!t.contains("heroic"));
}

#[test]
fn longest_entry_wins() {
    let t = AbilityWordTable::from_words(["Council", "Council's dilemma"]).unwrap();
    assert_eq!(
        t.longest_prefix_of("Council's dilemma — Vote."),
        Some("Council's dilemma")
    );
    assert_eq!(t.longest_prefix_of("Council — x"), Some("Council"));
    assert_eq!(t.longest_prefix_of("Other — x"), None);
}

#[test]
fn duplicates_collapse() {
    let t = AbilityWordTable::from_words(["Raid", "Raid", "Morbid"]).unwrap();
    assert_eq!(t.len(), 2);
}

#[test]
fn rejects_padded_or_empty_entries() {
    assert!(AbilityWordTable::from_words([""]).is_err());
    assert!(AbilityWordTable::from_words([" Raid"]).is_err());
    assert!(AbilityWordTable::from_words(["Ra\nid"]).is_err());
}

#[test]
fn json_round_trips_through_word_list() {
    let t = AbilityWordTable::from_json_str(r#"["Heroic","Boast"]"#).unwrap();
    assert!(t.contains("Boast"));
    let s = serde_json::to_string(&t).unwrap();
    let back = AbilityWordTable::from_json_str(&s).unwrap();
    assert_eq!(back, t);

    let err = AbilityWordTable::from_json_str(r#"["ok", ""]"#).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}
