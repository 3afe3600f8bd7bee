use super::core::PageSession;

#[test]
fn test_get_modifiers() {
    let modifiers = ["Control", "Shift"];
    let flags = PageSession::get_modifiers(&modifiers);
    assert_eq!(flags, 10); // 2 + 8
}

#[test]
fn test_get_modifiers_mac() {
    let modifiers = ["Meta", "a"];
    // Only Meta should be counted, 'a' is not a modifier
    let flags = PageSession::get_modifiers(&modifiers[..1]);
    assert_eq!(flags, 4);
}

#[test]
fn test_get_modifiers_unknown_ignored() {
    let modifiers = ["Hyper"];
    assert_eq!(PageSession::get_modifiers(&modifiers), 0);
}
