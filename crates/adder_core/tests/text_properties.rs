use adder_core::Text;
use adder_core::text::INLINE_CAP;
use proptest::prelude::*;

proptest! {
    #[test]
    fn short_payloads_stay_inline(s in "\\PC{0,30}") {
        let t = Text::from_str(&s);
        prop_assert_eq!(t.as_str(), s.as_str());
        prop_assert_eq!(t.is_inline(), s.len() <= INLINE_CAP);
        prop_assert_eq!(Text::from_string(s.clone()), t);
    }
}

proptest! {
    #[test]
    fn concat_keeps_bytes_and_counts(a in "\\PC{0,20}", b in "\\PC{0,20}") {
        let t = Text::from_str(&a).concat(&Text::from_str(&b));
        let expected = format!("{a}{b}");
        prop_assert_eq!(t.as_str(), expected.as_str());
        prop_assert_eq!(t.char_count(), expected.chars().count());
        prop_assert_eq!(t.is_inline(), expected.len() <= INLINE_CAP);
    }
}

proptest! {
    #[test]
    fn code_point_access_agrees_with_chars(s in "\\PC{0,40}") {
        let t = Text::from_str(&s);
        let chars: Vec<char> = s.chars().collect();
        prop_assert_eq!(t.char_count(), chars.len());
        prop_assert_eq!(t.is_ascii(), s.is_ascii());
        for (i, c) in chars.iter().enumerate() {
            prop_assert_eq!(t.char_at(i), Some(*c));
            let at = t.byte_offset(i).unwrap();
            prop_assert_eq!(s[at..].chars().next(), Some(*c));
        }
        prop_assert_eq!(t.char_at(chars.len()), None);
        prop_assert_eq!(t.byte_offset(chars.len()), Some(s.len()));
    }
}

proptest! {
    #[test]
    fn ordering_follows_code_points(a in "\\PC{0,8}", b in "\\PC{0,8}") {
        let ta = Text::from_str(&a);
        let tb = Text::from_str(&b);
        let by_chars = a.chars().cmp(b.chars());
        prop_assert_eq!(ta.cmp(&tb), by_chars);
    }
}
