use std::convert::TryFrom;
use std::str::FromStr;

use crate::Tag;

mod codec;

macro_rules! check_tags {
    {$($tag:ident = $val:literal, $name:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(Tag::$tag), $val);
            assert_eq!(Tag::try_from($val as u8), Ok(Tag::$tag));
            assert_eq!(Tag::$tag.name(), $name);
            assert_eq!(Tag::from_str($name), Ok(Tag::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0, "end",
        Byte = 1, "byte",
        Short = 2, "short",
        Int = 3, "int",
        Long = 4, "long",
        Float = 5, "float",
        Double = 6, "double",
        ByteArray = 7, "byteArray",
        String = 8, "string",
        List = 9, "list",
        Compound = 10, "compound",
        IntArray = 11, "intArray",
        LongArray = 12, "longArray",
    }

    for value in 13..=u8::MAX {
        assert!(Tag::try_from(value).is_err())
    }
}

#[test]
fn tag_all_is_in_numeric_order() {
    for (i, tag) in Tag::ALL.iter().enumerate() {
        assert_eq!(u8::from(*tag) as usize, i);
    }
}

#[test]
fn unknown_tag_name() {
    assert!(Tag::from_str("bytearray").is_err());
    assert!(Tag::from_str("").is_err());
}

#[test]
fn tag_display_is_name() {
    assert_eq!(Tag::LongArray.to_string(), "longArray");
}
