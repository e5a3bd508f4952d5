//! Encoding helpers shared across the demo crates so that credential ids, challenges and client
//! data all agree on a single textual representation.

use data_encoding::{Specification, BASE64URL, BASE64URL_NOPAD, BASE64_NOPAD};

const PADDING: char = '=';

/// Convert bytes to base64 without padding
pub fn base64(data: &[u8]) -> String {
    BASE64_NOPAD.encode(data)
}

/// Convert bytes to base64url without padding
pub fn base64url(data: &[u8]) -> String {
    BASE64URL_NOPAD.encode(data)
}

/// Try parsing from base64 with or without padding
pub(crate) fn try_from_base64(input: &str) -> Option<Vec<u8>> {
    let sane_string = input.trim_end_matches(PADDING);
    BASE64_NOPAD.decode(sane_string.as_bytes()).ok()
}

/// Try parsing from base64url with or without padding. Trailing bits are not checked since some
/// browsers emit non-canonical encodings of the challenge.
pub fn try_from_base64url(input: &str) -> Option<Vec<u8>> {
    let specs = Specification {
        check_trailing_bits: false,
        padding: None,
        ..BASE64URL.specification()
    };
    let encoding = specs.encoding().ok()?;
    let sane_string = input.trim_end_matches(PADDING);
    encoding.decode(sane_string.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64url_round_trip_without_padding() {
        let encoded = base64url(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert_eq!(try_from_base64url(&encoded), Some(vec![0xfb, 0xff]));
        assert_eq!(try_from_base64url("-_8="), Some(vec![0xfb, 0xff]));
    }

    #[test]
    fn base64_rejects_url_alphabet() {
        assert_eq!(base64(&[0xfb, 0xff]), "+/8");
        assert_eq!(try_from_base64("-_8"), None);
    }
}
