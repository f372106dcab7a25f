//! Line parsing for the two-channel serial protocol.
//!
//! The device emits newline-terminated UTF-8 lines of the form `"<int>,<int>"`.
//! Serial links are noisy, so anything that does not match is simply dropped:
//! a rejected line is not an error, the loop just moves on to the next one.

/// Parse one raw line into a channel pair.
///
/// Returns `None` on invalid UTF-8, wrong field count, or non-integer fields.
pub fn parse_line(raw: &[u8]) -> Option<(i64, i64)> {
    let text = std::str::from_utf8(raw).ok()?;
    let mut fields = text.trim().split(',');

    let a = fields.next()?.trim().parse::<i64>().ok()?;
    let b = fields.next()?.trim().parse::<i64>().ok()?;
    if fields.next().is_some() {
        return None;
    }

    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_pair() {
        assert_eq!(parse_line(b"10,20"), Some((10, 20)));
    }

    #[test]
    fn accepts_negative_values() {
        assert_eq!(parse_line(b"-512,4095"), Some((-512, 4095)));
    }

    #[test]
    fn accepts_trailing_crlf() {
        assert_eq!(parse_line(b"30,40\r\n"), Some((30, 40)));
    }

    #[test]
    fn rejects_non_integer_field() {
        assert_eq!(parse_line(b"abc,5"), None);
        assert_eq!(parse_line(b"1.5,2"), None);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(parse_line(b"42"), None);
        assert_eq!(parse_line(b"1,2,3"), None);
        assert_eq!(parse_line(b""), None);
    }

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(parse_line(b","), None);
        assert_eq!(parse_line(b"7,"), None);
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(parse_line(&[0xff, 0xfe, b'1', b',', b'2']), None);
    }
}
