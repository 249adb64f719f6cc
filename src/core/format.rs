//! Message body formatting
//!
//! Three paths, cheapest first:
//! 1. no arguments: the format text is copied verbatim
//! 2. one primitive argument and a single bare `{}`: prefix, value, suffix
//! 3. everything else: placeholder substitution
//!
//! Placeholders are `{}`; `{{` and `}}` render literal braces. A placeholder
//! without a matching argument renders as `{}`, and surplus arguments are
//! appended after the message, each preceded by a space.

use super::arg::Arg;

/// Append the rendered message body to `buf`
pub fn write_message(buf: &mut Vec<u8>, format: &str, args: &[Arg<'_>]) {
    match args {
        [] => buf.extend_from_slice(format.as_bytes()),
        [arg] if arg.is_primitive() => match split_single_placeholder(format) {
            Some((prefix, suffix)) => {
                buf.extend_from_slice(prefix.as_bytes());
                arg.write_to(buf);
                buf.extend_from_slice(suffix.as_bytes());
            }
            None => substitute(buf, format, args),
        },
        _ => substitute(buf, format, args),
    }
}

/// Render the message body into a fresh `String`
pub fn format_message(format: &str, args: &[Arg<'_>]) -> String {
    let mut buf = Vec::with_capacity(estimate_len(format, args));
    write_message(&mut buf, format, args);
    // Every path appends whole UTF-8 sequences.
    String::from_utf8(buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Upper-bound guess of the rendered body length
pub fn estimate_len(format: &str, args: &[Arg<'_>]) -> usize {
    format.len() + args.iter().map(Arg::size_hint).sum::<usize>()
}

/// Split a format holding exactly one `{}` and no escaped braces
fn split_single_placeholder(format: &str) -> Option<(&str, &str)> {
    let pos = format.find("{}")?;
    let (prefix, rest) = format.split_at(pos);
    let suffix = &rest[2..];
    let has_brace = |s: &str| s.contains('{') || s.contains('}');
    if has_brace(prefix) || has_brace(suffix) {
        return None;
    }
    Some((prefix, suffix))
}

fn substitute(buf: &mut Vec<u8>, format: &str, args: &[Arg<'_>]) {
    let bytes = format.as_bytes();
    let mut next_arg = args.iter();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'{', Some(b'{')) | (b'}', Some(b'}')) => {
                buf.extend_from_slice(&bytes[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            (b'{', Some(b'}')) => {
                buf.extend_from_slice(&bytes[literal_start..i]);
                match next_arg.next() {
                    Some(arg) => arg.write_to(buf),
                    None => buf.extend_from_slice(b"{}"),
                }
                i += 2;
                literal_start = i;
            }
            _ => i += 1,
        }
    }
    buf.extend_from_slice(&bytes[literal_start..]);

    for extra in next_arg {
        buf.push(b' ');
        extra.write_to(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_is_verbatim() {
        assert_eq!(format_message("100% {} {{done}}", &[]), "100% {} {{done}}");
    }

    #[test]
    fn test_single_primitive_fast_path() {
        assert_eq!(format_message("value={}", &[Arg::from(42)]), "value=42");
        assert_eq!(format_message("{}", &[Arg::from("plain")]), "plain");
        assert_eq!(format_message("pi is {} roughly", &[Arg::from(3.14)]), "pi is 3.14 roughly");

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(format_message("failed: {}", &[Arg::error(&err)]), "failed: missing");
    }

    #[test]
    fn test_single_arg_with_escapes_uses_general_path() {
        assert_eq!(format_message("{{{}}}", &[Arg::from(1)]), "{1}");
        assert_eq!(format_message("flag={}", &[Arg::from(true)]), "flag=true");
    }

    #[test]
    fn test_multiple_args() {
        let out = format_message(
            "user {} did {} in {}ms",
            &[Arg::from("ann"), Arg::from("login"), Arg::from(12u32)],
        );
        assert_eq!(out, "user ann did login in 12ms");
    }

    #[test]
    fn test_missing_args_keep_placeholder() {
        assert_eq!(format_message("{} and {}", &[Arg::from('a'), Arg::from(true)]), "a and true");
        assert_eq!(format_message("{} and {} and {}", &[Arg::from(1), Arg::from(2)]), "1 and 2 and {}");
    }

    #[test]
    fn test_surplus_args_are_appended() {
        assert_eq!(format_message("count", &[Arg::from(1), Arg::from(2)]), "count 1 2");
        assert_eq!(format_message("a={}", &[Arg::from(1), Arg::from("b")]), "a=1 b");
    }

    #[test]
    fn test_unicode_literals_survive() {
        assert_eq!(format_message("héllo {} wörld", &[Arg::from(1), Arg::from(2)]), "héllo 1 wörld 2");
    }

    #[test]
    fn test_lone_braces_are_literal() {
        assert_eq!(format_message("{ {} }", &[Arg::from(1), Arg::from(2)]), "{ 1 } 2");
    }
}
