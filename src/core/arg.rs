//! Message arguments
//!
//! `Arg` is the value type substituted into `{}` placeholders. Primitive
//! variants are rendered without going through `core::fmt` machinery where
//! possible; anything else can be passed through [`Arg::display`].

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io::Write;

#[derive(Clone)]
pub enum Arg<'a> {
    Str(Cow<'a, str>),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Error(&'a (dyn Error + 'a)),
    Display(&'a (dyn fmt::Display + 'a)),
}

impl<'a> Arg<'a> {
    /// Wrap an error value; rendered with its `Display` text
    pub fn error<E: Error + 'a>(err: &'a E) -> Self {
        Arg::Error(err)
    }

    /// Wrap any displayable value
    pub fn display<T: fmt::Display + 'a>(value: &'a T) -> Self {
        Arg::Display(value)
    }

    /// Kinds eligible for the single-argument fast path
    pub(crate) fn is_primitive(&self) -> bool {
        matches!(
            self,
            Arg::Str(_) | Arg::Int(_) | Arg::Uint(_) | Arg::Float(_) | Arg::Error(_)
        )
    }

    /// Rough rendered length, used only to size buffers
    pub(crate) fn size_hint(&self) -> usize {
        match self {
            Arg::Str(s) => s.len(),
            Arg::Int(_) | Arg::Uint(_) => 20,
            Arg::Float(_) => 24,
            Arg::Bool(_) => 5,
            Arg::Char(c) => c.len_utf8(),
            Arg::Error(_) | Arg::Display(_) => 32,
        }
    }

    /// Append the textual form of this argument to `buf`
    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        // Writing into a Vec<u8> cannot fail.
        let _ = match self {
            Arg::Str(s) => {
                buf.extend_from_slice(s.as_bytes());
                Ok(())
            }
            Arg::Int(v) => write!(buf, "{}", v),
            Arg::Uint(v) => write!(buf, "{}", v),
            Arg::Float(v) => write!(buf, "{}", v),
            Arg::Bool(v) => {
                buf.extend_from_slice(if *v { b"true" } else { b"false" });
                Ok(())
            }
            Arg::Char(c) => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
                Ok(())
            }
            Arg::Error(e) => write!(buf, "{}", e),
            Arg::Display(d) => write!(buf, "{}", d),
        };
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(v) => write!(f, "{}", v),
            Arg::Uint(v) => write!(f, "{}", v),
            Arg::Float(v) => write!(f, "{}", v),
            Arg::Bool(v) => write!(f, "{}", v),
            Arg::Char(c) => write!(f, "{}", c),
            Arg::Error(e) => write!(f, "{}", e),
            Arg::Display(d) => write!(f, "{}", d),
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Arg::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Arg::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Arg::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Arg::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Arg::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
            Arg::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Arg::Str(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(s: String) -> Self {
        Arg::Str(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Arg<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Arg::Str(s)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg<'_> {
    fn from(v: f32) -> Self {
        Arg::Float(v as f64)
    }
}

impl From<f64> for Arg<'_> {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg<'_> {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<char> for Arg<'_> {
    fn from(v: char) -> Self {
        Arg::Char(v)
    }
}
