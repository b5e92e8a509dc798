use std::{borrow::Cow, fmt};

/// Hex display of raw MIDI bytes, e.g. `[d0 35]`.
#[derive(Debug)]
pub struct Displayable<'a>(Cow<'a, [u8]>);

impl<'a> From<&'a [u8]> for Displayable<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self(Cow::Borrowed(buf))
    }
}

impl<'a> Displayable<'a> {
    pub fn to_owned(&self) -> Displayable<'static> {
        Displayable(Cow::Owned(self.0.to_vec()))
    }
}

impl<'a> fmt::Display for Displayable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;

        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first:02x}")?;
            for byte in iter {
                write!(f, " {byte:02x}")?;
            }
        }

        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::Displayable;

    #[test]
    fn display() {
        assert_eq!(Displayable::from([0xd0u8, 0x35].as_slice()).to_string(), "[d0 35]");
        assert_eq!(Displayable::from(&[] as &[u8]).to_string(), "[]");
    }
}
