//! Length-restricted names made of LSDJ's character subset

use std::{fmt, str::FromStr};

use crate::error::NameError;

/// A null-terminated, length-restricted string of LSDJ characters.
///
/// Files, instruments and kits carry names of different maximum lengths,
/// which is why [`Name`] is generic over its capacity. Shorter names are
/// padded with zeroes.
///
/// The allowed characters are `A-Z`, `0-9`, space and `x`. The default ROM
/// draws the `x` as a lightning bolt.
///
/// # Example
///
/// ```
/// use lsdj::name::Name;
///
/// let name: Name<8> = "YOKAI".parse().unwrap();
/// assert_eq!(name.len(), 5);
/// assert_eq!(name.bytes(), b"YOKAI\0\0\0");
/// assert!("yokai".parse::<Name<8>>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Name<N> {
    // Drawn as a lightning bolt by the ROM
    const LIGHTNING_BOLT: u8 = b'x';

    /// Convert raw bytes into a name.
    ///
    /// Conversion stops at the first zero byte; anything after it is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NameError> {
        if bytes.len() > N {
            return Err(NameError::TooLong {
                len: bytes.len(),
                capacity: N,
            });
        }

        let mut dest = [0; N];
        for (index, &byte) in bytes.iter().enumerate() {
            match byte {
                0 => break,
                byte if Self::is_byte_allowed(byte) => dest[index] = byte,
                byte => return Err(NameError::InvalidByte { byte, index }),
            }
        }

        Ok(Self { bytes: dest })
    }

    /// The underlying bytes, including zero padding
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// The maximum number of characters
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of characters before the zero terminator
    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&byte| byte == 0).unwrap_or(N)
    }

    /// Whether the name has no characters at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the name as a string slice.
    pub fn as_str(&self) -> &str {
        // Every allowed byte is ASCII
        std::str::from_utf8(&self.bytes[..self.len()]).unwrap_or_default()
    }

    /// Whether a byte may appear in a name.
    pub fn is_byte_allowed(byte: u8) -> bool {
        byte.is_ascii_uppercase()
            || byte.is_ascii_digit()
            || byte == b' '
            || byte == Self::LIGHTNING_BOLT
    }
}

impl<const N: usize> Default for Name<N> {
    fn default() -> Self {
        Self { bytes: [0; N] }
    }
}

impl<const N: usize> fmt::Display for Name<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> TryFrom<&[u8]> for Name<N> {
    type Error = NameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl<const N: usize> TryFrom<&str> for Name<N> {
    type Error = NameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_bytes(s.as_bytes())
    }
}

impl<const N: usize> FromStr for Name<N> {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let name = Name::<8>::from_str("HELLO").unwrap();
        assert_eq!(name.len(), 5);
        assert!(!name.is_empty());
        assert_eq!(name.as_str(), "HELLO");
        assert_eq!(format!("{name}"), "HELLO");
        assert_eq!(name.capacity(), 8);
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            Name::<8>::from_str("123456789"),
            Err(NameError::TooLong {
                len: 9,
                capacity: 8
            })
        );
    }

    #[test]
    fn test_invalid_byte() {
        assert_eq!(
            Name::<8>::from_str("A!"),
            Err(NameError::InvalidByte {
                byte: b'!',
                index: 1
            })
        );
    }

    #[test]
    fn test_stops_at_null() {
        let name = Name::<8>::from_bytes(&[b'A', b'B', 0, 0xFF, 0xFF]).unwrap();
        assert_eq!(name.as_str(), "AB");
        assert_eq!(name.bytes(), &[b'A', b'B', 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_full_capacity() {
        let name = Name::<8>::from_str("ABCDEFGH").unwrap();
        assert_eq!(name.len(), 8);
        assert_eq!(name.as_str(), "ABCDEFGH");
    }

    #[test]
    fn test_lightning_bolt() {
        assert!(Name::<8>::is_byte_allowed(b'x'));
        assert!(!Name::<8>::is_byte_allowed(b'y'));
        assert_eq!(Name::<8>::from_str("AxB").unwrap().as_str(), "AxB");
    }

    #[test]
    fn test_default_is_empty() {
        let name = Name::<8>::default();
        assert_eq!(name.len(), 0);
        assert!(name.is_empty());
        assert_eq!(name.as_str(), "");
    }
}
