//! SanitizedName - filesystem-safe token derived from a camera display name
//!
//! The mapping is total and deterministic so that repeated runs overwrite
//! the same preview file.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Filesystem-safe camera name.
///
/// Only obtainable through [`sanitize`], which guarantees every path built
/// from a display name goes through the same transform.
///
/// # Examples
/// ```
/// use contracts::sanitize;
///
/// let name = sanitize("Front Door (North)");
/// assert_eq!(name.as_str(), "front_door_-north-");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SanitizedName(String);

impl SanitizedName {
    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Preview file name for this camera (`<name>.webp`).
    pub fn file_name(&self) -> String {
        format!("{}.webp", self.0)
    }
}

/// Map a free-text camera name to a filesystem-safe token.
///
/// Applied in order over the whole string: lowercase, `' '` to `'_'`,
/// `'('` and `')'` to `'-'`, `'.'` to `'+'`.
pub fn sanitize(display_name: &str) -> SanitizedName {
    let token = display_name
        .to_lowercase()
        .replace(' ', "_")
        .replace('(', "-")
        .replace(')', "-")
        .replace('.', "+");
    SanitizedName(token)
}

impl Deref for SanitizedName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SanitizedName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SanitizedName({:?})", self.0)
    }
}

impl PartialEq<str> for SanitizedName {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SanitizedName {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for SanitizedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_transform() {
        assert_eq!(sanitize("Front Door (North)"), "front_door_-north-");
        assert_eq!(sanitize("Cam 1.2"), "cam_1+2");
        assert_eq!(sanitize("PARKING"), "parking");
    }

    #[test]
    fn test_every_mapped_character() {
        assert_eq!(sanitize(" ().A"), "_--+a");
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        assert_eq!(sanitize("gate-2_east+b"), "gate-2_east+b");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_non_ascii_lowercase() {
        assert_eq!(sanitize("Ŝtreet Ĉam"), "ŝtreet_ĉam");
    }

    #[test]
    fn test_deterministic() {
        let names = ["Lobby (Main)", "Dock 4.1", "  spaced  ", "x"];
        for name in names {
            assert_eq!(sanitize(name), sanitize(name));
        }
    }

    #[test]
    fn test_output_is_fixed_point() {
        let names = ["Front Door (North)", "Cam 1.2", "A.B (C) D", "()..  "];
        for name in names {
            let once = sanitize(name);
            let twice = sanitize(once.as_str());
            assert_eq!(once, twice, "not a fixed point for {name:?}");
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(sanitize("Yard Cam").file_name(), "yard_cam.webp");
    }

    #[test]
    fn test_serialize_as_plain_string() {
        let json = serde_json::to_string(&sanitize("Yard Cam")).unwrap();
        assert_eq!(json, "\"yard_cam\"");
    }
}
