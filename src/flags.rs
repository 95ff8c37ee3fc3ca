use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::FlagsParseError;

/// Header layout of the upstream text logger.
///
/// These must describe what the logger actually prints, otherwise the
/// header is left in the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LogFlags(u8);

impl LogFlags {
    /// `2009/01/23`
    pub const DATE: LogFlags = LogFlags(1 << 0);
    /// `01:23:23`
    pub const TIME: LogFlags = LogFlags(1 << 1);
    /// `01:23:23.123123`, implies a time token.
    pub const MICROSECONDS: LogFlags = LogFlags(1 << 2);
    /// `d.go:23`
    pub const SHORT_FILE: LogFlags = LogFlags(1 << 3);
    /// `/a/b/c/d.go:23`
    pub const LONG_FILE: LogFlags = LogFlags(1 << 4);
    /// Prefix printed after the header instead of at the start of the line.
    pub const MSG_PREFIX: LogFlags = LogFlags(1 << 5);
    pub const STD_FLAGS: LogFlags = LogFlags(Self::DATE.0 | Self::TIME.0);

    const NAMES: [(&'static str, LogFlags); 7] = [
        ("date", Self::DATE),
        ("time", Self::TIME),
        ("microseconds", Self::MICROSECONDS),
        ("shortfile", Self::SHORT_FILE),
        ("longfile", Self::LONG_FILE),
        ("msgprefix", Self::MSG_PREFIX),
        ("stdflags", Self::STD_FLAGS),
    ];

    pub const fn empty() -> Self {
        LogFlags(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: LogFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: LogFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn has_date(self) -> bool {
        self.contains(Self::DATE)
    }

    pub fn has_time(self) -> bool {
        self.intersects(LogFlags(Self::TIME.0 | Self::MICROSECONDS.0))
    }

    pub fn has_microseconds(self) -> bool {
        self.contains(Self::MICROSECONDS)
    }

    /// Short and long file names parse the same way.
    pub fn has_location(self) -> bool {
        self.intersects(LogFlags(Self::SHORT_FILE.0 | Self::LONG_FILE.0))
    }

    pub fn prefix_after_header(self) -> bool {
        self.contains(Self::MSG_PREFIX)
    }
}

impl BitOr for LogFlags {
    type Output = LogFlags;

    fn bitor(self, rhs: LogFlags) -> LogFlags {
        LogFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LogFlags {
    fn bitor_assign(&mut self, rhs: LogFlags) {
        self.0 |= rhs.0;
    }
}

/// Accepts names joined by `|`, `,` or whitespace, e.g. `"date|time|shortfile"`.
impl FromStr for LogFlags {
    type Err = FlagsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = LogFlags::empty();
        for name in s
            .split(|c: char| c == '|' || c == ',' || c.is_whitespace())
            .filter(|n| !n.is_empty())
        {
            let lower = name.to_ascii_lowercase();
            let flag = Self::NAMES
                .iter()
                .find(|(n, _)| *n == lower)
                .map(|(_, f)| *f)
                .ok_or_else(|| FlagsParseError::UnknownFlag(name.to_string()))?;
            flags |= flag;
        }
        Ok(flags)
    }
}

impl fmt::Display for LogFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        // stdflags is a combination, skip it when printing
        for (name, flag) in Self::NAMES.iter().take(6) {
            if self.contains(*flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
