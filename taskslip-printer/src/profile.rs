//! Printer capability profiles
//!
//! A profile tells the renderer how many columns fit on a line in the
//! default font and which code page the printer should be switched into.
//! Names follow the ones commonly used for ESC/POS printer models.

use crate::encoding::CodePage;
use crate::error::{PrintError, PrintResult};
use serde::Serialize;

/// Capabilities of one printer model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: &'static str,
    /// Characters per line in font A at normal size
    pub columns: usize,
    pub code_page: CodePage,
}

const fn profile(name: &'static str, columns: usize, code_page: CodePage) -> Profile {
    Profile {
        name,
        columns,
        code_page,
    }
}

static PROFILES: &[Profile] = &[
    profile("default", 42, CodePage::Wpc1252),
    profile("simple", 32, CodePage::Wpc1252),
    profile("TM-T88II", 42, CodePage::Wpc1252),
    profile("TM-T88III", 42, CodePage::Wpc1252),
    profile("TM-T88IV", 42, CodePage::Wpc1252),
    profile("TM-T88V", 42, CodePage::Wpc1252),
    profile("TM-T20", 48, CodePage::Wpc1252),
    profile("TM-T20II", 48, CodePage::Wpc1252),
    profile("TM-U220", 33, CodePage::Wpc1252),
    profile("RP326", 48, CodePage::Wpc1252),
    profile("TSP600", 48, CodePage::Wpc1252),
    profile("POS-5890", 32, CodePage::Gbk),
    profile("ZJ-5870", 32, CodePage::Gbk),
];

impl Profile {
    /// Find a profile by name (ASCII case-insensitive)
    pub fn lookup(name: &str) -> Option<&'static Profile> {
        let name = name.trim();
        PROFILES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Resolve an optional profile name; `None` selects the default profile
    pub fn resolve(name: Option<&str>) -> PrintResult<&'static Profile> {
        match name {
            None => Ok(&PROFILES[0]),
            Some(name) => {
                Self::lookup(name).ok_or_else(|| PrintError::UnknownProfile(name.to_string()))
            }
        }
    }

    /// All known profile names
    pub fn names() -> impl Iterator<Item = &'static str> {
        PROFILES.iter().map(|p| p.name)
    }
}

impl Default for Profile {
    fn default() -> Self {
        PROFILES[0]
    }
}
