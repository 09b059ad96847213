use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Output format chosen by the host; shared between panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetFormat {
    #[default]
    Excel,
    Word,
}

impl TargetFormat {
    /// File extension used for downloads of this format.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Excel => "xlsx",
            TargetFormat::Word => "txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetFormat::Excel => "Excel",
            TargetFormat::Word => "Word",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown format {0:?} (expected excel or word)")]
pub struct UnknownFormat(pub String);

impl FromStr for TargetFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("excel") || trimmed.eq_ignore_ascii_case("xlsx") {
            Ok(TargetFormat::Excel)
        } else if trimmed.eq_ignore_ascii_case("word") || trimmed.eq_ignore_ascii_case("txt") {
            Ok(TargetFormat::Word)
        } else {
            Err(UnknownFormat(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_extensions() {
        assert_eq!("Excel".parse(), Ok(TargetFormat::Excel));
        assert_eq!(" xlsx".parse(), Ok(TargetFormat::Excel));
        assert_eq!("WORD".parse(), Ok(TargetFormat::Word));
        assert_eq!("txt".parse(), Ok(TargetFormat::Word));
        assert_eq!(
            "pdf".parse::<TargetFormat>(),
            Err(UnknownFormat("pdf".to_string()))
        );
    }
}
