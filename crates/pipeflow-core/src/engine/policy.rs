use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UnknownPolicy;

/// Regla que decide, durante la ejecución hacia adelante, si se confía en una
/// entrada de cache existente para un step.
///
/// El default es `IgnoreAndOverwrite`: una re-ejecución recalcula todo lo que
/// queda después del punto de reanudación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumePolicy {
    /// Siempre recalcula y sobrescribe.
    #[default]
    IgnoreAndOverwrite,
    /// Usa la entrada si existe; si no, calcula y guarda.
    UseIfPresent,
    /// Si existe entrada, recalcula y sobrescribe igualmente, pero continúa
    /// con el valor que estaba en cache.
    UseButAlsoOverwrite,
}

impl ResumePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoreAndOverwrite => "ignore-and-overwrite",
            Self::UseIfPresent => "use-if-present",
            Self::UseButAlsoOverwrite => "use-but-also-overwrite",
        }
    }
}

impl fmt::Display for ResumePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ignore-and-overwrite" => Ok(Self::IgnoreAndOverwrite),
            "use-if-present" => Ok(Self::UseIfPresent),
            "use-but-also-overwrite" => Ok(Self::UseButAlsoOverwrite),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_and_snake_case() {
        assert_eq!("use-if-present".parse::<ResumePolicy>().unwrap(), ResumePolicy::UseIfPresent);
        assert_eq!("USE_BUT_ALSO_OVERWRITE".parse::<ResumePolicy>().unwrap(),
                   ResumePolicy::UseButAlsoOverwrite);
        assert!("sometimes".parse::<ResumePolicy>().is_err());
    }

    #[test]
    fn serde_names_match_display() {
        for p in [ResumePolicy::IgnoreAndOverwrite, ResumePolicy::UseIfPresent, ResumePolicy::UseButAlsoOverwrite] {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{p}\""));
        }
        assert_eq!(ResumePolicy::default(), ResumePolicy::IgnoreAndOverwrite);
    }
}
