//! Preview runner settings, read from the environment.

use anyhow::bail;
use match3_core::{ColorScheme, Customizations, Difficulty, Theme};
use std::time::Duration;

/// Scheduler resolution for driving `MatchGame::tick`
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// How long a preview runs when `PREVIEW_SECONDS` is unset
pub const DEFAULT_RUN_SECONDS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    pub customizations: Customizations,
    /// Total preview run time
    pub run_for: Duration,
    /// Play a hinted swap once per second
    pub autoplay: bool,
    pub tick_period: Duration,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            customizations: Customizations::default(),
            run_for: Duration::from_secs(DEFAULT_RUN_SECONDS),
            autoplay: true,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

impl PreviewSettings {
    /// Read settings from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(value) = lookup("PREVIEW_DIFFICULTY") {
            settings.customizations.difficulty = value.parse::<Difficulty>()?;
        }
        if let Some(value) = lookup("PREVIEW_COLOR_SCHEME") {
            settings.customizations.color_scheme = value.parse::<ColorScheme>()?;
        }
        if let Some(value) = lookup("PREVIEW_THEME") {
            settings.customizations.theme = value.parse::<Theme>()?;
        }
        if let Some(value) = lookup("PREVIEW_SECONDS") {
            settings.run_for = Duration::from_secs(value.parse()?);
        }
        if let Some(value) = lookup("PREVIEW_AUTOPLAY") {
            settings.autoplay = parse_flag(&value)?;
        }
        if let Some(value) = lookup("PREVIEW_TICK_MS") {
            let ms: u64 = value.parse()?;
            settings.tick_period = Duration::from_millis(ms.max(1));
        }

        Ok(settings)
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected a boolean flag, got {value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = PreviewSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, PreviewSettings::default());
    }

    #[test]
    fn test_reads_overrides() {
        let settings = PreviewSettings::from_lookup(lookup(&[
            ("PREVIEW_DIFFICULTY", "easy"),
            ("PREVIEW_COLOR_SCHEME", "orange"),
            ("PREVIEW_THEME", "neon"),
            ("PREVIEW_SECONDS", "3"),
            ("PREVIEW_AUTOPLAY", "off"),
        ]))
        .unwrap();

        assert_eq!(settings.customizations.difficulty, Difficulty::Easy);
        assert_eq!(settings.customizations.color_scheme, ColorScheme::Orange);
        assert_eq!(settings.customizations.theme, Theme::Neon);
        assert_eq!(settings.run_for, Duration::from_secs(3));
        assert!(!settings.autoplay);
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        let result = PreviewSettings::from_lookup(lookup(&[("PREVIEW_DIFFICULTY", "brutal")]));
        assert!(result.is_err());
    }
}
