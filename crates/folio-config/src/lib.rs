//! Configuration file handling for folio.
//!
//! The configuration lives at `<config dir>/folio/config.toml`. Every field
//! has a default, so a missing file or a partial file is fine:
//!
//! ```toml
//! [profile]
//! name = "Ada Lovelace"
//! words = ["engineer", "writer"]
//!
//! [theme]
//! primary = "#21808d"
//!
//! [background]
//! fps = 30
//!
//! [[sections]]
//! id = "about"
//! title = "About"
//! body = "..."
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use folio_core::{ColorToken, Theme};
use serde::{Deserialize, Serialize};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    pub theme: ThemeConfig,
    pub background: BackgroundConfig,
    pub sections: Sections,
}

/// Who the portfolio is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    /// Line shown above the name in the hero.
    pub greeting: String,
    /// Text placed before the typewriter word, e.g. "I'm a".
    pub role_prefix: String,
    /// Words the typewriter cycles through.
    pub words: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            greeting: "Hi, my name is".to_string(),
            role_prefix: "I'm a".to_string(),
            words: ["engineer", "designer", "creative thinker", "student", "architect"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Color tokens as written in the file. Resolved with [`ThemeConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl ThemeConfig {
    /// Parse the tokens, falling back to the default palette for any that are
    /// missing or malformed.
    pub fn resolve(&self) -> Theme {
        let defaults = Theme::default();
        Theme {
            primary: resolve_token("primary", self.primary.as_deref(), defaults.primary),
            secondary: resolve_token("secondary", self.secondary.as_deref(), defaults.secondary),
            background: resolve_token(
                "background",
                self.background.as_deref(),
                defaults.background,
            ),
        }
    }
}

fn resolve_token(name: &str, token: Option<&str>, default: ColorToken) -> ColorToken {
    if let Some(raw) = token {
        if ColorToken::parse(raw).is_none() {
            log::warn!("theme.{name} = {raw:?} is not a #rrggbb color, using {default}");
        }
    }
    ColorToken::parse_or(token, default)
}

/// Particle background settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub enabled: bool,
    /// Frame rate cap for the animation loop.
    pub fps: u32,
    /// Width of a terminal cell in surface units.
    pub cell_width_px: f32,
    /// Height of a terminal cell in surface units.
    pub cell_height_px: f32,
    /// Bound on each initial velocity component, in units per frame.
    pub max_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Distance within which the pointer pushes particles away.
    pub pointer_radius: f32,
    pub particle_opacity: f32,
    pub line_opacity: f32,
    pub line_width: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fps: 60,
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            max_speed: 0.5,
            radius_min: 1.0,
            radius_max: 3.0,
            pointer_radius: 100.0,
            particle_opacity: 0.6,
            line_opacity: 0.35,
            line_width: 1.0,
        }
    }
}

/// One scrollable portfolio section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl SectionConfig {
    fn new(id: &str, title: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Ordered list of sections; defaults to a standard portfolio layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections(pub Vec<SectionConfig>);

impl Default for Sections {
    fn default() -> Self {
        Self(vec![
            SectionConfig::new(
                "about",
                "About",
                "I build things for the web and beyond. Replace this text in \
                 config.toml with a few lines about yourself.",
            ),
            SectionConfig::new(
                "experience",
                "Experience",
                "List roles, internships and the teams you have worked with.",
            ),
            SectionConfig::new(
                "projects",
                "Projects",
                "Describe the projects you are proudest of and link to them.",
            ),
            SectionConfig::new(
                "skills",
                "Skills",
                "Languages, frameworks and tools you reach for.",
            ),
            SectionConfig::new("contact", "Contact", "Tell visitors how to reach you."),
        ])
    }
}

impl Config {
    /// Default location of the configuration file, if a home directory exists.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                log::warn!("could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&contents)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Write this configuration to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).wrap_err("failed to serialize config")?;
        fs::write(path, contents)
            .wrap_err_with(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sections.0.len(), 5);
        assert_eq!(config.profile.words.len(), 5);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::parse(
            r##"
            [profile]
            name = "Ada"

            [background]
            fps = 30
            "##,
        )
        .unwrap();
        assert_eq!(config.profile.name, "Ada");
        assert_eq!(config.profile.role_prefix, "I'm a");
        assert_eq!(config.background.fps, 30);
        assert_eq!(config.background.cell_height_px, 16.0);
        assert!(config.background.enabled);
    }

    #[test]
    fn test_sections_replace_defaults() {
        let config = Config::parse(
            r#"
            [[sections]]
            id = "work"
            title = "Work"

            [[sections]]
            id = "talks"
            title = "Talks"
            body = "Slides and recordings."
            "#,
        )
        .unwrap();
        assert_eq!(config.sections.0.len(), 2);
        assert_eq!(config.sections.0[0].body, "");
        assert_eq!(config.sections.0[1].id, "talks");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::parse("[background]\nfps = \"fast\"").is_err());
        assert!(Config::parse("not toml at all [").is_err());
    }

    #[test]
    fn test_theme_resolution_falls_back() {
        let theme = ThemeConfig {
            primary: Some("#ff0000".to_string()),
            secondary: Some("teal".to_string()),
            background: None,
        }
        .resolve();
        assert_eq!(theme.primary, ColorToken::rgb(255, 0, 0));
        assert_eq!(theme.secondary, Theme::DEFAULT_SECONDARY);
        assert_eq!(theme.background, Theme::DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("folio-config-test-{}", std::process::id()));
        let path = dir.join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.profile.name = "Grace".to_string();
        config.theme.primary = Some("#123456".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let path = std::env::temp_dir().join("folio-config-test-missing/config.toml");
        assert!(Config::load_from(&path).is_err());
    }
}
