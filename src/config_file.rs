//! Build blueprint handling.
//!
//! A blueprint selects the target image, the desktop, and a list of modules:
//!
//! ```yaml
//! image:
//!   type: fedora
//!   base: quay.io/fedora/fedora-bootc:41
//! desktop:
//!   window_manager: sway
//!   include_common: true
//! modules:
//!   - type: packages
//!     install: [htop]
//!   - type: systemd
//!     enable: [sddm.service]
//! ```
//!
//! Unknown keys are rejected instead of being silently ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BootcraftError, Result};
use crate::package_utils::{is_single_line, is_valid_identifier};
use crate::types::{InstallMode, SetKind};

/// Category used for module packages that do not name one
pub const DEFAULT_MODULE_CATEGORY: &str = "extra";

fn default_true() -> bool {
    true
}

/// Top-level blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    pub image: ImageConfig,
    #[serde(default)]
    pub desktop: DesktopSelection,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
    /// Where the blueprint was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

/// Target image options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Image type, mapped onto a distro family
    #[serde(rename = "type")]
    pub image_type: String,
    /// Base image reference; the distro default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Run a full package update before installing
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub install_mode: InstallMode,
    /// Finish with `bootc container lint`
    #[serde(default = "default_true")]
    pub lint: bool,
}

/// Desktop selection: at most one of window manager or desktop environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesktopSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_environment: Option<String>,
    #[serde(default = "default_true")]
    pub include_common: bool,
}

impl Default for DesktopSelection {
    fn default() -> Self {
        Self {
            window_manager: None,
            desktop_environment: None,
            include_common: true,
        }
    }
}

impl DesktopSelection {
    /// The selected set, if any.
    ///
    /// Fails when both a window manager and a desktop environment are set.
    pub fn selected(&self) -> Result<Option<(SetKind, &str)>> {
        match (&self.window_manager, &self.desktop_environment) {
            (Some(wm), Some(de)) => Err(BootcraftError::ConflictingSelection {
                window_manager: wm.clone(),
                desktop_environment: de.clone(),
            }),
            (Some(wm), None) => Ok(Some((SetKind::WindowManager, wm.as_str()))),
            (None, Some(de)) => Ok(Some((SetKind::DesktopEnvironment, de.as_str()))),
            (None, None) => Ok(None),
        }
    }
}

/// A build module, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModuleConfig {
    Packages(PackagesModule),
    Systemd(SystemdModule),
    Files(FilesModule),
    Script(ScriptModule),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagesModule {
    #[serde(default)]
    pub install: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PackagesModule {
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_MODULE_CATEGORY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemdModule {
    #[serde(default)]
    pub enable: Vec<String>,
    #[serde(default)]
    pub disable: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesModule {
    pub files: Vec<FileCopy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileCopy {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptModule {
    pub run: Vec<String>,
}

impl BuildConfig {
    /// Create a blueprint for an image type with no desktop and no modules
    pub fn new(image_type: impl Into<String>) -> Self {
        Self {
            image: ImageConfig {
                image_type: image_type.into(),
                base: None,
                update: false,
                install_mode: InstallMode::default(),
                lint: true,
            },
            desktop: DesktopSelection::default(),
            modules: Vec::new(),
            source: PathBuf::new(),
        }
    }

    /// Parse a blueprint from YAML text; `source` is used for diagnostics
    pub fn from_yaml_str(content: &str, source: &Path) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(content)
            .map_err(|e| BootcraftError::parse(source, e.to_string()))?;
        config.source = source.to_path_buf();
        Ok(config)
    }

    /// Load a blueprint from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                BootcraftError::not_found("blueprint", path.display().to_string(), path)
            }
            _ => BootcraftError::io(path, e),
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Save the blueprint as YAML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).map_err(|e| BootcraftError::parse(path, e.to_string()))?;
        fs::write(path, yaml).map_err(|e| BootcraftError::io(path, e))
    }

    /// Validate the blueprint
    pub fn validate(&self) -> Result<()> {
        let source = self.source.as_path();

        if self.image.image_type.trim().is_empty() {
            return Err(BootcraftError::parse(source, "image.type must not be empty"));
        }
        if let Some(base) = &self.image.base {
            if base.trim().is_empty() {
                return Err(BootcraftError::parse(source, "image.base must not be empty"));
            }
            if !is_single_line(base) {
                return Err(BootcraftError::parse(source, "image.base must be a single line"));
            }
        }

        for (field, value) in [
            ("desktop.window_manager", &self.desktop.window_manager),
            ("desktop.desktop_environment", &self.desktop.desktop_environment),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(BootcraftError::parse(source, format!("{} must not be empty", field)));
            }
            if value.as_deref().is_some_and(|v| !is_single_line(v)) {
                return Err(BootcraftError::parse(source, format!("{} must be a single line", field)));
            }
        }
        self.desktop.selected()?;

        for (index, module) in self.modules.iter().enumerate() {
            module
                .validate()
                .map_err(|message| BootcraftError::parse(source, format!("modules[{}]: {}", index, message)))?;
        }

        Ok(())
    }
}

impl ModuleConfig {
    /// Module type as written in the blueprint
    pub fn type_name(&self) -> &'static str {
        match self {
            ModuleConfig::Packages(_) => "packages",
            ModuleConfig::Systemd(_) => "systemd",
            ModuleConfig::Files(_) => "files",
            ModuleConfig::Script(_) => "script",
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let check_ids = |field: &str, ids: &[String]| {
            match ids.iter().find(|id| !is_valid_identifier(id)) {
                Some(bad) => Err(format!("invalid {} entry '{}'", field, bad)),
                None => Ok(()),
            }
        };

        match self {
            ModuleConfig::Packages(m) => {
                check_ids("install", &m.install)?;
                check_ids("remove", &m.remove)?;
                if m.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
                    return Err("category must not be empty".to_string());
                }
                if m.category.as_deref().is_some_and(|c| !is_single_line(c)) {
                    return Err("category must be a single line".to_string());
                }
            }
            ModuleConfig::Systemd(m) => {
                check_ids("enable", &m.enable)?;
                check_ids("disable", &m.disable)?;
            }
            ModuleConfig::Files(m) => {
                if let Some(copy) = m
                    .files
                    .iter()
                    .find(|f| f.source.trim().is_empty() || f.destination.trim().is_empty())
                {
                    return Err(format!(
                        "file copy '{}' -> '{}' needs both source and destination",
                        copy.source, copy.destination
                    ));
                }
                if m
                    .files
                    .iter()
                    .any(|f| !is_single_line(&f.source) || !is_single_line(&f.destination))
                {
                    return Err("file copy paths must be single lines".to_string());
                }
            }
            ModuleConfig::Script(m) => {
                if m.run.iter().any(|cmd| cmd.trim().is_empty()) {
                    return Err("script commands must not be empty".to_string());
                }
                if let Some(cmd) = m.run.iter().find(|cmd| !is_single_line(cmd)) {
                    return Err(format!("script command {:?} spans several lines", cmd));
                }
            }
        }
        Ok(())
    }
}
