//! Device catalog: brands and the profiles that can be deployed.
//!
//! The catalog is read-only for the whole run. The built-in table is
//! materialised once per process and shared as an [`Arc`]; a TOML file can
//! replace it at startup.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::toml_loader;
use crate::error::ConfigError;

/// A deployable device profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceProfile {
    /// Primary bundle directory under the asset store. Unique per catalog.
    pub source_id: String,
    /// Label shown in menus.
    pub display_name: String,
    /// Grouping key; one of the catalog's brands.
    pub brand: String,
    /// Extra bundles applied after the primary one, in order.
    pub overlay_sources: Vec<String>,
}

impl DeviceProfile {
    /// Build a profile from borrowed parts.
    #[must_use]
    pub fn new(source_id: &str, display_name: &str, brand: &str, overlays: &[&str]) -> Self {
        Self {
            source_id: source_id.to_string(),
            display_name: display_name.to_string(),
            brand: brand.to_string(),
            overlay_sources: overlays.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Ordered brands plus the profiles grouped under them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    brands: Vec<String>,
    profiles: Vec<DeviceProfile>,
}

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    brands: Option<Vec<String>>,
    #[serde(default)]
    devices: Vec<DeviceEntry>,
}

/// One `[[devices]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceEntry {
    source: String,
    name: String,
    brand: String,
    #[serde(default)]
    overlays: Vec<String>,
}

impl From<DeviceEntry> for DeviceProfile {
    fn from(entry: DeviceEntry) -> Self {
        Self {
            source_id: entry.source,
            display_name: entry.name,
            brand: entry.brand,
            overlay_sources: entry.overlays,
        }
    }
}

const XIFAN: &str = "XiFan HandHelds";
const GAME_CONSOLE: &str = "GameConsole";
const YMC: &str = "YMC";
const CLONE_R36S: &str = "Clone R36s";
const OTHER: &str = "Other";

const LOGO_480: &str = "logo/480P/";
const LOGO_720: &str = "logo/720P/";
const KERNEL_COMMON: &str = "kenrel/common/";

static BUILTIN: OnceLock<Arc<Catalog>> = OnceLock::new();

impl Catalog {
    /// Build a catalog, checking that sources are unique and that every
    /// profile's brand is listed in `brands`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateSource`] or
    /// [`ConfigError::UnknownBrand`] when the table is inconsistent.
    pub fn new(brands: Vec<String>, profiles: Vec<DeviceProfile>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.source_id.as_str()) {
                return Err(ConfigError::DuplicateSource(profile.source_id.clone()));
            }
            if !brands.contains(&profile.brand) {
                return Err(ConfigError::UnknownBrand {
                    device: profile.display_name.clone(),
                    brand: profile.brand.clone(),
                });
            }
        }
        Ok(Self { brands, profiles })
    }

    /// Build a catalog whose brand order is the order in which brands first
    /// appear among `profiles`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateSource`] if two profiles share a source.
    pub fn from_profiles(profiles: Vec<DeviceProfile>) -> Result<Self, ConfigError> {
        let mut brands: Vec<String> = Vec::new();
        for profile in &profiles {
            if !brands.contains(&profile.brand) {
                brands.push(profile.brand.clone());
            }
        }
        Self::new(brands, profiles)
    }

    /// The built-in catalog, created on first use and shared afterwards.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(builtin_table())))
    }

    /// Load a catalog from a TOML file.
    ///
    /// ```toml
    /// brands = ["GameConsole"]
    ///
    /// [[devices]]
    /// source = "r46h"
    /// name = "GameConsole R46H"
    /// brand = "GameConsole"
    /// overlays = ["logo/768p/", "kenrel/common/"]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// table is inconsistent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml_loader::load_config(path)?;
        Self::from_file(file)
    }

    /// Parse a catalog from TOML text; `origin` is used in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::load`], minus the read.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml_loader::parse_config(content, origin)?;
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self, ConfigError> {
        let profiles = file.devices.into_iter().map(DeviceProfile::from).collect();
        match file.brands {
            Some(brands) => Self::new(brands, profiles),
            None => Self::from_profiles(profiles),
        }
    }

    /// Brands in presentation order.
    #[must_use]
    pub fn list_brands(&self) -> &[String] {
        &self.brands
    }

    /// Profiles of `brand`, sorted by display name. Profiles with equal
    /// names keep their declaration order. Unknown brands yield nothing.
    #[must_use]
    pub fn list_profiles(&self, brand: &str) -> Vec<&DeviceProfile> {
        let mut matching: Vec<&DeviceProfile> =
            self.profiles.iter().filter(|p| p.brand == brand).collect();
        matching.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        matching
    }

    /// Every profile in declaration order.
    #[must_use]
    pub fn profiles(&self) -> &[DeviceProfile] {
        &self.profiles
    }

    /// Look a profile up by its primary source.
    #[must_use]
    pub fn find(&self, source_id: &str) -> Option<&DeviceProfile> {
        self.profiles.iter().find(|p| p.source_id == source_id)
    }
}

fn builtin_table() -> Catalog {
    let common = |logo: &'static str| [logo, KERNEL_COMMON];
    let profiles = vec![
        DeviceProfile::new("mymini", "XiFan Mymini", XIFAN, &common(LOGO_480)),
        DeviceProfile::new("r36max", "XiFan R36Max", XIFAN, &common(LOGO_720)),
        DeviceProfile::new("r36pro", "XiFan R36Pro", XIFAN, &common(LOGO_480)),
        DeviceProfile::new("xf35h", "XiFan XF35H", XIFAN, &common(LOGO_480)),
        DeviceProfile::new("xf40h", "XiFan XF40H", XIFAN, &common(LOGO_720)),
        DeviceProfile::new("hg36", "GameConsole HG36", OTHER, &common("logo/480p/")),
        DeviceProfile::new("r36ultra", "GameConsole R36Ultra", OTHER, &common(LOGO_720)),
        DeviceProfile::new("rx6h", "GameConsole RX6H", OTHER, &common(LOGO_480)),
        DeviceProfile::new("k36s", "GameConsole K36S", OTHER, &common(LOGO_480)),
        DeviceProfile::new("r46h", "GameConsole R46H", GAME_CONSOLE, &common("logo/768p/")),
        DeviceProfile::new("r36splus", "GameConsole R36sPlus", GAME_CONSOLE, &common("logo/720p/")),
        DeviceProfile::new(
            "origin r36s panel 0",
            "GameConsole R36s Panel 0",
            GAME_CONSOLE,
            &common(LOGO_480),
        ),
        DeviceProfile::new(
            "origin r36s panel 1",
            "GameConsole R36s Panel 1",
            GAME_CONSOLE,
            &common(LOGO_480),
        ),
        DeviceProfile::new(
            "origin r36s panel 2",
            "GameConsole R36s Panel 2",
            GAME_CONSOLE,
            &common(LOGO_480),
        ),
        DeviceProfile::new(
            "origin r36s panel 3",
            "GameConsole R36s Panel 3",
            GAME_CONSOLE,
            &common(LOGO_480),
        ),
        DeviceProfile::new(
            "origin r36s panel 4",
            "GameConsole R36s Panel 4",
            GAME_CONSOLE,
            &common(LOGO_480),
        ),
        DeviceProfile::new(
            "origin r36s panel 5",
            "GameConsole R36s Panel 5",
            GAME_CONSOLE,
            &[LOGO_480, "kenrel/panel5/"],
        ),
        DeviceProfile::new("a10mini", "YMC A10MINI", YMC, &common(LOGO_480)),
        DeviceProfile::new("g80cambv12", "R36S Clone G80camb v1.2", CLONE_R36S, &common(LOGO_480)),
        DeviceProfile::new("r36s v20 719m", "R36S Clone V2.0 719M", CLONE_R36S, &common(LOGO_480)),
        DeviceProfile::new("k36p7", "K36 Panel 7", CLONE_R36S, &common(LOGO_480)),
        DeviceProfile::new("xgb36", "GameConsole XGB36", OTHER, &common(LOGO_480)),
    ];
    let brands = [XIFAN, GAME_CONSOLE, YMC, CLONE_R36S, OTHER]
        .iter()
        .map(ToString::to_string)
        .collect();
    Catalog { brands, profiles }
}
