use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::geodesy::DistanceMethod;
use crate::map::MapOptions;
use crate::models::ReferenceLocation;
use crate::proximity::{ProximityFilter, DEFAULT_RADIUS_KM};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub reference: ReferenceLocation,
    pub filter: FilterConfig,
    pub files: FilesConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilterConfig {
    pub radius_km: f64,
    pub method: DistanceMethod,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            method: DistanceMethod::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilesConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub map: PathBuf,
    /// Write the sample dataset when the input is missing
    pub create_sample: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("geodetic_data.csv"),
            output: PathBuf::from("filtered_geodetic_data.csv"),
            map: PathBuf::from("camp_map.html"),
            create_sample: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub title: String,
    pub reference_popup: String,
    pub reference_tooltip: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        let options = MapOptions::default();
        Self {
            zoom: options.zoom,
            title: options.title,
            reference_popup: options.reference_popup,
            reference_tooltip: options.reference_tooltip,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a reference off the globe or a negative radius
    pub fn validate(&self) -> Result<()> {
        ReferenceLocation::new(self.reference.latitude, self.reference.longitude)
            .context("Invalid reference location")?;
        self.proximity_filter()?;
        Ok(())
    }

    pub fn proximity_filter(&self) -> Result<ProximityFilter> {
        let filter = ProximityFilter::new(self.reference, self.filter.radius_km)
            .context("Invalid filter radius")?;
        Ok(filter.with_method(self.filter.method))
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            title: self.map.title.clone(),
            zoom: self.map.zoom,
            reference_popup: self.map.reference_popup.clone(),
            reference_tooltip: self.map.reference_tooltip.clone(),
            generated_at: None,
        }
    }
}
