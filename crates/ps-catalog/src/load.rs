//! Catalog loading.
//!
//! A curve that cannot be used is skipped with a warning and reported in
//! [`CatalogLoad::skipped`]; it never fails the whole catalog.

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Catalog, PumpModel};
use crate::schema::CatalogDef;
use std::path::Path;
use tracing::{debug, warn};

/// A curve dropped during loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCurve {
    pub pump_code: String,
    pub curve_index: usize,
    pub reason: String,
}

/// Loaded catalog plus the curves that were left out.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub skipped: Vec<SkippedCurve>,
}

/// Build a catalog from its file definition.
///
/// # Errors
/// Only catalog-level problems (duplicate pump codes) are errors.
pub fn from_def(def: CatalogDef) -> CatalogResult<CatalogLoad> {
    let mut skipped = Vec::new();
    let mut pumps = Vec::with_capacity(def.pumps.len());

    for pump_def in def.pumps {
        let mut curves = Vec::with_capacity(pump_def.curves.len());
        for (curve_index, curve_def) in pump_def.curves.iter().enumerate() {
            match curve_def.to_curve() {
                Ok(curve) => curves.push(curve),
                Err(err) => {
                    warn!(
                        pump_code = %pump_def.pump_code,
                        curve_index,
                        error = %err,
                        "skipping unusable performance curve"
                    );
                    skipped.push(SkippedCurve {
                        pump_code: pump_def.pump_code.clone(),
                        curve_index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if curves.is_empty() {
            warn!(pump_code = %pump_def.pump_code, "pump has no usable performance curves");
        }

        pumps.push(PumpModel {
            pump_code: pump_def.pump_code,
            manufacturer: pump_def.manufacturer,
            pump_type: pump_def.pump_type,
            specifications: pump_def.specifications,
            curves,
        });
    }

    let catalog = Catalog::new(pumps)?;
    debug!(
        pumps = catalog.len(),
        curves = catalog.curve_count(),
        skipped = skipped.len(),
        "catalog built"
    );
    Ok(CatalogLoad { catalog, skipped })
}

pub fn parse_yaml(content: &str) -> CatalogResult<CatalogLoad> {
    let def: CatalogDef = serde_yaml::from_str(content)?;
    from_def(def)
}

pub fn parse_json(content: &str) -> CatalogResult<CatalogLoad> {
    let def: CatalogDef = serde_json::from_str(content)?;
    from_def(def)
}

pub fn load_yaml(path: &Path) -> CatalogResult<CatalogLoad> {
    parse_yaml(&read(path)?)
}

pub fn load_json(path: &Path) -> CatalogResult<CatalogLoad> {
    parse_json(&read(path)?)
}

/// Load by file extension (`.yaml`/`.yml` or `.json`).
pub fn load_path(path: &Path) -> CatalogResult<CatalogLoad> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
