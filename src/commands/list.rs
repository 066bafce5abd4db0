//! Command: print the catalog.
use anyhow::Result;
use serde::Serialize;

use crate::cli::{GlobalOpts, ListOpts};
use crate::config::Config;
use crate::config::catalog::{Catalog, DeviceProfile};

/// One brand and its devices in menu order.
#[derive(Debug, Serialize)]
struct BrandListing<'a> {
    brand: &'a str,
    devices: Vec<&'a DeviceProfile>,
}

fn listings(catalog: &Catalog) -> Vec<BrandListing<'_>> {
    catalog
        .list_brands()
        .iter()
        .map(|brand| BrandListing {
            brand,
            devices: catalog.list_profiles(brand),
        })
        .collect()
}

/// Render the catalog as an indented text listing, numbered as in the menus.
#[must_use]
pub fn render_text(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (i, listing) in listings(catalog).iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, listing.brand));
        if listing.devices.is_empty() {
            out.push_str("   (no devices)\n");
        }
        for (j, device) in listing.devices.iter().enumerate() {
            out.push_str(&format!(
                "   {}. {} [{}]\n",
                j + 1,
                device.display_name,
                device.source_id
            ));
        }
    }
    out
}

/// Render the catalog as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(catalog: &Catalog) -> Result<String> {
    Ok(serde_json::to_string_pretty(&listings(catalog))?)
}

/// Print the catalog in effect for the current asset store.
///
/// The asset store is optional here; without one the built-in catalog or
/// `--catalog` is listed.
///
/// # Errors
///
/// Returns an error if the catalog file fails to load.
pub fn run(global: &GlobalOpts, opts: &ListOpts) -> Result<()> {
    let dest = super::resolve_destination(global)?;
    let assets = super::resolve_assets(global, &dest).unwrap_or_else(|_| dest.clone());
    let config = Config::load(&assets, &dest, global.catalog.as_deref())?;

    if opts.json {
        println!("{}", render_json(&config.catalog)?);
    } else {
        print!("{}", render_text(&config.catalog));
    }
    Ok(())
}
