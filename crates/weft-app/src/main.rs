//! weft command-line driver.
//!
//! Loads a TOML scene, lays it out with fixed-advance font metrics, and
//! prints the geometry of every view as JSON. With `--paint` it prints the
//! draw calls of the laid-out tree instead.
//!
//! Usage:
//!   weft-app [scene.toml] [--paint]
//!   WEFT_SCENE=scenes/demo.toml weft-app

mod draw_list;
mod scene;

use anyhow::{Context, Result};
use weft_layout::{LayoutEngine, MonospaceMetrics, paint_tree};

use draw_list::DrawList;
use scene::Scene;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut path = None;
    let mut paint = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--paint" => paint = true,
            _ => path = Some(arg),
        }
    }
    let path = path
        .or_else(|| std::env::var("WEFT_SCENE").ok())
        .unwrap_or_else(|| "scenes/demo.toml".to_string());

    let scene = Scene::load(&path).with_context(|| format!("loading scene {path}"))?;
    let mut built = scene.build().with_context(|| format!("building scene {path}"))?;
    log::info!(
        "Loaded scene {path}: {} views, viewport {}x{:?}",
        built.tree.len(),
        built.viewport.width,
        built.viewport.height,
    );

    let metrics = MonospaceMetrics::default();
    let engine = LayoutEngine::new(&metrics, &built.config);
    let root = engine.layout(
        &mut built.tree,
        built.root,
        built.viewport.width,
        built.viewport.height,
    );
    log::info!("Root border box: {:?}", root.border_box);

    let output = if paint {
        let mut canvas = DrawList::default();
        paint_tree(&built.tree, built.root, &mut canvas, &metrics, &built.config);
        log::info!("Painted {} draw calls", canvas.ops.len());
        serde_json::to_string_pretty(&canvas.ops)?
    } else {
        serde_json::to_string_pretty(&built.report())?
    };
    println!("{output}");
    Ok(())
}
