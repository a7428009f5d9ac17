use std::{
    fs::File,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{BelleError, BelleResult},
    scene::{layer::Layer, model::Scene},
};

/// One flattened layer image produced by an extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedLayer {
    /// Layer name as shown in the source document.
    pub name: String,
    /// Flattened image on disk.
    pub path: PathBuf,
}

/// Source of per-layer images for a named scene.
pub trait LayerExtractor {
    /// Layers of `scene` in drawing order (bottom first).
    fn extract_scene(&self, scene: &str) -> BelleResult<Vec<ExtractedLayer>>;
}

/// Extracts layers from GIMP `.xcf` files with the `xcfinfo` and `xcf2png` tools.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct XcfLayerExtractor {
    /// Directory holding `<scene>.xcf` files.
    pub scenes_dir: PathBuf,
    /// Directory receiving `<scene>/<layer>.png` files.
    pub layers_dir: PathBuf,
    /// Fill colour passed to `xcf2png -b`.
    pub background: String,
    /// Layer listing tool.
    pub xcfinfo: PathBuf,
    /// Layer flattening tool.
    pub xcf2png: PathBuf,
}

impl Default for XcfLayerExtractor {
    fn default() -> Self {
        Self {
            scenes_dir: PathBuf::from("scenes"),
            layers_dir: PathBuf::from("layers"),
            background: "white".to_string(),
            xcfinfo: PathBuf::from("xcfinfo"),
            xcf2png: PathBuf::from("xcf2png"),
        }
    }
}

impl XcfLayerExtractor {
    pub fn source_path(&self, scene: &str) -> PathBuf {
        self.scenes_dir.join(format!("{scene}.xcf"))
    }

    pub fn layer_path(&self, scene: &str, layer: &str) -> PathBuf {
        self.layers_dir
            .join(scene)
            .join(format!("{}.png", layer.replace(['/', '\\'], "_")))
    }

    /// Layer names of `source`, bottom layer first.
    #[tracing::instrument(skip(self))]
    pub fn layer_names(&self, source: &Path) -> BelleResult<Vec<String>> {
        let output = Command::new(&self.xcfinfo)
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                BelleError::extraction(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.xcfinfo.display()
                ))
            })?;
        if !output.status.success() {
            return Err(BelleError::extraction(format!(
                "{} exited with status {} for '{}': {}",
                self.xcfinfo.display(),
                output.status,
                source.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let names = parse_layer_names(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(?names, "found layers");
        Ok(names)
    }

    /// Flatten one layer of `source` into a PNG and return its path.
    #[tracing::instrument(skip(self))]
    pub fn extract_layer(&self, source: &Path, scene: &str, layer: &str) -> BelleResult<PathBuf> {
        let out = self.layer_path(scene, layer);
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create layer directory '{}'", parent.display()))?;
        }
        let file =
            File::create(&out).with_context(|| format!("create layer file '{}'", out.display()))?;

        let output = Command::new(&self.xcf2png)
            .arg(source)
            .arg(layer)
            .arg("-b")
            .arg(&self.background)
            .stdin(Stdio::null())
            .stdout(Stdio::from(file))
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                BelleError::extraction(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.xcf2png.display()
                ))
            })?;
        if !output.status.success() {
            return Err(BelleError::extraction(format!(
                "{} exited with status {} for layer \"{layer}\": {}",
                self.xcf2png.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!(path = %out.display(), "saved layer");
        Ok(out)
    }
}

impl LayerExtractor for XcfLayerExtractor {
    fn extract_scene(&self, scene: &str) -> BelleResult<Vec<ExtractedLayer>> {
        let source = self.source_path(scene);
        let names = self.layer_names(&source)?;
        names
            .into_iter()
            .map(|name| {
                let path = self.extract_layer(&source, scene, &name)?;
                Ok(ExtractedLayer { name, path })
            })
            .collect()
    }
}

/// Parse `xcfinfo` output into layer names, bottom layer first.
///
/// The first line is the document header; each following line carries four fields before the
/// layer name, and the name itself may contain spaces. `xcfinfo` lists the top layer first.
pub fn parse_layer_names(listing: &str) -> Vec<String> {
    let mut names: Vec<String> = listing
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.split(' ').skip(4).collect::<Vec<_>>().join(" "))
        .collect();
    names.reverse();
    names
}

/// Reuses layer PNGs that were already extracted into `<root>/<scene>/`.
///
/// Layers are ordered by file name and named after the file stem.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PngDirExtractor {
    pub root: PathBuf,
}

impl PngDirExtractor {
    /// Read layers from `<root>/<scene>/*.png`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LayerExtractor for PngDirExtractor {
    fn extract_scene(&self, scene: &str) -> BelleResult<Vec<ExtractedLayer>> {
        let dir = self.root.join(scene);
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("read layer directory '{}'", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("read layer directory '{}'", dir.display()))?
                .path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if is_png && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                Some(ExtractedLayer { name, path })
            })
            .collect())
    }
}

/// Which extractor a storyboard uses.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorConfig {
    Xcf(XcfLayerExtractor),
    PngDir(PngDirExtractor),
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::Xcf(XcfLayerExtractor::default())
    }
}

impl LayerExtractor for ExtractorConfig {
    fn extract_scene(&self, scene: &str) -> BelleResult<Vec<ExtractedLayer>> {
        match self {
            Self::Xcf(x) => x.extract_scene(scene),
            Self::PngDir(p) => p.extract_scene(scene),
        }
    }
}

/// Extract and decode every layer of `scene`.
#[tracing::instrument(skip(extractor))]
pub fn load_scene(extractor: &dyn LayerExtractor, scene: &str) -> BelleResult<Scene> {
    let layers = extractor
        .extract_scene(scene)?
        .into_iter()
        .map(|e| Layer::open(e.name, &e.path))
        .collect::<BelleResult<Vec<_>>>()?;
    let scene = Scene::new(scene, layers);
    tracing::info!(%scene, "loaded scene");
    Ok(scene)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/extract.rs"]
mod tests;
