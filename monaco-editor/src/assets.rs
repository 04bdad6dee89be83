use include_dir::{include_dir, Dir};
use std::path::PathBuf;

/// Bootstrap page and the page-side bridge, gzip-compressed. Regenerate
/// with `scripts/compress-assets.sh` after editing `web/`.
static BUNDLED_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Readable store of gzip-compressed editor assets, addressed by
/// `/`-separated relative paths such as `Editor/vs/loader.js`.
pub trait AssetSource {
    fn contains(&self, path: &str) -> bool;
    /// Raw (still compressed) bytes of an asset.
    fn read(&self, path: &str) -> std::io::Result<Vec<u8>>;
}

/// Assets compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledAssets;

impl AssetSource for BundledAssets {
    fn contains(&self, path: &str) -> bool {
        BUNDLED_DIR.get_file(path).is_some()
    }

    fn read(&self, path: &str) -> std::io::Result<Vec<u8>> {
        BUNDLED_DIR
            .get_file(path)
            .map(|file| file.contents().to_vec())
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }
}

/// Assets in a directory on disk, e.g. an unpacked Monaco distribution
/// whose files were compressed in place.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/').fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl AssetSource for DirAssets {
    fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read(&self, path: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }
}

/// Several sources searched in order; the first that has the asset serves it.
#[derive(Default)]
pub struct LayeredAssets {
    layers: Vec<Box<dyn AssetSource>>,
}

impl LayeredAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl AssetSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }
}

impl AssetSource for LayeredAssets {
    fn contains(&self, path: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains(path))
    }

    fn read(&self, path: &str) -> std::io::Result<Vec<u8>> {
        match self.layers.iter().find(|layer| layer.contains(path)) {
            Some(layer) => layer.read(path),
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound)),
        }
    }
}
