//! # Assets
//!
//! The fixed set of images the art scene reads at startup: skybox faces,
//! the environment cubemap used for reflection and refraction, and the water
//! normal map. Anything that fails to load is replaced by a 1x1 solid image
//! so the scene still renders.

pub mod image_loader;

pub use image_loader::ImageData;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cubemap face {face} is {found:?}, expected {expected:?}")]
    FaceSizeMismatch {
        face: &'static str,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("cubemap faces must be square, got {0}x{1}")]
    NonSquareFace(u32, u32),

    #[error("image is {width}x{height}, larger than the {limit} texel limit")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// Face order of cube textures: +X, -X, +Y, -Y, +Z, -Z
pub const CUBE_FACES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// Colors used in place of images that could not be loaded
const SKY_FALLBACK: [u8; 4] = [135, 170, 200, 255];
const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

/// Six faces of one cube texture, in [`CUBE_FACES`] order
#[derive(Debug, Clone, PartialEq)]
pub struct CubeImages {
    pub faces: [ImageData; 6],
}

impl CubeImages {
    /// Checks that the faces are square and share one size
    pub fn new(faces: [ImageData; 6]) -> Result<Self, AssetError> {
        let expected = (faces[0].width, faces[0].height);
        if expected.0 != expected.1 {
            return Err(AssetError::NonSquareFace(expected.0, expected.1));
        }
        for (&face, image) in CUBE_FACES.iter().zip(&faces) {
            let found = (image.width, image.height);
            if found != expected {
                return Err(AssetError::FaceSizeMismatch {
                    face,
                    expected,
                    found,
                });
            }
        }
        Ok(Self { faces })
    }

    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            faces: std::array::from_fn(|_| ImageData::solid_color(1, 1, color)),
        }
    }

    pub fn size(&self) -> u32 {
        self.faces[0].width
    }
}

/// File locations of every image, relative to an asset root
#[derive(Debug, Clone, PartialEq)]
pub struct AssetManifest {
    pub root: PathBuf,
    pub skybox: [PathBuf; 6],
    pub environment: [PathBuf; 6],
    pub water_normals: PathBuf,
}

impl AssetManifest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let faces = |dir: &str| CUBE_FACES.map(|face| PathBuf::from(dir).join(format!("{face}.jpg")));
        Self {
            root: root.into(),
            skybox: faces("skybox"),
            environment: faces("environment"),
            water_normals: PathBuf::from("water").join("normals.jpg"),
        }
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Loads every image, substituting fallbacks for failures.
    ///
    /// Images with a side above `max_dimension` texels count as failures,
    /// since the device could not create a texture for them.
    pub fn load(&self, max_dimension: u32) -> LoadedAssets {
        LoadedAssets {
            skybox: self.load_cube("skybox", &self.skybox, max_dimension),
            environment: self.load_cube("environment", &self.environment, max_dimension),
            water_normals: self.load_image(&self.water_normals, FLAT_NORMAL, max_dimension),
        }
    }

    fn read(&self, relative: &Path, max_dimension: u32) -> Result<ImageData, AssetError> {
        let path = self.resolve(relative);
        ImageData::from_file(&path)?
            .fit_within(max_dimension)
            .inspect_err(|_| log::debug!("Rejected {:?}", path))
    }

    fn load_image(&self, relative: &Path, fallback: [u8; 4], max_dimension: u32) -> ImageData {
        self.read(relative, max_dimension).unwrap_or_else(|err| {
            log::warn!("{}, using a solid fallback", err);
            ImageData::solid_color(1, 1, fallback)
        })
    }

    fn load_cube(&self, name: &str, faces: &[PathBuf; 6], max_dimension: u32) -> CubeImages {
        let mut failed = false;
        let images = faces.each_ref().map(|relative| {
            self.read(relative, max_dimension).unwrap_or_else(|err| {
                log::warn!("{}", err);
                failed = true;
                ImageData::solid_color(1, 1, SKY_FALLBACK)
            })
        });

        if failed {
            log::warn!("Cubemap '{}' is incomplete, using a solid fallback", name);
            return CubeImages::solid(SKY_FALLBACK);
        }

        CubeImages::new(images).unwrap_or_else(|err| {
            log::warn!("Cubemap '{}' rejected: {}", name, err);
            CubeImages::solid(SKY_FALLBACK)
        })
    }
}

/// Decoded images ready to be turned into GPU textures
#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub skybox: CubeImages,
    pub environment: CubeImages,
    pub water_normals: ImageData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(size: u32) -> [ImageData; 6] {
        std::array::from_fn(|_| ImageData::solid_color(size, size, [0, 0, 0, 255]))
    }

    #[test]
    fn test_manifest_layout() {
        let manifest = AssetManifest::new("assets");
        assert_eq!(manifest.skybox[0], PathBuf::from("skybox/px.jpg"));
        assert_eq!(manifest.environment[5], PathBuf::from("environment/nz.jpg"));
        assert_eq!(
            manifest.resolve(&manifest.water_normals),
            PathBuf::from("assets/water/normals.jpg")
        );
    }

    #[test]
    fn test_cube_faces_must_match() {
        assert_eq!(CubeImages::new(faces(4)).unwrap().size(), 4);

        let mut uneven = faces(4);
        uneven[3] = ImageData::solid_color(8, 8, [0; 4]);
        assert!(matches!(
            CubeImages::new(uneven),
            Err(AssetError::FaceSizeMismatch { face: "ny", .. })
        ));

        let mut wide = faces(4);
        wide[0] = ImageData::solid_color(8, 4, [0; 4]);
        assert!(matches!(CubeImages::new(wide), Err(AssetError::NonSquareFace(8, 4))));
    }

    #[test]
    fn test_missing_files_fall_back() {
        let manifest = AssetManifest::new("/nonexistent/asset/root");
        let assets = manifest.load(4096);

        assert_eq!(assets.skybox, CubeImages::solid(SKY_FALLBACK));
        assert_eq!(assets.environment.size(), 1);
        assert_eq!(assets.water_normals, ImageData::solid_color(1, 1, FLAT_NORMAL));
    }

    #[test]
    fn test_oversized_images_fall_back() {
        let root = std::env::temp_dir().join(format!("aquasphere-assets-{}", std::process::id()));
        let manifest = AssetManifest::new(&root);
        let normals = manifest.resolve(&manifest.water_normals);
        std::fs::create_dir_all(normals.parent().unwrap()).unwrap();
        image::RgbImage::from_pixel(8, 8, image::Rgb([128, 128, 255]))
            .save(&normals)
            .unwrap();

        let within = manifest.load(8);
        let too_small = manifest.load(4);
        std::fs::remove_dir_all(&root).unwrap();

        assert_eq!((within.water_normals.width, within.water_normals.height), (8, 8));
        assert_eq!(too_small.water_normals, ImageData::solid_color(1, 1, FLAT_NORMAL));
        assert_eq!(too_small.skybox, CubeImages::solid(SKY_FALLBACK));
    }
}
