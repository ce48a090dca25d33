//! Image decoding for textures and cubemap faces

use std::path::Path;

use super::AssetError;

/// Decoded RGBA8 pixels ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        log::debug!("Loading image from {:?}", path);

        let bytes = std::fs::read(path).map_err(|err| AssetError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(err),
        })?;
        let image = decode(&bytes, path)?;

        log::info!("Loaded image {}x{} from {:?}", image.width, image.height, path);
        Ok(image)
    }

    /// Rejects images with a side longer than `limit` texels
    pub fn fit_within(self, limit: u32) -> Result<Self, AssetError> {
        if self.width > limit || self.height > limit {
            return Err(AssetError::TooLarge {
                width: self.width,
                height: self.height,
                limit,
            });
        }
        Ok(self)
    }

    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Bytes per row, as needed by texture uploads
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

fn decode(bytes: &[u8], path: &Path) -> Result<ImageData, AssetError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(ImageData {
        data: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!((img.width, img.height), (4, 4));
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(img.bytes_per_row(), 16);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_decodes_png_bytes() {
        let mut source = image::RgbaImage::new(3, 2);
        source.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let img = decode(&bytes, Path::new("memory.png")).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        let last = img.size_bytes() - 4;
        assert_eq!(&img.data[last..], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_fit_within_limit() {
        let img = ImageData::solid_color(8, 2, [0; 4]);
        assert!(img.clone().fit_within(8).is_ok());
        assert!(matches!(
            img.fit_within(4),
            Err(AssetError::TooLarge { width: 8, height: 2, limit: 4 })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ImageData::from_file("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
