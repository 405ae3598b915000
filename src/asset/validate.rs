//! Signature checks for loaded asset bytes
//!
//! These are pass/fail sniffers, not decoders: a texture only has to carry a
//! plausible BMP header, a model only has to contain vertex and face lines.

use super::asset::{AssetError, AssetKind};

/// Size of the BMP file + info header
pub const BMP_HEADER_SIZE: usize = 54;
/// Largest accepted texture edge
pub const MAX_TEXTURE_DIM: i32 = 2048;
/// Size of a canonical RIFF/WAVE header
pub const WAV_HEADER_SIZE: usize = 44;

/// What validation learned about the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validated {
    Texture { width: u32, height: u32 },
    Model { vertices: usize, faces: usize },
    Sound,
    /// Kinds without a signature check
    Opaque,
}

/// Check `data` against the signature expected for `kind`
pub fn validate(kind: AssetKind, data: &[u8]) -> Result<Validated, AssetError> {
    match kind {
        AssetKind::Texture => validate_texture(data),
        AssetKind::Model => validate_model(data),
        AssetKind::Sound => validate_sound(data),
        AssetKind::Script
        | AssetKind::Material
        | AssetKind::Prefab
        | AssetKind::Animation => Ok(Validated::Opaque),
    }
}

fn read_i32_le(data: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    i32::from_le_bytes(bytes)
}

fn validate_texture(data: &[u8]) -> Result<Validated, AssetError> {
    let kind = AssetKind::Texture;
    if data.len() < BMP_HEADER_SIZE {
        return Err(AssetError::invalid(kind, format!(
            "{} bytes is too small for a BMP header", data.len()
        )));
    }
    if &data[0..2] != b"BM" {
        return Err(AssetError::invalid(kind, "missing BM signature"));
    }

    let width = read_i32_le(data, 18);
    let height = read_i32_le(data, 22);
    let in_range = |v: i32| v > 0 && v <= MAX_TEXTURE_DIM;
    if !in_range(width) || !in_range(height) {
        return Err(AssetError::invalid(kind, format!(
            "dimensions {}x{} outside 1..={}", width, height, MAX_TEXTURE_DIM
        )));
    }

    Ok(Validated::Texture { width: width as u32, height: height as u32 })
}

fn validate_model(data: &[u8]) -> Result<Validated, AssetError> {
    let mut vertices = 0;
    let mut faces = 0;
    for line in data.split(|&b| b == b'\n') {
        if line.starts_with(b"v ") {
            vertices += 1;
        } else if line.starts_with(b"f ") {
            faces += 1;
        }
    }

    if vertices == 0 || faces == 0 {
        return Err(AssetError::invalid(AssetKind::Model, format!(
            "expected vertex and face lines, found {} vertices and {} faces", vertices, faces
        )));
    }
    Ok(Validated::Model { vertices, faces })
}

fn validate_sound(data: &[u8]) -> Result<Validated, AssetError> {
    let kind = AssetKind::Sound;
    if data.len() < WAV_HEADER_SIZE {
        return Err(AssetError::invalid(kind, format!(
            "{} bytes is too small for a WAV header", data.len()
        )));
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(AssetError::invalid(kind, "missing RIFF/WAVE markers"));
    }
    Ok(Validated::Sound)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal BMP: 54-byte header followed by bottom-up BGR pixels
    pub(crate) fn bmp_bytes(width: i32, height: i32, pixels: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; BMP_HEADER_SIZE];
        data[0] = b'B';
        data[1] = b'M';
        data[18..22].copy_from_slice(&width.to_le_bytes());
        data[22..26].copy_from_slice(&height.to_le_bytes());
        data.extend_from_slice(pixels);
        data
    }

    pub(crate) fn wav_bytes() -> Vec<u8> {
        let mut data = vec![0u8; WAV_HEADER_SIZE];
        data[0..4].copy_from_slice(b"RIFF");
        data[8..12].copy_from_slice(b"WAVE");
        data
    }

    #[test]
    fn test_texture_header() {
        let ok = bmp_bytes(4, 2, &[0; 24]);
        assert_eq!(
            validate(AssetKind::Texture, &ok).unwrap(),
            Validated::Texture { width: 4, height: 2 }
        );

        let mut wrong_magic = ok.clone();
        wrong_magic[0] = b'P';
        assert!(validate(AssetKind::Texture, &wrong_magic).is_err());

        assert!(validate(AssetKind::Texture, &ok[..53]).is_err());
        assert!(validate(AssetKind::Texture, &bmp_bytes(0, 4, &[])).is_err());
        assert!(validate(AssetKind::Texture, &bmp_bytes(4, -4, &[])).is_err());
        assert!(validate(AssetKind::Texture, &bmp_bytes(2049, 4, &[])).is_err());
        assert!(validate(AssetKind::Texture, &bmp_bytes(2048, 2048, &[])).is_ok());
    }

    #[test]
    fn test_model_needs_vertices_and_faces() {
        let obj = b"# cube\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(
            validate(AssetKind::Model, obj).unwrap(),
            Validated::Model { vertices: 3, faces: 1 }
        );
        assert!(validate(AssetKind::Model, b"v 0 0 0\nv 1 1 1\n").is_err());
        assert!(validate(AssetKind::Model, b"f 1 2 3\n").is_err());
        // "vn"/"vt" lines are not vertices
        assert!(validate(AssetKind::Model, b"vn 0 1 0\nf 1 2 3\n").is_err());
    }

    #[test]
    fn test_sound_markers() {
        assert_eq!(validate(AssetKind::Sound, &wav_bytes()).unwrap(), Validated::Sound);
        let mut bad = wav_bytes();
        bad[8..12].copy_from_slice(b"AVI ");
        assert!(validate(AssetKind::Sound, &bad).is_err());
        assert!(validate(AssetKind::Sound, &wav_bytes()[..40]).is_err());
    }

    #[test]
    fn test_other_kinds_always_pass() {
        assert_eq!(validate(AssetKind::Script, b"").unwrap(), Validated::Opaque);
        assert_eq!(validate(AssetKind::Prefab, b"anything").unwrap(), Validated::Opaque);
    }
}
