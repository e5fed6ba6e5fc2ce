//! Pipeline tests with stub collaborators.

use dcmflow_object::meta::FileMetaTableBuilder;
use dcmflow_object::open_file;
use dcmflow_pixeldata::{
    render_window_leveled_jpeg, BoxedError, ColorModel, DecodedFrame, FrameDecoder, ImageScaler,
    JpegEncoder, Raster, RenderOptions, Rgb8Raster, ScaleMode,
};
use std::path::Path;

/// A decoder producing a fixed 2x2 12-bit frame.
struct StubDecoder {
    samples: Vec<u16>,
}

impl FrameDecoder for StubDecoder {
    fn decode(&self, _path: &Path, _frame: u32) -> Result<DecodedFrame, BoxedError> {
        Ok(DecodedFrame {
            raster: Raster {
                width: 2,
                height: 2,
                samples: self.samples.clone(),
            },
            color_model: ColorModel {
                bits_stored: 12,
                signed: false,
                samples_per_pixel: 1,
                planar: 0,
                pixel_size: 16,
            },
        })
    }
}

/// A scaler which only supports the identity transformation.
struct IdentityScaler;

impl ImageScaler for IdentityScaler {
    fn scale(&self, image: &Rgb8Raster, _sx: f64, _sy: f64, _mode: ScaleMode) -> Rgb8Raster {
        image.clone()
    }
}

/// An "encoder" which hands the raw RGB bytes back,
/// so the test can inspect the painted raster.
struct PassthroughEncoder;

impl JpegEncoder for PassthroughEncoder {
    fn encode(&self, image: &Rgb8Raster, _quality: i32) -> Result<Vec<u8>, BoxedError> {
        Ok(image.data.clone())
    }
}

/// Build a Part 10 file with rendition attributes and a small
/// OW pixel data element.
fn image_file(dir: &Path, extra_dataset: &[u8]) -> std::path::PathBuf {
    let meta = FileMetaTableBuilder::new()
        .information_version([0, 1])
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.2".to_owned())
        .media_storage_sop_instance_uid("1.2.3.4".to_owned())
        .transfer_syntax("1.2.840.10008.1.2.1".to_owned())
        .build()
        .unwrap();
    let mut bytes = vec![0u8; 128];
    meta.write_to(&mut bytes).unwrap();
    bytes.extend_from_slice(extra_dataset);
    // (7FE0,0010) OW 8, dummy samples (decoding is stubbed)
    bytes.extend_from_slice(&[
        0xE0, 0x7F, 0x10, 0x00, b'O', b'W', 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, //
        0, 0, 0, 0, 0, 0, 0, 0,
    ]);
    let path = dir.join("frame.dcm");
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn window_level_maps_samples_to_gray() {
    let dir = tempfile::tempdir().unwrap();
    // RescaleIntercept -1024, RescaleSlope 1
    let dataset: &[u8] = &[
        // (0028,1052) DS 6 "-1024 "
        0x28, 0x00, 0x52, 0x10, b'D', b'S', 0x06, 0x00, b'-', b'1', b'0', b'2', b'4', b' ', //
        // (0028,1053) DS 2 "1 "
        0x28, 0x00, 0x53, 0x10, b'D', b'S', 0x02, 0x00, b'1', b' ',
    ];
    let path = image_file(dir.path(), dataset);
    let obj = open_file(&path).unwrap();
    assert!(obj.is_image());

    let decoder = StubDecoder {
        samples: vec![0, 974, 1024, 1074],
    };
    let rendered = render_window_leveled_jpeg(
        &obj,
        &decoder,
        &IdentityScaler,
        &PassthroughEncoder,
        RenderOptions {
            frame: 0,
            width: -1,
            height: -1,
            quality: -1,
            // 0 HU center, 100 HU width: pixel units 1024 / 100
            window_level: 0,
            window_width: 100,
        },
    )
    .unwrap();

    assert_eq!(rendered.width, 2);
    assert_eq!(rendered.height, 2);
    // gray values per sample: below, ramp start, middle, top
    let grays: Vec<u8> = rendered.data.chunks_exact(3).map(|px| px[0]).collect();
    assert_eq!(grays[0], 0);
    assert_eq!(grays[1], 0);
    assert!((120..=135).contains(&grays[2]), "midpoint was {}", grays[2]);
    assert_eq!(grays[3], 255);
    // all channels carry the same gray
    for px in rendered.data.chunks_exact(3) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }
}

#[test]
fn inverse_presentation_lut_flips_the_output() {
    let dir = tempfile::tempdir().unwrap();
    let dataset: &[u8] = &[
        // (2050,0020) CS 8 "INVERSE "
        0x50, 0x20, 0x20, 0x00, b'C', b'S', 0x08, 0x00, //
        b'I', b'N', b'V', b'E', b'R', b'S', b'E', b' ',
    ];
    let path = image_file(dir.path(), dataset);
    let obj = open_file(&path).unwrap();

    let decoder = StubDecoder {
        samples: vec![0, 0, 4095, 4095],
    };
    let rendered = render_window_leveled_jpeg(
        &obj,
        &decoder,
        &IdentityScaler,
        &PassthroughEncoder,
        RenderOptions {
            frame: 0,
            width: -1,
            height: -1,
            quality: -1,
            window_level: 2048,
            window_width: 1000,
        },
    )
    .unwrap();

    let grays: Vec<u8> = rendered.data.chunks_exact(3).map(|px| px[0]).collect();
    // low samples render bright, high samples render dark
    assert_eq!(grays[0], 255);
    assert_eq!(grays[3], 0);
}

#[test]
fn rendering_a_non_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let meta = FileMetaTableBuilder::new()
        .information_version([0, 1])
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7".to_owned())
        .media_storage_sop_instance_uid("1.2.3.4".to_owned())
        .transfer_syntax("1.2.840.10008.1.2.1".to_owned())
        .build()
        .unwrap();
    let mut bytes = vec![0u8; 128];
    meta.write_to(&mut bytes).unwrap();
    // (0008,0060) CS 2 "CT", no pixel data
    bytes.extend_from_slice(&[0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'C', b'T']);
    let path = dir.path().join("noimage.dcm");
    std::fs::write(&path, bytes).unwrap();

    let obj = open_file(&path).unwrap();
    let decoder = StubDecoder { samples: vec![] };
    let result = render_window_leveled_jpeg(
        &obj,
        &decoder,
        &IdentityScaler,
        &PassthroughEncoder,
        RenderOptions {
            frame: 0,
            width: -1,
            height: -1,
            quality: -1,
            window_level: 0,
            window_width: 100,
        },
    );
    assert!(result.is_err());
}
