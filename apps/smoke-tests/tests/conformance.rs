use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use cutout_core::{
    remove_background, remove_background_with_events, ConfidenceBuffer, CutoutError, EventSink,
    PipelineEvent, PipelineEventType, PixelBuffer, SegmentationProvider,
};
use cutout_runtime_luma::LumaProvider;
use cutout_samples::SampleId;
use image::{Rgba, RgbaImage};

struct FixedProvider {
    values: Vec<f32>,
    delay: Duration,
}

#[async_trait]
impl SegmentationProvider for FixedProvider {
    async fn segment(&self, pixels: &PixelBuffer) -> Result<ConfidenceBuffer, CutoutError> {
        tokio::time::sleep(self.delay).await;
        ConfidenceBuffer::new(pixels.width(), pixels.height(), self.values.clone())
    }
}

struct FailingProvider;

#[async_trait]
impl SegmentationProvider for FailingProvider {
    async fn segment(&self, _pixels: &PixelBuffer) -> Result<ConfidenceBuffer, CutoutError> {
        Err(CutoutError::Segmentation("backend offline".to_string()))
    }
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl EventSink for CollectingSink {
    fn emit(&self, event: PipelineEvent) {
        self.events.lock().expect("event lock").push(event);
    }
}

fn gray_2x2_png() -> Result<Vec<u8>> {
    let img = RgbaImage::from_pixel(2, 2, Rgba([128, 128, 128, 255]));
    let buffer = PixelBuffer::from_rgba(2, 2, img.into_raw())?;
    cutout_image::encode_png(&buffer)
}

#[tokio::test]
async fn gray_scenario_through_real_decode_and_encode() -> Result<()> {
    let original = cutout_image::decode_rgba(&gray_2x2_png()?)?;
    let provider = FixedProvider {
        values: vec![0.9, 0.1, 0.5, 0.39],
        delay: Duration::ZERO,
    };

    let cutout = remove_background(&provider, &original, 0.4).await?;
    let alphas: Vec<u8> = (0..4).map(|i| cutout.rgba_at(i)[3]).collect();
    assert_eq!(alphas, vec![255, 0, 255, 0]);
    for i in 0..4 {
        let [r, g, b, _] = cutout.rgba_at(i);
        assert_eq!([r, g, b], [128, 128, 128]);
    }

    // The hard-edged alpha must survive a PNG round trip untouched.
    let reloaded = cutout_image::decode_rgba(&cutout_image::encode_png(&cutout)?)?;
    assert_eq!(reloaded, cutout);
    Ok(())
}

#[tokio::test]
async fn every_bundled_sample_produces_a_valid_cutout() -> Result<()> {
    let provider = LumaProvider::new();
    for sample in SampleId::all() {
        let original = cutout_image::decode_rgba(&cutout_samples::render_png(sample)?)?;
        let cutout = remove_background(&provider, &original, 0.4).await?;

        assert_eq!(cutout.width(), original.width());
        assert_eq!(cutout.height(), original.height());
        for i in 0..cutout.pixel_count() {
            let [r, g, b, a] = cutout.rgba_at(i);
            let [or, og, ob, _] = original.rgba_at(i);
            assert_eq!([r, g, b], [or, og, ob], "{}: rgb drifted at {}", sample, i);
            assert!(a == 0 || a == 255, "{}: soft alpha {} at {}", sample, a, i);
        }
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_do_not_cross_contaminate() -> Result<()> {
    // The slower request starts first, so completions arrive out of
    // submission order.
    let red = PixelBuffer::from_rgba(1, 2, vec![200, 0, 0, 255, 200, 0, 0, 255])?;
    let blue = PixelBuffer::from_rgba(1, 2, vec![0, 0, 200, 255, 0, 0, 200, 255])?;
    let slow = FixedProvider {
        values: vec![0.9, 0.1],
        delay: Duration::from_millis(50),
    };
    let fast = FixedProvider {
        values: vec![0.1, 0.9],
        delay: Duration::from_millis(5),
    };

    let (red_cutout, blue_cutout) = tokio::join!(
        remove_background(&slow, &red, 0.4),
        remove_background(&fast, &blue, 0.4),
    );
    let red_cutout = red_cutout?;
    let blue_cutout = blue_cutout?;

    assert_eq!(red_cutout.rgba_at(0), [200, 0, 0, 255]);
    assert_eq!(red_cutout.rgba_at(1), [200, 0, 0, 0]);
    assert_eq!(blue_cutout.rgba_at(0), [0, 0, 200, 0]);
    assert_eq!(blue_cutout.rgba_at(1), [0, 0, 200, 255]);
    Ok(())
}

#[tokio::test]
async fn failed_request_leaves_original_untouched_and_settles_events() -> Result<()> {
    let original = cutout_image::decode_rgba(&gray_2x2_png()?)?;
    let before = original.clone();
    let sink = CollectingSink::default();

    let err = remove_background_with_events(&FailingProvider, &original, 0.4, "gray", Some(&sink))
        .await
        .unwrap_err();
    assert!(matches!(err, CutoutError::Segmentation(_)));
    assert_eq!(original, before);

    let events = sink.events.lock().expect("event lock");
    let types: Vec<PipelineEventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            PipelineEventType::RequestStart,
            PipelineEventType::RequestError
        ]
    );
    Ok(())
}
