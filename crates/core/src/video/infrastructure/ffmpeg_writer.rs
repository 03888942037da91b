use std::path::Path;

use crate::shared::constants::OUTPUT_BIT_RATE;
use crate::shared::fourcc::{FourCc, VideoCodec};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// MPEG-4 Part 2 caps the time base denominator at 16 bits.
const MAX_RATE_TERM: i32 = 65_535;

/// Encodes video frames via ffmpeg-next.
///
/// The encoder is chosen from a four-character code. Incoming RGB frames
/// are converted (and rescaled if needed) to the encoder's pixel format,
/// so the output resolution is always the one given at `open`.
pub struct FfmpegWriter {
    codec: FourCc,
    bit_rate: usize,
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<SourceScaler>,
    pixel_format: ffmpeg_next::format::Pixel,
    width: u32,
    height: u32,
    time_base: ffmpeg_next::Rational,
    frame_count: usize,
    video_stream_index: usize,
}

/// Scaler bound to one source frame size.
struct SourceScaler {
    width: u32,
    height: u32,
    context: ffmpeg_next::software::scaling::Context,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            codec: FourCc::XVID,
            bit_rate: OUTPUT_BIT_RATE,
            octx: None,
            encoder: None,
            scaler: None,
            pixel_format: ffmpeg_next::format::Pixel::YUV420P,
            width: 0,
            height: 0,
            time_base: ffmpeg_next::Rational(1, 1),
            frame_count: 0,
            video_stream_index: 0,
        }
    }

    pub fn with_codec(mut self, codec: FourCc) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_bit_rate(mut self, bit_rate: usize) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    /// Number of frames accepted since `open`.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn scaler_for(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<&mut ffmpeg_next::software::scaling::Context, Box<dyn std::error::Error>> {
        let stale = self
            .scaler
            .as_ref()
            .map_or(true, |s| s.width != width || s.height != height);
        if stale {
            if width != self.width || height != self.height {
                log::debug!(
                    "Rescaling {width}x{height} frames to {}x{}",
                    self.width,
                    self.height
                );
            }
            let context = ffmpeg_next::software::scaling::Context::get(
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
                self.pixel_format,
                self.width,
                self.height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )?;
            self.scaler = Some(SourceScaler {
                width,
                height,
                context,
            });
        }
        let scaler = self.scaler.as_mut().ok_or("FfmpegWriter: scaler missing")?;
        Ok(&mut scaler.context)
    }

    /// Flushes the encoder and writes the trailer. No-op when not open.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Ok(());
        };
        encoder.send_eof()?;
        self.drain_packets()?;
        if let Some(octx) = self.octx.as_mut() {
            octx.write_trailer()?;
        }
        log::debug!("Finalized output after {} frames", self.frame_count);
        Ok(())
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let encoder = self.encoder.as_mut().ok_or("FfmpegWriter: not opened")?;
        let octx = self.octx.as_mut().ok_or("FfmpegWriter: not opened")?;
        let ost_time_base = octx
            .stream(self.video_stream_index)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_index);
            encoded.rescale_ts(self.time_base, ost_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let codec_id = encoder_id(self.codec.codec()?);
        let codec = ffmpeg_next::encoder::find(codec_id)
            .ok_or_else(|| format!("No encoder available for {} ({codec_id:?})", self.codec))?;

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);
        // AVI stores the four-character code verbatim; other containers
        // validate tags against their own tables.
        let tags_codec = octx.format().name() == "avi";

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        let pixel_format = pixel_format_for(codec_id);
        let rate = frame_rate(metadata.fps)?;
        let time_base = rate.invert();

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(pixel_format);
        encoder_ctx.set_time_base(time_base);
        encoder_ctx.set_frame_rate(Some(rate));
        encoder_ctx.set_bit_rate(self.bit_rate);

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        if tags_codec {
            unsafe {
                (*ost.parameters().as_mut_ptr()).codec_tag = self.codec.tag();
            }
        }

        self.video_stream_index = 0; // only stream

        octx.write_header()?;

        log::debug!(
            "Encoding {}x{} @ {rate} fps with {} ({codec_id:?}) to {}",
            metadata.width,
            metadata.height,
            self.codec,
            path.display()
        );

        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = None;
        self.pixel_format = pixel_format;
        self.width = metadata.width;
        self.height = metadata.height;
        self.time_base = time_base;
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.encoder.is_none() {
            return Err("FfmpegWriter: not opened".into());
        }
        if frame.channels() != 3 {
            return Err(format!(
                "FfmpegWriter: expected 3-channel RGB frame, got {} channels",
                frame.channels()
            )
            .into());
        }

        let (src_w, src_h) = (frame.width(), frame.height());
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            src_w,
            src_h,
        );

        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        let src = frame.data();
        let row_len = src_w as usize * 3;

        // Copy pixel data, respecting stride
        for row in 0..src_h as usize {
            let src_start = row * row_len;
            let dst_start = row * stride;
            data[dst_start..dst_start + row_len].copy_from_slice(&src[src_start..src_start + row_len]);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler_for(src_w, src_h)?.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(self.frame_count as i64));

        self.encoder
            .as_mut()
            .ok_or("FfmpegWriter: not opened")?
            .send_frame(&yuv_frame)?;
        self.drain_packets()?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let result = self.finish();
        self.octx = None;
        self.encoder = None;
        self.scaler = None;
        result
    }
}

/// Exact rational form of `fps` (e.g. 29.97 -> 2997/100), so fractional
/// rates are encoded as given instead of being rounded.
fn frame_rate(fps: f64) -> Result<ffmpeg_next::Rational, Box<dyn std::error::Error>> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(format!("FfmpegWriter: frame rate must be positive, got {fps}").into());
    }
    // SAFETY: av_d2q is a pure arithmetic function.
    let rate =
        ffmpeg_next::Rational::from(unsafe { ffmpeg_next::ffi::av_d2q(fps, MAX_RATE_TERM) });
    if rate.numerator() <= 0 || rate.denominator() <= 0 {
        return Err(format!("FfmpegWriter: frame rate {fps} cannot be represented").into());
    }
    Ok(rate)
}

fn encoder_id(codec: VideoCodec) -> ffmpeg_next::codec::Id {
    match codec {
        VideoCodec::Mpeg4Part2 => ffmpeg_next::codec::Id::MPEG4,
        VideoCodec::MotionJpeg => ffmpeg_next::codec::Id::MJPEG,
        VideoCodec::Ffv1 => ffmpeg_next::codec::Id::FFV1,
        VideoCodec::H264 => ffmpeg_next::codec::Id::H264,
    }
}

fn pixel_format_for(codec_id: ffmpeg_next::codec::Id) -> ffmpeg_next::format::Pixel {
    match codec_id {
        // mjpeg only accepts full-range input
        ffmpeg_next::codec::Id::MJPEG => ffmpeg_next::format::Pixel::YUVJ420P,
        _ => ffmpeg_next::format::Pixel::YUV420P,
    }
}
