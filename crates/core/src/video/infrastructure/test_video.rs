//! Synthetic video fixtures for ffmpeg round-trip tests.

use std::path::Path;

#[derive(Clone, Copy, Debug)]
pub enum Pattern {
    /// Uniform gray that brightens every frame.
    Solid,
    /// White filled rectangle on black, shifting right one pixel per frame.
    Rectangle,
}

fn pixel(pattern: Pattern, frame: usize, row: usize, col: usize, w: usize, h: usize) -> u8 {
    match pattern {
        Pattern::Solid => ((frame * 40) % 256) as u8,
        Pattern::Rectangle => {
            let (x0, y0) = (w / 4 + frame, h / 4);
            let (x1, y1) = (x0 + w / 2, y0 + h / 2);
            if (x0..x1).contains(&col) && (y0..y1).contains(&row) {
                255
            } else {
                0
            }
        }
    }
}

pub fn create_test_video(
    path: &Path,
    num_frames: usize,
    width: u32,
    height: u32,
    fps: i32,
    pattern: Pattern,
) {
    ffmpeg_next::init().unwrap();

    let mut octx = ffmpeg_next::format::output(path).unwrap();

    let global_header = octx
        .format()
        .flags()
        .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

    let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
    let mut ost = octx.add_stream(Some(codec)).unwrap();

    let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .unwrap();

    encoder_ctx.set_width(width);
    encoder_ctx.set_height(height);
    encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
    encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
    encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

    if global_header {
        encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
    }

    let mut encoder = encoder_ctx
        .open_with(ffmpeg_next::Dictionary::new())
        .unwrap();
    ost.set_parameters(&encoder);

    octx.write_header().unwrap();

    let ost_time_base = octx.stream(0).unwrap().time_base();

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        ffmpeg_next::format::Pixel::RGB24,
        width,
        height,
        ffmpeg_next::format::Pixel::YUV420P,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .unwrap();

    let (w, h) = (width as usize, height as usize);
    for i in 0..num_frames {
        let mut rgb_frame =
            ffmpeg_next::util::frame::video::Video::new(ffmpeg_next::format::Pixel::RGB24, width, height);
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        for row in 0..h {
            for col in 0..w {
                let value = pixel(pattern, i, row, col, w, h);
                let offset = row * stride + col * 3;
                data[offset..offset + 3].fill(value);
            }
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&rgb_frame, &mut yuv_frame).unwrap();
        yuv_frame.set_pts(Some(i as i64));

        encoder.send_frame(&yuv_frame).unwrap();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
            encoded.write_interleaved(&mut octx).unwrap();
        }
    }

    encoder.send_eof().unwrap();
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(0);
        encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
        encoded.write_interleaved(&mut octx).unwrap();
    }

    octx.write_trailer().unwrap();
}

/// Decodes `path` and returns `(frame_count, width, height)`.
pub fn count_frames(path: &Path) -> (usize, u32, u32) {
    use crate::video::domain::video_reader::VideoReader;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

    let mut reader = FfmpegReader::new();
    let meta = reader.open(path).unwrap();
    let count = reader.frames().map(|f| f.unwrap()).count();
    reader.close();
    (count, meta.width, meta.height)
}
