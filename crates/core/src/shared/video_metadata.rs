use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count reported (or estimated) by the container; 0 if unknown.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Metadata describing an encoded output stream.
    pub fn for_output(width: u32, height: u32, fps: f64, codec: &str) -> Self {
        Self {
            width,
            height,
            fps,
            total_frames: 0,
            codec: codec.to_string(),
            source_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let meta = VideoMetadata {
            width: 480,
            height: 360,
            fps: 30.0,
            total_frames: 6572,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("/tmp/test.mp4")),
        };
        assert_eq!(meta.width, 480);
        assert_eq!(meta.height, 360);
        assert_eq!(meta.fps, 30.0);
        assert_eq!(meta.total_frames, 6572);
        assert_eq!(meta.codec, "h264");
        assert_eq!(meta.source_path, Some(PathBuf::from("/tmp/test.mp4")));
    }

    #[test]
    fn test_for_output_has_no_source() {
        let meta = VideoMetadata::for_output(640, 480, 30.0, "XVID");
        assert_eq!(meta.width, 640);
        assert_eq!(meta.height, 480);
        assert_eq!(meta.codec, "XVID");
        assert_eq!(meta.total_frames, 0);
        assert!(meta.source_path.is_none());
    }
}
