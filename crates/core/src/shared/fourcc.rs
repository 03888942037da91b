use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FourCcError {
    #[error("codec identifier must be exactly four characters, got {0:?}")]
    Length(String),
    #[error("codec identifier must be ASCII alphanumeric, got {0:?}")]
    Charset(String),
    #[error("no encoder is known for codec identifier {0}")]
    Unsupported(FourCc),
}

/// Encoder families a four-character code can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoCodec {
    /// MPEG-4 Part 2 (XviD / DivX family).
    Mpeg4Part2,
    MotionJpeg,
    Ffv1,
    H264,
}

/// A four-character codec identifier such as `XVID` or `MJPG`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FourCc([u8; 4]);

impl FourCc {
    pub const XVID: FourCc = FourCc(*b"XVID");

    pub fn parse(code: &str) -> Result<Self, FourCcError> {
        let bytes: [u8; 4] = code
            .as_bytes()
            .try_into()
            .map_err(|_| FourCcError::Length(code.to_string()))?;
        if !bytes.iter().all(u8::is_ascii_alphanumeric) {
            return Err(FourCcError::Charset(code.to_string()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Little-endian packing used by container codec tags
    /// (`'X' | 'V' << 8 | 'I' << 16 | 'D' << 24`).
    pub fn tag(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    pub fn codec(&self) -> Result<VideoCodec, FourCcError> {
        let upper = self.0.map(|b| b.to_ascii_uppercase());
        match &upper {
            b"XVID" | b"DIVX" | b"DX50" | b"FMP4" | b"MP4V" => Ok(VideoCodec::Mpeg4Part2),
            b"MJPG" => Ok(VideoCodec::MotionJpeg),
            b"FFV1" => Ok(VideoCodec::Ffv1),
            b"H264" | b"AVC1" | b"X264" => Ok(VideoCodec::H264),
            _ => Err(FourCcError::Unsupported(*self)),
        }
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // parse() guarantees ASCII
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl FromStr for FourCc {
    type Err = FourCcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_and_display() {
        let code = FourCc::parse("XVID").unwrap();
        assert_eq!(code.to_string(), "XVID");
        assert_eq!(code.as_bytes(), *b"XVID");
    }

    #[test]
    fn test_xvid_constant_matches_parse() {
        assert_eq!(FourCc::XVID, FourCc::parse("XVID").unwrap());
    }

    #[test]
    fn test_tag_is_little_endian() {
        let code = FourCc::parse("XVID").unwrap();
        let expected =
            b'X' as u32 | (b'V' as u32) << 8 | (b'I' as u32) << 16 | (b'D' as u32) << 24;
        assert_eq!(code.tag(), expected);
    }

    #[rstest]
    #[case::too_short("XVI")]
    #[case::too_long("XVIDX")]
    #[case::empty("")]
    fn test_parse_rejects_wrong_length(#[case] code: &str) {
        assert!(matches!(FourCc::parse(code), Err(FourCcError::Length(_))));
    }

    #[test]
    fn test_parse_rejects_non_alphanumeric() {
        assert!(matches!(
            FourCc::parse("XV-D"),
            Err(FourCcError::Charset(_))
        ));
    }

    #[rstest]
    #[case("XVID", VideoCodec::Mpeg4Part2)]
    #[case("xvid", VideoCodec::Mpeg4Part2)]
    #[case("mp4v", VideoCodec::Mpeg4Part2)]
    #[case("MJPG", VideoCodec::MotionJpeg)]
    #[case("FFV1", VideoCodec::Ffv1)]
    #[case("avc1", VideoCodec::H264)]
    fn test_codec_mapping(#[case] code: &str, #[case] expected: VideoCodec) {
        assert_eq!(FourCc::parse(code).unwrap().codec().unwrap(), expected);
    }

    #[test]
    fn test_unknown_codec_is_unsupported() {
        let code: FourCc = "ABCD".parse().unwrap();
        assert_eq!(code.codec(), Err(FourCcError::Unsupported(code)));
    }
}
