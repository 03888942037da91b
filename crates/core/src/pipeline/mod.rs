pub mod convert_config;
pub mod convert_video_use_case;
pub mod pipeline_logger;
