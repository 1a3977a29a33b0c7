pub mod v4l2_source;

