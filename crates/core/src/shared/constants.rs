pub const CASCADE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const CASCADE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

pub const LABEL_FONT_NAME: &str = "JetBrainsMono-Regular.ttf";
pub const LABEL_FONT_URL: &str =
    "https://github.com/JetBrains/JetBrainsMono/raw/master/fonts/ttf/JetBrainsMono-Regular.ttf";

/// Smallest face the cascade will report, in pixels per side.
pub const DEFAULT_MIN_FACE_SIZE: u32 = 80;

/// Cascade score cut-off; higher values reject more candidate windows.
pub const DEFAULT_SCORE_THRESH: f64 = 2.0;

/// Per-level shrink ratio of the detection image pyramid.
pub const DEFAULT_PYRAMID_SCALE_FACTOR: f32 = 0.8;

/// Sliding window step in x and y.
pub const DEFAULT_SLIDE_WINDOW_STEP: (u32, u32) = (4, 4);

pub const DEFAULT_LABEL_PREFIX: &str = "People in frame: ";
