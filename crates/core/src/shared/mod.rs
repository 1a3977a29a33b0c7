pub mod asset_resolver;
pub mod bounding_box;
pub mod constants;
pub mod detection_result;
pub mod frame;
