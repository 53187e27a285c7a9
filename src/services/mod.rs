pub mod video_assets;

pub use video_assets::VideoAssetService;
