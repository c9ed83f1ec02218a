pub mod footer;
pub mod handlers;
pub mod header;
pub mod model_status;
pub mod preview_area;
pub mod results;
pub mod upload_section;
pub mod utils;
