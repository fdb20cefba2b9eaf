mod admin;
mod storage;

pub use admin::health;
pub use storage::{
    complete_multipart_upload, initiate_multipart_upload, list_uploads, multipart_part_url,
    presigned_download_url, presigned_upload_url, presigned_view_url,
};
