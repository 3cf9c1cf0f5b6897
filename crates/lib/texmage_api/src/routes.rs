//! Route paths, relative to the server root.

pub const GET_HEALTH: &str = "/health";
pub const POST_SIGNUP: &str = "/signup";
pub const POST_LOGIN: &str = "/login";
pub const GET_CREDITS: &str = "/credits";
pub const POST_IMAGE_GENERATE: &str = "/image/generate-image";
