//! Route paths, relative to [`API_PREFIX`].

/// Mount point of every API route.
pub const API_PREFIX: &str = "/api/v1";

pub const POST_AUTH_REGISTER: &str = "/auth/register";
pub const POST_AUTH_LOGIN: &str = "/auth/login";
pub const PATCH_AUTH_UPDATE_USER: &str = "/auth/updateUser";
pub const JOBS: &str = "/jobs";
pub const GET_JOBS_STATS: &str = "/jobs/stats";
pub const JOBS_ID: &str = "/jobs/{id}";
