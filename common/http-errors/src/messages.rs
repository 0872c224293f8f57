pub const BAD_REQUEST: &str = "bad request";
pub const EMAIL_ALREADY_EXISTS: &str = "email already exists";
pub const INTERNAL_SERVER_ERROR: &str = "internal server error";
pub const INVALID_CREDENTIALS: &str = "invalid credentials";
pub const UNAUTHORIZED: &str = "unauthorized";
pub const FORBIDDEN: &str = "forbidden";
pub const NOT_FOUND: &str = "data not found";

pub const SUCCESS_LOGIN: &str = "login successful";
pub const SUCCESS_REGISTER: &str = "registration successful";
pub const SUCCESS_LOGOUT: &str = "logout successful";
pub const SUCCESS_CREATE: &str = "created successfully";
pub const SUCCESS_UPDATE: &str = "updated successfully";
pub const SUCCESS_DELETE: &str = "deleted successfully";
pub const SUCCESS_RETRIEVE: &str = "retrieved successfully";
